//! Output formatting for CLI commands.

use std::fmt::Write as _;

use serde::Serialize;

use crate::cafe::{Cafe, CafeId, Currency, PriceRange};
use crate::chat::CafeContext;
use crate::cli::args::{CafeScoutArgs, OutputFormat};
use crate::error::Result;
use crate::location::ResolvedLocation;
use crate::recommend::{MaxDistance, ScoredCafe, UserPreferences};
use crate::repository::UserProfile;
use crate::review::{CategoryRatings, RankedReview, Review};

/// Anything a command prints.
pub trait HumanReadable {
    fn to_human(&self) -> String;
}

/// One café as listed by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CafeRow {
    pub id: CafeId,
    pub name: String,
    pub address: String,
    pub rating: f64,
    pub reviews: u32,
    pub price_range: PriceRange,
    pub price_label: &'static str,
    pub distance_km: Option<f64>,
    pub tags: Vec<String>,
}

impl CafeRow {
    pub fn new(cafe: &Cafe, currency: Currency) -> Self {
        CafeRow {
            id: cafe.id,
            name: cafe.name.clone(),
            address: cafe.address.clone(),
            rating: cafe.rating,
            reviews: cafe.review_count,
            price_range: cafe.price_range,
            price_label: cafe.price_range.label(currency),
            distance_km: cafe.distance,
            tags: cafe.tags.clone(),
        }
    }

    fn write_human(&self, out: &mut String, rank: usize) {
        let distance = match self.distance_km {
            Some(km) => format!("{km:.1}km"),
            None => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "{rank}. {} [{}]  ★{:.1} ({} reviews)  {}  {}",
            self.name, self.id, self.rating, self.reviews, distance, self.price_label
        );
        if !self.address.is_empty() {
            let _ = writeln!(out, "   {}", self.address);
        }
        if !self.tags.is_empty() {
            let _ = writeln!(out, "   tags: {}", self.tags.join(", "));
        }
    }
}

/// Where results were measured from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSummary {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub is_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&ResolvedLocation> for LocationSummary {
    fn from(location: &ResolvedLocation) -> Self {
        LocationSummary {
            name: location.name.clone(),
            lat: location.point.lat,
            lng: location.point.lng,
            is_fallback: location.is_fallback,
            error: location.error.clone(),
        }
    }
}

fn write_location(out: &mut String, location: Option<&LocationSummary>) {
    match location {
        Some(loc) => {
            let _ = writeln!(out, "Location: {} ({:.4}, {:.4})", loc.name, loc.lat, loc.lng);
            if let Some(error) = &loc.error {
                let _ = writeln!(out, "  {error}");
            }
        }
        None => {
            let _ = writeln!(out, "Location: unknown");
        }
    }
}

/// Result structure for search operations.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub sort: String,
    pub location: Option<LocationSummary>,
    pub total_hits: usize,
    pub cafes: Vec<CafeRow>,
}

impl HumanReadable for SearchOutput {
    fn to_human(&self) -> String {
        let mut out = String::new();
        write_location(&mut out, self.location.as_ref());
        let _ = writeln!(
            out,
            "Search Results ({} found, sorted by {}):",
            self.total_hits, self.sort
        );
        let _ = writeln!(out, "═══════════════");
        if self.cafes.is_empty() {
            let _ = writeln!(out, "No cafés match.");
        }
        for (i, row) in self.cafes.iter().enumerate() {
            row.write_human(&mut out, i + 1);
        }
        out
    }
}

/// Result structure for recommendations.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendOutput {
    pub location: Option<LocationSummary>,
    pub personalized: bool,
    pub recommendations: Vec<RecommendationRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationRow {
    pub score: f64,
    #[serde(flatten)]
    pub cafe: CafeRow,
}

impl RecommendationRow {
    pub fn new(scored: &ScoredCafe, currency: Currency) -> Self {
        RecommendationRow {
            score: scored.score,
            cafe: CafeRow::new(&scored.cafe, currency),
        }
    }
}

impl HumanReadable for RecommendOutput {
    fn to_human(&self) -> String {
        let mut out = String::new();
        write_location(&mut out, self.location.as_ref());
        if self.personalized {
            let _ = writeln!(out, "Recommended for you:");
        } else {
            let _ = writeln!(out, "Top rated (set preferences for personal picks):");
        }
        let _ = writeln!(out, "═══════════════");
        for (i, row) in self.recommendations.iter().enumerate() {
            row.cafe.write_human(&mut out, i + 1);
            let _ = writeln!(out, "   score: {:.2}", row.score);
        }
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DistanceOutput {
    pub from: [f64; 2],
    pub to: [f64; 2],
    pub distance_km: f64,
}

impl HumanReadable for DistanceOutput {
    fn to_human(&self) -> String {
        format!("{:.3} km\n", self.distance_km)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CafeAddedOutput {
    pub cafe: CafeRow,
    pub lat: f64,
    pub lng: f64,
}

impl HumanReadable for CafeAddedOutput {
    fn to_human(&self) -> String {
        let mut out = String::from("Café added:\n");
        self.cafe.write_human(&mut out, 1);
        let _ = writeln!(out, "   at ({:.6}, {:.6})", self.lat, self.lng);
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoriteToggleOutput {
    pub cafe_id: CafeId,
    pub name: String,
    pub favorite: bool,
}

impl HumanReadable for FavoriteToggleOutput {
    fn to_human(&self) -> String {
        if self.favorite {
            format!("Added {} to favorites\n", self.name)
        } else {
            format!("Removed {} from favorites\n", self.name)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoritesOutput {
    pub cafes: Vec<CafeRow>,
}

impl HumanReadable for FavoritesOutput {
    fn to_human(&self) -> String {
        let mut out = String::new();
        if self.cafes.is_empty() {
            out.push_str("No favorites yet.\n");
        }
        for (i, row) in self.cafes.iter().enumerate() {
            row.write_human(&mut out, i + 1);
        }
        out
    }
}

fn write_review(out: &mut String, review: &Review, likes: u32) {
    let date = review
        .date()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let _ = writeln!(
        out,
        "★{:.1} {} {}  ♥{}  [{}]",
        review.rating, review.user_name, date, likes, review.id
    );
    let _ = writeln!(out, "   {}", review.text);
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewAddedOutput {
    pub review: Review,
}

impl HumanReadable for ReviewAddedOutput {
    fn to_human(&self) -> String {
        let mut out = String::from("Review posted:\n");
        write_review(&mut out, &self.review, self.review.likes);
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewLikeOutput {
    pub review_id: String,
    pub liked: bool,
    pub likes: u32,
}

impl HumanReadable for ReviewLikeOutput {
    fn to_human(&self) -> String {
        let verb = if self.liked { "Liked" } else { "Unliked" };
        format!("{verb} review {} ({} likes)\n", self.review_id, self.likes)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewListOutput {
    pub cafe_id: CafeId,
    pub cafe_name: String,
    pub sort: String,
    /// Review counts for 5★ down to 1★.
    pub distribution: [usize; 5],
    pub averages: Option<CategoryRatings>,
    pub reviews: Vec<RankedReview>,
}

impl HumanReadable for ReviewListOutput {
    fn to_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} ({} reviews)", self.cafe_name, self.reviews.len());
        for (i, count) in self.distribution.iter().enumerate() {
            let _ = writeln!(out, "  {}★ {}", 5 - i, count);
        }
        if let Some(avg) = &self.averages {
            let _ = writeln!(
                out,
                "  drinks {:.1} / food {:.1} / service {:.1} / atmosphere {:.1}",
                avg.drinks, avg.food, avg.service, avg.atmosphere
            );
        }
        let _ = writeln!(out, "───────────── sorted by {}", self.sort);
        for ranked in &self.reviews {
            write_review(&mut out, &ranked.review, ranked.current_likes);
        }
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PreferencesOutput {
    pub preferences: Option<UserPreferences>,
    /// Radius quoted for the "any" distance setting.
    pub any_distance_km: f64,
}

impl HumanReadable for PreferencesOutput {
    fn to_human(&self) -> String {
        let Some(prefs) = &self.preferences else {
            return "No preferences saved.\n".to_string();
        };
        let join = |items: Vec<String>| {
            if items.is_empty() {
                "-".to_string()
            } else {
                items.join(", ")
            }
        };
        let mut out = String::new();
        let types = prefs.cafe_types.iter().map(|t| t.to_string()).collect();
        let prices = prefs.price_range.iter().map(|p| p.to_string()).collect();
        let amenities = prefs.amenities.iter().map(|a| a.to_string()).collect();
        let _ = writeln!(out, "types: {}", join(types));
        let _ = writeln!(out, "prices: {}", join(prices));
        let max_distance = match prefs.max_distance {
            MaxDistance::Any => format!("any (up to {} km)", self.any_distance_km),
            MaxDistance::Km(km) => format!("{km} km"),
        };
        let _ = writeln!(out, "max distance: {max_distance}");
        let _ = writeln!(out, "amenities: {}", join(amenities));
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileOutput {
    pub profile: UserProfile,
    pub currency: Currency,
}

impl HumanReadable for ProfileOutput {
    fn to_human(&self) -> String {
        let or_dash = |value: &str| {
            if value.trim().is_empty() {
                "-".to_string()
            } else {
                value.to_string()
            }
        };
        let mut out = String::new();
        let _ = writeln!(out, "name: {}", or_dash(&self.profile.name));
        let _ = writeln!(out, "email: {}", or_dash(&self.profile.email));
        let _ = writeln!(out, "phone: {}", or_dash(&self.profile.phone));
        let _ = writeln!(out, "avatar: {}", or_dash(self.profile.avatar().unwrap_or("")));
        let _ = writeln!(out, "currency: {}", self.currency);
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatContextOutput {
    pub user_location: String,
    pub cafes: Vec<CafeContext>,
}

impl HumanReadable for ChatContextOutput {
    fn to_human(&self) -> String {
        let cafes = serde_json::to_string_pretty(&self.cafes).unwrap_or_default();
        format!("{}\n\n{}\n", self.user_location, cafes)
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanReadable>(result: &T, args: &CafeScoutArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            print!("{}", result.to_human());
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

fn output_json<T: Serialize>(result: &T, args: &CafeScoutArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> CafeRow {
        let cafe = Cafe::new(5, "Maison Marou", 21.02, 105.85)
            .with_address("91 Thợ Nhuộm")
            .with_rating(4.9)
            .with_price_range(PriceRange::Expensive)
            .with_tags(["chocolate"])
            .with_distance(1.234);
        CafeRow::new(&cafe, Currency::Vnd)
    }

    #[test]
    fn test_cafe_row_human() {
        let mut out = String::new();
        row().write_human(&mut out, 1);
        assert!(out.starts_with("1. Maison Marou [5]  ★4.9 (0 reviews)  1.2km  > 200.000 VND\n"));
        assert!(out.contains("   91 Thợ Nhuộm\n"));
        assert!(out.contains("   tags: chocolate\n"));
    }

    #[test]
    fn test_search_output_empty() {
        let output = SearchOutput {
            query: "zzz".to_string(),
            sort: "rating".to_string(),
            location: None,
            total_hits: 0,
            cafes: Vec::new(),
        };
        let text = output.to_human();
        assert!(text.contains("Location: unknown"));
        assert!(text.contains("No cafés match."));
    }

    #[test]
    fn test_cafe_row_json() {
        let value = serde_json::to_value(row()).unwrap();
        assert_eq!(value["price_label"], "> 200.000 VND");
        assert_eq!(value["price_range"], "expensive");
        assert_eq!(value["id"], 5);
    }

    #[test]
    fn test_preferences_output() {
        assert_eq!(
            PreferencesOutput {
                preferences: None,
                any_distance_km: 100.0,
            }
            .to_human(),
            "No preferences saved.\n"
        );
        let text = PreferencesOutput {
            preferences: Some(UserPreferences::default()),
            any_distance_km: 100.0,
        }
        .to_human();
        assert!(text.contains("types: -"));
        assert!(text.contains("max distance: 5 km"));

        let any = UserPreferences {
            max_distance: MaxDistance::Any,
            ..Default::default()
        };
        let text = PreferencesOutput {
            preferences: Some(any),
            any_distance_km: 80.0,
        }
        .to_human();
        assert!(text.contains("max distance: any (up to 80 km)"));
    }

    #[test]
    fn test_profile_output() {
        let output = ProfileOutput {
            profile: UserProfile {
                name: "Linh".to_string(),
                ..Default::default()
            },
            currency: Currency::Jpy,
        };
        let text = output.to_human();
        assert!(text.contains("name: Linh\n"));
        assert!(text.contains("email: -\n"));
        assert!(text.contains("currency: JPY\n"));

        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["currency"], "JPY");
        assert_eq!(value["profile"]["name"], "Linh");
    }
}
