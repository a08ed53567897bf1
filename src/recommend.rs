//! Preference-based café recommendations.
//!
//! Scoring weights:
//!
//! | signal | points |
//! |---|---|
//! | price tier is one of the preferred tiers | 3 |
//! | each preferred café type found in the tags | 2 |
//! | each preferred amenity found in the tags | 1 |
//! | distance within `maxDistance` (always when "any") | 1 |
//! | rating | rating / 10 |

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::cafe::{Cafe, PriceRange};
use crate::error::CafeScoutError;
use crate::filter::TagCategory;
use crate::util::sort::{cmp_f64, stable_sort_by};

/// Number of recommendations shown on the home page.
pub const DEFAULT_TOP_N: usize = 5;

/// Kind of café a user is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CafeType {
    Dog,
    Cat,
    Work,
    Quiet,
}

impl CafeType {
    pub fn category(self) -> TagCategory {
        match self {
            CafeType::Dog => TagCategory::Dog,
            CafeType::Cat => TagCategory::Cat,
            CafeType::Work => TagCategory::Work,
            CafeType::Quiet => TagCategory::Quiet,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CafeType::Dog => "dog",
            CafeType::Cat => "cat",
            CafeType::Work => "work",
            CafeType::Quiet => "quiet",
        }
    }
}

impl fmt::Display for CafeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CafeType {
    type Err = CafeScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dog" => Ok(CafeType::Dog),
            "cat" => Ok(CafeType::Cat),
            "work" => Ok(CafeType::Work),
            "quiet" => Ok(CafeType::Quiet),
            other => Err(CafeScoutError::invalid_argument(format!("unknown café type: {other}"))),
        }
    }
}

/// Facility a user wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Amenity {
    Wifi,
    Outlets,
    Outdoor,
}

impl Amenity {
    pub fn category(self) -> TagCategory {
        match self {
            Amenity::Wifi => TagCategory::Wifi,
            Amenity::Outlets => TagCategory::PowerOutlets,
            Amenity::Outdoor => TagCategory::Outdoor,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Amenity::Wifi => "wifi",
            Amenity::Outlets => "outlets",
            Amenity::Outdoor => "outdoor",
        }
    }
}

impl fmt::Display for Amenity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Amenity {
    type Err = CafeScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wifi" => Ok(Amenity::Wifi),
            "outlets" => Ok(Amenity::Outlets),
            "outdoor" => Ok(Amenity::Outdoor),
            other => Err(CafeScoutError::invalid_argument(format!("unknown amenity: {other}"))),
        }
    }
}

/// Preferred maximum distance.
///
/// Stored as the string `"any"` or a number of kilometers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaxDistance {
    Any,
    Km(f64),
}

impl Default for MaxDistance {
    fn default() -> Self {
        MaxDistance::Km(5.0)
    }
}

impl MaxDistance {
    /// Whether a café at `distance` (if known) is close enough.
    pub fn admits(self, distance: Option<f64>) -> bool {
        match (self, distance) {
            (MaxDistance::Any, _) => true,
            (MaxDistance::Km(max), Some(d)) => d <= max,
            (MaxDistance::Km(_), None) => false,
        }
    }
}

impl fmt::Display for MaxDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxDistance::Any => f.write_str("any"),
            MaxDistance::Km(km) => write!(f, "{km}"),
        }
    }
}

impl FromStr for MaxDistance {
    type Err = CafeScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("any") {
            return Ok(MaxDistance::Any);
        }
        match s.parse::<f64>() {
            Ok(km) if km.is_finite() && km >= 0.0 => Ok(MaxDistance::Km(km)),
            _ => Err(CafeScoutError::invalid_argument(format!(
                "max distance must be \"any\" or a non-negative number: {s}"
            ))),
        }
    }
}

impl Serialize for MaxDistance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MaxDistance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(km) => Ok(MaxDistance::Km(km)),
            Repr::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// What the user told us they like.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub cafe_types: BTreeSet<CafeType>,
    pub price_range: BTreeSet<PriceRange>,
    pub max_distance: MaxDistance,
    pub amenities: BTreeSet<Amenity>,
}

impl UserPreferences {
    /// No type, price or amenity selected. `max_distance` alone does not count.
    pub fn is_empty(&self) -> bool {
        self.cafe_types.is_empty() && self.price_range.is_empty() && self.amenities.is_empty()
    }

    /// Preference score of `cafe`.
    pub fn score(&self, cafe: &Cafe) -> f64 {
        let mut score = 0.0;

        if self.price_range.contains(&cafe.price_range) {
            score += 3.0;
        }

        for cafe_type in &self.cafe_types {
            if cafe_type.category().matches(cafe) {
                score += 2.0;
            }
        }

        for amenity in &self.amenities {
            if amenity.category().matches(cafe) {
                score += 1.0;
            }
        }

        if self.max_distance.admits(cafe.distance) {
            score += 1.0;
        }

        score + cafe.rating / 10.0
    }
}

/// A café with its preference score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCafe {
    pub cafe: Cafe,
    pub score: f64,
}

/// Top `top_n` cafés with their scores.
///
/// Without preferences (or with empty ones) the score is the rating and
/// the result is simply the best-rated cafés. Equal scores keep input order.
pub fn recommend_scored(
    cafes: &[Cafe],
    preferences: Option<&UserPreferences>,
    top_n: usize,
) -> Vec<ScoredCafe> {
    let mut scored: Vec<ScoredCafe> = match preferences.filter(|p| !p.is_empty()) {
        Some(prefs) => cafes
            .iter()
            .map(|cafe| ScoredCafe {
                score: prefs.score(cafe),
                cafe: cafe.clone(),
            })
            .collect(),
        None => {
            debug!("no preferences set, recommending by rating");
            cafes
                .iter()
                .map(|cafe| ScoredCafe {
                    score: cafe.rating,
                    cafe: cafe.clone(),
                })
                .collect()
        }
    };

    stable_sort_by(&mut scored, |a, b| cmp_f64(b.score, a.score));
    scored.truncate(top_n);
    scored
}

/// Top `top_n` cafés for `preferences`.
pub fn recommend(
    cafes: &[Cafe],
    preferences: Option<&UserPreferences>,
    top_n: usize,
) -> Vec<Cafe> {
    recommend_scored(cafes, preferences, top_n)
        .into_iter()
        .map(|scored| scored.cafe)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(cafes: &[Cafe]) -> Vec<u64> {
        cafes.iter().map(|c| c.id.0).collect()
    }

    #[test]
    fn test_no_preferences_returns_top_rated() {
        let cafes: Vec<Cafe> = (1..=8)
            .map(|i| Cafe::new(i, format!("C{i}"), 0.0, 0.0).with_rating(i as f64 / 2.0))
            .collect();
        let top = recommend(&cafes, None, 5);
        assert_eq!(ids(&top), vec![8, 7, 6, 5, 4]);

        let empty = UserPreferences::default();
        assert_eq!(ids(&recommend(&cafes, Some(&empty), 5)), vec![8, 7, 6, 5, 4]);
    }

    #[test]
    fn test_price_preference_dominates_rating() {
        let cafes = vec![
            Cafe::new(1, "pricey", 0.0, 0.0)
                .with_price_range(PriceRange::Expensive)
                .with_rating(4.9),
            Cafe::new(2, "cheap", 0.0, 0.0)
                .with_price_range(PriceRange::Cheap)
                .with_rating(4.0),
        ];
        let prefs = UserPreferences {
            price_range: [PriceRange::Cheap].into_iter().collect(),
            ..UserPreferences::default()
        };
        assert_eq!(ids(&recommend(&cafes, Some(&prefs), 5)), vec![2, 1]);
    }

    #[test]
    fn test_score_components() {
        let cafe = Cafe::new(1, "Dog & Bee", 0.0, 0.0)
            .with_price_range(PriceRange::Moderate)
            .with_tags(["犬カフェ", "屋外席", "Wi-Fi"])
            .with_rating(4.4)
            .with_distance(2.7);
        let prefs = UserPreferences {
            cafe_types: [CafeType::Dog, CafeType::Cat].into_iter().collect(),
            price_range: [PriceRange::Moderate].into_iter().collect(),
            max_distance: MaxDistance::Km(3.0),
            amenities: [Amenity::Outdoor, Amenity::Outlets].into_iter().collect(),
        };
        // 3 (price) + 2 (dog) + 1 (outdoor) + 1 (distance) + 0.44
        assert!((prefs.score(&cafe) - 7.44).abs() < 1e-9);
    }

    #[test]
    fn test_max_distance_any_is_unconditional() {
        assert!(MaxDistance::Any.admits(None));
        assert!(MaxDistance::Any.admits(Some(500.0)));
        assert!(MaxDistance::Km(5.0).admits(Some(5.0)));
        assert!(!MaxDistance::Km(5.0).admits(Some(5.1)));
        assert!(!MaxDistance::Km(5.0).admits(None));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let cafes = vec![
            Cafe::new(1, "A", 0.0, 0.0).with_rating(4.0),
            Cafe::new(2, "B", 0.0, 0.0).with_rating(4.0),
            Cafe::new(3, "C", 0.0, 0.0).with_rating(4.0),
        ];
        let prefs = UserPreferences {
            amenities: [Amenity::Wifi].into_iter().collect(),
            ..UserPreferences::default()
        };
        assert_eq!(ids(&recommend(&cafes, Some(&prefs), 2)), vec![1, 2]);
    }

    #[test]
    fn test_preferences_serde_shape() {
        let json = r#"{
            "cafeTypes": ["dog", "work"],
            "priceRange": ["cheap"],
            "maxDistance": "any",
            "amenities": ["wifi"]
        }"#;
        let prefs: UserPreferences = serde_json::from_str(json).unwrap();
        assert_eq!(prefs.max_distance, MaxDistance::Any);
        assert!(prefs.cafe_types.contains(&CafeType::Work));

        let numeric: UserPreferences = serde_json::from_str(r#"{"maxDistance":"3"}"#).unwrap();
        assert_eq!(numeric.max_distance, MaxDistance::Km(3.0));
        assert!(numeric.is_empty());

        let out = serde_json::to_string(&prefs).unwrap();
        assert!(out.contains("\"maxDistance\":\"any\""));
    }

    #[test]
    fn test_max_distance_parse() {
        assert_eq!("ANY".parse::<MaxDistance>().unwrap(), MaxDistance::Any);
        assert_eq!("10".parse::<MaxDistance>().unwrap(), MaxDistance::Km(10.0));
        assert!("-1".parse::<MaxDistance>().is_err());
        assert!("far".parse::<MaxDistance>().is_err());
    }
}
