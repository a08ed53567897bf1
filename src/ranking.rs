//! The search pipeline: distance annotation, filtering and sorting.
//!
//! Everything here is a pure function of its arguments. Input cafés are
//! never mutated; results are fresh copies carrying the distance computed
//! for this call.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::cafe::Cafe;
use crate::error::CafeScoutError;
use crate::filter::{CafeFilter, FilterSet};
use crate::geo::GeoPoint;
use crate::util::sort::{cmp_f64, stable_sort_by};

/// Distances closer than this are a tie under [`SortMode::ByDistance`].
pub const DISTANCE_TIE_TOLERANCE_KM: f64 = 0.1;

/// Result ordering selected in the filter panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortMode {
    /// Rating descending, then distance ascending.
    #[default]
    #[serde(rename = "rating")]
    ByRating,
    /// Distance ascending; within the tie tolerance, rating descending.
    #[serde(rename = "distance")]
    ByDistance,
    /// Cheapest tier first, then rating descending.
    #[serde(rename = "price-low")]
    ByPriceAscending,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::ByRating => "rating",
            SortMode::ByDistance => "distance",
            SortMode::ByPriceAscending => "price-low",
        }
    }

    /// Compare two cafés under this mode.
    ///
    /// Missing distances count as 0 km (see [`Cafe::distance_or_zero`]).
    pub fn compare(self, a: &Cafe, b: &Cafe, tie_tolerance_km: f64) -> Ordering {
        match self {
            SortMode::ByRating => cmp_f64(b.rating, a.rating)
                .then_with(|| cmp_f64(a.distance_or_zero(), b.distance_or_zero())),
            SortMode::ByDistance => {
                let (da, db) = (a.distance_or_zero(), b.distance_or_zero());
                if (da - db).abs() < tie_tolerance_km {
                    cmp_f64(b.rating, a.rating)
                } else {
                    cmp_f64(da, db)
                }
            }
            SortMode::ByPriceAscending => a
                .price_range
                .ordinal()
                .cmp(&b.price_range.ordinal())
                .then_with(|| cmp_f64(b.rating, a.rating)),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = CafeScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rating" | "by-rating" => Ok(SortMode::ByRating),
            "distance" | "by-distance" => Ok(SortMode::ByDistance),
            "price-low" | "price" | "by-price" => Ok(SortMode::ByPriceAscending),
            other => Err(CafeScoutError::invalid_argument(format!(
                "unknown sort mode: {other}"
            ))),
        }
    }
}

/// A search request with its options.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub filters: FilterSet,
    pub sort_mode: SortMode,
    pub user_location: Option<GeoPoint>,
    pub tie_tolerance_km: f64,
}

impl Default for SearchRequest {
    fn default() -> Self {
        SearchRequest {
            query: String::new(),
            filters: FilterSet::new(),
            sort_mode: SortMode::default(),
            user_location: None,
            tie_tolerance_km: DISTANCE_TIE_TOLERANCE_KM,
        }
    }
}

impl SearchRequest {
    pub fn new<S: Into<String>>(query: S) -> Self {
        SearchRequest {
            query: query.into(),
            ..SearchRequest::default()
        }
    }

    pub fn filters(mut self, filters: FilterSet) -> Self {
        self.filters = filters;
        self
    }

    pub fn sort_mode(mut self, sort_mode: SortMode) -> Self {
        self.sort_mode = sort_mode;
        self
    }

    pub fn user_location(mut self, user_location: Option<GeoPoint>) -> Self {
        self.user_location = user_location;
        self
    }

    pub fn tie_tolerance_km(mut self, tie_tolerance_km: f64) -> Self {
        self.tie_tolerance_km = tie_tolerance_km;
        self
    }

    /// Run the pipeline over `cafes`.
    pub fn execute(&self, cafes: &[Cafe]) -> SearchResults {
        let mut results: Vec<Cafe> = cafes.to_vec();

        if let Some(origin) = &self.user_location {
            for cafe in &mut results {
                cafe.annotate_distance(origin);
            }
        }

        let filter = CafeFilter::new(&self.filters, &self.query);
        results.retain(|cafe| filter.matches(cafe));

        let (mode, tolerance) = (self.sort_mode, self.tie_tolerance_km);
        stable_sort_by(&mut results, |a, b| mode.compare(a, b, tolerance));

        debug!(
            "search query={:?} sort={} matched {}/{} cafés",
            self.query,
            mode,
            results.len(),
            cafes.len()
        );

        SearchResults {
            total_hits: results.len(),
            cafes: results,
        }
    }
}

/// Ordered search output plus the count shown in the filter panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub cafes: Vec<Cafe>,
    pub total_hits: usize,
}

/// Copies of `cafes` with distances measured from `origin`.
pub fn with_distances(cafes: &[Cafe], origin: &GeoPoint) -> Vec<Cafe> {
    cafes
        .iter()
        .map(|cafe| {
            let mut cafe = cafe.clone();
            cafe.annotate_distance(origin);
            cafe
        })
        .collect()
}

/// Filter and sort `cafes`.
///
/// With a user coordinate every café gets a fresh distance; without one,
/// whatever distance the input carried is kept.
pub fn search(
    cafes: &[Cafe],
    query: &str,
    filters: &FilterSet,
    sort_mode: SortMode,
    user_location: Option<GeoPoint>,
) -> Vec<Cafe> {
    SearchRequest::new(query)
        .filters(filters.clone())
        .sort_mode(sort_mode)
        .user_location(user_location)
        .execute(cafes)
        .cafes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cafe::PriceRange;
    use crate::filter::FilterKey;

    fn ids(cafes: &[Cafe]) -> Vec<u64> {
        cafes.iter().map(|c| c.id.0).collect()
    }

    #[test]
    fn test_rating_sort_breaks_ties_by_distance() {
        let cafes = vec![
            Cafe::new(1, "A", 0.0, 0.0).with_rating(4.5).with_distance(1.0),
            Cafe::new(2, "B", 0.0, 0.0).with_rating(4.5).with_distance(0.5),
            Cafe::new(3, "C", 0.0, 0.0).with_rating(4.8).with_distance(5.0),
        ];
        let sorted = search(&cafes, "", &FilterSet::new(), SortMode::ByRating, None);
        assert_eq!(ids(&sorted), vec![3, 2, 1]);
    }

    #[test]
    fn test_distance_sort_tolerance() {
        let cafes = vec![
            Cafe::new(1, "near", 0.0, 0.0).with_rating(3.0).with_distance(1.00),
            Cafe::new(2, "near-ish", 0.0, 0.0).with_rating(4.9).with_distance(1.05),
            Cafe::new(3, "far", 0.0, 0.0).with_rating(5.0).with_distance(3.0),
        ];
        let sorted = search(&cafes, "", &FilterSet::new(), SortMode::ByDistance, None);
        // 1.00 and 1.05 are within 0.1 km, so rating decides between them.
        assert_eq!(ids(&sorted), vec![2, 1, 3]);
    }

    #[test]
    fn test_price_sort() {
        let cafes = vec![
            Cafe::new(1, "A", 0.0, 0.0).with_price_range(PriceRange::Expensive).with_rating(4.9),
            Cafe::new(2, "B", 0.0, 0.0).with_price_range(PriceRange::Cheap).with_rating(4.0),
            Cafe::new(3, "C", 0.0, 0.0).with_price_range(PriceRange::Cheap).with_rating(4.7),
            Cafe::new(4, "D", 0.0, 0.0).with_price_range(PriceRange::Moderate).with_rating(4.1),
        ];
        let sorted = search(&cafes, "", &FilterSet::new(), SortMode::ByPriceAscending, None);
        assert_eq!(ids(&sorted), vec![3, 2, 4, 1]);
    }

    #[test]
    fn test_missing_distance_counts_as_zero() {
        let cafes = vec![
            Cafe::new(1, "located", 0.0, 0.0).with_distance(0.5),
            Cafe::new(2, "unknown", 0.0, 0.0),
        ];
        let sorted = search(&cafes, "", &FilterSet::new(), SortMode::ByDistance, None);
        assert_eq!(ids(&sorted), vec![2, 1]);
    }

    #[test]
    fn test_user_location_annotates_all() {
        let cafes = vec![
            Cafe::new(1, "A", 21.0, 105.0).with_distance(99.0),
            Cafe::new(2, "B", 21.1, 105.0),
        ];
        let origin = GeoPoint::new(21.0, 105.0);
        let sorted = search(&cafes, "", &FilterSet::new(), SortMode::ByDistance, Some(origin));
        assert_eq!(sorted[0].id.0, 1);
        assert_eq!(sorted[0].distance, Some(0.0));
        assert!(sorted[1].distance.unwrap() > 11.0);
        // The input keeps its stale distance.
        assert_eq!(cafes[0].distance, Some(99.0));
    }

    #[test]
    fn test_without_location_keeps_known_distance() {
        let cafes = vec![Cafe::new(1, "A", 21.0, 105.0).with_distance(2.5)];
        let sorted = search(&cafes, "", &FilterSet::new(), SortMode::ByDistance, None);
        assert_eq!(sorted[0].distance, Some(2.5));
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let cafes = vec![Cafe::new(1, "A", 0.0, 0.0)];
        let filters = FilterSet::new().with(FilterKey::DogFriendly);
        let results = SearchRequest::new("").filters(filters).execute(&cafes);
        assert!(results.cafes.is_empty());
        assert_eq!(results.total_hits, 0);
    }

    #[test]
    fn test_nan_rating_does_not_panic() {
        let cafes = vec![
            Cafe::new(1, "A", 0.0, 0.0).with_rating(f64::NAN),
            Cafe::new(2, "B", 0.0, 0.0).with_rating(4.0),
            Cafe::new(3, "C", 0.0, 0.0).with_rating(4.5),
        ];
        let sorted = search(&cafes, "", &FilterSet::new(), SortMode::ByRating, None);
        assert_eq!(sorted.len(), 3);
    }

    #[test]
    fn test_sort_mode_parse() {
        assert_eq!("distance".parse::<SortMode>().unwrap(), SortMode::ByDistance);
        assert_eq!("price-low".parse::<SortMode>().unwrap(), SortMode::ByPriceAscending);
        assert!("popularity".parse::<SortMode>().is_err());
        assert_eq!(serde_json::to_string(&SortMode::ByPriceAscending).unwrap(), "\"price-low\"");
    }
}
