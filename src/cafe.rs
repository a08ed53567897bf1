//! Café records and the values attached to them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CafeScoutError;
use crate::geo::GeoPoint;

/// Opaque café identifier.
///
/// Catalog cafés use small integers, user-submitted ones a millisecond
/// timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CafeId(pub u64);

impl fmt::Display for CafeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CafeId {
    type Err = CafeScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(CafeId)
            .map_err(|_| CafeScoutError::invalid_argument(format!("not a café id: {s}")))
    }
}

/// Price tier of a café.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PriceRange {
    Cheap,
    #[default]
    Moderate,
    Expensive,
}

/// Currency used when showing a price tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Vnd,
    Jpy,
}

impl PriceRange {
    pub const ALL: [PriceRange; 3] = [
        PriceRange::Cheap,
        PriceRange::Moderate,
        PriceRange::Expensive,
    ];

    /// Sort key for cheapest-first ordering: cheap=1, moderate=2, expensive=3.
    pub fn ordinal(self) -> u8 {
        match self {
            PriceRange::Cheap => 1,
            PriceRange::Moderate => 2,
            PriceRange::Expensive => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PriceRange::Cheap => "cheap",
            PriceRange::Moderate => "moderate",
            PriceRange::Expensive => "expensive",
        }
    }

    /// Approximate per-person spend for this tier.
    pub fn label(self, currency: Currency) -> &'static str {
        match (currency, self) {
            (Currency::Vnd, PriceRange::Cheap) => "< 100.000 VND",
            (Currency::Vnd, PriceRange::Moderate) => "100.000 - 200.000 VND",
            (Currency::Vnd, PriceRange::Expensive) => "> 200.000 VND",
            (Currency::Jpy, PriceRange::Cheap) => "< 600 JPY",
            (Currency::Jpy, PriceRange::Moderate) => "600 - 1200 JPY",
            (Currency::Jpy, PriceRange::Expensive) => "> 1200 JPY",
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Currency {
    pub fn as_str(self) -> &'static str {
        match self {
            Currency::Vnd => "VND",
            Currency::Jpy => "JPY",
        }
    }

    /// The other currency; the price toggle flips between the two.
    pub fn toggled(self) -> Currency {
        match self {
            Currency::Vnd => Currency::Jpy,
            Currency::Jpy => Currency::Vnd,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = CafeScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "VND" => Ok(Currency::Vnd),
            "JPY" => Ok(Currency::Jpy),
            other => Err(CafeScoutError::invalid_argument(format!(
                "unknown currency: {other}"
            ))),
        }
    }
}

impl FromStr for PriceRange {
    type Err = CafeScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cheap" => Ok(PriceRange::Cheap),
            "moderate" => Ok(PriceRange::Moderate),
            "expensive" => Ok(PriceRange::Expensive),
            other => Err(CafeScoutError::invalid_argument(format!(
                "unknown price range: {other}"
            ))),
        }
    }
}

/// A café record.
///
/// `distance` is a projection from the current user coordinate. It is
/// never serialized and is recomputed whenever a coordinate is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cafe {
    pub id: CafeId,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default, rename = "reviews")]
    pub review_count: u32,
    #[serde(default)]
    pub price_range: PriceRange,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub hours: String,
    #[serde(skip)]
    pub distance: Option<f64>,
}

impl Cafe {
    /// A minimal record; remaining fields take their defaults.
    pub fn new<S: Into<String>>(id: u64, name: S, lat: f64, lng: f64) -> Self {
        Cafe {
            id: CafeId(id),
            name: name.into(),
            address: String::new(),
            lat,
            lng,
            rating: 0.0,
            review_count: 0,
            price_range: PriceRange::default(),
            tags: Vec::new(),
            description: String::new(),
            phone: String::new(),
            hours: String::new(),
            distance: None,
        }
    }

    pub fn with_address<S: Into<String>>(mut self, address: S) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_price_range(mut self, price_range: PriceRange) -> Self {
        self.price_range = price_range;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_distance(mut self, distance_km: f64) -> Self {
        self.distance = Some(distance_km);
        self
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    /// Recompute `distance` from `origin`.
    pub fn annotate_distance(&mut self, origin: &GeoPoint) {
        self.distance = Some(origin.distance_to(&self.location()));
    }

    /// Distance used by comparators: an unknown distance counts as 0 km.
    ///
    /// This biases unlocated cafés toward the front of distance orderings;
    /// it is kept as-is pending a product decision.
    pub fn distance_or_zero(&self) -> f64 {
        self.distance.unwrap_or(0.0)
    }
}

/// Form input for a user-submitted café.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCafe {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price_range: PriceRange,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub hours: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Explicit coordinates; when absent the repository places the café
    /// near the default location.
    #[serde(default)]
    pub location: Option<GeoPoint>,
}
