//! # cafescout
//!
//! Geo-aware café search, filtering, ranking and recommendation.
//!
//! ## Features
//!
//! - Haversine distances from the user's position, with a default fallback
//! - Diacritic-insensitive text search over names, addresses and tags
//! - Tag and price filters, three sort orders
//! - Preference-scored recommendations
//! - Favorites, user-submitted cafés and reviews over a pluggable key-value store
//!
//! ```
//! use cafescout::catalog::Catalog;
//! use cafescout::filter::{FilterKey, FilterSet};
//! use cafescout::ranking::{SortMode, search};
//!
//! # fn main() -> cafescout::error::Result<()> {
//! let catalog = Catalog::builtin()?;
//! let filters = FilterSet::new().with(FilterKey::Cheap);
//! let results = search(&catalog.cafes, "", &filters, SortMode::ByRating, None);
//! assert!(results.iter().all(|cafe| cafe.price_range.as_str() == "cheap"));
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod cafe;
pub mod catalog;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod geo;
pub mod location;
pub mod ranking;
pub mod recommend;
pub mod repository;
pub mod review;
pub mod storage;
pub mod util;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
