//! The built-in café catalog and its seed reviews.
//!
//! The data ships inside the binary as JSON (`data/*.json`).

use crate::cafe::Cafe;
use crate::error::Result;
use crate::review::Review;

const CAFES_JSON: &str = include_str!("../data/cafes.json");
const REVIEWS_JSON: &str = include_str!("../data/reviews.json");

/// Static cafés and reviews.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub cafes: Vec<Cafe>,
    pub reviews: Vec<Review>,
}

impl Catalog {
    /// The fifteen Hanoi cafés the site launched with.
    pub fn builtin() -> Result<Self> {
        Ok(Catalog {
            cafes: serde_json::from_str(CAFES_JSON)?,
            reviews: serde_json::from_str(REVIEWS_JSON)?,
        })
    }

    pub fn empty() -> Self {
        Catalog::default()
    }
}
