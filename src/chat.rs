//! Café summaries handed to the chat assistant.
//!
//! The assistant itself lives outside this crate; it receives the
//! [`CafeContext`] list as JSON together with [`user_location_line`].

use log::debug;
use serde::Serialize;

use crate::cafe::{Cafe, CafeId, PriceRange};
use crate::config::CafeScoutConfig;
use crate::geo::GeoPoint;
use crate::ranking::with_distances;
use crate::repository::ReviewStore;
use crate::review::ReviewSort;
use crate::util::sort::{cmp_f64, stable_sort_by};

const CONTEXT_TAG_LIMIT: usize = 5;

/// A review excerpt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewExcerpt {
    pub rating: f64,
    pub text: String,
    pub likes: u32,
}

/// One café as the assistant sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CafeContext {
    pub id: CafeId,
    pub name: String,
    pub address: String,
    pub distance: String,
    pub rating: f64,
    pub price_range: PriceRange,
    pub tags: Vec<String>,
    pub description: String,
    pub hours: String,
    #[serde(rename = "topReviews")]
    pub top_reviews: Vec<ReviewExcerpt>,
    #[serde(rename = "totalReviews")]
    pub total_reviews: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatContextBuilder {
    cafe_limit: usize,
    review_limit: usize,
    review_chars: usize,
}

impl Default for ChatContextBuilder {
    fn default() -> Self {
        ChatContextBuilder::from_config(&CafeScoutConfig::default())
    }
}

impl ChatContextBuilder {
    pub fn from_config(config: &CafeScoutConfig) -> Self {
        ChatContextBuilder {
            cafe_limit: config.chat_context_limit,
            review_limit: config.chat_review_limit,
            review_chars: config.chat_review_chars,
        }
    }

    /// Nearest cafés when the user's position is known, best rated otherwise.
    pub fn build(
        &self,
        cafes: &[Cafe],
        reviews: &ReviewStore,
        user: Option<GeoPoint>,
    ) -> Vec<CafeContext> {
        let mut selected = match &user {
            Some(origin) => {
                let mut located = with_distances(cafes, origin);
                stable_sort_by(&mut located, |a, b| {
                    cmp_f64(a.distance_or_zero(), b.distance_or_zero())
                });
                located
            }
            None => {
                let mut rated = cafes.to_vec();
                stable_sort_by(&mut rated, |a, b| cmp_f64(b.rating, a.rating));
                rated
            }
        };
        selected.truncate(self.cafe_limit);
        debug!("chat context with {} cafés", selected.len());

        selected
            .into_iter()
            .map(|cafe| self.summarize(cafe, reviews))
            .collect()
    }

    fn summarize(&self, cafe: Cafe, reviews: &ReviewStore) -> CafeContext {
        let ranked = reviews.for_cafe(cafe.id, ReviewSort::MostLiked);
        let total_reviews = ranked.len();
        let top_reviews = ranked
            .into_iter()
            .take(self.review_limit)
            .map(|r| ReviewExcerpt {
                rating: r.review.rating,
                text: truncate_chars(&r.review.text, self.review_chars),
                likes: r.current_likes,
            })
            .collect();

        CafeContext {
            id: cafe.id,
            address: strip_annotation(&cafe.address).to_string(),
            distance: format_distance(cafe.distance),
            rating: cafe.rating,
            price_range: cafe.price_range,
            tags: cafe.tags.into_iter().take(CONTEXT_TAG_LIMIT).collect(),
            name: cafe.name,
            description: cafe.description,
            hours: cafe.hours,
            top_reviews,
            total_reviews,
        }
    }
}

/// The user position line of the assistant prompt.
pub fn user_location_line(user: Option<GeoPoint>) -> String {
    match user {
        Some(point) => format!("ユーザーの現在地: 緯度 {:.4}, 経度 {:.4}", point.lat, point.lng),
        None => "ユーザーの位置情報: 不明".to_string(),
    }
}

/// Address without the parenthesised Japanese reading.
fn strip_annotation(address: &str) -> &str {
    address.split('(').next().unwrap_or_default().trim()
}

fn format_distance(distance: Option<f64>) -> String {
    match distance {
        Some(km) if km.is_finite() => format!("{km:.1}km"),
        _ => "N/A".to_string(),
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
