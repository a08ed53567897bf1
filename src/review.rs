//! Reviews left on café pages.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::cafe::CafeId;
use crate::error::{CafeScoutError, Result};
use crate::util::sort::stable_sort_by;

/// Per-aspect ratings, each from 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryRatings {
    #[serde(rename = "drinkRating")]
    pub drinks: f64,
    #[serde(rename = "foodRating")]
    pub food: f64,
    #[serde(rename = "serviceRating")]
    pub service: f64,
    #[serde(rename = "atmosphereRating")]
    pub atmosphere: f64,
}

impl Default for CategoryRatings {
    fn default() -> Self {
        CategoryRatings {
            drinks: 5.0,
            food: 5.0,
            service: 5.0,
            atmosphere: 5.0,
        }
    }
}

impl CategoryRatings {
    pub fn new(drinks: f64, food: f64, service: f64, atmosphere: f64) -> Self {
        CategoryRatings {
            drinks,
            food,
            service,
            atmosphere,
        }
    }

    /// Overall rating: the mean of the four aspects.
    pub fn overall(&self) -> f64 {
        (self.drinks + self.food + self.service + self.atmosphere) / 4.0
    }

    pub fn validate(&self) -> Result<()> {
        let aspects = [
            ("drinks", self.drinks),
            ("food", self.food),
            ("service", self.service),
            ("atmosphere", self.atmosphere),
        ];
        for (name, value) in aspects {
            if !value.is_finite() || !(1.0..=5.0).contains(&value) {
                return Err(CafeScoutError::validation(format!(
                    "{name} rating must be between 1 and 5, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// A single review, stored in the same flat shape as the `cafe_comments` records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub cafe_id: CafeId,
    #[serde(rename = "username")]
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_avatar: Option<String>,
    pub rating: f64,
    #[serde(flatten)]
    pub categories: CategoryRatings,
    pub text: String,
    /// Likes the review was created with; per-user likes are tracked separately.
    #[serde(default)]
    pub likes: u32,
    /// Creation time, milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: i64,
}

impl Review {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Calendar day shown next to the review.
    pub fn date(&self) -> Option<NaiveDate> {
        self.created_at().map(|at| at.date_naive())
    }
}

/// Review ordering on the café page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewSort {
    #[default]
    MostLiked,
    Newest,
}

impl ReviewSort {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewSort::MostLiked => "most-liked",
            ReviewSort::Newest => "newest",
        }
    }
}

impl std::fmt::Display for ReviewSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReviewSort {
    type Err = CafeScoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "most-liked" | "likes" => Ok(ReviewSort::MostLiked),
            "newest" | "recent" => Ok(ReviewSort::Newest),
            other => Err(CafeScoutError::invalid_argument(format!(
                "unknown review sort: {other}"
            ))),
        }
    }
}

/// A review together with its current like count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedReview {
    #[serde(flatten)]
    pub review: Review,
    pub current_likes: u32,
}

/// Stable sort by the chosen order.
pub fn sort_reviews(reviews: &mut [RankedReview], sort: ReviewSort) {
    match sort {
        ReviewSort::MostLiked => {
            stable_sort_by(reviews, |a, b| b.current_likes.cmp(&a.current_likes))
        }
        ReviewSort::Newest => {
            stable_sort_by(reviews, |a, b| b.review.timestamp.cmp(&a.review.timestamp))
        }
    }
}

/// Counts of reviews per rounded star, index 0 is 5 stars and index 4 is 1 star.
pub fn rating_distribution<'a, I>(reviews: I) -> [usize; 5]
where
    I: IntoIterator<Item = &'a Review>,
{
    let mut counts = [0usize; 5];
    for review in reviews.into_iter().filter(|r| r.rating.is_finite()) {
        let stars = review.rating.round().clamp(1.0, 5.0) as usize;
        counts[5 - stars] += 1;
    }
    counts
}

/// Mean of each aspect, `None` when there are no reviews.
pub fn category_averages<'a, I>(reviews: I) -> Option<CategoryRatings>
where
    I: IntoIterator<Item = &'a Review>,
{
    let mut sum = CategoryRatings::new(0.0, 0.0, 0.0, 0.0);
    let mut count = 0usize;
    for review in reviews {
        sum.drinks += review.categories.drinks;
        sum.food += review.categories.food;
        sum.service += review.categories.service;
        sum.atmosphere += review.categories.atmosphere;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    let n = count as f64;
    Some(CategoryRatings::new(
        sum.drinks / n,
        sum.food / n,
        sum.service / n,
        sum.atmosphere / n,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(id: &str, rating: f64, likes: u32, timestamp: i64) -> Review {
        Review {
            id: id.to_string(),
            cafe_id: CafeId(1),
            user_name: "tester".to_string(),
            user_avatar: None,
            rating,
            categories: CategoryRatings::new(rating, rating, rating, rating),
            text: "good".to_string(),
            likes,
            timestamp,
        }
    }

    fn ranked(review: Review) -> RankedReview {
        let current_likes = review.likes;
        RankedReview {
            review,
            current_likes,
        }
    }

    #[test]
    fn test_overall_is_mean() {
        let ratings = CategoryRatings::new(5.0, 4.0, 3.0, 4.0);
        assert_eq!(ratings.overall(), 4.0);
    }

    #[test]
    fn test_validate_range() {
        assert!(CategoryRatings::default().validate().is_ok());
        assert!(CategoryRatings::new(0.0, 5.0, 5.0, 5.0).validate().is_err());
        assert!(CategoryRatings::new(5.0, 5.5, 5.0, 5.0).validate().is_err());
        assert!(CategoryRatings::new(5.0, 5.0, f64::NAN, 5.0).validate().is_err());
    }

    #[test]
    fn test_sort_most_liked_and_newest() {
        let mut reviews = vec![
            ranked(review("a", 4.0, 2, 300)),
            ranked(review("b", 4.0, 9, 100)),
            ranked(review("c", 4.0, 2, 200)),
        ];
        sort_reviews(&mut reviews, ReviewSort::MostLiked);
        let order: Vec<&str> = reviews.iter().map(|r| r.review.id.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);

        sort_reviews(&mut reviews, ReviewSort::Newest);
        let order: Vec<&str> = reviews.iter().map(|r| r.review.id.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_rating_distribution() {
        let reviews = vec![
            review("a", 4.6, 0, 0),
            review("b", 4.4, 0, 0),
            review("c", 5.0, 0, 0),
            review("d", 1.2, 0, 0),
        ];
        assert_eq!(rating_distribution(&reviews), [2, 1, 0, 0, 1]);
    }

    #[test]
    fn test_category_averages() {
        assert!(category_averages(&Vec::<Review>::new()).is_none());
        let reviews = vec![review("a", 4.0, 0, 0), review("b", 5.0, 0, 0)];
        let averages = category_averages(&reviews).unwrap();
        assert_eq!(averages.drinks, 4.5);
    }

    #[test]
    fn test_stored_shape() {
        let json = r#"{
            "id": "c1",
            "cafeId": 4,
            "username": "Mai",
            "userAvatar": "avatar.png",
            "rating": 4.5,
            "drinkRating": 5,
            "foodRating": 4,
            "serviceRating": 5,
            "atmosphereRating": 4,
            "text": "Lovely",
            "date": "2025/10/15",
            "likes": 1,
            "timestamp": 1760486400000
        }"#;
        let parsed: Review = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.cafe_id, CafeId(4));
        assert_eq!(parsed.user_name, "Mai");
        assert_eq!(parsed.user_avatar.as_deref(), Some("avatar.png"));
        assert_eq!(parsed.categories, CategoryRatings::new(5.0, 4.0, 5.0, 4.0));

        let value = serde_json::to_value(review("a", 4.0, 0, 0)).unwrap();
        assert_eq!(value["cafeId"], 1);
        assert_eq!(value["username"], "tester");
        assert_eq!(value["drinkRating"], 4.0);
        assert!(value.get("userAvatar").is_none());
        assert!(value.get("categories").is_none());
    }

    #[test]
    fn test_date_from_timestamp() {
        // 2025-10-15T00:00:00Z
        let r = review("a", 4.0, 0, 1_760_486_400_000);
        assert_eq!(r.date(), NaiveDate::from_ymd_opt(2025, 10, 15));
    }
}
