use ahash::AHashMap;
use chrono::Utc;
use log::info;
use uuid::Uuid;

use crate::cafe::CafeId;
use crate::error::{CafeScoutError, Result};
use crate::repository::{SharedStore, load_json, load_json_list, save_json};
use crate::review::{
    CategoryRatings, RankedReview, Review, ReviewSort, category_averages, rating_distribution,
    sort_reviews,
};
use crate::storage::keys;

/// Seed reviews plus user comments, with per-user likes.
#[derive(Debug)]
pub struct ReviewStore {
    store: SharedStore,
    seed: Vec<Review>,
    comments: Vec<Review>,
    /// Review id to the users who liked it.
    likes: AHashMap<String, Vec<String>>,
}

impl ReviewStore {
    pub fn load(store: SharedStore, seed: Vec<Review>) -> Result<Self> {
        let comments = load_json_list(store.as_ref(), keys::CAFE_COMMENTS)?;
        let likes = load_json(store.as_ref(), keys::REVIEW_LIKES)?.unwrap_or_default();
        Ok(ReviewStore {
            store,
            seed,
            comments,
            likes,
        })
    }

    /// Post a review. The overall rating is the mean of the four aspects,
    /// and a blank author name posts as ゲスト.
    pub fn add(
        &mut self,
        cafe_id: CafeId,
        user_name: &str,
        user_avatar: Option<&str>,
        ratings: CategoryRatings,
        text: &str,
    ) -> Result<Review> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CafeScoutError::validation("review text is required"));
        }
        ratings.validate()?;

        let user_name = match user_name.trim() {
            "" => "ゲスト",
            name => name,
        };

        let review = Review {
            id: Uuid::new_v4().to_string(),
            cafe_id,
            user_name: user_name.to_string(),
            user_avatar: user_avatar
                .map(str::trim)
                .filter(|avatar| !avatar.is_empty())
                .map(str::to_string),
            rating: ratings.overall(),
            categories: ratings,
            text: text.to_string(),
            likes: 0,
            timestamp: Utc::now().timestamp_millis(),
        };

        self.comments.push(review.clone());
        if let Err(e) = save_json(self.store.as_ref(), keys::CAFE_COMMENTS, &self.comments) {
            self.comments.pop();
            return Err(e);
        }
        info!("review {} added to café {cafe_id}", review.id);
        Ok(review)
    }

    /// Like or unlike `review_id` as `user`. Returns whether it is now liked.
    pub fn toggle_like(&mut self, review_id: &str, user: &str) -> Result<bool> {
        if self.find(review_id).is_none() {
            return Err(CafeScoutError::not_found(format!("review {review_id}")));
        }

        let previous = self.likes.get(review_id).cloned();
        let users = self.likes.entry(review_id.to_string()).or_default();
        let liked = match users.iter().position(|u| u == user) {
            Some(index) => {
                users.remove(index);
                false
            }
            None => {
                users.push(user.to_string());
                true
            }
        };
        if users.is_empty() {
            self.likes.remove(review_id);
        }

        if let Err(e) = save_json(self.store.as_ref(), keys::REVIEW_LIKES, &self.likes) {
            match previous {
                Some(users) => self.likes.insert(review_id.to_string(), users),
                None => self.likes.remove(review_id),
            };
            return Err(e);
        }
        Ok(liked)
    }

    pub fn is_liked_by(&self, review_id: &str, user: &str) -> bool {
        self.likes
            .get(review_id)
            .is_some_and(|users| users.iter().any(|u| u == user))
    }

    /// Base likes plus user likes.
    pub fn likes(&self, review: &Review) -> u32 {
        let extra = self.likes.get(&review.id).map_or(0, Vec::len);
        review.likes + u32::try_from(extra).unwrap_or(u32::MAX)
    }

    pub fn find(&self, review_id: &str) -> Option<&Review> {
        self.iter().find(|review| review.id == review_id)
    }

    /// Reviews for `cafe_id` in the chosen order.
    pub fn for_cafe(&self, cafe_id: CafeId, sort: ReviewSort) -> Vec<RankedReview> {
        let mut reviews: Vec<RankedReview> = self
            .reviews_of(cafe_id)
            .map(|review| RankedReview {
                current_likes: self.likes(review),
                review: review.clone(),
            })
            .collect();
        sort_reviews(&mut reviews, sort);
        reviews
    }

    pub fn count_for(&self, cafe_id: CafeId) -> usize {
        self.reviews_of(cafe_id).count()
    }

    pub fn rating_distribution(&self, cafe_id: CafeId) -> [usize; 5] {
        rating_distribution(self.reviews_of(cafe_id))
    }

    pub fn category_averages(&self, cafe_id: CafeId) -> Option<CategoryRatings> {
        category_averages(self.reviews_of(cafe_id))
    }

    fn iter(&self) -> impl Iterator<Item = &Review> {
        self.seed.iter().chain(self.comments.iter())
    }

    fn reviews_of(&self, cafe_id: CafeId) -> impl Iterator<Item = &Review> {
        self.iter().filter(move |review| review.cafe_id == cafe_id)
    }
}
