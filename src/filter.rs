//! Filter predicates over café records.
//!
//! Tags are free text in several languages, so a tag-based filter is
//! satisfied when any tag contains any keyword of its [`TagCategory`].
//! The keyword table lives in one place ([`TagCategory::keywords`]) and
//! is shared with the recommender.
//!
//! Groups combine as follows:
//!
//! 1. text query: name, address or any tag must match
//! 2. every active tag filter must be satisfied (AND)
//! 3. active price filters form one group (OR); none active means no constraint

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use ahash::AHashMap;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::analysis::TextMatcher;
use crate::cafe::{Cafe, PriceRange};
use crate::error::CafeScoutError;

/// A family of tags recognised by keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagCategory {
    Dog,
    Cat,
    Work,
    Quiet,
    Wifi,
    PowerOutlets,
    Outdoor,
}

impl TagCategory {
    pub const ALL: [TagCategory; 7] = [
        TagCategory::Dog,
        TagCategory::Cat,
        TagCategory::Work,
        TagCategory::Quiet,
        TagCategory::Wifi,
        TagCategory::PowerOutlets,
        TagCategory::Outdoor,
    ];

    /// English, Japanese and loanword variants that identify the category.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            TagCategory::Dog => &["dog", "ドッグ", "犬"],
            TagCategory::Cat => &["cat", "キャット", "猫"],
            TagCategory::Work => &["work", "wi-fi", "仕事"],
            TagCategory::Quiet => &["quiet", "book", "静か", "書店"],
            TagCategory::Wifi => &["wi-fi", "wifi", "ワイファイ"],
            TagCategory::PowerOutlets => &["outlet", "power", "電源", "コンセント"],
            TagCategory::Outdoor => &["outdoor", "garden", "屋外", "庭園"],
        }
    }

    fn matchers(self) -> &'static [TextMatcher] {
        KEYWORD_MATCHERS
            .get(&self)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True when any keyword occurs in `tag`.
    pub fn matches_tag(self, tag: &str) -> bool {
        self.matchers().iter().any(|m| m.matches(tag))
    }

    /// True when any of the café's tags belongs to this category.
    /// A café without tags never matches.
    pub fn matches(self, cafe: &Cafe) -> bool {
        cafe.tags.iter().any(|tag| self.matches_tag(tag))
    }
}

lazy_static! {
    static ref KEYWORD_MATCHERS: AHashMap<TagCategory, Vec<TextMatcher>> = TagCategory::ALL
        .iter()
        .map(|category| {
            let matchers = category
                .keywords()
                .iter()
                .map(|keyword| TextMatcher::new(keyword))
                .collect();
            (*category, matchers)
        })
        .collect();
}

/// A toggle exposed by the filter panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterKey {
    DogFriendly,
    CatFriendly,
    Wifi,
    PowerOutlets,
    Outdoor,
    Cheap,
    Moderate,
    Expensive,
}

/// What a filter key constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterGroup {
    Tag(TagCategory),
    Price(PriceRange),
}

impl FilterKey {
    pub const ALL: [FilterKey; 8] = [
        FilterKey::DogFriendly,
        FilterKey::CatFriendly,
        FilterKey::Wifi,
        FilterKey::PowerOutlets,
        FilterKey::Outdoor,
        FilterKey::Cheap,
        FilterKey::Moderate,
        FilterKey::Expensive,
    ];

    pub fn group(self) -> FilterGroup {
        match self {
            FilterKey::DogFriendly => FilterGroup::Tag(TagCategory::Dog),
            FilterKey::CatFriendly => FilterGroup::Tag(TagCategory::Cat),
            FilterKey::Wifi => FilterGroup::Tag(TagCategory::Wifi),
            FilterKey::PowerOutlets => FilterGroup::Tag(TagCategory::PowerOutlets),
            FilterKey::Outdoor => FilterGroup::Tag(TagCategory::Outdoor),
            FilterKey::Cheap => FilterGroup::Price(PriceRange::Cheap),
            FilterKey::Moderate => FilterGroup::Price(PriceRange::Moderate),
            FilterKey::Expensive => FilterGroup::Price(PriceRange::Expensive),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterKey::DogFriendly => "dogFriendly",
            FilterKey::CatFriendly => "catFriendly",
            FilterKey::Wifi => "wifi",
            FilterKey::PowerOutlets => "powerOutlets",
            FilterKey::Outdoor => "outdoor",
            FilterKey::Cheap => "cheap",
            FilterKey::Moderate => "moderate",
            FilterKey::Expensive => "expensive",
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKey {
    type Err = CafeScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        FilterKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CafeScoutError::invalid_argument(format!("unknown filter: {wanted}")))
    }
}

/// Filter toggles; a key that was never set is off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    flags: BTreeMap<FilterKey, bool>,
}

impl FilterSet {
    pub fn new() -> Self {
        FilterSet::default()
    }

    /// Builder-style: turn `key` on.
    pub fn with(mut self, key: FilterKey) -> Self {
        self.set(key, true);
        self
    }

    pub fn set(&mut self, key: FilterKey, value: bool) {
        self.flags.insert(key, value);
    }

    pub fn is_active(&self, key: FilterKey) -> bool {
        self.flags.get(&key).copied().unwrap_or(false)
    }

    /// Active keys in declaration order.
    pub fn active(&self) -> impl Iterator<Item = FilterKey> + '_ {
        self.flags
            .iter()
            .filter(|(_, on)| **on)
            .map(|(key, _)| *key)
    }

    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }

    fn selected_prices(&self) -> impl Iterator<Item = PriceRange> + '_ {
        self.active().filter_map(|key| match key.group() {
            FilterGroup::Price(price) => Some(price),
            FilterGroup::Tag(_) => None,
        })
    }

    fn required_tags(&self) -> impl Iterator<Item = TagCategory> + '_ {
        self.active().filter_map(|key| match key.group() {
            FilterGroup::Tag(category) => Some(category),
            FilterGroup::Price(_) => None,
        })
    }
}

impl FromIterator<FilterKey> for FilterSet {
    fn from_iter<T: IntoIterator<Item = FilterKey>>(iter: T) -> Self {
        let mut set = FilterSet::new();
        for key in iter {
            set.set(key, true);
        }
        set
    }
}

/// A query and filter set prepared for evaluating many cafés.
#[derive(Debug, Clone)]
pub struct CafeFilter {
    query: TextMatcher,
    tags: Vec<TagCategory>,
    prices: Vec<PriceRange>,
}

impl CafeFilter {
    pub fn new(filters: &FilterSet, query: &str) -> Self {
        CafeFilter {
            query: TextMatcher::new(query),
            tags: filters.required_tags().collect(),
            prices: filters.selected_prices().collect(),
        }
    }

    pub fn matches(&self, cafe: &Cafe) -> bool {
        self.matches_query(cafe) && self.matches_tags(cafe) && self.matches_price(cafe)
    }

    fn matches_query(&self, cafe: &Cafe) -> bool {
        self.query.is_empty()
            || self.query.matches(&cafe.name)
            || self.query.matches(&cafe.address)
            || cafe.tags.iter().any(|tag| self.query.matches(tag))
    }

    fn matches_tags(&self, cafe: &Cafe) -> bool {
        self.tags.iter().all(|category| category.matches(cafe))
    }

    fn matches_price(&self, cafe: &Cafe) -> bool {
        self.prices.is_empty() || self.prices.contains(&cafe.price_range)
    }
}

/// Whether `cafe` satisfies the query and every active filter.
pub fn passes_filters(cafe: &Cafe, filters: &FilterSet, query: &str) -> bool {
    CafeFilter::new(filters, query).matches(cafe)
}
