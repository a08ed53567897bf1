//! Diacritic-insensitive, case-insensitive substring matching.

use std::fmt;

use lazy_static::lazy_static;

use crate::analysis::char_filter::CharFilter;
use crate::analysis::char_filter::diacritic_fold::DiacriticFoldingCharFilter;
use crate::analysis::char_filter::lowercase::LowercaseCharFilter;
use crate::analysis::char_filter::whitespace::WhitespaceCollapseCharFilter;

lazy_static! {
    static ref SEARCH_NORMALIZER: TextNormalizer = TextNormalizer::search();
}

/// An ordered chain of char filters.
pub struct TextNormalizer {
    filters: Vec<Box<dyn CharFilter>>,
}

impl TextNormalizer {
    /// An empty chain; `normalize` returns its input unchanged.
    pub fn new() -> Self {
        TextNormalizer {
            filters: Vec::new(),
        }
    }

    /// The chain used for search: fold diacritics, lowercase, collapse whitespace.
    pub fn search() -> Self {
        TextNormalizer::new()
            .with_filter(DiacriticFoldingCharFilter::new())
            .with_filter(LowercaseCharFilter::new())
            .with_filter(WhitespaceCollapseCharFilter::new())
    }

    /// Append a filter to the chain.
    pub fn with_filter<F: CharFilter + 'static>(mut self, filter: F) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn normalize(&self, input: &str) -> String {
        let mut text = input.to_string();
        for filter in &self.filters {
            text = filter.filter(&text);
        }
        text
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        TextNormalizer::search()
    }
}

impl fmt::Debug for TextNormalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.filters.iter().map(|filter| filter.name()).collect();
        f.debug_struct("TextNormalizer")
            .field("filters", &names)
            .finish()
    }
}

/// Normalize with the shared search chain.
pub fn normalize(input: &str) -> String {
    SEARCH_NORMALIZER.normalize(input)
}

/// A needle normalized once and tested against many haystacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatcher {
    needle: String,
}

impl TextMatcher {
    pub fn new(needle: &str) -> Self {
        TextMatcher {
            needle: normalize(needle),
        }
    }

    /// True when the normalized needle is empty; such a matcher accepts everything.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    pub fn matches(&self, haystack: &str) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        normalize(haystack).contains(&self.needle)
    }
}

/// Case- and diacritic-insensitive substring test.
///
/// An empty (or whitespace-only) needle matches every haystack,
/// including the empty one.
pub fn flexible_match(haystack: &str, needle: &str) -> bool {
    TextMatcher::new(needle).matches(haystack)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flexible_match_diacritics() {
        assert!(flexible_match("Cà Phê", "ca phe"));
        assert!(flexible_match("Cộng Cà Phê", "cà phê"));
        assert!(flexible_match("Cộng Cà Phê", "cong ca phe"));
        assert!(flexible_match("78 Lê Duẩn, Đống Đa, Hanoi", "dong da"));
    }

    #[test]
    fn test_flexible_match_negative() {
        assert!(!flexible_match("Coffee", "xyz"));
        assert!(!flexible_match("", "coffee"));
    }

    #[test]
    fn test_empty_needle_matches_everything() {
        assert!(flexible_match("anything", ""));
        assert!(flexible_match("", ""));
        assert!(flexible_match("Cà Phê", "   "));
    }

    #[test]
    fn test_whitespace_is_collapsed_on_both_sides() {
        assert!(flexible_match("Highlands   Coffee", "highlands coffee"));
        assert!(flexible_match("Highlands Coffee", "  highlands    coffee "));
    }

    #[test]
    fn test_japanese_substring() {
        assert!(flexible_match("犬カフェ", "犬"));
        assert!(flexible_match("ドッグカフェ", "ドッグ"));
    }

    #[test]
    fn test_normalizer_debug_lists_filters() {
        let debug = format!("{:?}", TextNormalizer::search());
        assert!(debug.contains("diacritic_fold"));
        assert!(debug.contains("whitespace_collapse"));
    }

    #[test]
    fn test_matcher_reuse() {
        let matcher = TextMatcher::new("Wi-Fi");
        assert_eq!(matcher.needle(), "wi-fi");
        assert!(matcher.matches("Free WI-FI"));
        assert!(!matcher.matches("電源"));
    }
}
