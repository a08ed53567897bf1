//! Text normalization and flexible matching for the search box.
//!
//! Café names and addresses mix Vietnamese diacritics, Japanese and
//! romanized text. Queries are typed without tone marks, so both sides of
//! a comparison go through the same [`TextNormalizer`] before a plain
//! substring test.

pub mod char_filter;
pub mod matcher;

pub use self::char_filter::CharFilter;
pub use self::matcher::{TextMatcher, TextNormalizer, flexible_match, normalize};
