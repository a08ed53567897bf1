//! Char filters that rewrite a string before it is compared.
//!
//! # Available Filters
//!
//! - [`diacritic_fold::DiacriticFoldingCharFilter`] - strips tone marks and other combining marks
//! - [`lowercase::LowercaseCharFilter`] - Unicode lowercasing
//! - [`whitespace::WhitespaceCollapseCharFilter`] - trims and collapses whitespace runs
//! - [`pattern_replace::PatternReplaceCharFilter`] - Regex-based replacement
//! - [`mapping::MappingCharFilter`] - literal phrase replacement (longest match wins)
//!
//! # Examples
//!
//! ```
//! use cafescout::analysis::char_filter::CharFilter;
//! use cafescout::analysis::char_filter::diacritic_fold::DiacriticFoldingCharFilter;
//!
//! let filter = DiacriticFoldingCharFilter::new();
//! assert_eq!(filter.filter("Cà Phê"), "Ca Phe");
//! ```

/// Trait for character filters that transform text before matching.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text.
    fn filter(&self, input: &str) -> String;

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

pub mod diacritic_fold;
pub mod lowercase;
pub mod mapping;
pub mod pattern_replace;
pub mod whitespace;
