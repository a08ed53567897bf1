use super::CharFilter;

/// A char filter that trims the input and collapses every run of
/// Unicode whitespace (including the ideographic space) to one ASCII space.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceCollapseCharFilter;

impl WhitespaceCollapseCharFilter {
    pub fn new() -> Self {
        WhitespaceCollapseCharFilter
    }
}

impl CharFilter for WhitespaceCollapseCharFilter {
    fn filter(&self, input: &str) -> String {
        let mut output = String::with_capacity(input.len());
        for word in input.split_whitespace() {
            if !output.is_empty() {
                output.push(' ');
            }
            output.push_str(word);
        }
        output
    }

    fn name(&self) -> &'static str {
        "whitespace_collapse"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse() {
        let filter = WhitespaceCollapseCharFilter::new();
        assert_eq!(filter.filter("  ca   phe \t sua "), "ca phe sua");
        assert_eq!(filter.filter("ca\u{3000}phe"), "ca phe");
        assert_eq!(filter.filter("   "), "");
    }
}
