use super::CharFilter;

/// A char filter that lowercases using Unicode case mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseCharFilter;

impl LowercaseCharFilter {
    pub fn new() -> Self {
        LowercaseCharFilter
    }
}

impl CharFilter for LowercaseCharFilter {
    fn filter(&self, input: &str) -> String {
        input.to_lowercase()
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase() {
        let filter = LowercaseCharFilter::new();
        assert_eq!(filter.filter("Wi-Fi"), "wi-fi");
        assert_eq!(filter.filter("ĐỐNG"), "đống");
    }
}
