//! Noise Filtering
//!
//! Rejects line text that is not plausible title/author signal: publisher
//! imprints, series markers, prices, barcodes, and printed ISBNs. Applied
//! before candidate extraction only; ISBN resolution works on unfiltered
//! text since everything rejected here is non-ISBN noise.

use regex::Regex;
use std::sync::LazyLock;

use crate::config::FilterConfig;

// 3 or 4 digit groups with dash/colon/space separators, e.g. printed ISBNs
static RE_ISBN_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(?:[-: ]\d+){2,3}$").expect("valid isbn shape regex")
});

static RE_CURRENCY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[$€£¥]\s*\d+(?:[.,]\d{1,2})?").expect("valid currency regex")
});

/// Noise filter with configured denylists
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    min_text_len: usize,
    max_digits: usize,
    publishers: Vec<String>,
    series_markers: Vec<String>,
}

impl NoiseFilter {
    /// Build a filter from configuration (denylists are lowercased once here)
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            min_text_len: config.min_text_len,
            max_digits: config.max_digits,
            publishers: config.publishers.iter().map(|p| p.to_lowercase()).collect(),
            series_markers: config
                .series_markers
                .iter()
                .map(|m| m.to_lowercase())
                .collect(),
        }
    }

    /// True if the text should be discarded before candidate extraction
    pub fn is_noise(&self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.chars().count() < self.min_text_len {
            return true;
        }

        let lower = trimmed.to_lowercase();
        if self.publishers.iter().any(|p| lower.contains(p.as_str())) {
            return true;
        }
        if self.series_markers.iter().any(|m| lower.contains(m.as_str())) {
            return true;
        }

        let shape_len = trimmed.chars().count();
        if (10..=17).contains(&shape_len) && RE_ISBN_SHAPE.is_match(trimmed) {
            return true;
        }

        let digits = trimmed.chars().filter(|c| c.is_ascii_digit()).count();
        if digits >= self.max_digits {
            return true;
        }

        RE_CURRENCY.is_match(trimmed)
    }
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self::new(&FilterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_title() {
        let filter = NoiseFilter::default();
        assert!(!filter.is_noise("The Great Gatsby"));
        assert!(!filter.is_noise("Dune"));
    }

    #[test]
    fn test_rejects_short_text() {
        let filter = NoiseFilter::default();
        assert!(filter.is_noise("ab"));
        assert!(filter.is_noise("  x  "));
    }

    #[test]
    fn test_rejects_publisher_and_series() {
        let filter = NoiseFilter::default();
        assert!(filter.is_noise("Penguin Classics"));
        assert!(filter.is_noise("50th Anniversary Edition"));
        assert!(filter.is_noise("SCHOLASTIC"));
    }

    #[test]
    fn test_rejects_isbn_shaped_text() {
        let filter = NoiseFilter::default();
        assert!(filter.is_noise("978-0-123456-78-9"));
        assert!(filter.is_noise("0 13 468599 1"));
    }

    #[test]
    fn test_rejects_barcode_digits() {
        let filter = NoiseFilter::default();
        assert!(filter.is_noise("97801234567"));
        assert!(filter.is_noise("codes 1234 5678 here"));
    }

    #[test]
    fn test_rejects_prices() {
        let filter = NoiseFilter::default();
        assert!(filter.is_noise("$12.99"));
        assert!(filter.is_noise("£8.50 UK"));
    }

    #[test]
    fn test_custom_series_marker() {
        let mut config = FilterConfig::default();
        config.series_markers.push("collection".to_string());
        let filter = NoiseFilter::new(&config);
        assert!(filter.is_noise("The Complete Collection"));

        // Default list leaves such titles alone
        assert!(!NoiseFilter::default().is_noise("The Complete Collection"));
    }
}
