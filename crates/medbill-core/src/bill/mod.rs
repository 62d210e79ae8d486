//! Bill field extraction module.

mod extractor;
pub mod rules;

pub use extractor::RuleBasedExtractor;

use crate::models::bill::BillRecord;

/// Trait for bill field extractors.
///
/// Extraction is best-effort: it never fails, and fields that cannot be
/// found are left undetected.
pub trait BillExtractor {
    /// Extract a bill record from raw OCR text.
    fn extract(&self, text: &str) -> BillRecord;
}

/// Split OCR text into trimmed, non-empty lines in source order.
pub fn clean_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_lines() {
        let text = "  City Hospital  \r\n\n   \n2 Gauze 5 10\n";
        assert_eq!(clean_lines(text), vec!["City Hospital", "2 Gauze 5 10"]);
        assert!(clean_lines("").is_empty());
    }
}
