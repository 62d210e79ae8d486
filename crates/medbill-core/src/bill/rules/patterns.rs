//! Common regex patterns for hospital bill extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Integer or decimal token, e.g. "2", "10.00"
    pub static ref NUMBER_TOKEN: Regex = Regex::new(
        r"\d+(?:\.\d+)?"
    ).unwrap();

    // Bare digit runs, removed when deriving item names
    pub static ref DIGITS: Regex = Regex::new(
        r"\d+"
    ).unwrap();

    // 15/01/2024, 15-1-24, 15.01.2024
    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"\b\d{1,2}[./\-]\d{1,2}[./\-]\d{2,4}\b"
    ).unwrap();

    // 15 January 2024, 15 Jan. 2024
    pub static ref DATE_LONG: Regex = Regex::new(
        r"(?i)\b\d{1,2}[ \t]+(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?,?[ \t]+\d{4}\b"
    ).unwrap();

    // Identity field markers
    pub static ref PATIENT_MARKER: Regex = Regex::new(
        r"(?i)patient|name"
    ).unwrap();

    pub static ref HOSPITAL_MARKER: Regex = Regex::new(
        r"(?i)hospital|clinic|medical"
    ).unwrap();

    // Amount markers
    pub static ref TAX_MARKER: Regex = Regex::new(
        r"(?i)gst|tax"
    ).unwrap();

    // GST registration number, not an amount
    pub static ref GSTIN_MARKER: Regex = Regex::new(
        r"(?i)gstin"
    ).unwrap();

    // "Tax Invoice" headers carry invoice numbers, not tax
    pub static ref INVOICE_MARKER: Regex = Regex::new(
        r"(?i)invoice"
    ).unwrap();

    pub static ref TOTAL_MARKER: Regex = Regex::new(
        r"(?i)total|grand|net\s+amount|\bnet\b"
    ).unwrap();

    pub static ref SUB_MARKER: Regex = Regex::new(
        r"(?i)sub"
    ).unwrap();

    pub static ref SUBTOTAL_MARKER: Regex = Regex::new(
        r"(?i)sub[\s\-]*total"
    ).unwrap();

    // Punctuation left over from a mis-segmented OCR line
    pub static ref ITEM_ARTIFACT: Regex = Regex::new(
        r"[\[\]/#\-]"
    ).unwrap();

    // Everything that cannot be part of a name
    pub static ref NON_NAME_CHARS: Regex = Regex::new(
        r"[^A-Za-z\s]"
    ).unwrap();

    pub static ref WHITESPACE: Regex = Regex::new(
        r"\s+"
    ).unwrap();
}

/// Keep letters and spaces only, collapse runs of whitespace, and trim.
pub fn letters_only(text: &str) -> String {
    let stripped = NON_NAME_CHARS.replace_all(text, "");
    WHITESPACE.replace_all(stripped.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_only() {
        assert_eq!(letters_only("  Dr. A.  Sharma, MD!! "), "Dr A Sharma MD");
        assert_eq!(letters_only("1234 --"), "");
    }

    #[test]
    fn test_total_marker_skips_words_containing_net() {
        assert!(TOTAL_MARKER.is_match("Net Amount: 1180"));
        assert!(TOTAL_MARKER.is_match("NET 1180"));
        assert!(!TOTAL_MARKER.is_match("Internet charges 200"));
    }

    #[test]
    fn test_date_patterns() {
        assert!(DATE_NUMERIC.is_match("Date: 15/01/2024"));
        assert!(DATE_NUMERIC.is_match("15-1-24"));
        assert!(DATE_LONG.is_match("Admitted 3 March 2024"));
        assert!(DATE_LONG.is_match("3 mar. 2024"));
        assert!(!DATE_LONG.is_match("3 Bandage 2024"));
    }
}
