//! Date detection for hospital bills.

use super::patterns::{DATE_LONG, DATE_NUMERIC};
use super::{ExtractionMatch, FieldExtractor};

/// Finds the first date written as `D/M/Y` or `D Month YYYY`.
///
/// The date is kept as written; nothing is normalized here.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, lines: &[String]) -> Option<Self::Output> {
        self.extract_all(lines).into_iter().next()
    }

    fn extract_all(&self, lines: &[String]) -> Vec<Self::Output> {
        let text = lines.join("\n");

        let mut found: Vec<(usize, usize, &str)> = DATE_NUMERIC
            .find_iter(&text)
            .chain(DATE_LONG.find_iter(&text))
            .map(|m| (m.start(), m.end(), m.as_str()))
            .collect();

        // Earliest position wins; on a tie prefer the longer match
        found.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        found
            .into_iter()
            .map(|(start, _, matched)| {
                let line = text[..start].matches('\n').count();
                ExtractionMatch::new(matched.to_string(), matched).at_line(line)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::rules::lines;

    #[test]
    fn test_extract_numeric_date() {
        let extractor = DateExtractor::new();

        let result = extractor.extract(&lines("Bill Date: 15/01/2024")).unwrap();
        assert_eq!(result.value, "15/01/2024");
        assert_eq!(result.line, Some(0));
    }

    #[test]
    fn test_extract_long_date() {
        let extractor = DateExtractor::new();

        let result = extractor
            .extract(&lines("City Hospital\nAdmitted on 3 March 2024"))
            .unwrap();
        assert_eq!(result.value, "3 March 2024");
        assert_eq!(result.line, Some(1));
    }

    #[test]
    fn test_first_date_wins() {
        let extractor = DateExtractor::new();
        let text = "Admission 2 Feb 2024\nDischarge 09-02-2024";

        let all = extractor.extract_all(&lines(text));
        assert_eq!(all.len(), 2);
        assert_eq!(extractor.extract(&lines(text)).unwrap().value, "2 Feb 2024");
    }

    #[test]
    fn test_no_date() {
        let extractor = DateExtractor::new();
        assert!(extractor.extract(&lines("2 Paracetamol 10.00 20.00")).is_none());
        assert!(extractor.extract(&[]).is_none());
    }
}
