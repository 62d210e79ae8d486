//! Patient and hospital name detection.
//!
//! Names are taken from header lines carrying a keyword marker. Only the
//! first `header_lines` lines are searched so item descriptions further
//! down ("Medical consumables") are not mistaken for the hospital.

use super::patterns::{letters_only, HOSPITAL_MARKER, PATIENT_MARKER};
use super::{ExtractionMatch, FieldExtractor};

/// Which identity field to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    Patient,
    Hospital,
}

/// Keyword-driven name extractor.
pub struct NameExtractor {
    field: NameField,
    header_lines: usize,
    min_length: usize,
}

impl NameExtractor {
    pub fn new(field: NameField) -> Self {
        Self {
            field,
            header_lines: 15,
            min_length: 5,
        }
    }

    /// Restrict the search to the first `lines` lines.
    pub fn with_header_lines(mut self, lines: usize) -> Self {
        self.header_lines = lines;
        self
    }

    /// Set the minimum accepted name length.
    pub fn with_min_length(mut self, length: usize) -> Self {
        self.min_length = length;
        self
    }

    fn is_candidate(&self, line: &str) -> bool {
        match self.field {
            NameField::Patient => PATIENT_MARKER.is_match(line) && !HOSPITAL_MARKER.is_match(line),
            NameField::Hospital => HOSPITAL_MARKER.is_match(line),
        }
    }

    /// Pull the name out of a marker line, or `None` for label-only lines.
    fn name_from_line(&self, line: &str) -> Option<String> {
        let value = match line.split_once(':') {
            Some((_, after)) => after.to_string(),
            // "Patient John Doe": drop the marker words themselves
            None if self.field == NameField::Patient => {
                PATIENT_MARKER.replace_all(line, " ").into_owned()
            }
            None => line.to_string(),
        };

        let name = letters_only(&value);
        let words = name.split_whitespace().count();

        if name.len() >= self.min_length || words >= 2 {
            Some(name)
        } else {
            None
        }
    }
}

impl FieldExtractor for NameExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, lines: &[String]) -> Option<Self::Output> {
        self.extract_all(lines).into_iter().next()
    }

    fn extract_all(&self, lines: &[String]) -> Vec<Self::Output> {
        lines
            .iter()
            .take(self.header_lines)
            .enumerate()
            .filter(|(_, line)| self.is_candidate(line))
            .filter_map(|(i, line)| {
                self.name_from_line(line)
                    .map(|name| ExtractionMatch::new(name, line.as_str()).at_line(i))
            })
            .collect()
    }
}
