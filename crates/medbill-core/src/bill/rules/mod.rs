//! Rule-based field extractors for hospital bills.

pub mod amounts;
pub mod dates;
pub mod items;
pub mod names;
pub mod numbers;
pub mod patterns;

pub use amounts::{SubtotalExtractor, TaxExtractor, TotalExtractor};
pub use dates::DateExtractor;
pub use items::LineItemExtractor;
pub use names::{NameExtractor, NameField};
pub use numbers::{amounts_in, max_amount, numeric_tokens, parse_number};
pub use patterns::*;

/// Trait for field extractors over cleaned bill lines.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field, applying the rule's tie-breaking policy.
    fn extract(&self, lines: &[String]) -> Option<Self::Output>;

    /// Extract every candidate, in source order.
    fn extract_all(&self, lines: &[String]) -> Vec<Self::Output>;
}

/// A value together with where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Index of the source line, if the value came from a single line.
    pub line: Option<usize>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            line: None,
            source: source.into(),
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

#[cfg(test)]
pub(crate) fn lines(text: &str) -> Vec<String> {
    crate::bill::clean_lines(text)
}
