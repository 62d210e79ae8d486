//! Tax, subtotal and total detection.

use rust_decimal::Decimal;

use super::numbers::max_amount;
use super::patterns::{
    GSTIN_MARKER, INVOICE_MARKER, SUBTOTAL_MARKER, SUB_MARKER, TAX_MARKER, TOTAL_MARKER,
};
use super::{ExtractionMatch, FieldExtractor};

/// Largest amount on each line accepted by `is_match`, in source order.
fn line_maxima<F>(lines: &[String], is_match: F) -> Vec<ExtractionMatch<Decimal>>
where
    F: Fn(&str) -> bool,
{
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_match(line))
        .filter_map(|(i, line)| {
            max_amount(line).map(|amount| ExtractionMatch::new(amount, line.as_str()).at_line(i))
        })
        .collect()
}

/// GST / tax amount. The first tax line carrying a number wins.
pub struct TaxExtractor;

impl TaxExtractor {
    pub fn new() -> Self {
        Self
    }

    fn is_tax_line(line: &str) -> bool {
        TAX_MARKER.is_match(line)
            && !GSTIN_MARKER.is_match(line)
            && !INVOICE_MARKER.is_match(line)
            && !SUBTOTAL_MARKER.is_match(line)
    }
}

impl Default for TaxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TaxExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, lines: &[String]) -> Option<Self::Output> {
        self.extract_all(lines).into_iter().next()
    }

    fn extract_all(&self, lines: &[String]) -> Vec<Self::Output> {
        line_maxima(lines, Self::is_tax_line)
    }
}

/// Subtotal before tax. The first subtotal line carrying a number wins.
pub struct SubtotalExtractor;

impl SubtotalExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SubtotalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for SubtotalExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, lines: &[String]) -> Option<Self::Output> {
        self.extract_all(lines).into_iter().next()
    }

    fn extract_all(&self, lines: &[String]) -> Vec<Self::Output> {
        line_maxima(lines, |line| SUBTOTAL_MARKER.is_match(line))
    }
}

/// Bill total.
///
/// Each total/grand/net line contributes its largest number and the
/// largest of those wins. When no line is labeled, the largest number in
/// the whole document is used instead. That fallback can pick an unrelated
/// figure such as an invoice number ("Invoice #9999").
pub struct TotalExtractor;

impl TotalExtractor {
    pub fn new() -> Self {
        Self
    }

    fn is_total_line(line: &str) -> bool {
        TOTAL_MARKER.is_match(line) && !SUB_MARKER.is_match(line)
    }

    /// Largest number anywhere in the document.
    pub fn fallback(&self, lines: &[String]) -> Option<ExtractionMatch<Decimal>> {
        line_maxima(lines, |_| true)
            .into_iter()
            .max_by(|a, b| a.value.cmp(&b.value))
    }
}

impl Default for TotalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TotalExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, lines: &[String]) -> Option<Self::Output> {
        let labeled = self
            .extract_all(lines)
            .into_iter()
            .max_by(|a, b| a.value.cmp(&b.value));

        labeled.or_else(|| self.fallback(lines))
    }

    fn extract_all(&self, lines: &[String]) -> Vec<Self::Output> {
        line_maxima(lines, Self::is_total_line)
    }
}
