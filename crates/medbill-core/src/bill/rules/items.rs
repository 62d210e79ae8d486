//! Line item detection.
//!
//! A line with at least three numbers is read as `quantity ... unit_price
//! line_total`; numbers in between are ignored. Whatever text is left once
//! the numbers are removed becomes the item name.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::trace;

use crate::models::bill::LineItem;
use crate::models::config::ExtractionConfig;

use super::numbers::{numeric_tokens, parse_number};
use super::patterns::{letters_only, DIGITS, GSTIN_MARKER, ITEM_ARTIFACT};
use super::FieldExtractor;

/// Line item extractor with configurable sanity bounds.
pub struct LineItemExtractor {
    max_quantity: u32,
    max_unit_price: Decimal,
    max_line_total: Decimal,
    min_name_length: usize,
}

impl LineItemExtractor {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            max_quantity: config.max_quantity,
            max_unit_price: config.max_unit_price,
            max_line_total: config.max_line_total,
            min_name_length: config.min_item_name_length,
        }
    }

    /// Parse one line into an item, or `None` if it is not a plausible item.
    pub fn parse_line(&self, line: &str) -> Option<LineItem> {
        // Registration codes like 29ABCDE1234F1Z5 split into several numbers
        if GSTIN_MARKER.is_match(line) {
            return None;
        }

        let tokens = numeric_tokens(line);
        if tokens.len() < 3 {
            return None;
        }

        // One malformed token discards the whole candidate
        let values: Vec<Decimal> = tokens
            .iter()
            .map(|t| parse_number(t))
            .collect::<Option<Vec<_>>>()?;

        let quantity = values[0].floor().to_u32()?;
        let unit_price = values[values.len() - 2];
        let line_total = values[values.len() - 1];

        if quantity < 1 || quantity > self.max_quantity {
            trace!("Rejected item line (quantity {}): {}", quantity, line);
            return None;
        }
        if unit_price <= Decimal::ZERO || unit_price > self.max_unit_price {
            trace!("Rejected item line (unit price {}): {}", unit_price, line);
            return None;
        }
        if line_total <= Decimal::ZERO || line_total > self.max_line_total {
            trace!("Rejected item line (line total {}): {}", line_total, line);
            return None;
        }

        let item_name = self.item_name(line)?;

        Some(LineItem {
            quantity,
            item_name,
            unit_price,
            line_total,
        })
    }

    fn item_name(&self, line: &str) -> Option<String> {
        let without_numbers = DIGITS.replace_all(line, "");
        if ITEM_ARTIFACT.is_match(&without_numbers) {
            return None;
        }

        let name = letters_only(&without_numbers);
        if name.len() < self.min_name_length {
            return None;
        }

        Some(name)
    }
}

impl Default for LineItemExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for LineItemExtractor {
    type Output = LineItem;

    fn extract(&self, lines: &[String]) -> Option<Self::Output> {
        self.extract_all(lines).into_iter().next()
    }

    fn extract_all(&self, lines: &[String]) -> Vec<Self::Output> {
        lines.iter().filter_map(|line| self.parse_line(line)).collect()
    }
}
