//! Individual consistency checks.
//!
//! Every check reads the record and returns the findings it raises; none of
//! them look at each other's results.

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::models::bill::BillRecord;
use crate::models::config::ValidationConfig;

/// One fired check: the message shown to a reviewer and its score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub message: String,
    pub penalty: u8,
}

impl Finding {
    fn new(message: impl Into<String>, penalty: u8) -> Self {
        Self {
            message: message.into(),
            penalty,
        }
    }
}

pub fn missing_total(record: &BillRecord, config: &ValidationConfig) -> Vec<Finding> {
    if record.total_amount.is_zero() {
        vec![Finding::new("Total amount not detected", config.penalties.missing_total)]
    } else {
        Vec::new()
    }
}

pub fn no_line_items(record: &BillRecord, config: &ValidationConfig) -> Vec<Finding> {
    if record.line_items.is_empty() {
        vec![Finding::new("No valid line items detected", config.penalties.no_line_items)]
    } else {
        Vec::new()
    }
}

/// One finding per item whose total is off by more than `tolerance`.
pub fn line_mismatches(
    record: &BillRecord,
    config: &ValidationConfig,
    tolerance: Decimal,
) -> Vec<Finding> {
    record
        .line_items
        .iter()
        .filter(|item| off_by_more(item.expected_total(), item.line_total, tolerance))
        .map(|item| {
            Finding::new(
                format!("Line mismatch: {}", item.item_name),
                config.penalties.line_mismatch,
            )
        })
        .collect()
}

/// Fires once, however many names repeat.
pub fn duplicate_items(record: &BillRecord, config: &ValidationConfig) -> Vec<Finding> {
    let mut seen = HashSet::new();
    let has_duplicate = record
        .line_items
        .iter()
        .any(|item| !seen.insert(item.item_name.as_str()));

    if has_duplicate {
        vec![Finding::new("Duplicate items detected", config.penalties.duplicate_items)]
    } else {
        Vec::new()
    }
}

/// Only runs when a subtotal was found on the bill.
pub fn tax_mismatch(record: &BillRecord, config: &ValidationConfig) -> Vec<Finding> {
    let Some(subtotal) = record.subtotal else {
        return Vec::new();
    };

    let expected = subtotal.checked_mul(config.gst_rate);
    if off_by_more(expected, record.tax_amount, config.tax_tolerance) {
        vec![Finding::new("Tax calculation mismatch", config.penalties.tax_mismatch)]
    } else {
        Vec::new()
    }
}

/// An expected amount that overflowed never matches.
fn off_by_more(expected: Option<Decimal>, actual: Decimal, tolerance: Decimal) -> bool {
    expected
        .and_then(|e| e.checked_sub(actual))
        .is_none_or(|diff| diff.abs() > tolerance)
}

pub fn missing_identity_fields(record: &BillRecord, config: &ValidationConfig) -> Vec<Finding> {
    if !config.check_identity_fields {
        return Vec::new();
    }

    [
        ("patient_name", &record.patient_name),
        ("hospital_name", &record.hospital_name),
        ("date", &record.date),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_none())
    .map(|(field, _)| {
        Finding::new(
            format!("Missing or invalid {}", field),
            config.penalties.missing_field,
        )
    })
    .collect()
}
