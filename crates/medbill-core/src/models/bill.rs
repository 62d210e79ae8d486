//! Bill data models produced by the field extractor.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Text written in place of an identity field that could not be found.
pub const NOT_DETECTED: &str = "not detected";

/// Structured record extracted from one hospital bill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillRecord {
    /// Patient name.
    #[serde(default, with = "sentinel")]
    pub patient_name: Option<String>,

    /// Hospital or clinic name.
    #[serde(default, with = "sentinel")]
    pub hospital_name: Option<String>,

    /// Bill date, exactly as it appeared in the text.
    #[serde(default, with = "sentinel")]
    pub date: Option<String>,

    /// Tax (GST) amount.
    #[serde(default)]
    pub tax_amount: Decimal,

    /// Bill total.
    #[serde(default)]
    pub total_amount: Decimal,

    /// Subtotal before tax, when a subtotal line was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Decimal>,

    /// Line items in source order.
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

/// A single billed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Quantity, in [1, 100] with the default bounds.
    pub quantity: u32,

    /// Item name (letters and spaces only).
    pub item_name: String,

    /// Price per unit.
    pub unit_price: Decimal,

    /// Amount billed for the line.
    pub line_total: Decimal,
}

impl LineItem {
    /// Amount the line should total: quantity times unit price.
    ///
    /// `None` when the product does not fit in a `Decimal`.
    pub fn expected_total(&self) -> Option<Decimal> {
        Decimal::from(self.quantity).checked_mul(self.unit_price)
    }
}

impl BillRecord {
    /// Create an empty record with every field undetected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Patient name, or the sentinel text.
    pub fn patient_display(&self) -> &str {
        self.patient_name.as_deref().unwrap_or(NOT_DETECTED)
    }

    /// Hospital name, or the sentinel text.
    pub fn hospital_display(&self) -> &str {
        self.hospital_name.as_deref().unwrap_or(NOT_DETECTED)
    }

    /// Date as detected, or the sentinel text.
    pub fn date_display(&self) -> &str {
        self.date.as_deref().unwrap_or(NOT_DETECTED)
    }

    /// Interpret the detected date as a calendar date.
    ///
    /// Handles `15/01/2024`, `15-1-24`, `15.01.2024` and `15 Jan 2024`
    /// (day first). Returns `None` when the text is not a real date.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let raw = self.date.as_deref()?.trim();

        let numeric: Vec<&str> = raw.split(['/', '-', '.']).collect();
        if numeric.len() == 3 {
            let day: u32 = numeric[0].parse().ok()?;
            let month: u32 = numeric[1].parse().ok()?;
            let year = expand_year(numeric[2])?;
            return NaiveDate::from_ymd_opt(year, month, day);
        }

        let words: Vec<&str> = raw.split_whitespace().collect();
        if words.len() == 3 {
            let day: u32 = words[0].parse().ok()?;
            let month = month_number(words[1])?;
            let year: i32 = words[2].parse().ok()?;
            return NaiveDate::from_ymd_opt(year, month, day);
        }

        None
    }
}

fn expand_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    match s.len() {
        2 => Some(if year <= 50 { 2000 + year } else { 1900 + year }),
        4 => Some(year),
        _ => None,
    }
}

/// Month number for an English month name or its three-letter abbreviation.
pub(crate) fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let prefix = lower.get(..3)?;
    let month = match prefix {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Serializes `None` as the "not detected" sentinel and reads it back as `None`.
mod sentinel {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::NOT_DETECTED;

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(NOT_DETECTED))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.filter(|v| !v.is_empty() && v != NOT_DETECTED))
    }
}
