//! Rule-based bill extractor combining the individual field rules.

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::models::bill::BillRecord;
use crate::models::config::ExtractionConfig;

use super::rules::{
    DateExtractor, FieldExtractor, LineItemExtractor, NameExtractor, NameField, SubtotalExtractor,
    TaxExtractor, TotalExtractor,
};
use super::{clean_lines, BillExtractor};

/// Extracts a [`BillRecord`] by running every field rule over the cleaned lines.
pub struct RuleBasedExtractor {
    patient: NameExtractor,
    hospital: NameExtractor,
    date: DateExtractor,
    tax: TaxExtractor,
    subtotal: SubtotalExtractor,
    total: TotalExtractor,
    items: LineItemExtractor,
}

impl RuleBasedExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        let name = |field| {
            NameExtractor::new(field)
                .with_header_lines(config.header_scan_lines)
                .with_min_length(config.min_name_length)
        };

        Self {
            patient: name(NameField::Patient),
            hospital: name(NameField::Hospital),
            date: DateExtractor::new(),
            tax: TaxExtractor::new(),
            subtotal: SubtotalExtractor::new(),
            total: TotalExtractor::new(),
            items: LineItemExtractor::from_config(config),
        }
    }

    /// Extract from lines that were already cleaned with [`clean_lines`].
    pub fn extract_lines(&self, lines: &[String]) -> BillRecord {
        debug!("Extracting bill fields from {} lines", lines.len());

        let patient = self.patient.extract(lines);
        let hospital = self.hospital.extract(lines);
        let date = self.date.extract(lines);
        let tax = self.tax.extract(lines);
        let subtotal = self.subtotal.extract(lines);
        let total = self.total.extract(lines);
        let line_items = self.items.extract_all(lines);

        for (field, found) in [("patient", &patient), ("hospital", &hospital), ("date", &date)] {
            match found {
                Some(m) => debug!("{} = {:?} (line {:?}: {:?})", field, m.value, m.line, m.source),
                None => debug!("{} not detected", field),
            }
        }
        if let Some(m) = &tax {
            debug!("tax = {} (line {:?})", m.value, m.line);
        }
        if let Some(m) = &total {
            debug!("total = {} (line {:?}: {:?})", m.value, m.line, m.source);
        }

        BillRecord {
            patient_name: patient.map(|m| m.value),
            hospital_name: hospital.map(|m| m.value),
            date: date.map(|m| m.value),
            tax_amount: tax.map(|m| m.value).unwrap_or(Decimal::ZERO),
            total_amount: total.map(|m| m.value).unwrap_or(Decimal::ZERO),
            subtotal: subtotal.map(|m| m.value),
            line_items,
        }
    }
}

impl Default for RuleBasedExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl BillExtractor for RuleBasedExtractor {
    fn extract(&self, text: &str) -> BillRecord {
        let lines = clean_lines(text);
        info!("Extracting bill from {} characters of text", text.len());

        let record = self.extract_lines(&lines);

        info!(
            "Extracted {} line items, total {}",
            record.line_items.len(),
            record.total_amount
        );
        record
    }
}
