//! Bill analysis pipeline: extraction followed by validation.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bill::{clean_lines, RuleBasedExtractor};
use crate::models::assessment::{RiskLevel, ValidationResult};
use crate::models::bill::BillRecord;
use crate::models::config::MedbillConfig;
use crate::validation::BillValidator;

/// Everything known about one analyzed bill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillAnalysis {
    /// Extracted fields.
    pub record: BillRecord,

    /// Validation errors and fraud score.
    pub validation: ValidationResult,

    /// Risk band for the fraud score.
    pub risk: RiskLevel,

    /// Cleaned OCR lines the record was extracted from.
    pub lines: Vec<String>,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Runs the field extractor and the validator over one text block.
///
/// Holds no per-document state, so one analyzer can be reused for any
/// number of bills.
pub struct BillAnalyzer {
    extractor: RuleBasedExtractor,
    validator: BillValidator,
}

impl BillAnalyzer {
    /// Create an analyzer with default settings.
    pub fn new() -> Self {
        Self::from_config(&MedbillConfig::default())
    }

    /// Create an analyzer from configuration.
    pub fn from_config(config: &MedbillConfig) -> Self {
        Self {
            extractor: RuleBasedExtractor::from_config(&config.extraction),
            validator: BillValidator::from_config(config.validation.clone()),
        }
    }

    /// Analyze raw OCR text.
    pub fn analyze(&self, text: &str) -> BillAnalysis {
        let start = Instant::now();

        let lines = clean_lines(text);
        let record = self.extractor.extract_lines(&lines);
        let validation = self.validator.validate(&record);
        let risk = validation.risk_level();

        info!(
            "Bill analyzed: {} items, fraud score {} ({})",
            record.line_items.len(),
            validation.fraud_score,
            risk
        );

        BillAnalysis {
            record,
            validation,
            risk,
            lines,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl Default for BillAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
