//! Consistency validation and fraud-risk scoring.
//!
//! The score is additive: each fired check adds a fixed penalty and the sum
//! is clamped at 100. Every error string names the rule that fired it, so a
//! score can always be traced back to the evidence.

pub mod checks;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::assessment::{ValidationResult, MAX_FRAUD_SCORE};
use crate::models::bill::BillRecord;
use crate::models::config::ValidationConfig;

use checks::Finding;

/// Smallest accepted line tolerance.
pub const MIN_LINE_TOLERANCE: Decimal = Decimal::TWO;
/// Largest accepted line tolerance.
pub const MAX_LINE_TOLERANCE: Decimal = Decimal::TEN;
/// Largest accepted GST rate (100%).
pub const MAX_GST_RATE: Decimal = Decimal::ONE;

/// Validates bill records against the configured checks.
pub struct BillValidator {
    config: ValidationConfig,
    line_tolerance: Decimal,
}

impl BillValidator {
    /// Create a validator with default settings.
    pub fn new() -> Self {
        Self::from_config(ValidationConfig::default())
    }

    /// Create a validator from configuration.
    pub fn from_config(mut config: ValidationConfig) -> Self {
        let line_tolerance = config
            .line_tolerance
            .clamp(MIN_LINE_TOLERANCE, MAX_LINE_TOLERANCE);

        if line_tolerance != config.line_tolerance {
            warn!(
                "Line tolerance {} outside [{}, {}], using {}",
                config.line_tolerance, MIN_LINE_TOLERANCE, MAX_LINE_TOLERANCE, line_tolerance
            );
        }

        let gst_rate = config.gst_rate.clamp(Decimal::ZERO, MAX_GST_RATE);
        if gst_rate != config.gst_rate {
            warn!(
                "GST rate {} outside [0, {}], using {}",
                config.gst_rate, MAX_GST_RATE, gst_rate
            );
            config.gst_rate = gst_rate;
        }

        Self {
            config,
            line_tolerance,
        }
    }

    /// GST rate actually applied to the subtotal.
    pub fn gst_rate(&self) -> Decimal {
        self.config.gst_rate
    }

    /// Enable or disable the missing patient/hospital/date check.
    pub fn with_identity_checks(mut self, enabled: bool) -> Self {
        self.config.check_identity_fields = enabled;
        self
    }

    /// Tolerance actually applied to line totals.
    pub fn line_tolerance(&self) -> Decimal {
        self.line_tolerance
    }

    /// Run every check in order and total the penalties.
    pub fn validate(&self, record: &BillRecord) -> ValidationResult {
        let config = &self.config;

        let findings: Vec<Finding> = [
            checks::missing_total(record, config),
            checks::no_line_items(record, config),
            checks::line_mismatches(record, config, self.line_tolerance),
            checks::duplicate_items(record, config),
            checks::tax_mismatch(record, config),
            checks::missing_identity_fields(record, config),
        ]
        .into_iter()
        .flatten()
        .collect();

        let mut score: u32 = 0;
        let mut errors = Vec::with_capacity(findings.len());

        for finding in findings {
            debug!("{} (+{})", finding.message, finding.penalty);
            score += u32::from(finding.penalty);
            errors.push(finding.message);
        }

        let fraud_score = score.min(u32::from(MAX_FRAUD_SCORE)) as u8;
        debug!("Fraud score {} from {} findings", fraud_score, errors.len());

        ValidationResult {
            errors,
            fraud_score,
        }
    }
}

impl Default for BillValidator {
    fn default() -> Self {
        Self::new()
    }
}
