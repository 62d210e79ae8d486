//! Validation outcome and risk banding.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Highest possible fraud score.
pub const MAX_FRAUD_SCORE: u8 = 100;

/// Outcome of validating one bill record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Issues found, in check order.
    pub errors: Vec<String>,

    /// Additive risk score, clamped to [0, 100].
    pub fraud_score: u8,
}

impl ValidationResult {
    /// True when no check fired.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Risk band for this score.
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.fraud_score)
    }
}

/// Three-band presentation of a fraud score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Score below 30.
    Low,
    /// Score from 30 to 69.
    Medium,
    /// Score of 70 or more.
    High,
}

impl RiskLevel {
    /// Map a fraud score to its band.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=29 => RiskLevel::Low,
            30..=69 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }

    /// Label shown to reviewers.
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        }
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    /// Parse a band name ("low", "medium", "high").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" | "med" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(format!("unknown risk level '{}', expected low, medium or high", other)),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
