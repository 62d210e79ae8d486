//! Configuration structures for the bill pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{MedbillError, Result};

/// Main configuration for the medbill pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MedbillConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Validation and scoring configuration.
    pub validation: ValidationConfig,

    /// OCR engine configuration.
    pub ocr: OcrConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Only the first N lines are searched for patient and hospital names.
    pub header_scan_lines: usize,

    /// Minimum characters for an accepted patient/hospital name (unless it has two words).
    pub min_name_length: usize,

    /// Minimum characters for an accepted line item name.
    pub min_item_name_length: usize,

    /// Largest accepted line item quantity.
    pub max_quantity: u32,

    /// Largest accepted unit price.
    pub max_unit_price: Decimal,

    /// Largest accepted line total.
    pub max_line_total: Decimal,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            header_scan_lines: 15,
            min_name_length: 5,
            min_item_name_length: 3,
            max_quantity: 100,
            max_unit_price: Decimal::from(100_000),
            max_line_total: Decimal::from(1_000_000),
        }
    }
}

/// Validation and fraud scoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Allowed gap between quantity * unit price and the line total.
    /// Kept within [2, 10] to absorb OCR digit noise.
    pub line_tolerance: Decimal,

    /// Expected GST rate applied to the subtotal.
    pub gst_rate: Decimal,

    /// Allowed gap between expected and detected tax.
    pub tax_tolerance: Decimal,

    /// Penalize bills whose patient, hospital or date is missing.
    pub check_identity_fields: bool,

    /// Score added per triggered check.
    pub penalties: Penalties,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            line_tolerance: Decimal::from(5),
            gst_rate: Decimal::new(18, 2),
            tax_tolerance: Decimal::from(5),
            check_identity_fields: false,
            penalties: Penalties::default(),
        }
    }
}

/// Score penalties for each check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Penalties {
    pub missing_total: u8,
    pub no_line_items: u8,
    /// Applied once per mismatched line.
    pub line_mismatch: u8,
    pub duplicate_items: u8,
    pub tax_mismatch: u8,
    /// Applied once per missing field.
    pub missing_field: u8,
}

impl Default for Penalties {
    fn default() -> Self {
        Self {
            missing_total: 30,
            no_line_items: 20,
            line_mismatch: 10,
            duplicate_items: 10,
            tax_mismatch: 30,
            missing_field: 20,
        }
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` markers for unrecognized glyphs instead of blanking them.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
        }
    }
}

impl OcrConfig {
    /// Check whether the detection and recognition models exist in `model_dir`.
    pub fn models_present(&self, model_dir: &Path) -> bool {
        model_dir.join(&self.detection_model).exists()
            && model_dir.join(&self.recognition_model).exists()
    }
}

impl MedbillConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| MedbillError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| MedbillError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
