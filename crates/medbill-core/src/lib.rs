//! Core library for hospital bill OCR processing.
//!
//! This crate provides:
//! - Field extraction from raw OCR text (patient, hospital, date, GST, total, line items)
//! - Consistency checks and an additive fraud-risk score
//! - Document loading for text files, PDFs and images, with OCR for scanned pages
//! - A pure Rust OCR engine (`native` feature)

pub mod bill;
pub mod document;
pub mod error;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod validation;

pub use bill::{BillExtractor, RuleBasedExtractor};
pub use document::{Document, DocumentKind};
pub use error::{MedbillError, OcrError, PdfError, Result};
pub use models::assessment::{RiskLevel, ValidationResult};
pub use models::bill::{BillRecord, LineItem, NOT_DETECTED};
pub use models::config::MedbillConfig;
pub use ocr::{OcrProvider, OcrText};
pub use pipeline::{BillAnalysis, BillAnalyzer};
pub use validation::BillValidator;

#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
