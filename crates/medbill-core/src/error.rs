//! Error types for the medbill-core library.
//!
//! Extraction and validation never fail; these errors only come from the
//! collaborators around them: file I/O, PDF parsing, image decoding and OCR.

use thiserror::Error;

/// Main error type for the medbill library.
#[derive(Error, Debug)]
pub enum MedbillError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Image decoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The input file type is not a bill we know how to read.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
}

/// Errors related to PDF text extraction.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF has no embedded text (scanned pages).
    #[error("PDF has no embedded text")]
    NoText,

    /// The PDF is encrypted with a non-empty password.
    #[error("PDF is encrypted")]
    Encrypted,

    /// Neither embedded text nor decodable page images.
    #[error("PDF has no decodable page images")]
    NoImages,
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// No OCR engine was supplied for an image input.
    #[error("no OCR engine available for image input")]
    Unavailable,
}

/// Result type for the medbill library.
pub type Result<T> = std::result::Result<T, MedbillError>;
