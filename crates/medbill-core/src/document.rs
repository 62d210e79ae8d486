//! Turning bill files into OCR text.
//!
//! Plain text is read as-is, text PDFs have their embedded text pulled
//! out, and images and scanned PDF pages go through an [`OcrProvider`].

use std::fs;
use std::path::Path;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{MedbillError, OcrError, PdfError, Result};
use crate::ocr::OcrProvider;
use crate::pdf;

/// Kind of input document, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// OCR text saved to a file.
    Text,
    /// PDF, with embedded text or scanned pages.
    Pdf,
    /// Scanned or photographed bill.
    Image,
}

impl DocumentKind {
    /// Classify a path by its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "txt" | "text" => Some(DocumentKind::Text),
            "pdf" => Some(DocumentKind::Pdf),
            "png" | "jpg" | "jpeg" | "tif" | "tiff" | "bmp" | "webp" => Some(DocumentKind::Image),
            _ => None,
        }
    }

    /// Whether this kind always needs an OCR engine. PDFs only need one
    /// when they have no embedded text.
    pub fn needs_ocr(&self) -> bool {
        matches!(self, DocumentKind::Image)
    }
}

/// Text obtained from one input file.
#[derive(Debug, Clone)]
pub struct Document {
    /// How the text was obtained.
    pub kind: DocumentKind,
    /// Raw text, newline separated.
    pub text: String,
    /// OCR time, when the text came from OCR.
    pub ocr_time_ms: Option<u64>,
}

impl Document {
    /// Load a bill file and return its text.
    ///
    /// `ocr` is consulted for image inputs and for PDFs without embedded
    /// text. A scanned PDF loaded without a provider fails with
    /// [`PdfError::NoText`], so callers can retry with an engine.
    pub fn from_path(path: &Path, ocr: Option<&dyn OcrProvider>) -> Result<Self> {
        let kind = DocumentKind::from_path(path).ok_or_else(|| {
            MedbillError::UnsupportedFormat(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("<none>")
                    .to_string(),
            )
        })?;

        info!("Loading {:?} document: {}", kind, path.display());

        match kind {
            DocumentKind::Text => {
                // OCR dumps often carry stray non-UTF-8 bytes
                let data = fs::read(path)?;
                Ok(Self {
                    kind,
                    text: String::from_utf8_lossy(&data).into_owned(),
                    ocr_time_ms: None,
                })
            }
            DocumentKind::Pdf => {
                let data = fs::read(path)?;
                match pdf::embedded_text(&data) {
                    Ok(text) => Ok(Self {
                        kind,
                        text,
                        ocr_time_ms: None,
                    }),
                    Err(PdfError::NoText) => {
                        let ocr = ocr.ok_or(PdfError::NoText)?;
                        info!("No embedded text, running OCR on page images");
                        let (text, ms) = recognize_all(&pdf::page_images(&data)?, ocr)?;
                        Ok(Self {
                            kind,
                            text,
                            ocr_time_ms: Some(ms),
                        })
                    }
                    Err(e) => Err(e.into()),
                }
            }
            DocumentKind::Image => {
                let ocr = ocr.ok_or(OcrError::Unavailable)?;
                let (text, ms) = recognize_all(&[image::open(path)?], ocr)?;
                Ok(Self {
                    kind,
                    text,
                    ocr_time_ms: Some(ms),
                })
            }
        }
    }
}

/// OCR each image in order and join the recognized lines.
fn recognize_all(images: &[DynamicImage], ocr: &dyn OcrProvider) -> Result<(String, u64)> {
    let mut pages = Vec::with_capacity(images.len());
    let mut total_ms = 0;

    for (i, image) in images.iter().enumerate() {
        let result = ocr.recognize(image)?;
        debug!(
            "OCR recognized {} lines on image {} in {}ms",
            result.lines.len(),
            i + 1,
            result.processing_time_ms
        );
        if result.is_empty() {
            warn!("OCR found no text on image {}", i + 1);
        }
        total_ms += result.processing_time_ms;
        pages.push(result.text());
    }

    Ok((pages.join("\n"), total_ms))
}
