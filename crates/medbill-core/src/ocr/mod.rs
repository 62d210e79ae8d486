//! OCR provider boundary.
//!
//! The bill pipeline only needs recognized text lines in reading order. Any
//! engine that can produce them implements [`OcrProvider`]; the native build
//! ships [`PureOcrEngine`].

#[cfg(feature = "native")]
mod pure_engine;

#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Source of OCR text for bill images.
///
/// Engines are expensive to load: create one up front and pass it by
/// reference to everything that needs it.
pub trait OcrProvider {
    /// Recognize the text in an image. Failures are returned, never retried.
    fn recognize(&self, image: &DynamicImage) -> Result<OcrText, OcrError>;
}

/// Text recognized in one image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrText {
    /// Recognized lines, top to bottom.
    pub lines: Vec<String>,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Image dimensions (width, height).
    pub image_size: (u32, u32),
}

impl OcrText {
    /// Lines joined with newlines, the form the extractor consumes.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// True when nothing was recognized.
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }
}

/// Order `(x, y, text)` boxes top-to-bottom, then left-to-right within a row,
/// and join each row into one line.
///
/// A row is anchored at the top edge of its first box. Later boxes join it
/// while their top edge is within `row_height` of that anchor, so a bill row
/// split into name and amount regions comes back as a single line even when
/// its boxes straddle a multiple of `row_height`.
pub fn reading_order(mut boxes: Vec<(f32, f32, String)>, row_height: f32) -> Vec<String> {
    boxes.retain(|(_, _, text)| !text.trim().is_empty());
    boxes.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut rows: Vec<(f32, Vec<(f32, String)>)> = Vec::new();
    for (x, y, text) in boxes {
        match rows.last_mut() {
            Some((anchor, row)) if y - *anchor < row_height => row.push((x, text)),
            _ => rows.push((y, vec![(x, text)])),
        }
    }

    rows.into_iter()
        .map(|(_, mut row)| {
            row.sort_by(|a, b| a.0.total_cmp(&b.0));
            row.iter()
                .map(|(_, text)| text.trim())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_order() {
        let boxes = vec![
            (300.0, 52.0, "20.00".to_string()),
            (10.0, 5.0, "City Hospital".to_string()),
            (10.0, 50.0, "2 Paracetamol".to_string()),
            (200.0, 51.0, "10.00".to_string()),
            (150.0, 90.0, "  ".to_string()),
        ];

        assert_eq!(
            reading_order(boxes, 20.0),
            vec!["City Hospital", "2 Paracetamol 10.00 20.00"]
        );
    }

    #[test]
    fn test_reading_order_row_across_band_edge() {
        let boxes = vec![
            (300.0, 41.0, "10.00 20.00".to_string()),
            (10.0, 39.0, "2 Paracetamol".to_string()),
            (10.0, 70.0, "Total 20.00".to_string()),
        ];

        assert_eq!(
            reading_order(boxes, 20.0),
            vec!["2 Paracetamol 10.00 20.00", "Total 20.00"]
        );
    }

    #[test]
    fn test_reading_order_rows_do_not_chain() {
        // Each box is within 20 px of the previous one but not of the anchor
        let boxes = vec![
            (10.0, 0.0, "A".to_string()),
            (10.0, 15.0, "B".to_string()),
            (10.0, 30.0, "C".to_string()),
        ];

        assert_eq!(reading_order(boxes, 20.0), vec!["A B", "C"]);
    }

    #[test]
    fn test_ocr_text() {
        let ocr = OcrText {
            lines: vec!["Total".to_string(), "500".to_string()],
            ..OcrText::default()
        };
        assert_eq!(ocr.text(), "Total\n500");
        assert!(!ocr.is_empty());
        assert!(OcrText::default().is_empty());
    }
}
