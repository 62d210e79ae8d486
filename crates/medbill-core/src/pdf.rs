//! PDF text and page image extraction using pdf-extract and lopdf.
//!
//! Text PDFs are read through their embedded text. Scanned PDFs carry the
//! bill as image XObjects, which are decoded here so an OCR provider can
//! read them.

use std::collections::HashSet;

use image::{DynamicImage, ImageBuffer, Rgba};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace};

use crate::error::PdfError;

type Result<T> = std::result::Result<T, PdfError>;

/// Extract the embedded text of a PDF.
///
/// Returns [`PdfError::NoText`] when the pages carry no text, which is the
/// case for scanned bills.
pub fn embedded_text(data: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| PdfError::Parse(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(PdfError::NoText);
    }

    Ok(text)
}

/// Decode the images of every page, in page order.
pub fn page_images(data: &[u8]) -> Result<Vec<DynamicImage>> {
    let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

    if doc.is_encrypted() {
        doc.decrypt("").map_err(|_| PdfError::Encrypted)?;
        debug!("Decrypted PDF with empty password");
    }

    let mut images = Vec::new();
    let mut seen: HashSet<ObjectId> = HashSet::new();

    for (number, page_id) in doc.get_pages() {
        let before = images.len();
        if let Some(resources) = page_resources(&doc, page_id) {
            images.extend(xobject_images(&doc, &resources, &mut seen));
        }
        debug!("Page {}: {} images", number, images.len() - before);
    }

    // Some producers do not link images from the page resources
    if images.is_empty() {
        debug!("No XObject images linked from pages, scanning all objects");
        for (id, object) in &doc.objects {
            if seen.insert(*id) {
                images.extend(decode_image(&doc, object));
            }
        }
    }

    if images.is_empty() {
        return Err(PdfError::NoImages);
    }

    Ok(images)
}

fn xobject_images(
    doc: &Document,
    resources: &Dictionary,
    seen: &mut HashSet<ObjectId>,
) -> Vec<DynamicImage> {
    let Ok(xobjects) = resources.get(b"XObject") else {
        return Vec::new();
    };
    let Ok((_, Object::Dictionary(xobjects))) = doc.dereference(xobjects) else {
        return Vec::new();
    };

    let mut images = Vec::new();
    for (_name, entry) in xobjects.iter() {
        if let Object::Reference(id) = entry {
            if !seen.insert(*id) {
                continue;
            }
        }
        if let Ok((_, object)) = doc.dereference(entry) {
            images.extend(decode_image(doc, object));
        }
    }
    images
}

/// Resources of a page, inherited from the page tree when not set directly.
fn page_resources(doc: &Document, node_id: ObjectId) -> Option<Dictionary> {
    let Ok(Object::Dictionary(node)) = doc.get_object(node_id) else {
        return None;
    };

    if let Ok(resources) = node.get(b"Resources") {
        if let Ok((_, Object::Dictionary(resources))) = doc.dereference(resources) {
            return Some(resources.clone());
        }
    }

    match node.get(b"Parent") {
        Ok(Object::Reference(parent_id)) => page_resources(doc, *parent_id),
        _ => None,
    }
}

fn decode_image(doc: &Document, object: &Object) -> Option<DynamicImage> {
    let Object::Stream(stream) = object else {
        return None;
    };
    let dict = &stream.dict;

    if dict.get(b"Subtype").ok()?.as_name().ok()? != b"Image" {
        return None;
    }

    let width = u32::try_from(dict.get(b"Width").ok()?.as_i64().ok()?).ok()?;
    let height = u32::try_from(dict.get(b"Height").ok()?.as_i64().ok()?).ok()?;
    trace!("Found image object: {}x{}", width, height);

    let filter = dict.get(b"Filter").ok().and_then(|f| match f {
        Object::Name(name) => Some(name.as_slice()),
        Object::Array(filters) => filters.first().and_then(|o| o.as_name().ok()),
        _ => None,
    });

    match filter {
        Some(b"DCTDecode") => {
            return image::load_from_memory_with_format(&stream.content, image::ImageFormat::Jpeg)
                .ok();
        }
        Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
            trace!("Unsupported image filter");
            return None;
        }
        _ => {}
    }

    let data = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());

    let color_space = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|o| match o {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(parts) => parts.first().and_then(|o| o.as_name().ok()),
            Object::Reference(id) => doc.get_object(*id).ok().and_then(|o| o.as_name().ok()),
            _ => None,
        })
        .unwrap_or(b"DeviceRGB");

    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(8);

    raw_image(&data, width, height, color_space, bits)
}

/// Build an image from uncompressed 8-bit RGB or grayscale samples.
fn raw_image(
    data: &[u8],
    width: u32,
    height: u32,
    color_space: &[u8],
    bits_per_component: i64,
) -> Option<DynamicImage> {
    if bits_per_component != 8 {
        trace!("Unsupported bits per component: {}", bits_per_component);
        return None;
    }

    let pixels = (width as usize).checked_mul(height as usize)?;
    let channels = match color_space {
        b"DeviceRGB" | b"RGB" => 3,
        b"DeviceGray" | b"G" => 1,
        other => {
            trace!("Unsupported color space: {}", String::from_utf8_lossy(other));
            return None;
        }
    };

    let samples = data.get(..pixels.checked_mul(channels)?)?;
    let mut rgba = Vec::with_capacity(pixels * 4);
    for px in samples.chunks_exact(channels) {
        match px {
            [r, g, b] => rgba.extend([*r, *g, *b, 255]),
            [gray] => rgba.extend([*gray, *gray, *gray, 255]),
            _ => return None,
        }
    }

    ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba).map(DynamicImage::ImageRgba8)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Stream};

    /// One-page PDF whose only content is a 2x2 grayscale image.
    pub(crate) fn scanned_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 2_i64,
                "Height" => 2_i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8_i64,
            },
            vec![0, 255, 255, 0],
        ));
        let resources_id = doc.add_object(dictionary! {
            "XObject" => dictionary! { "Im1" => image_id },
        });

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        200_i64.into(),
                        0_i64.into(),
                        0_i64.into(),
                        200_i64.into(),
                        0_i64.into(),
                        0_i64.into(),
                    ],
                ),
                Operation::new("Do", vec!["Im1".into()]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(200), Object::Integer(200)],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1_i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut data = Vec::new();
        doc.save_to(&mut data).unwrap();
        data
    }

    #[test]
    fn test_page_images_from_scanned_pdf() {
        let images = page_images(&scanned_pdf()).unwrap();

        assert_eq!(images.len(), 1);
        let image = images[0].to_rgba8();
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.get_pixel(1, 0).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_scanned_pdf_has_no_text() {
        assert!(matches!(embedded_text(&scanned_pdf()), Err(PdfError::NoText)));
    }

    #[test]
    fn test_raw_image_rgb_and_gray() {
        let rgb = raw_image(&[10, 20, 30], 1, 1, b"DeviceRGB", 8).unwrap();
        assert_eq!(rgb.to_rgba8().get_pixel(0, 0).0, [10, 20, 30, 255]);

        let gray = raw_image(&[7, 9], 2, 1, b"DeviceGray", 8).unwrap();
        assert_eq!(gray.to_rgba8().get_pixel(1, 0).0, [9, 9, 9, 255]);
    }

    #[test]
    fn test_raw_image_rejects_short_or_unsupported_data() {
        assert!(raw_image(&[1, 2], 1, 1, b"DeviceRGB", 8).is_none());
        assert!(raw_image(&[1], 1, 1, b"DeviceGray", 1).is_none());
        assert!(raw_image(&[1, 2, 3, 4], 1, 1, b"DeviceCMYK", 8).is_none());
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        assert!(matches!(page_images(b"not a pdf"), Err(PdfError::Parse(_))));
    }
}
