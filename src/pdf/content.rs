//! PDF content stream generation for tag symbols and text.
//!
//! This module provides:
//! - Symbol image embedding as XObjects
//! - Tag text rendering with a standard font
//! - PDF content stream building
//!
//! All coordinates taken here are PDF points with the origin at the bottom left.

use crate::error::RenderError;
use lopdf::{Dictionary, Document, Object, Stream};
use std::io::Write;

/// Builder for generating PDF content streams and associated XObjects
pub struct ContentBuilder {
    pub content_parts: Vec<String>,
    pub xobjects: Dictionary,
    font_name: String,
}

impl ContentBuilder {
    /// Create a new ContentBuilder drawing text with the given font resource
    pub fn new(font_name: String) -> Self {
        Self {
            content_parts: Vec::new(),
            xobjects: Dictionary::new(),
            font_name,
        }
    }

    /// Embed a PNG image and draw it into the rectangle at (x, y) sized w x h
    pub fn add_image(
        &mut self,
        png: &[u8],
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        doc: &mut Document,
    ) -> Result<(), RenderError> {
        let img = image::load_from_memory_with_format(png, image::ImageFormat::Png)?.to_luma8();

        // 8-bit grayscale, one byte per pixel
        let compressed_bytes = compress_data(img.as_raw()).map_err(RenderError::Compress)?;

        let mut img_dict = Dictionary::new();
        img_dict.set("Type", "XObject");
        img_dict.set("Subtype", "Image");
        img_dict.set("Width", img.width() as i64);
        img_dict.set("Height", img.height() as i64);
        img_dict.set("ColorSpace", "DeviceGray");
        img_dict.set("BitsPerComponent", 8_i64);
        img_dict.set("Filter", "FlateDecode");

        let img_stream = Stream::new(img_dict, compressed_bytes);
        let img_id = doc.add_object(img_stream);

        let img_name = format!("Im{}", img_id.0);
        self.xobjects.set(img_name.clone(), Object::Reference(img_id));

        self.content_parts.push(format!(
            "q {} 0 0 {} {} {} cm /{} Do Q ",
            w, h, x, y, img_name
        ));

        Ok(())
    }

    /// Draw text with its baseline starting at (x, y)
    pub fn add_text(&mut self, value: &str, x: f32, y: f32, font_size: f32) {
        let escaped_value = escape_pdf_string(value);
        self.content_parts.push(format!(
            "q BT 0 g /{} {} Tf {} {} Td ({}) Tj ET Q ",
            self.font_name, font_size, x, y, escaped_value
        ));
    }

    /// Build the final content bytes
    pub fn build_content_bytes(&self) -> Vec<u8> {
        self.content_parts.join("").into_bytes()
    }
}

/// Escape special characters in PDF strings
pub fn escape_pdf_string(s: &str) -> String {
    let mut result = String::new();
    for c in s.chars() {
        match c {
            '(' => result.push_str(r"\("),
            ')' => result.push_str(r"\)"),
            '\\' => result.push_str(r"\\"),
            '\n' => result.push_str(r"\n"),
            '\r' => result.push_str(r"\r"),
            '\t' => result.push_str(r"\t"),
            _ => result.push(c),
        }
    }
    result
}

/// Compress data using zlib/flate2
pub fn compress_data(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
