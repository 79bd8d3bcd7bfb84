//! QR symbol encoding for cell payloads.

use image::{ImageBuffer, ImageFormat, Luma};
use qrcode::QrCode;
use std::io::Cursor;

use crate::error::RenderError;
use crate::layout::SymbolEncoder;

/// Default QR image size in pixels
pub const QR_SIZE: u32 = 200;

/// Encodes payloads as QR codes rendered to grayscale PNG bytes.
#[derive(Debug, Clone, Copy)]
pub struct QrSymbolEncoder {
    size: u32,
}

impl QrSymbolEncoder {
    pub fn new(size: u32) -> Self {
        Self { size }
    }
}

impl Default for QrSymbolEncoder {
    fn default() -> Self {
        Self::new(QR_SIZE)
    }
}

impl SymbolEncoder for QrSymbolEncoder {
    type Error = RenderError;

    fn encode(&self, payload: &str) -> Result<Vec<u8>, RenderError> {
        let img = generate_qr_code(payload, self.size, self.size)?;
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }
}

/// Generate a QR code as an image buffer
pub fn generate_qr_code(
    data: &str,
    width: u32,
    height: u32,
) -> Result<ImageBuffer<Luma<u8>, Vec<u8>>, RenderError> {
    let qr_code = QrCode::new(data).map_err(|source| RenderError::Symbol {
        payload: data.to_string(),
        source,
    })?;

    // light=255 (white), dark=0 (black)
    let img = qr_code
        .render::<Luma<u8>>()
        .light_color(Luma([255u8]))
        .dark_color(Luma([0u8]))
        .build();

    let scaled = image::imageops::resize(
        &img,
        width,
        height,
        image::imageops::FilterType::Nearest,
    );
    Ok(scaled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_qr_code_size() {
        let img = generate_qr_code("A0BCDEFG", 120, 120).unwrap();
        assert_eq!(img.dimensions(), (120, 120));
        // quiet zone is white, finder pattern is black
        assert_eq!(img.get_pixel(0, 0)[0], 255);
        assert!(img.pixels().any(|p| p[0] == 0));
    }

    #[test]
    fn test_encode_produces_png() {
        let png = QrSymbolEncoder::default().encode("https://example.com/A0BCDEFG").unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (QR_SIZE, QR_SIZE));
    }

    #[test]
    fn test_payload_too_long() {
        let payload = "X".repeat(8000);
        let err = QrSymbolEncoder::default().encode(&payload).unwrap_err();
        assert!(matches!(err, RenderError::Symbol { .. }));
    }
}
