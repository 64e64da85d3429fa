use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use super::Capture;
use crate::error::SceneError;

/// Encode a capture as PNG bytes.
pub fn encode_png(capture: &Capture) -> Result<Vec<u8>, SceneError> {
    let (width, height) = (capture.width, capture.height);
    let image = RgbaImage::from_raw(width, height, capture.rgba.clone())
        .ok_or_else(|| {
            SceneError::Encode(format!(
                "capture buffer of {} bytes does not match {}x{}",
                capture.rgba.len(),
                capture.width,
                capture.height
            ))
        })?;
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| SceneError::Encode(e.to_string()))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_decodable_png() {
        let capture = Capture {
            width: 2,
            height: 1,
            rgba: vec![255, 0, 0, 255, 0, 0, 255, 128],
        };
        let bytes = encode_png(&capture).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 1));
        assert_eq!(decoded.get_pixel(1, 0).0, [0, 0, 255, 128]);
    }

    #[test]
    fn short_buffer_is_an_error() {
        let capture = Capture {
            width: 4,
            height: 4,
            rgba: vec![0; 3],
        };
        assert!(matches!(encode_png(&capture), Err(SceneError::Encode(_))));
    }
}
