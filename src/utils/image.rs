//! Utility functions for loading images.
//!
//! Images arrive either as raw bytes (an upload handed over by the caller) or
//! as paths on disk. Both are decoded with the `image` crate and converted to
//! 8-bit RGB, the only pixel format the pipeline works on.

use crate::core::errors::{PartsError, PartsResult};
use image::{DynamicImage, RgbImage};
use std::path::Path;

/// Converts a DynamicImage to an RgbImage.
pub fn dynamic_to_rgb(img: DynamicImage) -> RgbImage {
    img.to_rgb8()
}

/// Decodes an in-memory image and converts it to RgbImage.
///
/// The format is guessed from the leading bytes.
///
/// # Errors
///
/// Returns [`PartsError::ImageRead`] if `bytes` is empty or cannot be decoded.
pub fn decode_image(bytes: &[u8]) -> PartsResult<RgbImage> {
    if bytes.is_empty() {
        return Err(PartsError::image_read("image bytes are empty"));
    }
    let img = image::load_from_memory(bytes).map_err(PartsError::image_decode)?;
    Ok(dynamic_to_rgb(img))
}

/// Loads an image from a file path and converts it to RgbImage.
///
/// # Errors
///
/// Returns [`PartsError::ImageRead`] if the file cannot be opened or decoded.
pub fn load_image(path: &Path) -> PartsResult<RgbImage> {
    let img = image::open(path).map_err(PartsError::image_decode)?;
    Ok(dynamic_to_rgb(img))
}

/// Reads the raw bytes of an image file without decoding them.
///
/// Useful when the bytes are also needed by a text detector.
pub fn load_image_bytes(path: &Path) -> PartsResult<Vec<u8>> {
    Ok(std::fs::read(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ErrorKind;
    use image::{ImageFormat, Rgb};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 180, 160]));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let img = decode_image(&png_bytes(32, 24)).unwrap();
        assert_eq!(img.dimensions(), (32, 24));
        assert_eq!(img.get_pixel(5, 5), &Rgb([200, 180, 160]));
    }

    #[test]
    fn test_decode_empty_and_garbage() {
        let empty = decode_image(&[]).unwrap_err();
        assert_eq!(empty.kind(), ErrorKind::ImageRead);
        assert!(empty.to_string().contains("empty"));

        let garbage = decode_image(b"not an image at all").unwrap_err();
        assert_eq!(garbage.kind(), ErrorKind::ImageRead);
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.png");
        std::fs::write(&path, png_bytes(10, 12)).unwrap();

        assert_eq!(load_image(&path).unwrap().dimensions(), (10, 12));
        assert_eq!(load_image_bytes(&path).unwrap(), png_bytes(10, 12));

        let missing = load_image_bytes(&dir.path().join("missing.png")).unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::ImageRead);
    }
}
