//! The drawing-surface pixel buffer contract.
//!
//! A drawing surface produces a fixed-size RGBA pixel buffer (white strokes on
//! a black background). The pipeline does not implement drawing, undo, or
//! stroke capture; it only consumes the captured pixels. [`CanvasBuffer`] is
//! that in-memory contract: an immutable RGBA8 grid of positive dimensions,
//! validated at construction so the rest of the pipeline never sees a
//! malformed buffer.

use crate::core::DigitError;
use image::RgbaImage;
use std::path::Path;

/// An immutable RGBA8 pixel buffer captured from a drawing surface.
///
/// The buffer may have any positive width and height; the pipeline resizes it
/// regardless of source resolution. Only luminance is consulted downstream,
/// the alpha channel is not read separately.
#[derive(Debug, Clone)]
pub struct CanvasBuffer {
    pixels: RgbaImage,
}

impl CanvasBuffer {
    /// Creates a canvas buffer from raw RGBA bytes.
    ///
    /// The data must be in RGBA format (4 bytes per pixel) and its length
    /// must match the specified dimensions exactly.
    ///
    /// # Arguments
    ///
    /// * `width` - The width of the buffer in pixels.
    /// * `height` - The height of the buffer in pixels.
    /// * `data` - The raw pixel data (RGBA, row-major).
    ///
    /// # Returns
    ///
    /// A Result containing the canvas buffer, or a DigitError if the buffer
    /// has zero area or the byte length is incompatible with RGBA decoding.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, DigitError> {
        if width == 0 || height == 0 {
            return Err(DigitError::invalid_image(format!(
                "canvas must have positive area, got {}x{}",
                width, height
            )));
        }

        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(DigitError::invalid_image(format!(
                "RGBA data length mismatch for {}x{} canvas: expected {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }

        let pixels = RgbaImage::from_raw(width, height, data).ok_or_else(|| {
            DigitError::invalid_image("RGBA container smaller than the declared dimensions")
        })?;

        Ok(Self { pixels })
    }

    /// Creates a canvas buffer from an existing RGBA image.
    ///
    /// # Arguments
    ///
    /// * `pixels` - The RGBA image.
    ///
    /// # Returns
    ///
    /// A Result containing the canvas buffer, or a DigitError if the image
    /// has zero area.
    pub fn from_image(pixels: RgbaImage) -> Result<Self, DigitError> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(DigitError::invalid_image(format!(
                "canvas must have positive area, got {}x{}",
                width, height
            )));
        }
        Ok(Self { pixels })
    }

    /// Loads a canvas buffer from an image file, converting to RGBA.
    ///
    /// # Arguments
    ///
    /// * `path` - The path of the image file to load.
    ///
    /// # Returns
    ///
    /// A Result containing the canvas buffer or a DigitError.
    pub fn from_path(path: &Path) -> Result<Self, DigitError> {
        let img = image::open(path).map_err(DigitError::ImageLoad)?;
        Self::from_image(img.to_rgba8())
    }

    /// The width of the buffer in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// The height of the buffer in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// The dimensions of the buffer as (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// The underlying RGBA image.
    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_accepts_matching_length() {
        let buffer = CanvasBuffer::from_raw(2, 3, vec![0u8; 2 * 3 * 4]).unwrap();
        assert_eq!(buffer.dimensions(), (2, 3));
    }

    #[test]
    fn test_from_raw_rejects_zero_area() {
        let result = CanvasBuffer::from_raw(0, 300, Vec::new());
        assert!(matches!(result, Err(DigitError::InvalidImage { .. })));
    }

    #[test]
    fn test_from_raw_rejects_wrong_length() {
        // 3 bytes per pixel looks like RGB, not RGBA.
        let result = CanvasBuffer::from_raw(2, 2, vec![0u8; 2 * 2 * 3]);
        assert!(matches!(result, Err(DigitError::InvalidImage { .. })));
    }

    #[test]
    fn test_from_image_rejects_empty_image() {
        let result = CanvasBuffer::from_image(RgbaImage::new(0, 0));
        assert!(matches!(result, Err(DigitError::InvalidImage { .. })));
    }
}
