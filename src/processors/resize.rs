//! Fixed-size resize of the grayscale drawing to the model input.
//!
//! The resampling filter is part of the prediction contract: changing it
//! changes prediction behavior for the same drawing, so it is fixed at
//! construction and covered by tests.

use crate::core::DigitError;
use image::GrayImage;
use image::imageops::{self, FilterType};

/// Resampling filters available for the input resize.
///
/// Mirrors `image::imageops::FilterType`, kept as a separate enum so it can be
/// carried in serialized configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ResizeFilter {
    /// Nearest neighbor sampling.
    Nearest,
    /// Linear (triangle) interpolation.
    Triangle,
    /// Cubic (Catmull-Rom) interpolation.
    CatmullRom,
    /// Gaussian resampling.
    Gaussian,
    /// Lanczos with window 3.
    Lanczos3,
}

impl ResizeFilter {
    /// Maps this filter to the image crate's filter type.
    pub fn to_filter_type(self) -> FilterType {
        match self {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl Default for ResizeFilter {
    fn default() -> Self {
        ResizeFilter::Lanczos3
    }
}

/// Resizes grayscale drawings to the classifier's fixed spatial input size.
#[derive(Debug, Clone)]
pub struct ResizeToInput {
    /// Target width in pixels.
    width: u32,
    /// Target height in pixels.
    height: u32,
    /// Resampling filter applied to every resize.
    filter: ResizeFilter,
}

impl ResizeToInput {
    /// Creates a resize processor with the default filter.
    ///
    /// # Arguments
    ///
    /// * `width` - Target width in pixels (must be > 0).
    /// * `height` - Target height in pixels (must be > 0).
    ///
    /// # Returns
    ///
    /// A Result containing the processor or a DigitError if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, DigitError> {
        Self::with_filter(width, height, ResizeFilter::default())
    }

    /// Creates a resize processor with an explicit filter.
    ///
    /// # Arguments
    ///
    /// * `width` - Target width in pixels (must be > 0).
    /// * `height` - Target height in pixels (must be > 0).
    /// * `filter` - The resampling filter.
    pub fn with_filter(width: u32, height: u32, filter: ResizeFilter) -> Result<Self, DigitError> {
        if width == 0 || height == 0 {
            return Err(DigitError::config(format!(
                "resize target must have positive area, got {}x{}",
                width, height
            )));
        }
        Ok(Self {
            width,
            height,
            filter,
        })
    }

    /// The target dimensions as (width, height).
    pub fn target_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The resampling filter in use.
    pub fn filter(&self) -> ResizeFilter {
        self.filter
    }

    /// Resizes the given grayscale image to the target size.
    ///
    /// A source already at the target size is still passed through the
    /// resampler, keeping the transform uniform across input resolutions.
    pub fn apply(&self, img: &GrayImage) -> GrayImage {
        imageops::resize(img, self.width, self.height, self.filter.to_filter_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_produces_target_dimensions() {
        let resize = ResizeToInput::new(28, 28).unwrap();
        let src = GrayImage::new(300, 300);
        let out = resize.apply(&src);
        assert_eq!(out.dimensions(), (28, 28));
    }

    #[test]
    fn test_resize_is_resolution_independent() {
        let resize = ResizeToInput::new(28, 28).unwrap();
        for (w, h) in [(1, 1), (28, 28), (100, 50), (640, 480)] {
            let out = resize.apply(&GrayImage::new(w, h));
            assert_eq!(out.dimensions(), (28, 28));
        }
    }

    #[test]
    fn test_default_filter_is_lanczos3() {
        let resize = ResizeToInput::new(28, 28).unwrap();
        assert_eq!(resize.filter(), ResizeFilter::Lanczos3);
    }

    #[test]
    fn test_zero_target_is_rejected() {
        assert!(ResizeToInput::new(0, 28).is_err());
        assert!(ResizeToInput::new(28, 0).is_err());
    }
}
