//! Intensity normalization for the digit classifier input.
//!
//! This module scales 8-bit grayscale intensities into the floating point
//! range the classifier was trained on and arranges the result into the
//! batch/channel tensor layout of the input contract.

use crate::core::{DigitError, ProcessingStage, Tensor4D};
use image::GrayImage;

/// Normalizes a grayscale drawing into the classifier input tensor.
///
/// The transform is `value * alpha + beta` per pixel, with
/// `alpha = scale / std` and `beta = -mean / std` precomputed at
/// construction. Digit classifiers trained on [0, 1] inputs use the plain
/// `1/255` scale with no mean/std shift, which is the default.
#[derive(Debug, Clone)]
pub struct NormalizeImage {
    /// Scaling factor applied to each intensity (alpha = scale / std).
    pub alpha: f32,
    /// Offset applied to each intensity (beta = -mean / std).
    pub beta: f32,
}

impl NormalizeImage {
    /// Creates a new NormalizeImage instance with the specified parameters.
    ///
    /// # Arguments
    ///
    /// * `scale` - Optional scaling factor (defaults to 1.0/255.0).
    /// * `mean` - Optional mean value (defaults to 0.0).
    /// * `std` - Optional standard deviation (defaults to 1.0).
    ///
    /// # Returns
    ///
    /// A Result containing the new NormalizeImage instance or a DigitError if
    /// validation fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the scale or standard deviation is not greater
    /// than zero, or if any derived coefficient is not finite.
    pub fn new(scale: Option<f32>, mean: Option<f32>, std: Option<f32>) -> Result<Self, DigitError> {
        let scale = scale.unwrap_or(1.0 / 255.0);
        let mean = mean.unwrap_or(0.0);
        let std = std.unwrap_or(1.0);

        if scale <= 0.0 {
            return Err(DigitError::config("scale must be greater than 0"));
        }
        if std <= 0.0 {
            return Err(DigitError::config(format!(
                "standard deviation must be greater than 0, got {std}"
            )));
        }

        let alpha = scale / std;
        let beta = -mean / std;

        if !alpha.is_finite() || !beta.is_finite() {
            return Err(DigitError::config(format!(
                "normalization coefficients are not finite: alpha={alpha}, beta={beta}"
            )));
        }

        Ok(Self { alpha, beta })
    }

    /// Creates the normalization used by classifiers trained on [0, 1] inputs.
    pub fn unit_range() -> Result<Self, DigitError> {
        Self::new(None, None, None)
    }

    /// Normalizes a grayscale image into a flat vector of f32 intensities.
    ///
    /// Pixels are emitted in row-major order.
    pub fn apply(&self, img: &GrayImage) -> Vec<f32> {
        img.as_raw()
            .iter()
            .map(|&value| value as f32 * self.alpha + self.beta)
            .collect()
    }

    /// Normalizes a grayscale image into the classifier input tensor.
    ///
    /// The output has the NHWC layout `(1, height, width, 1)`: an explicit
    /// batch dimension of size one and an explicit channel dimension of size
    /// one around the spatial data.
    ///
    /// # Arguments
    ///
    /// * `img` - The grayscale image to normalize.
    ///
    /// # Returns
    ///
    /// A Result containing the input tensor or a DigitError if the data does
    /// not fit the declared dimensions.
    pub fn apply_to_input(&self, img: &GrayImage) -> Result<Tensor4D, DigitError> {
        let (width, height) = img.dimensions();
        let values = self.apply(img);
        Tensor4D::from_shape_vec((1, height as usize, width as usize, 1), values).map_err(|e| {
            DigitError::processing(
                ProcessingStage::TensorLayout,
                "arranging normalized intensities into the input tensor",
                e,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_range_maps_extremes_to_zero_and_one() {
        let normalize = NormalizeImage::unit_range().unwrap();
        let mut img = GrayImage::new(2, 1);
        img.put_pixel(0, 0, image::Luma([0]));
        img.put_pixel(1, 0, image::Luma([255]));

        let values = normalize.apply(&img);
        assert_eq!(values.len(), 2);
        assert!((values[0] - 0.0).abs() < 1e-6);
        assert!((values[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_apply_to_input_has_batch_and_channel_dims() {
        let normalize = NormalizeImage::unit_range().unwrap();
        let img = GrayImage::new(28, 28);
        let tensor = normalize.apply_to_input(&img).unwrap();
        assert_eq!(tensor.shape(), &[1, 28, 28, 1]);
    }

    #[test]
    fn test_values_stay_in_unit_range() {
        let normalize = NormalizeImage::unit_range().unwrap();
        let img = GrayImage::from_fn(7, 5, |x, y| image::Luma([(x * 37 + y * 11) as u8]));
        let tensor = normalize.apply_to_input(&img).unwrap();
        assert!(tensor.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_zero_scale_is_rejected() {
        assert!(NormalizeImage::new(Some(0.0), None, None).is_err());
    }

    #[test]
    fn test_zero_std_is_rejected() {
        assert!(NormalizeImage::new(None, None, Some(0.0)).is_err());
    }
}
