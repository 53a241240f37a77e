//! Handwritten digit classifier.
//!
//! This module provides the predictor that turns a captured canvas drawing
//! into a digit prediction. It composes the pipeline stages in strict order:
//! grayscale conversion, resize to the model's spatial input size, intensity
//! normalization into [0, 1], tensor layout, a forward pass through the
//! cached classifier, and argmax reduction of the raw score row.
//!
//! The classifier artifact is loaded once per process through [`ModelCache`]
//! and shared by every subsequent prediction.

use crate::core::{
    CommonBuilderConfig, DigitError, ModelCache, Tensor2D, Tensor4D,
    config::{ConfigValidator, ConfigValidatorExt},
};
use crate::domain::CanvasBuffer;
use crate::processors::{Argmax, NormalizeImage, ResizeFilter, ResizeToInput};
use std::path::Path;
use tracing::debug;

/// Number of digit classes (0 through 9).
pub const DIGIT_CLASSES: usize = 10;

/// Default spatial input size of the classifier, as (width, height).
pub const DEFAULT_INPUT_SIZE: (u32, u32) = (28, 28);

/// Result of classifying a single drawing.
///
/// The score vector is the classifier's raw output row, in class order 0-9.
/// It is expected to be a probability distribution (the artifact is expected
/// to end in a normalizing activation) but the pipeline does not re-normalize
/// it; consumers of a non-softmax artifact receive its scores as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct DigitPrediction {
    /// The predicted digit, the first-occurrence argmax of `scores`.
    pub digit: usize,
    /// The score of the predicted digit.
    pub confidence: f32,
    /// Scores for all ten classes, in class order.
    pub scores: Vec<f32>,
}

impl DigitPrediction {
    /// Returns the top-k (digit, score) pairs in descending score order.
    ///
    /// # Arguments
    ///
    /// * `k` - Number of entries to return (clamped to the class count).
    pub fn top_k(&self, k: usize) -> Vec<(usize, f32)> {
        Argmax::new().top_k(&self.scores, k)
    }
}

/// Configuration for the digit classifier.
///
/// This struct holds configuration parameters for the digit classifier. It
/// includes common configuration options as well as classifier-specific
/// parameters.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct DigitClassifierConfig {
    /// Common configuration options shared across predictors.
    pub common: CommonBuilderConfig,
    /// Spatial input size of the model (width, height).
    pub input_size: Option<(u32, u32)>,
    /// Resampling filter used to shrink the drawing to the input size.
    pub resize_filter: Option<ResizeFilter>,
}

impl DigitClassifierConfig {
    /// Creates a new digit classifier configuration with default settings.
    pub fn new() -> Self {
        Self {
            common: CommonBuilderConfig::with_defaults(Some("digit_classifier".to_string())),
            input_size: Some(DEFAULT_INPUT_SIZE),
            resize_filter: Some(ResizeFilter::default()),
        }
    }

    /// Validates the digit classifier configuration.
    ///
    /// # Returns
    ///
    /// Ok if the configuration is valid, or an error if validation fails.
    pub fn validate(&self) -> Result<(), crate::core::ConfigError> {
        ConfigValidator::validate(self)
    }
}

impl ConfigValidator for DigitClassifierConfig {
    fn validate(&self) -> Result<(), crate::core::ConfigError> {
        self.common.validate()?;

        if let Some((width, height)) = self.input_size {
            self.validate_image_dimensions(width, height)?;
        }

        Ok(())
    }

    fn get_defaults() -> Self {
        Self::new()
    }
}

/// Handwritten digit classifier.
///
/// Feeds captured canvas drawings through the preprocessing stages and the
/// cached classifier, and reduces the raw output into a [`DigitPrediction`].
/// The pipeline is stateless per call; the only state is the model cache,
/// which moves from unloaded to loaded exactly once.
#[derive(Debug)]
pub struct DigitClassifier {
    /// Spatial input size of the model (width, height).
    input_size: (u32, u32),
    /// Name of the model being used.
    model_name: String,
    /// Process-lifetime cache for the classifier artifact.
    model: ModelCache,
    /// Resize processor for the drawing.
    resize: ResizeToInput,
    /// Intensity normalizer.
    normalize: NormalizeImage,
    /// Argmax reduction of the output scores.
    post_op: Argmax,
}

impl DigitClassifier {
    /// Creates a new digit classifier.
    ///
    /// The artifact is not loaded here; the first prediction (or an explicit
    /// [`DigitClassifier::preload`]) triggers the one-time load.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the classifier.
    /// * `model_path` - Path to the ONNX model file.
    ///
    /// # Returns
    ///
    /// A new instance of `DigitClassifier` or an error if initialization fails.
    pub fn new(config: DigitClassifierConfig, model_path: &Path) -> Result<Self, DigitError> {
        let cache = ModelCache::from_common(&config.common, model_path);
        Self::with_model_cache(config, cache)
    }

    /// Creates a new digit classifier around an existing model cache.
    ///
    /// This is the injection seam for tests and for callers that manage the
    /// cache themselves (for example, one cache shared by several surfaces).
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the classifier.
    /// * `model` - The model cache to draw the classifier handle from.
    pub fn with_model_cache(
        config: DigitClassifierConfig,
        model: ModelCache,
    ) -> Result<Self, DigitError> {
        let input_size = config.input_size.unwrap_or(DEFAULT_INPUT_SIZE);
        let model_name = config
            .common
            .model_name
            .as_ref()
            .cloned()
            .unwrap_or_else(|| "DigitClassifier".to_string());
        let filter = config.resize_filter.unwrap_or_default();

        Ok(Self {
            input_size,
            model_name,
            model,
            resize: ResizeToInput::with_filter(input_size.0, input_size.1, filter)?,
            normalize: NormalizeImage::unit_range()?,
            post_op: Argmax::new(),
        })
    }

    /// The spatial input size of the model as (width, height).
    pub fn input_size(&self) -> (u32, u32) {
        self.input_size
    }

    /// Loads the classifier artifact now instead of on the first prediction.
    ///
    /// Useful at startup so an unusable artifact surfaces before any drawing
    /// is accepted.
    pub fn preload(&self) -> Result<(), DigitError> {
        self.model.get().map(|_| ())
    }

    /// Classifies a captured drawing.
    ///
    /// Repeated calls with the same buffer and artifact are deterministic and
    /// produce identical output. There is no fallback: any failure is
    /// returned to the caller instead of a substitute digit.
    ///
    /// # Arguments
    ///
    /// * `canvas` - The captured RGBA drawing.
    ///
    /// # Returns
    ///
    /// A Result containing the prediction or a DigitError.
    pub fn predict(&self, canvas: &CanvasBuffer) -> Result<DigitPrediction, DigitError> {
        let model = self.model.get()?;
        let input = self.preprocess(canvas)?;
        let output = model.infer(&input)?;
        self.postprocess(output)
    }

    /// Preprocesses a drawing into the classifier input tensor.
    ///
    /// Strict stage order: RGBA to grayscale via the fixed perceptual luma
    /// transform, resize to the spatial input size, intensity scaling into
    /// [0, 1], then layout as `(1, height, width, 1)`.
    ///
    /// # Arguments
    ///
    /// * `canvas` - The captured RGBA drawing.
    ///
    /// # Returns
    ///
    /// A Result containing the input tensor or a DigitError.
    pub fn preprocess(&self, canvas: &CanvasBuffer) -> Result<Tensor4D, DigitError> {
        let gray = image::imageops::grayscale(canvas.as_image());
        let resized = self.resize.apply(&gray);
        debug!(
            model = %self.model_name,
            source_w = canvas.width(),
            source_h = canvas.height(),
            "preprocessed drawing to {}x{}",
            self.input_size.0,
            self.input_size.1
        );
        self.normalize.apply_to_input(&resized)
    }

    /// Reduces the raw output matrix into a prediction.
    fn postprocess(&self, output: Tensor2D) -> Result<DigitPrediction, DigitError> {
        let shape = output.shape();
        if shape != [1, DIGIT_CLASSES] {
            return Err(DigitError::inference_shape(&[1, DIGIT_CLASSES], shape));
        }

        let scores: Vec<f32> = output.row(0).to_vec();
        // Raw scores are exposed as-is. A non-softmax artifact shows up here
        // as a sum far from 1.0, visible in traces but not corrected.
        debug!(
            model = %self.model_name,
            score_sum = scores.iter().sum::<f32>(),
            "reducing classifier output"
        );

        let best = self.post_op.process(&scores)?;
        Ok(DigitPrediction {
            digit: best.index,
            confidence: best.score,
            scores,
        })
    }
}

/// Builder for the digit classifier.
///
/// This struct provides a builder pattern for creating a digit classifier
/// with custom configuration options.
pub struct DigitClassifierBuilder {
    /// Common configuration options shared across predictors.
    common: CommonBuilderConfig,
    /// Spatial input size of the model (width, height).
    input_size: Option<(u32, u32)>,
    /// Resampling filter used to shrink the drawing to the input size.
    resize_filter: Option<ResizeFilter>,
}

impl DigitClassifierBuilder {
    /// Creates a new digit classifier builder.
    pub fn new() -> Self {
        Self {
            common: CommonBuilderConfig::new(),
            input_size: None,
            resize_filter: None,
        }
    }

    /// Sets the model path for the classifier.
    ///
    /// # Arguments
    ///
    /// * `model_path` - Path to the ONNX model file.
    pub fn model_path(mut self, model_path: impl Into<std::path::PathBuf>) -> Self {
        self.common = self.common.model_path(model_path);
        self
    }

    /// Sets the model name for the classifier.
    ///
    /// # Arguments
    ///
    /// * `model_name` - Name of the model.
    pub fn model_name(mut self, model_name: impl Into<String>) -> Self {
        self.common = self.common.model_name(model_name);
        self
    }

    /// Enables or disables logging for the classifier.
    ///
    /// # Arguments
    ///
    /// * `enable` - Whether to enable logging.
    pub fn enable_logging(mut self, enable: bool) -> Self {
        self.common = self.common.enable_logging(enable);
        self
    }

    /// Sets the ONNX Runtime session configuration.
    pub fn ort_session(mut self, config: crate::core::OrtSessionConfig) -> Self {
        self.common = self.common.ort_session(config);
        self
    }

    /// Sets the spatial input size of the model.
    ///
    /// # Arguments
    ///
    /// * `input_size` - Input size as (width, height).
    pub fn input_size(mut self, input_size: (u32, u32)) -> Self {
        self.input_size = Some(input_size);
        self
    }

    /// Sets the resampling filter used to shrink drawings.
    ///
    /// Changing the filter changes prediction behavior for the same drawing;
    /// pick one and keep it fixed for a deployed artifact.
    ///
    /// # Arguments
    ///
    /// * `filter` - The resampling filter.
    pub fn resize_filter(mut self, filter: ResizeFilter) -> Self {
        self.resize_filter = Some(filter);
        self
    }

    /// Builds the digit classifier.
    ///
    /// # Arguments
    ///
    /// * `model_path` - Path to the ONNX model file.
    ///
    /// # Returns
    ///
    /// A new instance of `DigitClassifier` or an error if building fails.
    pub fn build(self, model_path: &Path) -> Result<DigitClassifier, DigitError> {
        self.build_internal(model_path)
    }

    fn build_internal(mut self, model_path: &Path) -> Result<DigitClassifier, DigitError> {
        if self.common.model_path.is_none() {
            self.common = self.common.model_path(model_path.to_path_buf());
        }

        let config = DigitClassifierConfig {
            common: self.common,
            input_size: self.input_size,
            resize_filter: self.resize_filter,
        };

        let config = config.validate_and_wrap()?;

        DigitClassifier::new(config, model_path)
    }
}

impl Default for DigitClassifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ClassifierModel, ModelHandle};
    use image::{Rgba, RgbaImage};
    use imageproc::drawing::draw_line_segment_mut;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic classifier stub returning a fixed score row, after
    /// checking that the pipeline handed it the contracted input shape.
    #[derive(Debug)]
    struct StubModel {
        scores: Vec<f32>,
    }

    impl ClassifierModel for StubModel {
        fn infer(&self, input: &Tensor4D) -> Result<Tensor2D, DigitError> {
            assert_eq!(input.shape(), &[1, 28, 28, 1], "input shape contract");
            Tensor2D::from_shape_vec((1, self.scores.len()), self.scores.clone())
                .map_err(DigitError::Tensor)
        }
    }

    fn stub_classifier(scores: Vec<f32>) -> DigitClassifier {
        let cache =
            ModelCache::with_loader(move || Ok(Arc::new(StubModel {
                scores: scores.clone(),
            }) as ModelHandle));
        DigitClassifier::with_model_cache(DigitClassifierConfig::new(), cache).unwrap()
    }

    fn black_canvas(width: u32, height: u32) -> CanvasBuffer {
        let img = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
        CanvasBuffer::from_image(img).unwrap()
    }

    /// A 300x300 black canvas with a thick vertical white stroke, roughly a "1".
    fn one_stroke_canvas() -> CanvasBuffer {
        let mut img = RgbaImage::from_pixel(300, 300, Rgba([0, 0, 0, 255]));
        let white = Rgba([255, 255, 255, 255]);
        for dx in 0..12 {
            let x = 144.0 + dx as f32;
            draw_line_segment_mut(&mut img, (x, 60.0), (x, 240.0), white);
        }
        CanvasBuffer::from_image(img).unwrap()
    }

    #[test]
    fn test_end_to_end_with_stub_classifier() {
        let mut scores = vec![0.01; 9];
        scores.push(0.91);
        let classifier = stub_classifier(scores.clone());

        let prediction = classifier.predict(&one_stroke_canvas()).unwrap();
        assert_eq!(prediction.digit, 9);
        assert!((prediction.confidence - 0.91).abs() < 1e-6);
        assert_eq!(prediction.scores, scores);
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let classifier = stub_classifier(vec![
            0.05, 0.02, 0.1, 0.4, 0.03, 0.1, 0.05, 0.05, 0.1, 0.1,
        ]);
        let canvas = one_stroke_canvas();

        let first = classifier.predict(&canvas).unwrap();
        let second = classifier.predict(&canvas).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_preprocess_shape_and_range_invariant() {
        let classifier = stub_classifier(vec![0.1; 10]);
        for (w, h) in [(300, 300), (50, 97), (1, 1), (640, 480)] {
            let canvas = {
                let img = RgbaImage::from_fn(w, h, |x, y| {
                    let v = ((x * 31 + y * 17) % 256) as u8;
                    Rgba([v, v / 2, v / 3, 255])
                });
                CanvasBuffer::from_image(img).unwrap()
            };
            let tensor = classifier.preprocess(&canvas).unwrap();
            assert_eq!(tensor.shape(), &[1, 28, 28, 1]);
            assert!(tensor.iter().all(|&v| (0.0..=1.0).contains(&v)));
        }
    }

    #[test]
    fn test_empty_drawing_still_predicts() {
        let classifier = stub_classifier(vec![0.1; 10]);
        let prediction = classifier.predict(&black_canvas(300, 300)).unwrap();
        // All classes tied: the lowest index wins.
        assert_eq!(prediction.digit, 0);
    }

    #[test]
    fn test_artifact_loads_exactly_once_across_predictions() {
        let loads = Arc::new(AtomicUsize::new(0));
        let probe = loads.clone();
        let cache = ModelCache::with_loader(move || {
            probe.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(StubModel {
                scores: vec![0.1; 10],
            }) as ModelHandle)
        });
        let classifier =
            DigitClassifier::with_model_cache(DigitClassifierConfig::new(), cache).unwrap();

        let canvas = black_canvas(64, 64);
        for _ in 0..5 {
            classifier.predict(&canvas).unwrap();
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_wrong_output_width_is_an_inference_error() {
        let classifier = stub_classifier(vec![0.2; 5]);
        let result = classifier.predict(&black_canvas(32, 32));
        assert!(matches!(result, Err(DigitError::Inference { .. })));
    }

    #[test]
    fn test_artifact_load_failure_propagates_untranslated() {
        let cache = ModelCache::with_loader(|| {
            Err(DigitError::artifact_load(
                "missing.onnx",
                "model file not found",
                None,
                None::<std::io::Error>,
            ))
        });
        let classifier =
            DigitClassifier::with_model_cache(DigitClassifierConfig::new(), cache).unwrap();

        let result = classifier.predict(&black_canvas(32, 32));
        assert!(matches!(result, Err(DigitError::ArtifactLoad { .. })));
    }

    #[test]
    fn test_top_k_ranks_prediction_first() {
        let classifier = stub_classifier(vec![
            0.01, 0.02, 0.6, 0.05, 0.05, 0.05, 0.05, 0.07, 0.05, 0.05,
        ]);
        let prediction = classifier.predict(&one_stroke_canvas()).unwrap();
        let top = prediction.top_k(3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].0, prediction.digit);
        assert_eq!(top[1].0, 7);
    }

    #[test]
    fn test_builder_rejects_missing_model_path() {
        let result = DigitClassifierBuilder::new()
            .model_name("digit_classifier")
            .build(Path::new("definitely/not/a/real/model.onnx"));
        assert!(matches!(result, Err(DigitError::Config { .. })));
    }

    #[test]
    fn test_builder_rejects_zero_input_size() {
        let config = DigitClassifierConfig {
            input_size: Some((0, 28)),
            ..DigitClassifierConfig::new()
        };
        assert!(config.validate().is_err());
    }
}
