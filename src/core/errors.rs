//! Error types for the digit recognition pipeline.
//!
//! This module defines the error types that can occur while turning a raw
//! canvas drawing into a digit prediction: artifact loading errors, invalid
//! input errors, inference contract violations, and configuration errors.
//! It also provides utility functions for creating these errors with
//! appropriate context.

use thiserror::Error;

/// Enum representing different stages of preprocessing in the pipeline.
///
/// This enum is used to identify which stage of the pipeline an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProcessingStage {
    /// Error occurred during RGBA to grayscale conversion.
    Grayscale,
    /// Error occurred during image resizing.
    Resize,
    /// Error occurred during intensity normalization.
    Normalization,
    /// Error occurred while arranging data into the input tensor layout.
    TensorLayout,
    /// Error occurred during post-processing of model output.
    PostProcessing,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Grayscale => write!(f, "grayscale conversion"),
            ProcessingStage::Resize => write!(f, "resize"),
            ProcessingStage::Normalization => write!(f, "normalization"),
            ProcessingStage::TensorLayout => write!(f, "tensor layout"),
            ProcessingStage::PostProcessing => write!(f, "post-processing"),
        }
    }
}

/// Enum representing the errors that can occur in the digit recognition pipeline.
///
/// Three kinds carry the pipeline's caller-facing contract:
/// [`DigitError::ArtifactLoad`] (fatal, the classifier cannot be loaded),
/// [`DigitError::InvalidImage`] (recoverable, the specific request is rejected),
/// and [`DigitError::Inference`] (a shape contract violation between pipeline
/// and artifact). The remaining variants cover configuration and internal
/// processing failures. No error is silently swallowed and no fallback digit
/// is ever substituted.
#[derive(Error, Debug)]
pub enum DigitError {
    /// The classifier artifact could not be loaded from storage.
    #[error("failed to load classifier artifact from '{model_path}': {reason}{suggestion}")]
    ArtifactLoad {
        /// The storage path of the artifact.
        model_path: String,
        /// Short reason description.
        reason: String,
        /// Optional suggestion, pre-formatted (may be empty).
        suggestion: String,
        /// The underlying error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The input pixel buffer is malformed (zero area or incompatible with RGBA decoding).
    #[error("invalid image: {message}")]
    InvalidImage {
        /// A message describing the invalid input.
        message: String,
    },

    /// The classifier produced output of unexpected shape.
    #[error("inference contract violation: {message}")]
    Inference {
        /// A message describing the contract violation.
        message: String,
    },

    /// Error occurred while decoding an image file.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// Error occurred during a preprocessing stage.
    #[error("{stage} failed: {context}")]
    Processing {
        /// The stage of the pipeline where the error occurred.
        stage: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from tensor operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl DigitError {
    /// Creates a DigitError for a failed artifact load.
    ///
    /// # Arguments
    ///
    /// * `model_path` - Path to the artifact file.
    /// * `reason` - Short reason description.
    /// * `suggestion` - Optional suggestion message (without punctuation).
    /// * `source` - Optional underlying error.
    pub fn artifact_load(
        model_path: impl AsRef<std::path::Path>,
        reason: impl Into<String>,
        suggestion: Option<&str>,
        source: Option<impl std::error::Error + Send + Sync + 'static>,
    ) -> Self {
        let suggestion = suggestion
            .map(|s| format!("; suggested fix: {}", s))
            .unwrap_or_default();
        Self::ArtifactLoad {
            model_path: model_path.as_ref().display().to_string(),
            reason: reason.into(),
            suggestion,
            source: source.map(|e| Box::new(e) as _),
        }
    }

    /// Creates a DigitError for an invalid input buffer.
    ///
    /// # Arguments
    ///
    /// * `message` - A message describing the invalid input.
    pub fn invalid_image(message: impl Into<String>) -> Self {
        Self::InvalidImage {
            message: message.into(),
        }
    }

    /// Creates a DigitError for classifier output violating the shape contract.
    ///
    /// # Arguments
    ///
    /// * `expected` - The expected output shape.
    /// * `actual` - The actual output shape.
    pub fn inference_shape(expected: &[usize], actual: &[usize]) -> Self {
        Self::Inference {
            message: format!(
                "expected output shape {:?}, but the artifact produced {:?}",
                expected, actual
            ),
        }
    }

    /// Creates a DigitError for inference failures with a free-form message.
    ///
    /// # Arguments
    ///
    /// * `message` - A message describing the failure.
    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference {
            message: message.into(),
        }
    }

    /// Creates a DigitError for a preprocessing stage.
    ///
    /// # Arguments
    ///
    /// * `stage` - The stage of the pipeline where the error occurred.
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn processing(
        stage: ProcessingStage,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            stage,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a DigitError for configuration errors.
    ///
    /// # Arguments
    ///
    /// * `message` - A message describing the configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<image::ImageError> for DigitError {
    fn from(error: image::ImageError) -> Self {
        Self::ImageLoad(error)
    }
}

impl From<crate::core::config::ConfigError> for DigitError {
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::Config {
            message: error.to_string(),
        }
    }
}
