//! Configuration utilities for the digit recognition pipeline.
//!
//! This module provides structures and functions for handling configuration
//! in the pipeline, including error types, a validation trait, and the common
//! configuration shared by predictor builders, plus the ONNX Runtime session
//! tuning knobs.

use std::path::Path;
use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that a model path does not exist.
    #[error("model path does not exist: {path}")]
    ModelPathNotFound { path: std::path::PathBuf },

    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Error indicating that validation failed.
    #[error("validation failed: {message}")]
    ValidationFailed { message: String },
}

/// A trait for validating configuration parameters.
///
/// This trait provides methods for validating the configuration parameters
/// used in the pipeline, such as model paths and image dimensions.
pub trait ConfigValidator {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if validation fails.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates that a usize parameter is greater than zero.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to validate.
    /// * `name` - The parameter name, used in the error message.
    fn validate_positive_usize(&self, value: usize, name: &str) -> Result<(), ConfigError> {
        if value == 0 {
            return Err(ConfigError::InvalidConfig {
                message: format!("{} must be greater than 0", name),
            });
        }
        Ok(())
    }

    /// Validates image dimensions.
    ///
    /// Both the width and height must be greater than zero.
    ///
    /// # Arguments
    ///
    /// * `width` - The width to validate.
    /// * `height` - The height to validate.
    fn validate_image_dimensions(&self, width: u32, height: u32) -> Result<(), ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "image dimensions must be greater than 0, got {}x{}",
                    width, height
                ),
            });
        }
        Ok(())
    }

    /// Validates that a model path exists and is a file.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the model file.
    fn validate_model_path(&self, path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ModelPathNotFound {
                path: path.to_path_buf(),
            });
        }
        if !path.is_file() {
            return Err(ConfigError::InvalidConfig {
                message: format!("model path is not a file: {}", path.display()),
            });
        }
        Ok(())
    }
}

/// Extension helpers for validating configurations at predictor build time.
pub trait ConfigValidatorExt: ConfigValidator {
    /// Validates the configuration and wraps any failure in a [`DigitError`].
    ///
    /// [`DigitError`]: crate::core::DigitError
    fn validate_and_wrap(self) -> Result<Self, crate::core::DigitError>
    where
        Self: Sized,
    {
        self.validate()?;
        Ok(self)
    }
}

impl<T: ConfigValidator> ConfigValidatorExt for T {}

/// Graph optimization levels for the ONNX Runtime session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OrtGraphOptimizationLevel {
    /// Disable all graph optimizations.
    DisableAll,
    /// Basic optimizations.
    Level1,
    /// Extended optimizations.
    Level2,
    /// Layout optimizations.
    Level3,
    /// All available optimizations.
    All,
}

/// Tuning knobs for the ONNX Runtime session.
///
/// All fields are optional; unset fields leave the runtime defaults in place.
/// The inference runtime may thread internally during a forward pass. That is
/// opaque to the pipeline, which only passes these knobs through.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OrtSessionConfig {
    /// Number of threads used to parallelize execution within nodes.
    pub intra_threads: Option<usize>,
    /// Number of threads used to parallelize execution across nodes.
    pub inter_threads: Option<usize>,
    /// Whether to enable parallel execution of the graph.
    pub parallel_execution: Option<bool>,
    /// Graph optimization level.
    pub optimization_level: Option<OrtGraphOptimizationLevel>,
}

impl OrtSessionConfig {
    /// Creates a new OrtSessionConfig with all fields unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of intra-op threads.
    pub fn with_intra_threads(mut self, threads: usize) -> Self {
        self.intra_threads = Some(threads);
        self
    }

    /// Sets the number of inter-op threads.
    pub fn with_inter_threads(mut self, threads: usize) -> Self {
        self.inter_threads = Some(threads);
        self
    }

    /// Enables or disables parallel graph execution.
    pub fn with_parallel_execution(mut self, parallel: bool) -> Self {
        self.parallel_execution = Some(parallel);
        self
    }

    /// Sets the graph optimization level.
    pub fn with_optimization_level(mut self, level: OrtGraphOptimizationLevel) -> Self {
        self.optimization_level = Some(level);
        self
    }
}

/// Common configuration options shared by predictor builders.
///
/// This struct holds the options that every predictor in the pipeline accepts:
/// the model artifact location, a display name for logs and errors, and the
/// ONNX Runtime session configuration.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CommonBuilderConfig {
    /// Path to the model artifact file.
    pub model_path: Option<std::path::PathBuf>,
    /// Name of the model, used in logs and error context.
    pub model_name: Option<String>,
    /// Whether to emit per-stage tracing output.
    pub enable_logging: Option<bool>,
    /// ONNX Runtime session configuration.
    pub ort_session: Option<OrtSessionConfig>,
}

impl CommonBuilderConfig {
    /// Creates a new common configuration with all fields unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new common configuration with a default model name.
    ///
    /// # Arguments
    ///
    /// * `model_name` - The default model name.
    pub fn with_defaults(model_name: Option<String>) -> Self {
        Self {
            model_path: None,
            model_name,
            enable_logging: Some(true),
            ort_session: None,
        }
    }

    /// Sets the model path.
    pub fn model_path(mut self, model_path: impl Into<std::path::PathBuf>) -> Self {
        self.model_path = Some(model_path.into());
        self
    }

    /// Sets the model name.
    pub fn model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    /// Enables or disables per-stage tracing output.
    pub fn enable_logging(mut self, enable: bool) -> Self {
        self.enable_logging = Some(enable);
        self
    }

    /// Sets the ONNX Runtime session configuration.
    pub fn ort_session(mut self, config: OrtSessionConfig) -> Self {
        self.ort_session = Some(config);
        self
    }
}

impl ConfigValidator for CommonBuilderConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.model_path {
            self.validate_model_path(path)?;
        }
        if let Some(name) = &self.model_name {
            if name.is_empty() {
                return Err(ConfigError::InvalidConfig {
                    message: "model name must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::with_defaults(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_config_rejects_missing_model_path() {
        let config = CommonBuilderConfig::new().model_path("definitely/not/a/real/model.onnx");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ModelPathNotFound { .. })
        ));
    }

    #[test]
    fn test_common_config_rejects_empty_model_name() {
        let config = CommonBuilderConfig::new().model_name("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_common_config_defaults_validate() {
        let config = CommonBuilderConfig::get_defaults();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ort_session_config_builder() {
        let config = OrtSessionConfig::new()
            .with_intra_threads(2)
            .with_parallel_execution(false)
            .with_optimization_level(OrtGraphOptimizationLevel::Level3);
        assert_eq!(config.intra_threads, Some(2));
        assert_eq!(config.parallel_execution, Some(false));
        assert_eq!(
            config.optimization_level,
            Some(OrtGraphOptimizationLevel::Level3)
        );
    }
}
