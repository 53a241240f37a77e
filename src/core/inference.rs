//! Inference utilities for the digit recognition pipeline.
//!
//! This module provides the ONNX Runtime engine used to run the pretrained
//! digit classifier. It handles session creation from a model file, input
//! tensor name detection, and execution of a forward pass over the fixed
//! `1 x 28 x 28 x 1` input tensor.

use crate::core::{
    config::{CommonBuilderConfig, OrtGraphOptimizationLevel, OrtSessionConfig},
    errors::DigitError,
    tensor::{Tensor2D, Tensor4D},
};
use ort::{
    session::{Session, builder::SessionBuilder},
    value::TensorRef,
};
use std::path::Path;
use std::sync::Mutex;

/// A struct for performing inference using an ONNX Runtime model.
///
/// The session requires exclusive access for a forward pass, so it is guarded
/// by a mutex. The artifact is deserialized exactly once, when the instance is
/// created; the instance itself is immutable afterwards and safe to share.
#[derive(Debug)]
pub struct OrtInfer {
    /// The ONNX Runtime session.
    session: Mutex<Session>,
    /// The name of the input tensor.
    input_name: String,
    /// The name of the output tensor.
    output_name: String,
    /// The path to the model file for error context.
    model_path: std::path::PathBuf,
    /// The model name for error context.
    model_name: String,
}

impl OrtInfer {
    /// Creates a new OrtInfer instance with default ONNX Runtime settings.
    ///
    /// # Arguments
    ///
    /// * `model_path` - The path to the ONNX model file.
    ///
    /// # Returns
    ///
    /// A Result containing the new OrtInfer instance or a DigitError.
    pub fn new(model_path: impl AsRef<Path>) -> Result<Self, DigitError> {
        Self::from_common(&CommonBuilderConfig::new(), model_path)
    }

    /// Creates a new OrtInfer instance from a common builder configuration,
    /// applying the ONNX Runtime session configuration when present.
    ///
    /// The input tensor name is auto-detected by looking for common names in
    /// the model's inputs, falling back to the model's first declared input.
    ///
    /// # Arguments
    ///
    /// * `common` - Common builder configuration.
    /// * `model_path` - The path to the ONNX model file.
    ///
    /// # Returns
    ///
    /// A Result containing the new OrtInfer instance or a DigitError.
    pub fn from_common(
        common: &CommonBuilderConfig,
        model_path: impl AsRef<Path>,
    ) -> Result<Self, DigitError> {
        let path = model_path.as_ref();
        if !path.exists() {
            return Err(DigitError::artifact_load(
                path,
                "model file not found",
                Some("verify the artifact path"),
                None::<std::io::Error>,
            ));
        }

        let builder = Session::builder()?;
        let builder = if let Some(cfg) = &common.ort_session {
            Self::apply_ort_config(builder, cfg)?
        } else {
            builder
        };
        let session = builder.commit_from_file(path).map_err(|e| {
            DigitError::artifact_load(
                path,
                "failed to create ONNX session",
                Some("verify the artifact is a valid ONNX model"),
                Some(e),
            )
        })?;

        let model_name = common
            .model_name
            .clone()
            .or_else(|| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .map(|s| s.to_string())
            })
            .unwrap_or_else(|| "unknown_model".to_string());

        let common_names = ["x", "input", "images", "data", "image"];
        let available_inputs: Vec<String> = session
            .inputs
            .iter()
            .map(|input| input.name.clone())
            .collect();
        let input_name = common_names
            .iter()
            .find(|&name| available_inputs.iter().any(|input| input == *name))
            .map(|s| s.to_string())
            .or_else(|| available_inputs.first().cloned())
            .ok_or_else(|| {
                DigitError::artifact_load(
                    path,
                    "model declares no inputs",
                    Some("the artifact may be corrupted"),
                    None::<std::io::Error>,
                )
            })?;

        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| {
                DigitError::artifact_load(
                    path,
                    "model declares no outputs",
                    Some("the artifact may be corrupted"),
                    None::<std::io::Error>,
                )
            })?;

        Ok(OrtInfer {
            session: Mutex::new(session),
            input_name,
            output_name,
            model_path: path.to_path_buf(),
            model_name,
        })
    }

    fn apply_ort_config(
        mut builder: SessionBuilder,
        cfg: &OrtSessionConfig,
    ) -> Result<SessionBuilder, ort::Error> {
        if let Some(intra) = cfg.intra_threads {
            builder = builder.with_intra_threads(intra)?;
        }
        if let Some(inter) = cfg.inter_threads {
            builder = builder.with_inter_threads(inter)?;
        }
        if let Some(par) = cfg.parallel_execution {
            builder = builder.with_parallel_execution(par)?;
        }
        if let Some(level) = cfg.optimization_level {
            use ort::session::builder::GraphOptimizationLevel as GOL;
            let mapped = match level {
                OrtGraphOptimizationLevel::DisableAll => GOL::Disable,
                OrtGraphOptimizationLevel::Level1 => GOL::Level1,
                OrtGraphOptimizationLevel::Level2 => GOL::Level2,
                OrtGraphOptimizationLevel::Level3 => GOL::Level3,
                OrtGraphOptimizationLevel::All => GOL::Level3,
            };
            builder = builder.with_optimization_level(mapped)?;
        }
        Ok(builder)
    }

    /// Gets the path to the model file.
    pub fn model_path(&self) -> &std::path::Path {
        &self.model_path
    }

    /// Gets the name of the model.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Runs a forward pass and returns the output as a 2D tensor.
    ///
    /// The output tensor must be two-dimensional (`batch x classes`); anything
    /// else is reported as an inference contract violation.
    ///
    /// # Arguments
    ///
    /// * `x` - The input tensor.
    ///
    /// # Returns
    ///
    /// A Result containing the output 2D tensor or a DigitError.
    pub fn infer_2d(&self, x: &Tensor4D) -> Result<Tensor2D, DigitError> {
        let input_shape = x.shape().to_vec();

        let input_tensor = TensorRef::from_array_view(x.view()).map_err(|e| {
            DigitError::inference(format!(
                "model '{}': failed to convert input tensor with shape {:?}: {}",
                self.model_name, input_shape, e
            ))
        })?;
        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let mut session_guard = self.session.lock().map_err(|_| {
            DigitError::inference(format!(
                "model '{}': failed to acquire session lock",
                self.model_name
            ))
        })?;

        let outputs = session_guard.run(inputs).map_err(|e| {
            DigitError::inference(format!(
                "model '{}': forward pass failed with input '{}' -> output '{}': {}",
                self.model_name, self.input_name, self.output_name, e
            ))
        })?;

        let (output_shape, output_data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                DigitError::inference(format!(
                    "model '{}': failed to extract output tensor '{}' as f32: {}",
                    self.model_name, self.output_name, e
                ))
            })?;

        if output_shape.len() != 2 {
            let actual: Vec<usize> = output_shape.iter().map(|&d| d as usize).collect();
            return Err(DigitError::inference(format!(
                "model '{}': expected 2D output tensor, got {}D with shape {:?}",
                self.model_name,
                output_shape.len(),
                actual
            )));
        }

        let batch_size = output_shape[0] as usize;
        let num_classes = output_shape[1] as usize;
        if output_data.len() != batch_size * num_classes {
            return Err(DigitError::inference(format!(
                "model '{}': output data size mismatch: expected {}, got {}",
                self.model_name,
                batch_size * num_classes,
                output_data.len()
            )));
        }

        let array_view = ndarray::ArrayView2::from_shape((batch_size, num_classes), output_data)
            .map_err(DigitError::Tensor)?;
        Ok(array_view.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_file_is_an_artifact_load_error() {
        let result = OrtInfer::new("definitely/not/a/real/model.onnx");
        assert!(matches!(result, Err(DigitError::ArtifactLoad { .. })));
    }

    #[test]
    fn test_from_common_respects_session_config() {
        let common = CommonBuilderConfig::new()
            .ort_session(OrtSessionConfig::new().with_intra_threads(1));
        // No artifact on disk, so construction must fail before any session is built.
        let result = OrtInfer::from_common(&common, "missing.onnx");
        assert!(result.is_err());
    }
}
