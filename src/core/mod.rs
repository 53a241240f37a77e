//! The core module of the digit recognition pipeline.
//!
//! This module contains the fundamental components of the pipeline, including:
//! - Configuration management
//! - Error handling
//! - Inference engine integration
//! - The classifier capability and its process-lifetime cache
//! - Tensor type aliases
//!
//! It also provides re-exports of commonly used types and functions for convenience.

pub mod config;
pub mod errors;
pub mod inference;
pub mod model;
pub mod tensor;

pub use config::{
    CommonBuilderConfig, ConfigError, ConfigValidator, ConfigValidatorExt,
    OrtGraphOptimizationLevel, OrtSessionConfig,
};
pub use errors::{DigitError, ProcessingStage};
pub use inference::OrtInfer;
pub use model::{ClassifierModel, ModelCache, ModelHandle};
pub use tensor::{Tensor1D, Tensor2D, Tensor4D};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
