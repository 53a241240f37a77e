//! # digit-rec
//!
//! A Rust digit recognition library that classifies freehand drawings of
//! digits (0-9) using a pretrained ONNX model.
//!
//! The library is the inference pipeline behind a drawing surface: it takes
//! the captured RGBA pixel buffer (white strokes on a black background),
//! deterministically reduces it to the classifier's `1 x 28 x 28 x 1` input
//! tensor, runs a forward pass, and returns the predicted digit together with
//! the full 10-class score distribution. Drawing capture and result rendering
//! are external collaborators and not part of this crate.
//!
//! ## Components
//!
//! - **Model Cache**: loads the classifier artifact exactly once per process
//!   and shares the handle across predictions
//! - **Preprocessor**: grayscale conversion, resize, [0, 1] scaling, tensor
//!   layout
//! - **Predictor**: orchestrates inference and reduces the raw scores to a
//!   prediction
//!
//! ## Modules
//!
//! * [`core`] - Error handling, configuration, the inference engine, and the model cache
//! * [`domain`] - The drawing-surface pixel buffer contract
//! * [`processors`] - Image and score processors
//! * [`predictor`] - The digit classifier (high-level API)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use digit_rec::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let classifier = DigitClassifierBuilder::new()
//!     .model_name("digit_classifier")
//!     .build(Path::new("models/digit_classifier.onnx"))?;
//!
//! // A drawing surface hands over its captured RGBA pixels.
//! let canvas = CanvasBuffer::from_raw(300, 300, vec![0u8; 300 * 300 * 4])?;
//!
//! let prediction = classifier.predict(&canvas)?;
//! println!(
//!     "digit: {} (confidence {:.3})",
//!     prediction.digit, prediction.confidence
//! );
//! for (digit, score) in prediction.top_k(3) {
//!     println!("  {digit}: {score:.3}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod predictor;
pub mod processors;

/// Prelude module for convenient imports.
pub mod prelude {
    // Error handling
    pub use crate::core::{DigitError, ProcessingStage};

    // Model capability and cache
    pub use crate::core::{ClassifierModel, ModelCache, ModelHandle};

    // Tensors
    pub use crate::core::{Tensor2D, Tensor4D};

    // Domain types
    pub use crate::domain::CanvasBuffer;

    // Logging
    pub use crate::core::init_tracing;

    // Predictor (high-level API)
    pub use crate::predictor::{
        DIGIT_CLASSES, DigitClassifier, DigitClassifierBuilder, DigitClassifierConfig,
        DigitPrediction,
    };
}
