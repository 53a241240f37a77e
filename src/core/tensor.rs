//! Tensor type aliases used throughout the pipeline.

use ndarray::{Array1, Array2, Array4};

/// A 1D tensor of f32 values (a single score vector).
pub type Tensor1D = Array1<f32>;

/// A 2D tensor of f32 values (batch of score vectors, shape `batch x classes`).
pub type Tensor2D = Array2<f32>;

/// A 4D tensor of f32 values in NHWC layout (shape `batch x height x width x channel`).
///
/// The classifier input contract is the fixed shape `1 x 28 x 28 x 1`.
pub type Tensor4D = Array4<f32>;
