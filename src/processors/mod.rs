//! Image and score processors for the digit recognition pipeline.
//!
//! The preprocessing processors turn a grayscale drawing into the fixed-shape
//! input tensor the classifier expects; the post-processing processor reduces
//! the classifier's raw score row to a predicted class.

pub mod argmax;
pub mod normalization;
pub mod resize;

pub use argmax::{Argmax, ArgmaxResult};
pub use normalization::NormalizeImage;
pub use resize::{ResizeFilter, ResizeToInput};
