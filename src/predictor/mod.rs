//! Predictors for the digit recognition pipeline.

pub mod digit_classifier;

pub use digit_classifier::{
    DEFAULT_INPUT_SIZE, DIGIT_CLASSES, DigitClassifier, DigitClassifierBuilder,
    DigitClassifierConfig, DigitPrediction,
};
