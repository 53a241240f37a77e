//! Digit Prediction Example
//!
//! This example demonstrates how to use the digit-rec library to classify a
//! freehand digit drawing that has been saved as an image file (white strokes
//! on a black background).
//!
//! Usage:
//! ```
//! cargo run --example predict_digit -- --model-path <path_to_model> <image_paths>...
//! ```

use clap::Parser;
use digit_rec::prelude::*;
use std::path::Path;
use tracing::{error, info};

/// Command-line arguments for the digit prediction example
#[derive(Parser)]
#[command(name = "predict_digit")]
#[command(about = "Digit Prediction Example - classifies freehand digit drawings")]
struct Args {
    /// Path to the ONNX model file
    #[arg(short, long)]
    model_path: String,

    /// Image file paths to classify
    #[arg(required = true)]
    images: Vec<String>,

    /// Number of ranked scores to display per image
    #[arg(short, long, default_value_t = 3)]
    top: usize,
}

/// Display the prediction for a single image
///
/// # Arguments
///
/// * `path` - Path of the classified image
/// * `prediction` - The prediction to display
/// * `top` - Number of ranked scores to display
fn display_prediction(path: &str, prediction: &DigitPrediction, top: usize) {
    println!("{}", path);
    println!(
        "  predicted digit: {} (confidence {:.3})",
        prediction.digit, prediction.confidence
    );
    for (digit, score) in prediction.top_k(top) {
        println!("    {digit}: {score:.3}");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = Args::parse();

    info!("Building digit classifier with model: {}", args.model_path);
    let classifier = DigitClassifierBuilder::new()
        .model_name("digit_classifier")
        .build(Path::new(&args.model_path))?;

    // Surface an unusable artifact before touching any image.
    classifier.preload()?;

    for image_path in &args.images {
        let canvas = match CanvasBuffer::from_path(Path::new(image_path)) {
            Ok(canvas) => canvas,
            Err(e) => {
                error!("Failed to load image {}: {}", image_path, e);
                continue;
            }
        };

        match classifier.predict(&canvas) {
            Ok(prediction) => display_prediction(image_path, &prediction, args.top),
            Err(e) => error!("Failed to classify {}: {}", image_path, e),
        }
    }

    Ok(())
}
