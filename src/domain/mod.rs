//! Domain types for the digit recognition pipeline.
//!
//! This module contains the boundary types exchanged with external
//! collaborators, currently the drawing-surface pixel buffer contract.

pub mod canvas;

pub use canvas::CanvasBuffer;
