//! Brush-based terrain sculpting and painting.

pub mod brush;

pub use brush::*;
