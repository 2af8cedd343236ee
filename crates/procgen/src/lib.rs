//! Procedural generation: heightfield synthesis and object placement.

pub mod generator;
pub mod noise_field;
pub mod placement;

pub use generator::*;
pub use noise_field::*;
pub use placement::*;
