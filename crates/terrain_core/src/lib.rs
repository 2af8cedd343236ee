//! Core terrain data model for the terraedit workspace.
//!
//! This crate provides the types shared across all editor systems:
//! - Surface type classification and derived colors
//! - Generation configuration and tool state
//! - Heightfield geometry buffers
//! - Terrain instances and the world collection

pub mod config;
pub mod heightfield;
pub mod object;
pub mod surface;
pub mod terrain;
pub mod world;

pub use config::*;
pub use heightfield::*;
pub use object::*;
pub use surface::*;
pub use terrain::*;
pub use world::*;

// Re-export commonly used types
pub use glam::Vec3;
