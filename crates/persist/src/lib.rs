//! Versioned JSON persistence for terrains and worlds.
//!
//! Pure (de)serialization: this crate never touches rendering resources.
//! Two record kinds are distinguished by their top-level `version` string:
//! `"1.3"` single-terrain files and `"world-1.2"` whole-world files.

pub mod codec;
pub mod error;
pub mod records;

pub use codec::*;
pub use error::*;
pub use records::*;
