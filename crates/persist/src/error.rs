//! Codec failure taxonomy.

use terrain_core::GeometryError;
use thiserror::Error;

/// Errors surfaced by record decoding. Missing optional fields are never
/// errors (they are recovered via defaults); these are the genuinely
/// malformed cases, fatal for the load operation that hit them.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid world file format: missing 'worldTerrains' array")]
    MissingWorldTerrains,

    #[error("failed to parse record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stored geometry is malformed: {0}")]
    Geometry(#[from] GeometryError),
}
