//! Seedable 2-D noise source with a degraded flat fallback.

use noise::{NoiseFn, Simplex};

/// Derive a deterministic u32 noise seed from a session seed and an offset.
/// Same (seed, offset) always gives the same result so generation is
/// reproducible across runs.
#[inline]
fn deterministic_noise_seed(seed: u64, offset: u64) -> u32 {
    ((seed.wrapping_add(offset))
        .wrapping_mul(0x9e3779b97f4a7c15_u64)
        .wrapping_add(offset.wrapping_mul(0x6c078965_u64))
        >> 32) as u32
}

/// A 2-D noise sampling capability returning values in `[-1, 1]`.
///
/// When no noise source is available the field degrades to constant 0
/// (flat terrain) rather than failing; generation must never error
/// outright.
#[derive(Debug, Clone)]
pub struct NoiseField {
    source: Option<Simplex>,
}

impl NoiseField {
    /// Simplex noise derived deterministically from a session seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            source: Some(Simplex::new(deterministic_noise_seed(seed, 0))),
        }
    }

    /// Degraded source: every sample is 0.
    pub fn flat() -> Self {
        log::warn!("no noise source available, terrain will be flat");
        Self { source: None }
    }

    pub fn sample(&self, x: f64, y: f64) -> f64 {
        match &self.source {
            Some(simplex) => simplex.get([x, y]),
            None => 0.0,
        }
    }
}
