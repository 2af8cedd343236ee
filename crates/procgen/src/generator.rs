//! Heightfield synthesis from layered noise.

use terrain_core::{GenerationConfig, HeightfieldGeometry, SurfaceType};

use crate::noise_field::NoiseField;

/// Classify a generated height against the config thresholds. Evaluated at
/// generation time and fixed in the type buffer thereafter; lava and
/// gravel are never produced here, only by the paint tool.
pub fn classify_height(y: f32, config: &GenerationConfig) -> SurfaceType {
    if y < config.water_level + 2.0 {
        SurfaceType::Sand
    } else if y < config.terrain_height_scale * 0.5 {
        SurfaceType::Grass
    } else if y < config.terrain_height_scale * 0.8 {
        SurfaceType::Rock
    } else {
        SurfaceType::Snow
    }
}

/// Synthesizes heightfield geometry from a generation config.
///
/// Deterministic for a fixed seed and config: the same inputs always yield
/// identical position and type buffers. Saved geometry still takes
/// precedence over regeneration on load, so files survive algorithm
/// changes.
#[derive(Debug, Clone)]
pub struct NoiseHeightfieldGenerator {
    field: NoiseField,
}

impl NoiseHeightfieldGenerator {
    pub fn seeded(seed: u64) -> Self {
        Self {
            field: NoiseField::seeded(seed),
        }
    }

    /// Generator with a degraded (constant-zero) noise source. Produces a
    /// flat field; used when no noise capability is available.
    pub fn flat() -> Self {
        Self {
            field: NoiseField::flat(),
        }
    }

    /// Generate the grid. For each vertex the planar coordinates are
    /// normalized to `[0,1]²` and a fractal Brownian motion sum is
    /// accumulated over the octaves. The `sum / maxAmp` normalization
    /// keeps the result inside the noise range for any octave count, so
    /// the final height is always within `±terrainHeightScale`.
    pub fn generate(&self, config: &GenerationConfig) -> HeightfieldGeometry {
        let config = config.normalized();
        let width = config.terrain_width;
        let depth = config.terrain_depth;
        let side = config.vertices_per_side();
        let step_x = width / config.segments as f32;
        let step_z = depth / config.segments as f32;

        let noise_scale = config.noise_scale as f64;
        let height_scale = config.terrain_height_scale as f64;
        let persistence = config.persistence as f64;
        let lacunarity = config.lacunarity as f64;

        let mut positions = Vec::with_capacity(side * side * 3);
        let mut types = Vec::with_capacity(side * side);

        for iz in 0..side {
            let z = iz as f32 * step_z - depth / 2.0;
            for ix in 0..side {
                let x = ix as f32 * step_x - width / 2.0;
                let nx = ((x + width / 2.0) / width) as f64;
                let nz = ((z + depth / 2.0) / depth) as f64;

                // Fractal sum, accumulated in the same order the original
                // used so saved geometry stays numerically comparable.
                let mut sum = 0.0;
                let mut freq = 1.0;
                let mut amp = 1.0;
                let mut max_amp = 0.0;
                for _ in 0..config.octaves {
                    sum += self
                        .field
                        .sample(nx * noise_scale * freq, nz * noise_scale * freq)
                        * amp;
                    max_amp += amp;
                    amp *= persistence;
                    freq *= lacunarity;
                }
                let y = ((sum / max_amp) * height_scale) as f32;

                positions.push(x);
                positions.push(y);
                positions.push(z);
                types.push(classify_height(y, &config));
            }
        }

        log::debug!(
            "generated {}x{} heightfield (width {width}, depth {depth})",
            side,
            side
        );
        HeightfieldGeometry::from_grid(side, positions, types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> GenerationConfig {
        GenerationConfig {
            segments: 4,
            octaves: 1,
            persistence: 0.5,
            lacunarity: 2.0,
            noise_scale: 1.0,
            terrain_height_scale: 10.0,
            ..Default::default()
        }
    }

    #[test]
    fn flat_noise_yields_all_sand_at_zero_height() {
        // 4x4 segments => 25 vertices; a constant-zero noise source must
        // give height 0 everywhere, which classifies as sand (0 < water+2).
        let geometry = NoiseHeightfieldGenerator::flat().generate(&small_config());
        assert_eq!(geometry.vertex_count(), 25);
        for i in 0..geometry.vertex_count() {
            assert_eq!(geometry.height(i), 0.0);
            assert_eq!(geometry.surface_type(i), SurfaceType::Sand);
        }
    }

    #[test]
    fn generation_is_deterministic_for_fixed_seed() {
        let config = GenerationConfig {
            segments: 16,
            ..Default::default()
        };
        let a = NoiseHeightfieldGenerator::seeded(1234).generate(&config);
        let b = NoiseHeightfieldGenerator::seeded(1234).generate(&config);
        assert_eq!(a.positions, b.positions);
        assert_eq!(a.types, b.types);
    }

    #[test]
    fn fractal_sum_stays_within_height_scale() {
        for octaves in [1u32, 3, 6] {
            let config = GenerationConfig {
                segments: 20,
                octaves,
                persistence: 0.7,
                lacunarity: 2.3,
                ..Default::default()
            };
            let geometry = NoiseHeightfieldGenerator::seeded(99).generate(&config);
            let hs = config.terrain_height_scale;
            for i in 0..geometry.vertex_count() {
                let y = geometry.height(i);
                assert!(
                    (-hs..=hs).contains(&y),
                    "height {y} outside ±{hs} at octaves={octaves}"
                );
            }
        }
    }

    #[test]
    fn negative_persistence_cannot_poison_heights() {
        // Unnormalized, persistence -1 over two octaves sums amplitudes
        // 1 + (-1) = 0 and the fractal normalization divides by it. The
        // config fallback must keep every height finite and in bounds.
        let config = GenerationConfig {
            segments: 10,
            octaves: 2,
            persistence: -1.0,
            ..Default::default()
        };
        let geometry = NoiseHeightfieldGenerator::seeded(5).generate(&config);
        let hs = config.terrain_height_scale;
        for i in 0..geometry.vertex_count() {
            let y = geometry.height(i);
            assert!(y.is_finite(), "non-finite height {y} at vertex {i}");
            assert!((-hs..=hs).contains(&y), "height {y} outside ±{hs}");
        }
    }

    #[test]
    fn planar_extent_spans_half_widths() {
        let config = GenerationConfig {
            segments: 4,
            terrain_width: 20.0,
            terrain_depth: 40.0,
            ..Default::default()
        };
        let geometry = NoiseHeightfieldGenerator::flat().generate(&config);
        let (x0, z0) = geometry.planar(0);
        let (xn, zn) = geometry.planar(geometry.vertex_count() - 1);
        assert_eq!((x0, z0), (-10.0, -20.0));
        assert_eq!((xn, zn), (10.0, 20.0));
        // Row-major, x fastest: second vertex advances x only.
        assert_eq!(geometry.planar(1), (-5.0, -20.0));
    }

    #[test]
    fn zero_segments_falls_back_to_default_grid() {
        let config = GenerationConfig {
            segments: 0,
            ..Default::default()
        };
        let geometry = NoiseHeightfieldGenerator::flat().generate(&config);
        assert_eq!(geometry.vertices_per_side(), 101);
    }

    #[test]
    fn classification_thresholds() {
        let config = GenerationConfig::default(); // water 0, height scale 30
        assert_eq!(classify_height(1.9, &config), SurfaceType::Sand);
        assert_eq!(classify_height(2.0, &config), SurfaceType::Grass);
        assert_eq!(classify_height(14.9, &config), SurfaceType::Grass);
        assert_eq!(classify_height(15.0, &config), SurfaceType::Rock);
        assert_eq!(classify_height(23.9, &config), SurfaceType::Rock);
        assert_eq!(classify_height(24.0, &config), SurfaceType::Snow);
    }
}
