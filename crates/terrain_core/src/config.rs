//! Generation parameters and tool state. Field names mirror the legacy
//! JSON records, so these types serialize byte-compatibly with files the
//! original editor wrote.

use serde::{Deserialize, Serialize};

use crate::object::PlacedObjectKind;
use crate::surface::SurfaceType;

/// Parameter set for heightfield generation. Immutable once applied to a
/// terrain; each terrain carries its own snapshot which may diverge from
/// the session defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationConfig {
    /// Grid extent along X in world units.
    pub terrain_width: f32,
    /// Grid extent along Z in world units.
    pub terrain_depth: f32,
    /// Segment count per axis; the grid has `(segments+1)²` vertices.
    pub segments: u32,
    /// Noise sampling scale (higher = busier terrain).
    pub noise_scale: f32,
    /// Height amplitude; generated heights stay within ±this value.
    pub terrain_height_scale: f32,
    /// Number of fractal noise layers summed.
    pub octaves: u32,
    /// Amplitude decay per octave.
    pub persistence: f32,
    /// Frequency growth per octave.
    pub lacunarity: f32,
    /// Carried for record fidelity; does not affect generation.
    pub plateau_level: f32,
    /// Carried for record fidelity; does not affect generation.
    pub plateau_smoothing: f32,
    /// Carried for record fidelity; does not affect generation.
    pub valley_depth_factor: f32,
    /// Carried for record fidelity; does not affect generation.
    pub valley_threshold: f32,
    /// Water plane height; vertices below `waterLevel + 2` classify as sand.
    pub water_level: f32,
    /// Per-vertex tree probability on grass during procedural scatter.
    pub tree_placement_probability: f64,
    /// Per-vertex rock probability on rock during procedural scatter.
    pub rock_placement_probability: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            terrain_width: 200.0,
            terrain_depth: 200.0,
            segments: 100,
            noise_scale: 70.0,
            terrain_height_scale: 30.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            plateau_level: 0.0,
            plateau_smoothing: 0.1,
            valley_depth_factor: 1.5,
            valley_threshold: -0.2,
            water_level: 0.0,
            tree_placement_probability: 0.02,
            rock_placement_probability: 0.01,
        }
    }
}

impl GenerationConfig {
    /// Centralized validation step: every zero, negative, or non-finite
    /// generation parameter falls back to its documented default, so
    /// downstream code can rely on `segments >= 1`, `octaves >= 1`, and
    /// positive width/depth/scales/persistence/lacunarity without
    /// re-checking. Negative persistence in particular would make the
    /// fractal amplitude sum cancel to zero and poison every height with
    /// NaN. The original treated 0 as "absent" in every load path; this is
    /// the same tolerance in one place.
    pub fn normalized(&self) -> Self {
        let d = Self::default();
        let fix = |v: f32, fallback: f32| if v > 0.0 && v.is_finite() { v } else { fallback };
        let normalized = Self {
            terrain_width: fix(self.terrain_width, d.terrain_width),
            terrain_depth: fix(self.terrain_depth, d.terrain_depth),
            segments: if self.segments == 0 { d.segments } else { self.segments },
            noise_scale: fix(self.noise_scale, d.noise_scale),
            terrain_height_scale: fix(self.terrain_height_scale, d.terrain_height_scale),
            octaves: if self.octaves == 0 { d.octaves } else { self.octaves },
            persistence: fix(self.persistence, d.persistence),
            lacunarity: fix(self.lacunarity, d.lacunarity),
            ..self.clone()
        };
        if normalized != *self {
            log::debug!("generation config normalized: defaults substituted for zero fields");
        }
        normalized
    }

    /// Vertices per grid side after normalization.
    pub fn vertices_per_side(&self) -> usize {
        self.segments as usize + 1
    }
}

/// Interaction tool selected in the UI layer. Legacy string encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolMode {
    #[default]
    None,
    MoveTerrain,
    SculptRaise,
    SculptLower,
    SculptSmooth,
    SculptFlatten,
    Paint,
    PlaceObject,
}

impl ToolMode {
    /// Whether this tool mutates heightfield geometry when applied.
    pub fn is_sculpt(self) -> bool {
        matches!(
            self,
            ToolMode::SculptRaise
                | ToolMode::SculptLower
                | ToolMode::SculptSmooth
                | ToolMode::SculptFlatten
        )
    }
}

/// Last-used brush/paint parameters. Persisted per terrain purely for
/// operator convenience; every field is defaulted on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolSettings {
    pub current_tool_mode: ToolMode,
    pub current_paint_type: SurfaceType,
    pub current_place_object_type: PlacedObjectKind,
    pub brush_size: f32,
    pub sculpt_strength: f32,
    pub object_placement_scale: f32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            current_tool_mode: ToolMode::None,
            current_paint_type: SurfaceType::Grass,
            current_place_object_type: PlacedObjectKind::Tree,
            brush_size: 10.0,
            sculpt_strength: 0.5,
            object_placement_scale: 1.0,
        }
    }
}
