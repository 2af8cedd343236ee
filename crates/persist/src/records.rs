//! On-disk record shapes.
//!
//! Field names and nesting mirror the legacy JSON files exactly, so files
//! written by the original editor load unchanged and files written here
//! load there. Every field that can be absent in the wild is an `Option`;
//! the codec turns a record into a fully defaulted in-memory structure in
//! one normalization step.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use terrain_core::{
    GenerationConfig, PartialScale, PlacedObject, PlacedObjectKind, SavedObject, SurfaceType,
    ToolSettings,
};

/// Version tag of single-terrain files.
pub const TERRAIN_VERSION: &str = "1.3";
/// Version tag of whole-world files.
pub const WORLD_VERSION: &str = "world-1.2";

/// `{x, y, z}` triple used for offsets and object positions. Partial
/// records default each axis to 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorRecord {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for VectorRecord {
    fn from(v: Vec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

impl From<VectorRecord> for Vec3 {
    fn from(v: VectorRecord) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

/// Camera pose saved alongside terrain data so a session reopens where it
/// left off. Pure passenger data for the core: stored and returned, never
/// interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: [f32; 3],
    pub target: [f32; 3],
}

/// Stored geometry buffers: flat x,y,z triples plus the index-aligned
/// surface type codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryRecord {
    pub top_surface_positions: Vec<f32>,
    pub terrain_types: Vec<SurfaceType>,
}

/// Scale fields of a placed object; trees use x/y/z, rocks use radius.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f32>,
}

/// One placed object as stored on disk.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectRecord {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<PlacedObjectKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<VectorRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleRecord>,
}

impl From<&PlacedObject> for ObjectRecord {
    fn from(obj: &PlacedObject) -> Self {
        let scale = match obj.scale {
            terrain_core::ObjectScale::Box { x, y, z } => ScaleRecord {
                x: Some(x),
                y: Some(y),
                z: Some(z),
                radius: None,
            },
            terrain_core::ObjectScale::Radius(radius) => ScaleRecord {
                radius: Some(radius),
                ..Default::default()
            },
        };
        Self {
            kind: Some(obj.kind),
            position: Some(obj.position.into()),
            scale: Some(scale),
        }
    }
}

impl ObjectRecord {
    /// Loosen into the tolerant form the placement engine restores from.
    pub fn to_saved(&self) -> SavedObject {
        let scale = self.scale.unwrap_or_default();
        SavedObject {
            kind: self.kind,
            position: self.position.map(Vec3::from),
            scale: PartialScale {
                x: scale.x,
                y: scale.y,
                z: scale.z,
                radius: scale.radius,
            },
        }
    }

    #[cfg(test)]
    pub fn tree(position: Vec3, x: f32, y: f32, z: f32) -> Self {
        Self {
            kind: Some(PlacedObjectKind::Tree),
            position: Some(position.into()),
            scale: Some(ScaleRecord {
                x: Some(x),
                y: Some(y),
                z: Some(z),
                radius: None,
            }),
        }
    }
}

/// Single-terrain file, `version` `"1.3"`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TerrainRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_settings: Option<ToolSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<VectorRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<GeometryRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placed_objects: Option<Vec<ObjectRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_state: Option<CameraState>,
}

/// One terrain entry inside a world file. Same payload as a terrain file
/// but without the version wrapper, and with the `Data`-suffixed field
/// names the original used in world records.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorldTerrainRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_settings: Option<ToolSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<VectorRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry_data: Option<GeometryRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placed_objects_data: Option<Vec<ObjectRecord>>,
}

/// Whole-world file, `version` `"world-1.2"`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorldRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world_terrains: Option<Vec<WorldTerrainRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_state: Option<CameraState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_terrain_index: Option<i64>,
}

/// True when a record's version string marks it as a world file. Used to
/// route a loaded file of unknown kind.
pub fn is_world_version(version: &str) -> bool {
    version.starts_with("world-")
}
