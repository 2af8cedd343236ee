//! Terrain instance aggregate.

use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec3;
use rand::Rng;

use crate::config::{GenerationConfig, ToolSettings};
use crate::heightfield::HeightfieldGeometry;
use crate::object::PlacedObject;

/// One editable terrain: a generation config snapshot, the heightfield
/// buffers, the placed-object list, and a world-space offset.
///
/// The instance exclusively owns its geometry and objects. The offset is
/// applied uniformly by external renderers (terrain mesh, water plane,
/// object group) and is never baked into the stored positions.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainInstance {
    pub id: String,
    pub config: GenerationConfig,
    pub offset: Vec3,
    pub geometry: HeightfieldGeometry,
    pub placed_objects: Vec<PlacedObject>,
    pub tool_settings: ToolSettings,
}

impl TerrainInstance {
    pub fn new(id: String, config: GenerationConfig, offset: Vec3, geometry: HeightfieldGeometry) -> Self {
        Self {
            id,
            config,
            offset,
            geometry,
            placed_objects: Vec::new(),
            tool_settings: ToolSettings::default(),
        }
    }
}

/// Synthesize a unique terrain id: `prefix_<random base36>_<unix millis>`,
/// the same shape the original editor generated.
pub fn unique_id(prefix: &str) -> String {
    const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let tag: String = (0..9)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("{prefix}_{tag}_{millis}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_prefixed_and_distinct() {
        let a = unique_id("t");
        let b = unique_id("t");
        assert!(a.starts_with("t_"));
        assert_ne!(a, b);
    }
}
