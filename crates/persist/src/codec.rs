//! Versioned record encode/decode.
//!
//! Encoding is pure; decoding normalizes: every tolerated absence (id,
//! offset, tool settings, geometry, placed objects) is filled in here, in
//! one place, so no other component ever sees a partially defaulted
//! terrain. Stored geometry buffers are trusted verbatim and take
//! precedence over regeneration; the generator is only a fallback for
//! records that never carried buffers.

use glam::Vec3;
use procgen::{NoiseHeightfieldGenerator, ObjectPlacementEngine};
use terrain_core::{
    unique_id, GenerationConfig, HeightfieldGeometry, TerrainInstance, WorldModel,
};

use crate::error::CodecError;
use crate::records::{
    CameraState, GeometryRecord, ObjectRecord, TerrainRecord, VectorRecord, WorldRecord,
    WorldTerrainRecord, TERRAIN_VERSION, WORLD_VERSION,
};

/// Result of decoding a world file.
#[derive(Debug)]
pub struct DecodedWorld {
    pub terrains: Vec<TerrainInstance>,
    pub active_index: Option<usize>,
    pub grid_config: Option<GenerationConfig>,
    pub camera_state: Option<CameraState>,
}

impl DecodedWorld {
    /// Move the decoded terrains into a world model, restoring the saved
    /// active index: in range as-is, out of range falls back to the first
    /// terrain, and a saved cleared selection stays cleared.
    pub fn into_world(self) -> (WorldModel, Option<GenerationConfig>, Option<CameraState>) {
        let mut world = WorldModel::new();
        world.replace(self.terrains, self.active_index);
        (world, self.grid_config, self.camera_state)
    }
}

fn geometry_record(geometry: &HeightfieldGeometry) -> GeometryRecord {
    GeometryRecord {
        top_surface_positions: geometry.positions.clone(),
        terrain_types: geometry.types.clone(),
    }
}

/// Serialize one terrain to a `"1.3"` record (pretty JSON, matching the
/// original's download output).
pub fn encode_terrain(
    terrain: &TerrainInstance,
    camera_state: Option<&CameraState>,
) -> Result<String, CodecError> {
    let record = TerrainRecord {
        version: Some(TERRAIN_VERSION.to_string()),
        id: Some(terrain.id.clone()),
        config: Some(terrain.config.clone()),
        tool_settings: Some(terrain.tool_settings.clone()),
        offset: Some(terrain.offset.into()),
        geometry: Some(geometry_record(&terrain.geometry)),
        placed_objects: Some(terrain.placed_objects.iter().map(ObjectRecord::from).collect()),
        camera_state: camera_state.copied(),
    };
    Ok(serde_json::to_string_pretty(&record)?)
}

/// Serialize a whole world to a `"world-1.2"` record. The none active
/// selection is encoded as -1.
pub fn encode_world(
    world: &WorldModel,
    grid_config: &GenerationConfig,
    camera_state: Option<&CameraState>,
) -> Result<String, CodecError> {
    let entries = world
        .terrains()
        .iter()
        .map(|terrain| WorldTerrainRecord {
            id: Some(terrain.id.clone()),
            config: Some(terrain.config.clone()),
            tool_settings: Some(terrain.tool_settings.clone()),
            offset: Some(terrain.offset.into()),
            geometry_data: Some(geometry_record(&terrain.geometry)),
            placed_objects_data: Some(
                terrain.placed_objects.iter().map(ObjectRecord::from).collect(),
            ),
        })
        .collect();
    let record = WorldRecord {
        version: Some(WORLD_VERSION.to_string()),
        grid_config: Some(grid_config.clone()),
        world_terrains: Some(entries),
        camera_state: camera_state.copied(),
        active_terrain_index: Some(world.active_index().map_or(-1, |i| i as i64)),
    };
    Ok(serde_json::to_string_pretty(&record)?)
}

/// All the per-terrain pieces a record may or may not carry; the
/// normalization target both file kinds funnel through.
struct TerrainParts {
    id: Option<String>,
    config: Option<GenerationConfig>,
    tool_settings: Option<terrain_core::ToolSettings>,
    offset: Option<VectorRecord>,
    geometry: Option<GeometryRecord>,
    placed_objects: Option<Vec<ObjectRecord>>,
}

/// Build a fully defaulted terrain from record parts.
///
/// - Missing id/offset/tool settings synthesize defaults, never error.
/// - Stored geometry is adopted verbatim (malformed buffers are fatal);
///   absent geometry is regenerated from the config.
/// - Present placed objects are restored; absent ones fall back to a
///   procedural scatter.
fn instantiate(
    parts: TerrainParts,
    fallback_id_prefix: &str,
    generator: &NoiseHeightfieldGenerator,
    placement: &mut ObjectPlacementEngine,
) -> Result<TerrainInstance, CodecError> {
    let id = parts.id.unwrap_or_else(|| unique_id(fallback_id_prefix));
    let config = parts.config.unwrap_or_default();
    let offset: Vec3 = parts.offset.unwrap_or_default().into();

    let geometry = match parts.geometry {
        Some(record) => {
            HeightfieldGeometry::from_buffers(record.top_surface_positions, record.terrain_types)?
        }
        None => {
            log::debug!("record for {id} has no geometry, regenerating from config");
            generator.generate(&config)
        }
    };

    let mut terrain = TerrainInstance::new(id, config, offset, geometry);
    if let Some(settings) = parts.tool_settings {
        terrain.tool_settings = settings;
    }

    match parts.placed_objects {
        Some(records) => {
            let saved: Vec<_> = records.iter().map(ObjectRecord::to_saved).collect();
            placement.restore(&mut terrain, &saved);
        }
        None => placement.scatter(&mut terrain),
    }
    Ok(terrain)
}

fn warn_on_unexpected_version(found: Option<&str>, expected: &str) {
    match found {
        Some(v) if v == expected => {}
        Some(v) => log::warn!("unexpected record version {v:?} (expected {expected}), decoding best-effort"),
        None => log::warn!("record has no version field, decoding best-effort"),
    }
}

/// Decode a single-terrain file.
pub fn decode_terrain(
    json: &str,
    generator: &NoiseHeightfieldGenerator,
    placement: &mut ObjectPlacementEngine,
) -> Result<(TerrainInstance, Option<CameraState>), CodecError> {
    let record: TerrainRecord = serde_json::from_str(json)?;
    warn_on_unexpected_version(record.version.as_deref(), TERRAIN_VERSION);
    let terrain = instantiate(
        TerrainParts {
            id: record.id,
            config: record.config,
            tool_settings: record.tool_settings,
            offset: record.offset,
            geometry: record.geometry,
            placed_objects: record.placed_objects,
        },
        "t_loaded",
        generator,
        placement,
    )?;
    Ok((terrain, record.camera_state))
}

/// Decode a whole-world file. A record without a `worldTerrains` array is
/// rejected before anything is instantiated, so the caller's state is
/// never half-replaced by a bad file.
pub fn decode_world(
    json: &str,
    generator: &NoiseHeightfieldGenerator,
    placement: &mut ObjectPlacementEngine,
) -> Result<DecodedWorld, CodecError> {
    let record: WorldRecord = serde_json::from_str(json)?;
    warn_on_unexpected_version(record.version.as_deref(), WORLD_VERSION);
    let entries = record.world_terrains.ok_or(CodecError::MissingWorldTerrains)?;

    let mut terrains = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let terrain = instantiate(
            TerrainParts {
                id: entry.id,
                config: entry.config,
                tool_settings: entry.tool_settings,
                offset: entry.offset,
                geometry: entry.geometry_data,
                placed_objects: entry.placed_objects_data,
            },
            &format!("lt_{index}"),
            generator,
            placement,
        )?;
        terrains.push(terrain);
    }

    let active_index = match record.active_terrain_index {
        Some(i) if i >= 0 && (i as usize) < terrains.len() => Some(i as usize),
        // An explicit negative index is a saved cleared selection and
        // round-trips as such.
        Some(i) if i < 0 => None,
        _ if !terrains.is_empty() => Some(0),
        _ => None,
    };

    Ok(DecodedWorld {
        terrains,
        active_index,
        grid_config: record.grid_config,
        camera_state: record.camera_state,
    })
}

#[cfg(test)]
mod tests {
    use terrain_core::{ObjectScale, PlacedObject, PlacedObjectKind, SurfaceType, ToolMode};

    use super::*;

    fn engines() -> (NoiseHeightfieldGenerator, ObjectPlacementEngine) {
        (
            NoiseHeightfieldGenerator::seeded(42),
            ObjectPlacementEngine::with_seed(42),
        )
    }

    fn sample_terrain() -> TerrainInstance {
        let config = GenerationConfig {
            segments: 8,
            ..Default::default()
        };
        let geometry = NoiseHeightfieldGenerator::seeded(42).generate(&config);
        let mut terrain = TerrainInstance::new(
            "t_sample".into(),
            config,
            Vec3::new(10.0, 0.0, -20.0),
            geometry,
        );
        terrain.placed_objects.push(PlacedObject {
            kind: PlacedObjectKind::Tree,
            position: Vec3::new(1.0, 2.0, 3.0),
            scale: ObjectScale::Box { x: 0.6, y: 3.0, z: 0.6 },
        });
        terrain.tool_settings.current_tool_mode = ToolMode::SculptRaise;
        terrain.tool_settings.brush_size = 14.0;
        terrain
    }

    #[test]
    fn terrain_round_trip_preserves_everything() {
        let (generator, mut placement) = engines();
        let terrain = sample_terrain();
        let camera = CameraState {
            position: [80.0, 80.0, 80.0],
            target: [0.0, 0.0, 0.0],
        };

        let json = encode_terrain(&terrain, Some(&camera)).unwrap();
        let (decoded, decoded_camera) =
            decode_terrain(&json, &generator, &mut placement).unwrap();

        assert_eq!(decoded.id, terrain.id);
        assert_eq!(decoded.config, terrain.config);
        assert_eq!(decoded.offset, terrain.offset);
        assert_eq!(decoded.geometry.positions, terrain.geometry.positions);
        assert_eq!(decoded.geometry.types, terrain.geometry.types);
        assert_eq!(decoded.placed_objects, terrain.placed_objects);
        assert_eq!(decoded.tool_settings, terrain.tool_settings);
        assert_eq!(decoded_camera, Some(camera));
    }

    #[test]
    fn placed_tree_survives_round_trip_field_by_field() {
        let (generator, mut placement) = engines();
        let terrain = sample_terrain();
        let json = encode_terrain(&terrain, None).unwrap();
        let (decoded, _) = decode_terrain(&json, &generator, &mut placement).unwrap();

        assert_eq!(decoded.placed_objects.len(), 1);
        let obj = &decoded.placed_objects[0];
        assert_eq!(obj.kind, PlacedObjectKind::Tree);
        assert_eq!(obj.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(obj.scale, ObjectScale::Box { x: 0.6, y: 3.0, z: 0.6 });
    }

    #[test]
    fn world_round_trip_restores_active_index() {
        let (generator, mut placement) = engines();
        let mut world = WorldModel::new();
        world.add(sample_terrain());
        let mut second = sample_terrain();
        second.id = "t_second".into();
        world.add(second);
        world.set_active_index(0);

        let json = encode_world(&world, &GenerationConfig::default(), None).unwrap();
        let decoded = decode_world(&json, &generator, &mut placement).unwrap();
        let (restored, grid, _) = decoded.into_world();

        assert_eq!(restored.len(), 2);
        assert_eq!(restored.active_index(), Some(0));
        assert_eq!(restored.terrains()[1].id, "t_second");
        assert_eq!(grid, Some(GenerationConfig::default()));
    }

    #[test]
    fn world_without_terrains_array_is_rejected() {
        let (generator, mut placement) = engines();
        let err = decode_world(r#"{"version":"world-1.2"}"#, &generator, &mut placement);
        assert!(matches!(err, Err(CodecError::MissingWorldTerrains)));
    }

    #[test]
    fn missing_optional_fields_synthesize_defaults() {
        let (generator, mut placement) = engines();
        let json = r#"{
            "version": "world-1.2",
            "worldTerrains": [ { "config": { "segments": 4 } } ]
        }"#;
        let decoded = decode_world(json, &generator, &mut placement).unwrap();
        let terrain = &decoded.terrains[0];
        assert!(terrain.id.starts_with("lt_0"));
        assert_eq!(terrain.offset, Vec3::ZERO);
        assert_eq!(terrain.tool_settings, Default::default());
        // No stored geometry: regenerated at the record's resolution.
        assert_eq!(terrain.geometry.vertex_count(), 25);
        assert_eq!(decoded.active_index, Some(0));
    }

    #[test]
    fn stored_buffers_take_precedence_over_regeneration() {
        let (generator, mut placement) = engines();
        // A hand-written 2x2 grid that no generator config would produce.
        let json = r#"{
            "version": "1.3",
            "config": { "segments": 1 },
            "geometry": {
                "topSurfacePositions": [
                    -1.0, 7.0, -1.0,  1.0, 7.0, -1.0,
                    -1.0, 7.0,  1.0,  1.0, 7.0,  1.0
                ],
                "terrainTypes": [3, "LAVA", 2, 0]
            },
            "placedObjects": []
        }"#;
        let (terrain, _) = decode_terrain(json, &generator, &mut placement).unwrap();
        assert_eq!(terrain.geometry.vertex_count(), 4);
        assert_eq!(terrain.geometry.height(0), 7.0);
        // Legacy encodings: numeric and symbolic codes mix freely.
        assert_eq!(terrain.geometry.surface_type(0), SurfaceType::Snow);
        assert_eq!(terrain.geometry.surface_type(1), SurfaceType::Lava);
        // Stored buffers were trusted even though config says 1 segment too.
        assert!(terrain.placed_objects.is_empty());
    }

    #[test]
    fn absent_placed_objects_fall_back_to_scatter() {
        // Flat terrain with water below ground: all grass, so the scatter
        // fallback must place a statistically certain >0 trees.
        let json = r#"{
            "version": "1.3",
            "config": { "segments": 50, "waterLevel": -5.0 }
        }"#;
        let flat = NoiseHeightfieldGenerator::flat();
        let mut placement = ObjectPlacementEngine::with_seed(42);
        let (terrain, _) = decode_terrain(json, &flat, &mut placement).unwrap();
        assert!(
            !terrain.placed_objects.is_empty(),
            "scatter fallback placed nothing on 2601 grass vertices"
        );
    }

    #[test]
    fn legacy_numeric_object_kinds_decode() {
        let (generator, mut placement) = engines();
        let json = r#"{
            "version": "1.3",
            "config": { "segments": 1 },
            "geometry": {
                "topSurfacePositions": [
                    -1.0, 0.0, -1.0,  1.0, 0.0, -1.0,
                    -1.0, 0.0,  1.0,  1.0, 0.0,  1.0
                ],
                "terrainTypes": [0, 0, 0, 0]
            },
            "placedObjects": [
                { "type": 1, "position": { "x": 2.0, "z": 3.0 }, "scale": {} },
                { "type": "TREE", "position": { "x": 0.0, "y": 0.0, "z": 0.0 } }
            ]
        }"#;
        let (terrain, _) = decode_terrain(json, &generator, &mut placement).unwrap();
        assert_eq!(terrain.placed_objects.len(), 2);
        let rock = &terrain.placed_objects[0];
        assert_eq!(rock.kind, PlacedObjectKind::Rock);
        // Partial position defaults the missing axis to 0.
        assert_eq!(rock.position, Vec3::new(2.0, 0.0, 3.0));
        assert_eq!(rock.scale, ObjectScale::Radius(1.0));
        assert_eq!(
            terrain.placed_objects[1].scale,
            ObjectScale::Box { x: 0.75, y: 3.0, z: 0.75 }
        );
    }

    #[test]
    fn malformed_stored_geometry_is_fatal() {
        let (generator, mut placement) = engines();
        let json = r#"{
            "version": "1.3",
            "config": {},
            "geometry": { "topSurfacePositions": [1.0, 2.0], "terrainTypes": [0] }
        }"#;
        let err = decode_terrain(json, &generator, &mut placement);
        assert!(matches!(err, Err(CodecError::Geometry(_))));
    }

    #[test]
    fn cleared_selection_round_trips_in_non_empty_world() {
        let (generator, mut placement) = engines();
        let mut world = WorldModel::new();
        world.add(sample_terrain());
        world.clear_active();

        let json = encode_world(&world, &GenerationConfig::default(), None).unwrap();
        let decoded = decode_world(&json, &generator, &mut placement).unwrap();
        assert_eq!(decoded.active_index, None);
        let (restored, _, _) = decoded.into_world();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.active_index(), None);
    }

    #[test]
    fn none_active_index_encodes_as_minus_one() {
        let (generator, mut placement) = engines();
        let world = WorldModel::new();
        let json = encode_world(&world, &GenerationConfig::default(), None).unwrap();
        let record: WorldRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record.active_terrain_index, Some(-1));

        let decoded = decode_world(&json, &generator, &mut placement).unwrap();
        assert_eq!(decoded.active_index, None);
    }
}
