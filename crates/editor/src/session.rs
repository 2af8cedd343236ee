//! The editing session: owns the world model and routes every mutation.
//!
//! External layers (input, UI, rendering) are collaborators: they hand
//! this session a world-space point plus the current tool snapshot, and
//! read back the mutated buffers to redraw. All mutation is synchronous
//! and single-threaded; the `loading` guard keeps file loads from
//! interleaving with edits and is released on every exit path.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use glam::Vec3;
use persist::CameraState;
use procgen::{NoiseHeightfieldGenerator, ObjectPlacementEngine};
use sculpt::{apply_brush, BrushStroke, BrushTool};
use terrain_core::{
    unique_id, GenerationConfig, TerrainInstance, ToolMode, ToolSettings, WorldModel,
};

pub struct EditorSession {
    world: WorldModel,
    /// Session-wide generation defaults; world files carry them as
    /// `gridConfig` and replace them on load.
    defaults: GenerationConfig,
    generator: NoiseHeightfieldGenerator,
    placement: ObjectPlacementEngine,
    /// Current tool snapshot, updated by the UI layer before each
    /// interaction.
    pub tool: ToolSettings,
    camera_state: Option<CameraState>,
    loading: bool,
}

impl EditorSession {
    pub fn new(seed: u64) -> Self {
        Self {
            world: WorldModel::new(),
            defaults: GenerationConfig::default(),
            generator: NoiseHeightfieldGenerator::seeded(seed),
            placement: ObjectPlacementEngine::with_seed(seed),
            tool: ToolSettings::default(),
            camera_state: None,
            loading: false,
        }
    }

    pub fn world(&self) -> &WorldModel {
        &self.world
    }

    pub fn defaults(&self) -> &GenerationConfig {
        &self.defaults
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_camera_state(&mut self, camera: Option<CameraState>) {
        self.camera_state = camera;
    }

    pub fn camera_state(&self) -> Option<&CameraState> {
        self.camera_state.as_ref()
    }

    fn make_terrain(&self, id_prefix: &str) -> TerrainInstance {
        let config = self.defaults.clone();
        let geometry = self.generator.generate(&config);
        TerrainInstance::new(unique_id(id_prefix), config, Vec3::ZERO, geometry)
    }

    /// Create a fresh terrain from the session defaults, append it, make
    /// it active, and scatter initial objects. Returns its index.
    pub fn new_terrain(&mut self) -> usize {
        let mut terrain = self.make_terrain("t");
        self.placement.scatter(&mut terrain);
        self.world.add(terrain)
    }

    /// The active terrain, lazily creating a default one when the world is
    /// empty: once an active terrain is requested, the world always has at
    /// least one.
    pub fn ensure_active_terrain(&mut self) -> &mut TerrainInstance {
        let defaults = self.defaults.clone();
        let generator = &self.generator;
        self.world.active_or_insert_with(|| {
            let geometry = generator.generate(&defaults);
            TerrainInstance::new(unique_id("t_auto"), defaults, Vec3::ZERO, geometry)
        })
    }

    pub fn set_active(&mut self, index: usize) {
        self.world.set_active_index(index);
    }

    /// Remove a terrain and return it so externally owned rendering
    /// resources can be released by the caller.
    pub fn remove_terrain(&mut self, index: usize) -> Option<TerrainInstance> {
        self.world.remove(index)
    }

    /// Move a terrain's world-space offset. Applied by renderers to the
    /// terrain mesh, water plane, and object group alike; stored positions
    /// are untouched.
    pub fn set_terrain_offset(&mut self, index: usize, offset: Vec3) {
        if let Some(terrain) = self.world.get_mut(index) {
            terrain.offset = offset;
        }
    }

    /// Apply the current tool at a world-space interaction point.
    ///
    /// Tolerates transient absence of a target: no active terrain, or an
    /// in-flight load, is a no-op rather than an error.
    pub fn interact(&mut self, point: Vec3) {
        if self.loading {
            return;
        }
        let tool = self.tool.clone();
        let Some(terrain) = self.world.active_mut() else {
            return;
        };
        terrain.tool_settings = tool.clone();

        match tool.current_tool_mode {
            mode if mode.is_sculpt() => {
                let brush_tool = match mode {
                    ToolMode::SculptRaise => BrushTool::Raise,
                    ToolMode::SculptLower => BrushTool::Lower,
                    ToolMode::SculptSmooth => BrushTool::Smooth,
                    _ => BrushTool::Flatten,
                };
                let stroke =
                    BrushStroke::new(brush_tool, tool.brush_size, tool.sculpt_strength);
                apply_brush(&mut terrain.geometry, point, &stroke);
            }
            ToolMode::Paint => {
                let stroke = BrushStroke::paint(tool.brush_size, tool.current_paint_type);
                apply_brush(&mut terrain.geometry, point, &stroke);
            }
            ToolMode::PlaceObject => {
                self.placement.place_single(
                    terrain,
                    point,
                    tool.current_place_object_type,
                    tool.object_placement_scale,
                );
            }
            // MoveTerrain and None never mutate geometry.
            _ => {}
        }
    }

    /// Rebuild the active terrain's geometry from its config. Placed
    /// objects are preserved; the renderable projection of them is the
    /// caller's to refresh.
    pub fn regenerate_active(&mut self) {
        let Some(terrain) = self.world.active_mut() else {
            return;
        };
        terrain.geometry = self.generator.generate(&terrain.config);
        log::info!("regenerated terrain {}", terrain.id);
    }

    /// Remove every placed object from the active terrain.
    pub fn clear_active_objects(&mut self) {
        if let Some(terrain) = self.world.active_mut() {
            ObjectPlacementEngine::clear_all(terrain);
        }
    }

    pub fn save_active_terrain(&mut self, path: &Path) -> Result<()> {
        let camera = self.camera_state;
        let terrain = self.ensure_active_terrain();
        let json = persist::encode_terrain(terrain, camera.as_ref())
            .context("failed to encode terrain")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write terrain file {}", path.display()))?;
        log::info!("saved terrain to {}", path.display());
        Ok(())
    }

    pub fn save_world(&self, path: &Path) -> Result<()> {
        let json = persist::encode_world(&self.world, &self.defaults, self.camera_state.as_ref())
            .context("failed to encode world")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write world file {}", path.display()))?;
        log::info!("saved world ({} terrains) to {}", self.world.len(), path.display());
        Ok(())
    }

    /// Replace the whole session state from a world file. Prior state is
    /// cleared only after the record's top-level shape validates, so a
    /// rejected file never leaves the world half-populated.
    pub fn load_world(&mut self, path: &Path) -> Result<()> {
        if self.loading {
            bail!("a load is already in progress");
        }
        self.loading = true;
        let result = self.load_world_inner(path);
        self.loading = false;
        result
    }

    fn load_world_inner(&mut self, path: &Path) -> Result<()> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read world file {}", path.display()))?;
        let decoded = persist::decode_world(&json, &self.generator, &mut self.placement)
            .with_context(|| format!("error loading world from {}", path.display()))?;

        // Point of no return: shape validated, discard prior state. The
        // returned instances carry the dispose signal for any rendering
        // resources tied to them.
        let disposed = self.world.take_all();
        if !disposed.is_empty() {
            log::debug!("disposed {} terrains for world load", disposed.len());
        }

        let (world, grid_config, camera_state) = decoded.into_world();
        self.world = world;
        if let Some(config) = grid_config {
            self.defaults = config;
        }
        if camera_state.is_some() {
            self.camera_state = camera_state;
        }
        log::info!(
            "loaded world from {}: {} terrains, active {:?}",
            path.display(),
            self.world.len(),
            self.world.active_index()
        );
        Ok(())
    }

    /// Load a single-terrain file and append it as a new active terrain.
    pub fn add_terrain_from_file(&mut self, path: &Path) -> Result<()> {
        if self.loading {
            bail!("a load is already in progress");
        }
        self.loading = true;
        let result = self.add_terrain_inner(path);
        self.loading = false;
        result
    }

    fn add_terrain_inner(&mut self, path: &Path) -> Result<()> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read terrain file {}", path.display()))?;
        let (terrain, camera_state) =
            persist::decode_terrain(&json, &self.generator, &mut self.placement)
                .with_context(|| format!("error loading terrain from {}", path.display()))?;
        if camera_state.is_some() {
            self.camera_state = camera_state;
        }
        let index = self.world.add(terrain);
        log::info!("added terrain from {} at index {index}", path.display());
        Ok(())
    }
}
