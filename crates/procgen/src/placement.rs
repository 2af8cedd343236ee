//! Decorative object placement: procedural scatter, manual placement, and
//! restore from saved records.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use terrain_core::{
    ObjectScale, PlacedObject, PlacedObjectKind, SavedObject, SurfaceType, TerrainInstance,
};

/// Places, scatters, restores, and clears decorative objects on a terrain.
///
/// `terrain.placed_objects` is the authoritative, serializable source of
/// truth; any renderable representation is a regenerable projection of it.
#[derive(Debug)]
pub struct ObjectPlacementEngine {
    rng: StdRng,
}

impl Default for ObjectPlacementEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectPlacementEngine {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded engine, for reproducible scatter passes and tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Place one object at `position`. The base size is randomized per
    /// kind (tree height 2..5, footprint 0.5..1.0; rock radius 0.5..1.5)
    /// and multiplied by `scale_factor`.
    pub fn place_single(
        &mut self,
        terrain: &mut TerrainInstance,
        position: Vec3,
        kind: PlacedObjectKind,
        scale_factor: f32,
    ) {
        let scale = match kind {
            PlacedObjectKind::Tree => {
                let height = (2.0 + self.rng.gen::<f32>() * 3.0) * scale_factor;
                let footprint = (0.5 + self.rng.gen::<f32>() * 0.5) * scale_factor;
                ObjectScale::Box {
                    x: footprint,
                    y: height,
                    z: footprint,
                }
            }
            PlacedObjectKind::Rock => {
                ObjectScale::Radius((0.5 + self.rng.gen::<f32>()) * scale_factor)
            }
        };
        terrain.placed_objects.push(PlacedObject {
            kind,
            position,
            scale,
        });
    }

    /// Procedural pass over every vertex: trees on grass, rocks on rock,
    /// each an independent Bernoulli trial with the config probability.
    /// No spatial exclusion is enforced. Skipped entirely when the terrain
    /// already has objects, so a reloaded terrain is never double-
    /// scattered.
    pub fn scatter(&mut self, terrain: &mut TerrainInstance) {
        if !terrain.placed_objects.is_empty() {
            log::debug!(
                "scatter: terrain {} already has {} objects, skipping",
                terrain.id,
                terrain.placed_objects.len()
            );
            return;
        }
        let tree_p = terrain.config.tree_placement_probability;
        let rock_p = terrain.config.rock_placement_probability;
        let mut trees = 0usize;
        let mut rocks = 0usize;
        for i in 0..terrain.geometry.vertex_count() {
            let surface = terrain.geometry.surface_type(i);
            let position = terrain.geometry.position(i);
            match surface {
                SurfaceType::Grass if self.rng.gen::<f64>() < tree_p => {
                    self.place_single(terrain, position, PlacedObjectKind::Tree, 1.0);
                    trees += 1;
                }
                SurfaceType::Rock if self.rng.gen::<f64>() < rock_p => {
                    self.place_single(terrain, position, PlacedObjectKind::Rock, 1.0);
                    rocks += 1;
                }
                _ => {}
            }
        }
        log::debug!(
            "scatter: terrain {} received {trees} trees, {rocks} rocks",
            terrain.id
        );
    }

    /// Clear existing objects and re-instantiate each saved record.
    /// Records without a kind or position are skipped; missing scale
    /// fields fall back to the per-kind defaults (tree height 3 / width
    /// 0.75, rock radius 1).
    pub fn restore(&self, terrain: &mut TerrainInstance, saved: &[SavedObject]) {
        terrain.placed_objects.clear();
        for record in saved {
            let (kind, position) = match (record.kind, record.position) {
                (Some(kind), Some(position)) => (kind, position),
                _ => continue,
            };
            let scale = match kind {
                PlacedObjectKind::Tree => {
                    let x = record.scale.x.unwrap_or(0.75);
                    ObjectScale::Box {
                        x,
                        y: record.scale.y.unwrap_or(3.0),
                        // The original sized tree depth from the same
                        // footprint value as width.
                        z: record.scale.z.unwrap_or(x),
                    }
                }
                PlacedObjectKind::Rock => ObjectScale::Radius(record.scale.radius.unwrap_or(1.0)),
            };
            terrain.placed_objects.push(PlacedObject {
                kind,
                position,
                scale,
            });
        }
        log::debug!(
            "restore: terrain {} now has {} objects",
            terrain.id,
            terrain.placed_objects.len()
        );
    }

    /// Empty the placed-object state unconditionally.
    pub fn clear_all(terrain: &mut TerrainInstance) {
        terrain.placed_objects.clear();
    }
}
