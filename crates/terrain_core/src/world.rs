//! The ordered terrain collection and its active-selection index.

use crate::terrain::TerrainInstance;

/// Ordered collection of terrains plus the index edits are routed to.
///
/// Insertion order is significant: it drives list display and index-based
/// addressing in saved world files. The model is an owned value passed by
/// reference to whoever needs it; there is no ambient global lookup.
///
/// Invariant after every mutator: `active` is `None` or a valid index.
#[derive(Debug, Clone, Default)]
pub struct WorldModel {
    terrains: Vec<TerrainInstance>,
    active: Option<usize>,
}

impl WorldModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn terrains(&self) -> &[TerrainInstance] {
        &self.terrains
    }

    pub fn len(&self) -> usize {
        self.terrains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terrains.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn get(&self, index: usize) -> Option<&TerrainInstance> {
        self.terrains.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut TerrainInstance> {
        self.terrains.get_mut(index)
    }

    pub fn active(&self) -> Option<&TerrainInstance> {
        self.active.and_then(|i| self.terrains.get(i))
    }

    pub fn active_mut(&mut self) -> Option<&mut TerrainInstance> {
        match self.active {
            Some(i) => self.terrains.get_mut(i),
            None => None,
        }
    }

    /// Returns the active terrain, lazily creating a default one when the
    /// collection is empty so "the world always has at least one terrain
    /// once an active terrain is requested".
    pub fn active_or_insert_with(
        &mut self,
        create: impl FnOnce() -> TerrainInstance,
    ) -> &mut TerrainInstance {
        if self.terrains.is_empty() {
            self.terrains.push(create());
            self.active = Some(0);
        }
        let index = match self.active {
            Some(i) if i < self.terrains.len() => i,
            _ => 0,
        };
        &mut self.terrains[index]
    }

    /// Set the active terrain by index. Out-of-range indices clamp to the
    /// none sentinel (logged, never raised).
    pub fn set_active_index(&mut self, index: usize) {
        if index < self.terrains.len() {
            self.active = Some(index);
        } else {
            log::warn!("set_active_index: index {index} out of range, clearing selection");
            self.active = None;
        }
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }

    /// Resolve a terrain reference to an index by id and activate it.
    pub fn set_active_by_id(&mut self, id: &str) {
        match self.terrains.iter().position(|t| t.id == id) {
            Some(i) => self.active = Some(i),
            None => {
                log::warn!("set_active_by_id: no terrain with id {id:?}, clearing selection");
                self.active = None;
            }
        }
    }

    /// Append a terrain and make it active.
    pub fn add(&mut self, terrain: TerrainInstance) -> usize {
        self.terrains.push(terrain);
        let index = self.terrains.len() - 1;
        self.active = Some(index);
        index
    }

    /// Remove the terrain at `index`, re-clamping the active index into
    /// range (it shifts to `len - 1` when it pointed at or past the end).
    /// The removed instance is returned so the caller can release any
    /// externally owned rendering resources tied to it.
    pub fn remove(&mut self, index: usize) -> Option<TerrainInstance> {
        if index >= self.terrains.len() {
            return None;
        }
        let removed = self.terrains.remove(index);
        self.active = match self.active {
            _ if self.terrains.is_empty() => None,
            Some(a) if a >= self.terrains.len() => Some(self.terrains.len() - 1),
            Some(a) if a > index => Some(a - 1),
            other => other,
        };
        Some(removed)
    }

    /// Drop every terrain and clear the selection. Returns the previous
    /// contents for disposal.
    pub fn take_all(&mut self) -> Vec<TerrainInstance> {
        self.active = None;
        std::mem::take(&mut self.terrains)
    }

    /// Replace the whole collection, e.g. after a world load. An
    /// out-of-range index clamps to the first terrain; a none selection is
    /// preserved as none.
    pub fn replace(&mut self, terrains: Vec<TerrainInstance>, active: Option<usize>) {
        self.terrains = terrains;
        self.active = match active {
            Some(i) if i < self.terrains.len() => Some(i),
            Some(_) if !self.terrains.is_empty() => Some(0),
            _ => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::config::GenerationConfig;
    use crate::heightfield::HeightfieldGeometry;
    use crate::surface::SurfaceType;

    fn terrain(id: &str) -> TerrainInstance {
        let positions = vec![
            -1.0, 0.0, -1.0, 1.0, 0.0, -1.0, //
            -1.0, 0.0, 1.0, 1.0, 0.0, 1.0,
        ];
        let geometry =
            HeightfieldGeometry::from_buffers(positions, vec![SurfaceType::Grass; 4]).unwrap();
        TerrainInstance::new(id.into(), GenerationConfig::default(), Vec3::ZERO, geometry)
    }

    fn invariant_holds(world: &WorldModel) -> bool {
        match world.active_index() {
            None => true,
            Some(i) => i < world.len(),
        }
    }

    #[test]
    fn empty_world_has_no_active() {
        let world = WorldModel::new();
        assert_eq!(world.active_index(), None);
        assert!(world.active().is_none());
    }

    #[test]
    fn lazy_creation_appends_and_activates() {
        let mut world = WorldModel::new();
        let t = world.active_or_insert_with(|| terrain("t_auto"));
        assert_eq!(t.id, "t_auto");
        assert_eq!(world.len(), 1);
        assert_eq!(world.active_index(), Some(0));
    }

    #[test]
    fn add_activates_new_terrain() {
        let mut world = WorldModel::new();
        world.add(terrain("a"));
        world.add(terrain("b"));
        assert_eq!(world.active_index(), Some(1));
        assert_eq!(world.active().unwrap().id, "b");
    }

    #[test]
    fn out_of_range_activation_clears_selection() {
        let mut world = WorldModel::new();
        world.add(terrain("a"));
        world.set_active_index(5);
        assert_eq!(world.active_index(), None);
        assert!(invariant_holds(&world));
    }

    #[test]
    fn remove_reclamps_active_index() {
        let mut world = WorldModel::new();
        world.add(terrain("a"));
        world.add(terrain("b"));
        world.add(terrain("c"));
        assert_eq!(world.active_index(), Some(2));

        // Removing the active tail shifts the selection to the new end.
        let removed = world.remove(2).unwrap();
        assert_eq!(removed.id, "c");
        assert_eq!(world.active_index(), Some(1));

        // Removing before the active index keeps the same terrain active.
        world.set_active_index(1);
        world.remove(0);
        assert_eq!(world.active().unwrap().id, "b");

        world.remove(0);
        assert_eq!(world.active_index(), None);
        assert!(invariant_holds(&world));
    }

    #[test]
    fn invariant_survives_operation_sequences() {
        let mut world = WorldModel::new();
        world.add(terrain("a"));
        world.add(terrain("b"));
        world.set_active_by_id("a");
        assert_eq!(world.active_index(), Some(0));
        world.set_active_by_id("missing");
        assert_eq!(world.active_index(), None);
        world.remove(1);
        world.remove(0);
        world.replace(vec![terrain("x")], Some(9));
        assert_eq!(world.active_index(), Some(0));
        assert!(invariant_holds(&world));
    }

    #[test]
    fn replace_preserves_cleared_selection() {
        let mut world = WorldModel::new();
        world.add(terrain("a"));
        world.replace(vec![terrain("x"), terrain("y")], None);
        assert_eq!(world.len(), 2);
        assert_eq!(world.active_index(), None);
    }
}
