//! Heightfield geometry buffers.

use glam::Vec3;
use thiserror::Error;

use crate::surface::SurfaceType;

/// Buffer shape violations detected when adopting stored geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("position buffer length {positions} is not 3x type buffer length {types}")]
    Misaligned { positions: usize, types: usize },
    #[error("vertex count {0} is not a square (n+1)^2 grid")]
    NotAGrid(usize),
}

/// A regular grid of `(segments+1) x (segments+1)` vertices.
///
/// Positions are flat x,y,z triples in row-major plane order (x fastest,
/// then z), index-aligned with the surface type buffer. After generation
/// only vertex heights and types are ever mutated; planar x/z coordinates
/// are fixed. Normals are a derived attribute and must be recomputed after
/// any height change before the geometry is handed to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightfieldGeometry {
    pub positions: Vec<f32>,
    pub types: Vec<SurfaceType>,
    pub normals: Vec<f32>,
    vertices_per_side: usize,
}

impl HeightfieldGeometry {
    /// Adopt stored buffers, validating the grid invariants. Normals are
    /// recomputed from the positions.
    pub fn from_buffers(
        positions: Vec<f32>,
        types: Vec<SurfaceType>,
    ) -> Result<Self, GeometryError> {
        if positions.len() != types.len() * 3 {
            return Err(GeometryError::Misaligned {
                positions: positions.len(),
                types: types.len(),
            });
        }
        let count = types.len();
        let side = (count as f64).sqrt().round() as usize;
        if side == 0 || side * side != count {
            return Err(GeometryError::NotAGrid(count));
        }
        let mut geometry = Self {
            positions,
            types,
            normals: vec![0.0; count * 3],
            vertices_per_side: side,
        };
        geometry.recalculate_normals();
        Ok(geometry)
    }

    /// Build geometry from freshly generated buffers whose grid shape is
    /// known by construction. Normals are computed before returning.
    pub fn from_grid(
        vertices_per_side: usize,
        positions: Vec<f32>,
        types: Vec<SurfaceType>,
    ) -> Self {
        debug_assert_eq!(types.len(), vertices_per_side * vertices_per_side);
        debug_assert_eq!(positions.len(), types.len() * 3);
        let count = types.len();
        let mut geometry = Self {
            positions,
            types,
            normals: vec![0.0; count * 3],
            vertices_per_side,
        };
        geometry.recalculate_normals();
        geometry
    }

    pub fn vertex_count(&self) -> usize {
        self.types.len()
    }

    pub fn vertices_per_side(&self) -> usize {
        self.vertices_per_side
    }

    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::new(
            self.positions[i * 3],
            self.positions[i * 3 + 1],
            self.positions[i * 3 + 2],
        )
    }

    /// Planar (x, z) coordinates of a vertex. Fixed after generation.
    pub fn planar(&self, i: usize) -> (f32, f32) {
        (self.positions[i * 3], self.positions[i * 3 + 2])
    }

    pub fn height(&self, i: usize) -> f32 {
        self.positions[i * 3 + 1]
    }

    pub fn set_height(&mut self, i: usize, y: f32) {
        self.positions[i * 3 + 1] = y;
    }

    pub fn surface_type(&self, i: usize) -> SurfaceType {
        self.types[i]
    }

    pub fn set_surface_type(&mut self, i: usize, t: SurfaceType) {
        self.types[i] = t;
    }

    /// Derived per-vertex display colors (flat r,g,b triples), a pure
    /// function of the type buffer. Never persisted.
    pub fn colors(&self) -> Vec<f32> {
        let mut colors = Vec::with_capacity(self.types.len() * 3);
        for t in &self.types {
            colors.extend_from_slice(&t.color());
        }
        colors
    }

    /// Recalculate vertex normals from positions by accumulating the face
    /// normals of the two triangles in every grid quad, then normalizing.
    /// Whole-grid: a height edit anywhere invalidates its neighbors'
    /// normals too.
    pub fn recalculate_normals(&mut self) {
        let side = self.vertices_per_side;
        let mut normals: Vec<Vec3> = vec![Vec3::ZERO; self.vertex_count()];

        for z in 0..(side - 1) {
            for x in 0..(side - 1) {
                let i0 = z * side + x;
                let i1 = i0 + 1;
                let i2 = (z + 1) * side + x;
                let i3 = i2 + 1;

                let v0 = self.position(i0);
                let v1 = self.position(i1);
                let v2 = self.position(i2);
                let v3 = self.position(i3);

                // First triangle
                let n1 = (v2 - v0).cross(v1 - v0).normalize_or_zero();
                normals[i0] += n1;
                normals[i2] += n1;
                normals[i1] += n1;

                // Second triangle
                let n2 = (v3 - v1).cross(v2 - v1).normalize_or_zero();
                normals[i1] += n2;
                normals[i2] += n2;
                normals[i3] += n2;
            }
        }

        for (i, n) in normals.iter().enumerate() {
            let n = n.normalize_or(Vec3::Y);
            self.normals[i * 3] = n.x;
            self.normals[i * 3 + 1] = n.y;
            self.normals[i * 3 + 2] = n.z;
        }
    }
}
