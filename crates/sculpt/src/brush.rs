//! Circular brush edits: raise, lower, smooth, flatten, and paint.

use glam::Vec3;
use terrain_core::{HeightfieldGeometry, SurfaceType};

/// What a brush application does to the vertices it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushTool {
    Raise,
    Lower,
    Smooth,
    Flatten,
    Paint,
}

/// One brush application: tool, radius, strength, and the paint type used
/// by [`BrushTool::Paint`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushStroke {
    pub tool: BrushTool,
    pub radius: f32,
    pub strength: f32,
    pub paint_type: SurfaceType,
}

impl BrushStroke {
    pub fn new(tool: BrushTool, radius: f32, strength: f32) -> Self {
        Self {
            tool,
            radius,
            strength,
            paint_type: SurfaceType::Grass,
        }
    }

    pub fn paint(radius: f32, paint_type: SurfaceType) -> Self {
        Self {
            tool: BrushTool::Paint,
            radius,
            strength: 0.0,
            paint_type,
        }
    }
}

/// Apply a brush stroke centered at `center` (a world-space interaction
/// point). Returns the number of affected vertices; zero is a valid no-op,
/// not an error.
///
/// Membership is by planar distance only (`d <= radius`; height is
/// ignored), a full O(n) scan per application, which is fine at editor
/// grid sizes. Smooth re-scans all vertices per affected vertex and is
/// O(n²); it would need a spatial index before grids grow past editor
/// scale.
///
/// All height updates are computed from a snapshot of the pre-stroke
/// heights, so the result is independent of vertex order within one
/// application (smooth neighbor means never observe newly written
/// heights). Normals are recomputed over the whole grid afterwards.
pub fn apply_brush(geometry: &mut HeightfieldGeometry, center: Vec3, stroke: &BrushStroke) -> usize {
    if stroke.radius <= 0.0 {
        return 0;
    }

    let before: Vec<f32> = (0..geometry.vertex_count()).map(|i| geometry.height(i)).collect();
    let mut affected = 0usize;

    for i in 0..geometry.vertex_count() {
        let (vx, vz) = geometry.planar(i);
        let dx = vx - center.x;
        let dz = vz - center.z;
        let dist = (dx * dx + dz * dz).sqrt();
        if dist > stroke.radius {
            continue;
        }
        affected += 1;

        // Linear falloff: full strength at the center, exactly zero at
        // the rim, never negative.
        let falloff = (1.0 - dist / stroke.radius).clamp(0.0, 1.0);
        let vy = before[i];

        match stroke.tool {
            BrushTool::Raise => {
                geometry.set_height(i, vy + stroke.strength * falloff);
            }
            BrushTool::Lower => {
                geometry.set_height(i, vy - stroke.strength * falloff);
            }
            BrushTool::Flatten => {
                // Half-step toward the height at the interaction point,
                // scaled by falloff: converges without overshooting.
                geometry.set_height(i, vy + 0.5 * (center.y - vy) * falloff);
            }
            BrushTool::Smooth => {
                let neighborhood = stroke.radius * 0.5;
                let mut sum = 0.0;
                let mut count = 0usize;
                for (j, &height) in before.iter().enumerate() {
                    let (nx, nz) = geometry.planar(j);
                    let ddx = vx - nx;
                    let ddz = vz - nz;
                    if (ddx * ddx + ddz * ddz).sqrt() < neighborhood {
                        sum += height;
                        count += 1;
                    }
                }
                if count > 0 {
                    let mean = sum / count as f32;
                    geometry.set_height(i, mean * falloff + vy * (1.0 - falloff));
                }
            }
            BrushTool::Paint => {
                // No falloff: every vertex inside the radius takes the
                // selected type.
                geometry.set_surface_type(i, stroke.paint_type);
            }
        }
    }

    if affected > 0 {
        geometry.recalculate_normals();
        log::trace!("brush {:?} touched {affected} vertices", stroke.tool);
    }
    affected
}
