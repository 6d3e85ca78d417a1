//! Water surface triangles, culled where the land stands above the level.

use std::time::Instant;

use shoreline_mesh::WaterVertex;
use shoreline_terrain::{CancelToken, Cancelled, Corner, HeightQuery};

/// Upper bound on water vertices for a `size_x` by `size_z` cell grid.
pub fn water_vertex_capacity(size_x: u32, size_z: u32) -> usize {
    6 * size_x as usize * size_z as usize
}

/// Water triangles for the cells not fully above the water level.
#[derive(Clone, Debug, PartialEq)]
pub struct WaterMeshData {
    pub level: f32,
    /// Non-indexed triangle list, three vertices per triangle.
    pub vertices: Vec<WaterVertex>,
}

impl WaterMeshData {
    /// Vertices to draw.
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

const LEFT: [Corner; 3] = [Corner::TopLeft, Corner::BottomLeft, Corner::TopRight];
const RIGHT: [Corner; 3] = [Corner::TopRight, Corner::BottomLeft, Corner::BottomRight];

/// Build the water surface over `size_x` by `size_z` cells at `level`.
///
/// A triangle is dropped when the terrain is strictly above `level` at all
/// three of its corners. Off-terrain corners count as above water. Checks
/// `cancel` once per row.
pub fn build_water_mesh<H: HeightQuery + ?Sized>(
    terrain: &H,
    size_x: u32,
    size_z: u32,
    level: f32,
    cancel: &CancelToken,
) -> Result<WaterMeshData, Cancelled> {
    let start = Instant::now();
    let mut vertices = Vec::with_capacity(water_vertex_capacity(size_x, size_z));
    let mut culled = 0usize;

    for z in 0..size_z {
        cancel.check()?;
        for x in 0..size_x {
            for triangle in [LEFT, RIGHT] {
                let corners = triangle.map(|c| {
                    let (dx, dz) = c.offset();
                    [x + dx, z + dz]
                });
                let dry = corners
                    .iter()
                    .all(|&[cx, cz]| terrain.height_at(cx as f32, cz as f32, level + 1.0) > level);
                if dry {
                    culled += 1;
                    continue;
                }
                push_triangle(&mut vertices, corners);
            }
        }
    }

    tracing::debug!(
        triangles = vertices.len() / 3,
        culled,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "water mesh generated"
    );

    Ok(WaterMeshData { level, vertices })
}

/// Emit a triangle, each vertex pointing at the next two in winding order.
fn push_triangle(vertices: &mut Vec<WaterVertex>, corners: [[u32; 2]; 3]) {
    let offset = |from: [u32; 2], to: [u32; 2]| {
        [
            (to[0] as i64 - from[0] as i64) as i8,
            (to[1] as i64 - from[1] as i64) as i8,
        ]
    };
    for i in 0..3 {
        let here = corners[i];
        let first = corners[(i + 1) % 3];
        let second = corners[(i + 2) % 3];
        vertices.push(WaterVertex::new(
            here[0],
            here[1],
            offset(here, first),
            offset(here, second),
        ));
    }
}
