//! Faceted terrain vertices.
//!
//! Every cell has two flat normals, one per triangle. Rows above the last are
//! packed double-wide: each cell emits its `TopLeft` with the left normal and
//! its `TopRight` with the right normal, so neighbouring cells never share a
//! provoking vertex. The last row emits single-wide, followed by a deferred
//! bottom row whose `BottomRight` corners carry the right normals.

use glam::Vec3;
use shoreline_mesh::TerrainVertex;

use crate::cancel::{CancelToken, Cancelled};
use crate::color::ColorGrid;
use crate::heightmap::HeightGrid;
use crate::quad::{Corner, is_right_handed, left_triangle, right_triangle};

/// Vertices emitted for a `size_x` by `size_z` cell terrain.
pub fn terrain_vertex_count(size_x: u32, size_z: u32) -> u32 {
    if size_x == 0 || size_z == 0 {
        return 0;
    }
    (size_x - 1) * size_z * 2 + 2 * (size_z + 1)
}

/// Flat normal of a triangle wound `a`, `b`, `c`.
pub(crate) fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).normalize()
}

/// `(left, right)` triangle normals of cell `(x, z)`.
fn cell_normals(heights: &HeightGrid, x: u32, z: u32) -> (Vec3, Vec3) {
    let corner = |c: Corner| {
        let (dx, dz) = c.offset();
        heights.position(x + dx, z + dz)
    };
    let normal = |[a, b, c]: [Corner; 3]| face_normal(corner(a), corner(b), corner(c));
    let right_handed = is_right_handed(x, z);
    (
        normal(left_triangle(right_handed)),
        normal(right_triangle(right_handed)),
    )
}

fn vertex(heights: &HeightGrid, colors: &ColorGrid, x: u32, z: u32, normal: Vec3) -> TerrainVertex {
    TerrainVertex {
        position: heights.position(x, z).to_array(),
        normal: normal.to_array(),
        color: colors.get(x, z).to_array(),
    }
}

/// Build the terrain vertex array. Checks `cancel` once per row.
pub fn build_terrain_vertices(
    heights: &HeightGrid,
    colors: &ColorGrid,
    cancel: &CancelToken,
) -> Result<Vec<TerrainVertex>, Cancelled> {
    let (size_x, size_z) = (heights.size_x(), heights.size_z());
    let mut vertices = Vec::with_capacity(terrain_vertex_count(size_x, size_z) as usize);
    if size_x == 0 || size_z == 0 {
        return Ok(vertices);
    }

    let (last_x, last_z) = (size_x - 1, size_z - 1);
    let mut last_row = Vec::with_capacity(size_x as usize);

    for z in 0..size_z {
        cancel.check()?;
        for x in 0..size_x {
            let (left, right) = cell_normals(heights, x, z);
            vertices.push(vertex(heights, colors, x, z, left));
            if x == last_x || z != last_z {
                vertices.push(vertex(heights, colors, x + 1, z, right));
            }
            if z == last_z {
                last_row.push((left, right));
            }
        }
    }

    cancel.check()?;
    for (x, (left, right)) in (0..).zip(last_row) {
        if x == 0 {
            vertices.push(vertex(heights, colors, x, size_z, left));
        }
        vertices.push(vertex(heights, colors, x + 1, size_z, right));
    }

    Ok(vertices)
}
