//! Triangle indices over the packed terrain vertex layout.

use crate::cancel::{CancelToken, Cancelled};
use crate::quad::{Corner, is_right_handed, left_triangle, right_triangle};

/// Indices emitted for a `size_x` by `size_z` cell terrain.
pub fn terrain_index_count(size_x: u32, size_z: u32) -> usize {
    6 * size_x as usize * size_z as usize
}

/// Vertex indices of one cell's corners.
struct QuadIndices {
    top_left: u32,
    top_right: u32,
    bottom_left: u32,
    bottom_right: u32,
}

impl QuadIndices {
    fn get(&self, corner: Corner) -> u32 {
        match corner {
            Corner::TopLeft => self.top_left,
            Corner::TopRight => self.top_right,
            Corner::BottomLeft => self.bottom_left,
            Corner::BottomRight => self.bottom_right,
        }
    }

    /// Both triangles, each led by its `TopLeft` or `TopRight` provoking vertex.
    fn push(&self, indices: &mut Vec<u32>, right_handed: bool) {
        indices.extend(left_triangle(right_handed).map(|c| self.get(c)));
        indices.extend(right_triangle(right_handed).map(|c| self.get(c)));
    }

    /// As [`push`](Self::push), but the right triangle is rotated to lead with
    /// `BottomRight`, where the deferred bottom row keeps the right normals.
    fn push_last_row(&self, indices: &mut Vec<u32>, right_handed: bool) {
        indices.extend(left_triangle(right_handed).map(|c| self.get(c)));
        let [top_right, mid, bottom_right] = right_triangle(right_handed);
        indices.extend([bottom_right, top_right, mid].map(|c| self.get(c)));
    }
}

/// Build the index array matching [`build_terrain_vertices`](crate::build_terrain_vertices).
///
/// Rows before the last two index two double-wide rows. The second to last
/// row reaches down into the single-wide last row. The last row reaches into
/// the deferred bottom row. Checks `cancel` once per row.
pub fn build_terrain_indices(
    size_x: u32,
    size_z: u32,
    cancel: &CancelToken,
) -> Result<Vec<u32>, Cancelled> {
    let mut indices = Vec::with_capacity(terrain_index_count(size_x, size_z));
    if size_x == 0 || size_z == 0 {
        return Ok(indices);
    }
    let row_len = 2 * size_x;

    for z in 0..size_z.saturating_sub(2) {
        cancel.check()?;
        for x in 0..size_x {
            let top_left = z * row_len + 2 * x;
            let bottom_left = top_left + row_len;
            QuadIndices {
                top_left,
                top_right: top_left + 1,
                bottom_left,
                bottom_right: bottom_left + 1,
            }
            .push(&mut indices, is_right_handed(x, z));
        }
    }

    if size_z >= 2 {
        cancel.check()?;
        let z = size_z - 2;
        for x in 0..size_x {
            let top_left = z * row_len + 2 * x;
            let bottom_left = top_left + row_len - x;
            QuadIndices {
                top_left,
                top_right: top_left + 1,
                bottom_left,
                bottom_right: bottom_left + 1,
            }
            .push(&mut indices, is_right_handed(x, z));
        }
    }

    cancel.check()?;
    let z = size_z - 1;
    for x in 0..size_x {
        let top_left = z * row_len + x;
        let bottom_left = top_left + size_x + 1;
        QuadIndices {
            top_left,
            top_right: top_left + 1,
            bottom_left,
            bottom_right: bottom_left + 1,
        }
        .push_last_row(&mut indices, is_right_handed(x, z));
    }

    Ok(indices)
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::color::{ColorStep, Rgb, build_color_grid};
    use crate::heightmap::HeightGrid;
    use crate::terrain_mesh::{build_terrain_vertices, face_normal, terrain_vertex_count};

    const SIZES: [(u32, u32); 9] = [
        (1, 1),
        (1, 3),
        (4, 1),
        (2, 2),
        (3, 2),
        (2, 3),
        (3, 3),
        (5, 7),
        (16, 9),
    ];

    fn mesh(size_x: u32, size_z: u32) -> (HeightGrid, Vec<shoreline_mesh::TerrainVertex>, Vec<u32>) {
        let samples = (0..=size_z)
            .flat_map(|z| (0..=size_x).map(move |x| ((x * 31 + z * 17) % 11) as f32 * 0.75))
            .collect();
        let heights = HeightGrid::from_samples(size_x, size_z, samples);
        let colors = build_color_grid(&[ColorStep::new(0.0, Rgb::WHITE)], &heights, &CancelToken::new()).unwrap();
        let vertices = build_terrain_vertices(&heights, &colors, &CancelToken::new()).unwrap();
        let indices = build_terrain_indices(size_x, size_z, &CancelToken::new()).unwrap();
        (heights, vertices, indices)
    }

    #[test]
    fn test_index_count_and_bounds() {
        for (x, z) in SIZES {
            let indices = build_terrain_indices(x, z, &CancelToken::new()).unwrap();
            assert_eq!(indices.len(), terrain_index_count(x, z), "size {x}x{z}");
            let vertex_count = terrain_vertex_count(x, z);
            assert!(indices.iter().all(|&i| i < vertex_count), "size {x}x{z}");
        }
    }

    #[test]
    fn test_every_vertex_is_referenced() {
        for (x, z) in SIZES {
            let indices = build_terrain_indices(x, z, &CancelToken::new()).unwrap();
            let mut used = vec![false; terrain_vertex_count(x, z) as usize];
            for &i in &indices {
                used[i as usize] = true;
            }
            assert!(used.iter().all(|&u| u), "size {x}x{z}");
        }
    }

    #[test]
    fn test_triangles_cover_their_cell() {
        for (size_x, size_z) in SIZES {
            let (heights, vertices, indices) = mesh(size_x, size_z);
            for z in 0..size_z {
                for x in 0..size_x {
                    let first = 6 * (z * size_x + x) as usize;
                    let mut corners: Vec<[u32; 2]> = indices[first..first + 6]
                        .iter()
                        .map(|&i| {
                            let p = vertices[i as usize].position;
                            [p[0] as u32, p[2] as u32]
                        })
                        .collect();
                    corners.sort();
                    corners.dedup();
                    assert_eq!(
                        corners,
                        vec![[x, z], [x, z + 1], [x + 1, z], [x + 1, z + 1]],
                        "cell ({x}, {z}) of {size_x}x{size_z}"
                    );
                    for &i in &indices[first..first + 6] {
                        let p = vertices[i as usize].position;
                        assert_eq!(p[1], heights.get(p[0] as u32, p[2] as u32));
                    }
                }
            }
        }
    }

    #[test]
    fn test_provoking_vertex_carries_face_normal() {
        for (size_x, size_z) in SIZES {
            let (_, vertices, indices) = mesh(size_x, size_z);
            for tri in indices.chunks_exact(3) {
                let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(vertices[i as usize].position));
                let expected = face_normal(a, b, c);
                let carried = Vec3::from_array(vertices[tri[0] as usize].normal);
                assert!(
                    expected.abs_diff_eq(carried, 1e-5),
                    "triangle {tri:?} of {size_x}x{size_z}: {expected} vs {carried}"
                );
                assert!(expected.y > 0.0, "triangle {tri:?} wound downwards");
            }
        }
    }

    #[test]
    fn test_cancelled_indices() {
        let cancel = CancelToken::new();
        cancel.cancel();
        assert_eq!(build_terrain_indices(3, 3, &cancel), Err(Cancelled));
    }
}
