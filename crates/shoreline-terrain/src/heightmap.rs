//! The sampled height grid and the height query shared by mesh and runtime.

use glam::Vec3;

use crate::cancel::{CancelToken, Cancelled};
use crate::noise::NoiseField;

/// Heights at every integer grid point of a `size_x` by `size_z` cell terrain.
///
/// Holds `(size_x + 1) * (size_z + 1)` samples so the far edge has corners.
/// Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightGrid {
    size_x: u32,
    size_z: u32,
    /// Row-major, z outer.
    heights: Vec<f32>,
}

impl HeightGrid {
    /// Wrap precomputed samples. `heights` must hold `(size_x + 1) * (size_z + 1)` values.
    pub fn from_samples(size_x: u32, size_z: u32, heights: Vec<f32>) -> Self {
        debug_assert_eq!(
            heights.len(),
            (size_x as usize + 1) * (size_z as usize + 1)
        );
        Self {
            size_x,
            size_z,
            heights,
        }
    }

    /// Cells along X.
    pub fn size_x(&self) -> u32 {
        self.size_x
    }

    /// Cells along Z.
    pub fn size_z(&self) -> u32 {
        self.size_z
    }

    /// Sample at grid point `(x, z)`, with `x <= size_x` and `z <= size_z`.
    #[inline]
    pub fn get(&self, x: u32, z: u32) -> f32 {
        self.heights[z as usize * (self.size_x as usize + 1) + x as usize]
    }

    /// Grid point `(x, z)` as a world position.
    #[inline]
    pub fn position(&self, x: u32, z: u32) -> Vec3 {
        Vec3::new(x as f32, self.get(x, z), z as f32)
    }

    pub fn samples(&self) -> &[f32] {
        &self.heights
    }

    /// Barycentric height of the terrain surface at a world position.
    ///
    /// Off-grid positions return `fallback`. The far edges `x == size_x` and
    /// `z == size_z` are on the grid. Each cell is split along the
    /// `(x+1, z)`-`(x, z+1)` diagonal, and grid points return their stored
    /// sample exactly.
    pub fn height_at(&self, x: f32, z: f32, fallback: f32) -> f32 {
        let (max_x, max_z) = (self.size_x as f32, self.size_z as f32);
        // Negated comparisons also reject NaN.
        if !(x >= 0.0 && x <= max_x && z >= 0.0 && z <= max_z) || self.size_x == 0 || self.size_z == 0 {
            return fallback;
        }

        let cell_x = (x.floor() as u32).min(self.size_x - 1);
        let cell_z = (z.floor() as u32).min(self.size_z - 1);
        let fx = x - cell_x as f32;
        let fz = z - cell_z as f32;

        if fx <= 1.0 - fz {
            let h00 = self.get(cell_x, cell_z);
            let h10 = self.get(cell_x + 1, cell_z);
            let h01 = self.get(cell_x, cell_z + 1);
            (1.0 - fx - fz) * h00 + fx * h10 + fz * h01
        } else {
            let h10 = self.get(cell_x + 1, cell_z);
            let h11 = self.get(cell_x + 1, cell_z + 1);
            let h01 = self.get(cell_x, cell_z + 1);
            (1.0 - fz) * h10 + (fx + fz - 1.0) * h11 + (1.0 - fx) * h01
        }
    }
}

/// Anything that can answer terrain height queries.
pub trait HeightQuery {
    /// Surface height at `(x, z)`, or `fallback` off the terrain.
    fn height_at(&self, x: f32, z: f32, fallback: f32) -> f32;
}

impl HeightQuery for HeightGrid {
    fn height_at(&self, x: f32, z: f32, fallback: f32) -> f32 {
        HeightGrid::height_at(self, x, z, fallback)
    }
}

/// The highest grid point. Ties keep the first point in z-then-x order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    pub x: u32,
    pub z: u32,
    pub height: f32,
}

impl Peak {
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x as f32, self.height, self.z as f32)
    }
}

/// Sample `noise` over the inclusive grid `[0, size_x] x [0, size_z]`.
///
/// Checks `cancel` before every sample.
pub fn build_height_grid(
    noise: &NoiseField,
    size_x: u32,
    size_z: u32,
    cancel: &CancelToken,
) -> Result<(HeightGrid, Peak), Cancelled> {
    let mut heights = Vec::with_capacity((size_x as usize + 1) * (size_z as usize + 1));
    let mut peak = Peak {
        x: 0,
        z: 0,
        height: f32::NEG_INFINITY,
    };

    for z in 0..=size_z {
        for x in 0..=size_x {
            cancel.check()?;
            let height = noise.generate_height(x as i32, z as i32);
            if height > peak.height {
                peak = Peak { x, z, height };
            }
            heights.push(height);
        }
    }

    Ok((HeightGrid::from_samples(size_x, size_z, heights), peak))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::NoiseParams;

    fn noise() -> NoiseField {
        NoiseField::new(NoiseParams {
            seed: 1234,
            amplitude: 100.0,
            num_octaves: 5,
            roughness: 0.5,
        })
    }

    /// 2x2 cells with hand-picked heights.
    fn small_grid() -> HeightGrid {
        HeightGrid::from_samples(
            2,
            2,
            vec![
                0.0, 1.0, 2.0, //
                3.0, 4.0, 5.0, //
                6.0, 7.5, 9.0,
            ],
        )
    }

    #[test]
    fn test_grid_includes_far_edge() {
        let (grid, _) = build_height_grid(&noise(), 4, 3, &CancelToken::new()).unwrap();
        assert_eq!(grid.samples().len(), 5 * 4);
        assert_eq!(grid.size_x(), 4);
        assert_eq!(grid.size_z(), 3);
    }

    #[test]
    fn test_grid_matches_standalone_noise() {
        let field = noise();
        let (grid, _) = build_height_grid(&field, 8, 6, &CancelToken::new()).unwrap();
        for z in 0..=6 {
            for x in 0..=8 {
                assert_eq!(
                    grid.get(x, z).to_bits(),
                    field.generate_height(x as i32, z as i32).to_bits()
                );
            }
        }
    }

    #[test]
    fn test_peak_is_maximum() {
        let (grid, peak) = build_height_grid(&noise(), 16, 16, &CancelToken::new()).unwrap();
        let max = grid.samples().iter().copied().fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(peak.height, max);
        assert_eq!(grid.get(peak.x, peak.z), max);
    }

    #[test]
    fn test_cancelled_build() {
        let cancel = CancelToken::new();
        cancel.cancel();
        assert_eq!(
            build_height_grid(&noise(), 4, 4, &cancel),
            Err(Cancelled)
        );
    }

    #[test]
    fn test_height_at_grid_points_is_exact() {
        let (grid, _) = build_height_grid(&noise(), 6, 5, &CancelToken::new()).unwrap();
        for z in 0..=5 {
            for x in 0..=6 {
                assert_eq!(grid.height_at(x as f32, z as f32, f32::NAN), grid.get(x, z));
            }
        }
    }

    #[test]
    fn test_height_at_off_grid_is_fallback() {
        let grid = small_grid();
        assert_eq!(grid.height_at(-0.01, 1.0, -99.0), -99.0);
        assert_eq!(grid.height_at(1.0, -3.0, -99.0), -99.0);
        assert_eq!(grid.height_at(2.01, 1.0, -99.0), -99.0);
        assert_eq!(grid.height_at(1.0, 2.5, -99.0), -99.0);
        assert_eq!(grid.height_at(f32::NAN, 1.0, -99.0), -99.0);
    }

    #[test]
    fn test_height_at_interpolates_within_triangle() {
        let grid = small_grid();
        // Top triangle of cell (0, 0): corners 0 @ (0,0), 1 @ (1,0), 3 @ (0,1).
        assert!((grid.height_at(0.25, 0.25, 0.0) - 1.0).abs() < 1e-6);
        // Bottom triangle of cell (0, 0): corners 1 @ (1,0), 4 @ (1,1), 3 @ (0,1).
        assert!((grid.height_at(0.75, 0.75, 0.0) - 3.0).abs() < 1e-6);
        // Diagonal midpoint agrees from both sides.
        assert!((grid.height_at(0.5, 0.5, 0.0) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_height_at_far_corner() {
        let grid = small_grid();
        assert_eq!(grid.height_at(2.0, 2.0, 0.0), 9.0);
        assert!((grid.height_at(1.5, 2.0, 0.0) - 8.25).abs() < 1e-6);
    }
}
