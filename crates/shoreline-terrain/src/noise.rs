//! Seeded multi-octave value noise.
//!
//! Each octave samples a lattice of hashed values in `[-1, 1]`, smooths every
//! lattice point against its eight neighbours, and blends the four cell
//! corners with cosine interpolation. Octaves start coarse: octave `i` runs at
//! frequency `2^i / 2^(octaves - 1)` and amplitude `amplitude * roughness^i`.

use std::f32::consts::PI;

/// Noise parameters for one world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseParams {
    pub seed: i32,
    /// Amplitude of the first (coarsest) octave.
    pub amplitude: f32,
    pub num_octaves: u32,
    /// Amplitude falloff per octave, in `(0, 1]`.
    pub roughness: f32,
}

/// A deterministic height function over the integer grid.
///
/// Pure in `(x, z)` and the parameters, so any thread may sample it.
#[derive(Clone, Debug)]
pub struct NoiseField {
    params: NoiseParams,
    /// `(frequency, amplitude)` per octave.
    octaves: Vec<(f32, f32)>,
}

impl NoiseField {
    pub fn new(params: NoiseParams) -> Self {
        let count = params.num_octaves.max(1);
        // f64 keeps the divisor finite for any octave count.
        let divisor = 2f64.powi(count as i32 - 1);
        let octaves = (0..count)
            .map(|i| {
                (
                    (2f64.powi(i as i32) / divisor) as f32,
                    (f64::from(params.roughness).powi(i as i32) * f64::from(params.amplitude))
                        as f32,
                )
            })
            .collect();
        Self { params, octaves }
    }

    pub fn params(&self) -> &NoiseParams {
        &self.params
    }

    /// Terrain height at an integer grid point.
    pub fn generate_height(&self, x: i32, z: i32) -> f32 {
        let (x, z) = (x as f32, z as f32);
        self.octaves
            .iter()
            .map(|&(frequency, amplitude)| self.octave_sample(x * frequency, z * frequency) * amplitude)
            .sum()
    }

    /// One octave at a continuous position, in `[-1, 1]`.
    pub fn octave_sample(&self, x: f32, z: f32) -> f32 {
        let cell_x = x.floor();
        let cell_z = z.floor();
        let frac_x = x - cell_x;
        let frac_z = z - cell_z;
        let (ix, iz) = (cell_x as i32, cell_z as i32);

        let v00 = self.smoothed(ix, iz);
        let v10 = self.smoothed(ix.wrapping_add(1), iz);
        let v01 = self.smoothed(ix, iz.wrapping_add(1));
        let v11 = self.smoothed(ix.wrapping_add(1), iz.wrapping_add(1));

        let near = cosine_interpolate(v00, v10, frac_x);
        let far = cosine_interpolate(v01, v11, frac_x);
        // Rounding in the blend can land a hair outside the lattice range.
        cosine_interpolate(near, far, frac_z).clamp(-1.0, 1.0)
    }

    /// Lattice value weighted with its neighbours: corners 1/16, edges 1/8, centre 1/4.
    fn smoothed(&self, x: i32, z: i32) -> f32 {
        let l = |dx: i32, dz: i32| self.lattice(x.wrapping_add(dx), z.wrapping_add(dz));
        let corners = (l(-1, -1) + l(1, -1) + l(-1, 1) + l(1, 1)) / 16.0;
        let edges = (l(-1, 0) + l(1, 0) + l(0, -1) + l(0, 1)) / 8.0;
        let center = l(0, 0) / 4.0;
        corners + edges + center
    }

    /// Raw lattice value in `[-1, 1]`.
    fn lattice(&self, x: i32, z: i32) -> f32 {
        let h = lattice_hash(x, z, self.params.seed);
        (h as f32 / u32::MAX as f32) * 2.0 - 1.0
    }
}

/// Mix a lattice coordinate and seed into 32 well-distributed bits.
fn lattice_hash(x: i32, z: i32, seed: i32) -> u32 {
    let mut h = (x as u32)
        .wrapping_mul(0x27d4_eb2d)
        .wrapping_add((z as u32).wrapping_mul(0x1656_67b1))
        .wrapping_add((seed as u32).wrapping_mul(0x9e37_79b9));
    // murmur3 finalizer
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// Blend `a` to `b` along a half cosine wave.
fn cosine_interpolate(a: f32, b: f32, t: f32) -> f32 {
    let f = (1.0 - libm::cosf(t * PI)) * 0.5;
    a * (1.0 - f) + b * f
}
