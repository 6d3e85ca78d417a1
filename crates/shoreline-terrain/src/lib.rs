//! Procedural land surface: value-noise heights, height-to-color ramp, and the
//! faceted low-poly terrain mesh with its runtime height query.
//!
//! Every long-running loop takes a [`CancelToken`] and unwinds with
//! [`Cancelled`] when it is tripped.

mod cancel;
mod color;
mod generate;
mod heightmap;
mod noise;
mod quad;
mod terrain_index;
mod terrain_mesh;
mod tile;

pub use cancel::{CancelToken, Cancelled};
pub use color::{ColorGrid, ColorStep, Rgb, build_color_grid, calc_color};
pub use generate::{TerrainMeshData, TerrainParams, generate_terrain};
pub use heightmap::{HeightGrid, HeightQuery, Peak, build_height_grid};
pub use noise::{NoiseField, NoiseParams};
pub use quad::{Corner, is_right_handed, left_triangle, right_triangle};
pub use terrain_index::{build_terrain_indices, terrain_index_count};
pub use terrain_mesh::{build_terrain_vertices, terrain_vertex_count};
pub use tile::TerrainTile;
