//! The animated water plane.
//!
//! Water is a flat grid at a fixed level, trimmed to the cells the terrain
//! does not completely cover. Its vertices carry offsets to their triangle
//! mates instead of normals so the vertex stage can animate whole faces.

mod water_mesh;
mod water_tile;

pub use water_mesh::{WaterMeshData, build_water_mesh, water_vertex_capacity};
pub use water_tile::{WAVE_SPEED, WaterTile};
