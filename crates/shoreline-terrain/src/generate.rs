//! The full off-thread terrain pass: heights, colors, vertices, indices.

use std::time::Instant;

use shoreline_mesh::TerrainVertex;

use crate::cancel::{CancelToken, Cancelled};
use crate::color::{ColorStep, build_color_grid};
use crate::heightmap::{HeightGrid, Peak, build_height_grid};
use crate::noise::{NoiseField, NoiseParams};
use crate::terrain_index::build_terrain_indices;
use crate::terrain_mesh::build_terrain_vertices;

/// Everything needed to generate one terrain.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainParams {
    pub size_x: u32,
    pub size_z: u32,
    pub noise: NoiseParams,
    /// Ascending by height, non-empty.
    pub color_steps: Vec<ColorStep>,
}

/// The finished arrays of a terrain pass, ready to upload.
#[derive(Debug, PartialEq)]
pub struct TerrainMeshData {
    pub heights: HeightGrid,
    pub peak: Peak,
    pub vertices: Vec<TerrainVertex>,
    pub indices: Vec<u32>,
}

/// Run the whole terrain pass.
///
/// Returns `Err(Cancelled)` as soon as any stage sees `cancel` tripped. The
/// intermediate color grid is dropped before returning.
pub fn generate_terrain(
    params: &TerrainParams,
    cancel: &CancelToken,
) -> Result<TerrainMeshData, Cancelled> {
    let start = Instant::now();
    let noise = NoiseField::new(params.noise);

    let (heights, peak) = build_height_grid(&noise, params.size_x, params.size_z, cancel)?;
    tracing::debug!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        peak_x = peak.x,
        peak_z = peak.z,
        peak_height = peak.height,
        "height grid built"
    );

    let colors = build_color_grid(&params.color_steps, &heights, cancel)?;
    let vertices = build_terrain_vertices(&heights, &colors, cancel)?;
    drop(colors);
    let indices = build_terrain_indices(params.size_x, params.size_z, cancel)?;

    tracing::info!(
        size_x = params.size_x,
        size_z = params.size_z,
        vertices = vertices.len(),
        indices = indices.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "terrain mesh generated"
    );

    Ok(TerrainMeshData {
        heights,
        peak,
        vertices,
        indices,
    })
}
