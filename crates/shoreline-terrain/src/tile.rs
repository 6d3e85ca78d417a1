//! The live terrain: its uploaded mesh and the heights it was built from.

use std::sync::Arc;

use shoreline_mesh::{MeshBackend, MeshError, MeshHandle};

use crate::heightmap::{HeightGrid, HeightQuery};

/// An uploaded terrain mesh paired with the exact heights behind it.
///
/// Height queries read the same grid the mesh was built from, so rendered
/// geometry and queried height agree at every grid point.
#[derive(Debug)]
pub struct TerrainTile {
    mesh: MeshHandle,
    heights: Arc<HeightGrid>,
}

impl TerrainTile {
    pub fn new(mesh: MeshHandle, heights: Arc<HeightGrid>) -> Self {
        Self { mesh, heights }
    }

    pub fn mesh(&self) -> MeshHandle {
        self.mesh
    }

    /// Shared handle to the height grid, for off-thread queries.
    pub fn heights(&self) -> &Arc<HeightGrid> {
        &self.heights
    }

    pub fn size_x(&self) -> u32 {
        self.heights.size_x()
    }

    pub fn size_z(&self) -> u32 {
        self.heights.size_z()
    }

    /// Surface height at a world position, or `fallback` off the terrain.
    pub fn height_at(&self, x: f32, z: f32, fallback: f32) -> f32 {
        self.heights.height_at(x, z, fallback)
    }

    pub fn render(&self, backend: &mut dyn MeshBackend) -> Result<(), MeshError> {
        backend.render(self.mesh)
    }

    /// Release the mesh.
    pub fn delete(self, backend: &mut dyn MeshBackend) -> Result<(), MeshError> {
        tracing::debug!(mesh = %self.mesh, "releasing terrain tile");
        backend.delete(self.mesh)
    }
}

impl HeightQuery for TerrainTile {
    fn height_at(&self, x: f32, z: f32, fallback: f32) -> f32 {
        TerrainTile::height_at(self, x, z, fallback)
    }
}

#[cfg(test)]
mod tests {
    use shoreline_mesh::{DrawRecord, HeadlessBackend, MeshData, TerrainVertex};

    use super::*;

    fn tile(backend: &mut HeadlessBackend) -> TerrainTile {
        let vertices = [TerrainVertex {
            position: [0.0; 3],
            normal: [0.0, 1.0, 0.0],
            color: [1.0; 3],
        }; 3];
        let handle = backend
            .create_mesh("terrain", MeshData::indexed(&vertices, &[0, 1, 2]))
            .unwrap();
        let heights = HeightGrid::from_samples(1, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        TerrainTile::new(handle, Arc::new(heights))
    }

    #[test]
    fn test_sizes_and_query() {
        let mut backend = HeadlessBackend::new();
        let tile = tile(&mut backend);
        assert_eq!(tile.size_x(), 1);
        assert_eq!(tile.size_z(), 2);
        assert_eq!(tile.height_at(1.0, 2.0, 0.0), 6.0);
        assert_eq!(tile.height_at(1.5, 0.0, -1.0), -1.0);
    }

    #[test]
    fn test_render_and_delete() {
        let mut backend = HeadlessBackend::new();
        let tile = tile(&mut backend);
        let handle = tile.mesh();
        tile.render(&mut backend).unwrap();
        assert_eq!(
            backend.draws(),
            &[DrawRecord::Indexed {
                handle,
                index_count: 3
            }]
        );
        tile.delete(&mut backend).unwrap();
        assert_eq!(backend.live_count(), 0);
    }
}
