//! An uploaded water surface and its wave animation clock.

use shoreline_mesh::{MeshBackend, MeshError, MeshHandle};

/// Animation time added per rendered frame.
pub const WAVE_SPEED: f32 = 0.002;

/// The uploaded water surface.
#[derive(Debug)]
pub struct WaterTile {
    mesh: MeshHandle,
    vertex_count: u32,
    y: f32,
    anim_time: f32,
}

impl WaterTile {
    pub fn new(mesh: MeshHandle, vertex_count: u32, y: f32) -> Self {
        Self {
            mesh,
            vertex_count,
            y,
            anim_time: 0.0,
        }
    }

    pub fn mesh(&self) -> MeshHandle {
        self.mesh
    }

    /// Water level.
    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Wave clock fed to the water shader.
    pub fn anim_time(&self) -> f32 {
        self.anim_time
    }

    pub fn set_anim_time(&mut self, anim_time: f32) {
        self.anim_time = anim_time;
    }

    /// Step the wave clock by one frame.
    pub fn advance(&mut self) {
        self.anim_time += WAVE_SPEED;
    }

    /// Draw the emitted triangles.
    pub fn render(&self, backend: &mut dyn MeshBackend) -> Result<(), MeshError> {
        backend.render_unindexed(self.mesh, self.vertex_count)
    }

    pub fn delete(self, backend: &mut dyn MeshBackend) -> Result<(), MeshError> {
        tracing::debug!(mesh = %self.mesh, "releasing water tile");
        backend.delete(self.mesh)
    }
}

#[cfg(test)]
mod tests {
    use shoreline_mesh::{DrawRecord, HeadlessBackend, MeshData, WaterVertex};

    use super::*;

    fn tile(backend: &mut HeadlessBackend) -> WaterTile {
        let vertices = [
            WaterVertex::new(0, 0, [0, 1], [1, 0]),
            WaterVertex::new(0, 1, [1, -1], [0, -1]),
            WaterVertex::new(1, 0, [-1, 0], [-1, 1]),
        ];
        let handle = backend
            .create_mesh("water", MeshData::unindexed(&vertices))
            .unwrap();
        WaterTile::new(handle, 3, -2.5)
    }

    #[test]
    fn test_anim_time_advances_per_frame() {
        let mut backend = HeadlessBackend::new();
        let mut water = tile(&mut backend);
        assert_eq!(water.anim_time(), 0.0);
        for _ in 0..10 {
            water.advance();
        }
        assert!((water.anim_time() - 10.0 * WAVE_SPEED).abs() < 1e-6);
        water.set_anim_time(0.5);
        assert_eq!(water.anim_time(), 0.5);
        assert_eq!(water.y(), -2.5);
    }

    #[test]
    fn test_render_draws_emitted_prefix() {
        let mut backend = HeadlessBackend::new();
        let water = tile(&mut backend);
        water.render(&mut backend).unwrap();
        assert_eq!(
            backend.draws(),
            &[DrawRecord::Unindexed {
                handle: water.mesh(),
                vertex_count: 3
            }]
        );
        water.delete(&mut backend).unwrap();
        assert_eq!(backend.live_count(), 0);
    }
}
