//! The finished world handed back by the generator.

use shoreline_mesh::{MeshBackend, MeshError};
use shoreline_terrain::{Peak, TerrainTile};
use shoreline_water::WaterTile;

use crate::population::Entity;

/// A finished world, handed off once by the generator.
#[derive(Debug)]
pub struct World {
    pub terrain: TerrainTile,
    pub water: WaterTile,
    pub peak: Peak,
    pub seed: i32,
    pub entities: Vec<Entity>,
}

impl World {
    /// Draw terrain then water, and step the wave clock.
    pub fn render(&mut self, backend: &mut dyn MeshBackend) -> Result<(), MeshError> {
        self.terrain.render(backend)?;
        self.water.advance();
        self.water.render(backend)
    }

    pub fn creature_count(&self) -> usize {
        self.entities
            .iter()
            .filter(|e| matches!(e, Entity::Creature(_)))
            .count()
    }

    pub fn food_count(&self) -> usize {
        self.entities
            .iter()
            .filter(|e| matches!(e, Entity::Food(_)))
            .count()
    }

    /// Delete both meshes. Both deletes are attempted even if the first fails.
    pub fn release(self, backend: &mut dyn MeshBackend) -> Result<(), MeshError> {
        let terrain = self.terrain.delete(backend);
        let water = self.water.delete(backend);
        terrain.and(water)
    }
}
