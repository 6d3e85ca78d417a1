//! World creation: runs the terrain and water passes on background threads,
//! uploads their meshes from the polling thread, and spawns the initial
//! population.

mod error;
mod generator;
mod job;
mod population;
mod world;

pub use error::{GenerationError, WorldError};
pub use generator::{GenerationProgress, Stage, WorldGenerator, terrain_params};
pub use job::BackgroundJob;
pub use population::{Creature, Entity, Food, spawn_population};
pub use world::World;
