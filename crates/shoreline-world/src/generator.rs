//! The world creation state machine.
//!
//! Polled once per frame from the thread that owns the graphics context.
//! Heavy work runs on one background thread at a time; each poll either finds
//! the current job still running or consumes its result, uploads the mesh, and
//! moves on. Meshes are only ever created on the polling thread.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shoreline_config::WorldConfig;
use shoreline_mesh::{MeshBackend, MeshData};
use shoreline_terrain::{
    ColorStep, NoiseParams, Peak, Rgb, TerrainMeshData, TerrainParams, TerrainTile,
    generate_terrain,
};
use shoreline_water::{WaterMeshData, WaterTile, build_water_mesh};

use crate::error::WorldError;
use crate::job::BackgroundJob;
use crate::population::spawn_population;
use crate::world::World;

/// Where world creation currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    TerrainInit,
    TerrainWait,
    WaterInit,
    WaterWait,
    SpawnPopulation,
    Finish,
    /// The world has been handed off.
    Done,
    Cancelled,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::TerrainInit => "terrain init",
            Stage::TerrainWait => "terrain wait",
            Stage::WaterInit => "water init",
            Stage::WaterWait => "water wait",
            Stage::SpawnPopulation => "spawn population",
            Stage::Finish => "finish",
            Stage::Done => "done",
            Stage::Cancelled => "cancelled",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome of one [`WorldGenerator::poll`].
#[derive(Debug)]
pub enum GenerationProgress {
    /// Still going; now at this stage.
    Working(Stage),
    /// The finished world. Returned exactly once.
    Finished(World),
    /// Nothing left to do: already finished, cancelled, or failed.
    Stopped(Stage),
}

enum State {
    TerrainInit,
    TerrainWait {
        job: BackgroundJob<TerrainMeshData>,
    },
    WaterInit {
        terrain: TerrainTile,
        peak: Peak,
    },
    WaterWait {
        terrain: TerrainTile,
        peak: Peak,
        job: BackgroundJob<WaterMeshData>,
    },
    SpawnPopulation {
        terrain: TerrainTile,
        peak: Peak,
        water: WaterTile,
    },
    Finish {
        world: World,
    },
    Done,
    Cancelled,
    Failed,
}

impl State {
    fn stage(&self) -> Stage {
        match self {
            State::TerrainInit => Stage::TerrainInit,
            State::TerrainWait { .. } => Stage::TerrainWait,
            State::WaterInit { .. } => Stage::WaterInit,
            State::WaterWait { .. } => Stage::WaterWait,
            State::SpawnPopulation { .. } => Stage::SpawnPopulation,
            State::Finish { .. } => Stage::Finish,
            State::Done => Stage::Done,
            State::Cancelled => Stage::Cancelled,
            State::Failed => Stage::Failed,
        }
    }

    /// Stop any running job and delete every mesh this state holds.
    fn release(self, backend: &mut dyn MeshBackend) {
        match self {
            State::TerrainWait { job } => job.cancel(),
            State::WaterInit { terrain, .. } => release_terrain(terrain, backend),
            State::WaterWait { terrain, job, .. } => {
                job.cancel();
                release_terrain(terrain, backend);
            }
            State::SpawnPopulation { terrain, water, .. } => {
                release_terrain(terrain, backend);
                release_water(water, backend);
            }
            State::Finish { world } => {
                release_terrain(world.terrain, backend);
                release_water(world.water, backend);
            }
            State::TerrainInit | State::Done | State::Cancelled | State::Failed => {}
        }
    }

    fn holds_meshes(&self) -> bool {
        matches!(
            self,
            State::WaterInit { .. }
                | State::WaterWait { .. }
                | State::SpawnPopulation { .. }
                | State::Finish { .. }
        )
    }
}

fn release_terrain(terrain: TerrainTile, backend: &mut dyn MeshBackend) {
    if let Err(e) = terrain.delete(backend) {
        tracing::warn!("Failed to release terrain mesh: {e}");
    }
}

fn release_water(water: WaterTile, backend: &mut dyn MeshBackend) {
    if let Err(e) = water.delete(backend) {
        tracing::warn!("Failed to release water mesh: {e}");
    }
}

/// Terrain pass parameters for a world config and resolved seed.
pub fn terrain_params(config: &WorldConfig, seed: i32) -> TerrainParams {
    TerrainParams {
        size_x: config.size_x,
        size_z: config.size_z,
        noise: NoiseParams {
            seed,
            amplitude: config.amplitude,
            num_octaves: config.num_octaves,
            roughness: config.roughness,
        },
        color_steps: config
            .color_steps
            .iter()
            .map(|step| {
                let [r, g, b] = step.rgb_f32();
                ColorStep::new(step.height, Rgb::new(r, g, b))
            })
            .collect(),
    }
}

/// Builds a [`World`] a little at a time.
///
/// Call [`poll`](Self::poll) once per frame until it returns
/// [`GenerationProgress::Finished`]. Dropping the generator stops its worker,
/// but meshes can only be released through [`cancel`](Self::cancel), which
/// has the backend.
pub struct WorldGenerator {
    config: WorldConfig,
    seed: i32,
    state: State,
    started: Instant,
}

impl WorldGenerator {
    pub fn new(config: WorldConfig) -> Result<Self, WorldError> {
        config.validate()?;
        let seed = config.resolved_seed();
        tracing::info!(
            size_x = config.size_x,
            size_z = config.size_z,
            seed,
            "Starting world generation"
        );
        Ok(Self {
            config,
            seed,
            state: State::TerrainInit,
            started: Instant::now(),
        })
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn stage(&self) -> Stage {
        self.state.stage()
    }

    /// Advance by at most one stage. Never blocks on a worker.
    ///
    /// On error every mesh created so far is released and the generator
    /// stops.
    pub fn poll(&mut self, backend: &mut dyn MeshBackend) -> Result<GenerationProgress, WorldError> {
        let state = std::mem::replace(&mut self.state, State::Failed);
        let before = state.stage();

        if let State::Finish { world } = state {
            tracing::info!(
                elapsed_ms = self.started.elapsed().as_millis() as u64,
                "World generation finished"
            );
            self.state = State::Done;
            return Ok(GenerationProgress::Finished(world));
        }
        if matches!(state, State::Done | State::Cancelled | State::Failed) {
            self.state = state;
            return Ok(GenerationProgress::Stopped(before));
        }

        match self.step(state, backend) {
            Ok(next) => {
                let stage = next.stage();
                if stage != before {
                    tracing::info!(from = %before, to = %stage, "World generation stage");
                }
                self.state = next;
                Ok(GenerationProgress::Working(stage))
            }
            Err(e) => {
                tracing::error!(stage = %before, "World generation failed: {e}");
                Err(e)
            }
        }
    }

    /// Stop generation and release everything created so far.
    pub fn cancel(&mut self, backend: &mut dyn MeshBackend) {
        let state = std::mem::replace(&mut self.state, State::Cancelled);
        match state {
            State::Done | State::Failed => self.state = state,
            state => {
                tracing::warn!(stage = %state.stage(), "World generation cancelled");
                state.release(backend);
            }
        }
    }

    fn step(&self, state: State, backend: &mut dyn MeshBackend) -> Result<State, WorldError> {
        match state {
            State::TerrainInit => {
                let params = terrain_params(&self.config, self.seed);
                let job = BackgroundJob::spawn("terrain-gen", move |cancel| {
                    generate_terrain(&params, cancel)
                });
                Ok(State::TerrainWait { job })
            }

            State::TerrainWait { mut job } => {
                let Some(outcome) = job.poll() else {
                    return Ok(State::TerrainWait { job });
                };
                let data = outcome?;
                let mesh = backend.create_mesh(
                    "terrain",
                    MeshData::indexed(&data.vertices, &data.indices),
                )?;
                tracing::info!(
                    peak_x = data.peak.x,
                    peak_z = data.peak.z,
                    peak_height = data.peak.height,
                    "Terrain ready"
                );
                Ok(State::WaterInit {
                    terrain: TerrainTile::new(mesh, Arc::new(data.heights)),
                    peak: data.peak,
                })
            }

            State::WaterInit { terrain, peak } => {
                let heights = Arc::clone(terrain.heights());
                let (size_x, size_z) = (terrain.size_x(), terrain.size_z());
                let level = self.config.water_level;
                let job = BackgroundJob::spawn("water-gen", move |cancel| {
                    build_water_mesh(heights.as_ref(), size_x, size_z, level, cancel)
                });
                Ok(State::WaterWait { terrain, peak, job })
            }

            State::WaterWait {
                terrain,
                peak,
                mut job,
            } => {
                let Some(outcome) = job.poll() else {
                    return Ok(State::WaterWait { terrain, peak, job });
                };
                let uploaded = outcome.map_err(WorldError::from).and_then(|data| {
                    let mesh = backend.create_mesh("water", MeshData::unindexed(&data.vertices))?;
                    Ok(WaterTile::new(mesh, data.vertex_count(), data.level))
                });
                match uploaded {
                    Ok(water) => {
                        tracing::info!(vertices = water.vertex_count(), "Water ready");
                        Ok(State::SpawnPopulation {
                            terrain,
                            peak,
                            water,
                        })
                    }
                    Err(e) => {
                        release_terrain(terrain, backend);
                        Err(e)
                    }
                }
            }

            State::SpawnPopulation {
                terrain,
                peak,
                water,
            } => {
                let mut rng = ChaCha8Rng::seed_from_u64(self.seed as i64 as u64);
                let entities = spawn_population(
                    &terrain,
                    terrain.size_x(),
                    terrain.size_z(),
                    &mut rng,
                    self.config.initial_population,
                    self.config.food_count,
                );
                tracing::info!(entities = entities.len(), "Population spawned");
                Ok(State::Finish {
                    world: World {
                        terrain,
                        water,
                        peak,
                        seed: self.seed,
                        entities,
                    },
                })
            }

            done @ (State::Finish { .. } | State::Done | State::Cancelled | State::Failed) => Ok(done),
        }
    }
}

impl Drop for WorldGenerator {
    fn drop(&mut self) {
        if self.state.holds_meshes() {
            tracing::warn!(
                stage = %self.state.stage(),
                "World generator dropped while holding meshes; cancel it to release them"
            );
        }
    }
}
