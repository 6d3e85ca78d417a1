//! Generation and world errors.

use shoreline_config::ConfigError;
use shoreline_mesh::MeshError;
use shoreline_terrain::Cancelled;

/// How a background generation job ended without a result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("generation cancelled")]
    Cancelled,

    #[error("{worker} worker failed: {message}")]
    WorkerPanicked {
        worker: &'static str,
        message: String,
    },
}

impl From<Cancelled> for GenerationError {
    fn from(_: Cancelled) -> Self {
        GenerationError::Cancelled
    }
}

/// Errors that stop world creation.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("invalid world settings: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("mesh upload failed: {0}")]
    Mesh(#[from] MeshError),
}
