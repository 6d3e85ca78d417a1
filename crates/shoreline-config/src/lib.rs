//! Configuration system for Shoreline.
//!
//! World creation parameters and runtime settings persist to disk as RON
//! files. Supports CLI overrides via clap, hot-reload detection, and built-in
//! world presets.

mod cli;
mod config;
mod error;
mod preset;

pub use cli::CliArgs;
pub use config::{ColorStepConfig, Config, DebugConfig, MAX_OCTAVES, WorldConfig};
pub use error::ConfigError;
pub use preset::WorldPreset;
