//! Command-line argument parsing for Shoreline.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, WorldConfig, WorldPreset};

/// Shoreline command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "shoreline", about = "Low-poly island world generator")]
pub struct CliArgs {
    /// Start from a built-in preset instead of the configured world.
    #[arg(long, value_enum)]
    pub preset: Option<WorldPreset>,

    /// Grid cells along X.
    #[arg(long)]
    pub size_x: Option<u32>,

    /// Grid cells along Z.
    #[arg(long)]
    pub size_z: Option<u32>,

    /// Noise seed.
    #[arg(long, allow_negative_numbers = true)]
    pub seed: Option<i32>,

    /// Water plane height.
    #[arg(long, allow_negative_numbers = true)]
    pub water_level: Option<f32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Give up after this many frames.
    #[arg(long)]
    pub frames: Option<u64>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    ///
    /// A preset replaces the whole world section first; the individual
    /// flags then apply on top of it.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(preset) = args.preset {
            self.world = WorldConfig::preset(preset);
        }
        if let Some(x) = args.size_x {
            self.world.size_x = x;
        }
        if let Some(z) = args.size_z {
            self.world.size_z = z;
        }
        if let Some(seed) = args.seed {
            self.world.seed = Some(seed);
        }
        if let Some(level) = args.water_level {
            self.world.water_level = level;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            size_x: Some(64),
            seed: Some(9),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.world.size_x, 64);
        assert_eq!(config.world.seed, Some(9));
        // Non-overridden fields retain defaults
        assert_eq!(config.world.size_z, 256);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_preset_then_flags() {
        let mut config = Config::default();
        let args = CliArgs {
            preset: Some(WorldPreset::Small),
            size_x: Some(128),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.world.amplitude, 100.0);
        assert_eq!(config.world.size_x, 128);
        assert_eq!(config.world.size_z, 1000);
    }

    #[test]
    fn test_parse_from_args() {
        let args = CliArgs::parse_from([
            "shoreline",
            "--preset",
            "massive",
            "--seed",
            "-5",
            "--water-level",
            "-2.5",
        ]);
        assert_eq!(args.preset, Some(WorldPreset::Massive));
        assert_eq!(args.seed, Some(-5));
        assert_eq!(args.water_level, Some(-2.5));
    }
}
