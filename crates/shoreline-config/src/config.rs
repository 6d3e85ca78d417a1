//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::preset::WorldPreset;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World creation parameters.
    pub world: WorldConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// One entry of the height-to-color ramp.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ColorStepConfig {
    /// Height threshold at which this color is reached exactly.
    pub height: f32,
    /// 8-bit sRGB color.
    pub rgb: [u8; 3],
}

impl ColorStepConfig {
    pub const fn new(height: f32, rgb: [u8; 3]) -> Self {
        Self { height, rgb }
    }

    /// Color as normalized floats in `[0, 1]`.
    pub fn rgb_f32(&self) -> [f32; 3] {
        [
            self.rgb[0] as f32 / 255.0,
            self.rgb[1] as f32 / 255.0,
            self.rgb[2] as f32 / 255.0,
        ]
    }
}

/// Parameters that fully determine a generated world.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of grid cells along X.
    pub size_x: u32,
    /// Number of grid cells along Z.
    pub size_z: u32,
    /// Height of the water plane.
    pub water_level: f32,
    /// Amplitude of the lowest-frequency octave.
    pub amplitude: f32,
    /// Number of noise octaves. Too many smooth the result and slow generation.
    pub num_octaves: u32,
    /// Amplitude falloff per octave, in `(0, 1]`. Higher is rougher.
    pub roughness: f32,
    /// Noise seed. `None` derives one from the clock at creation time.
    pub seed: Option<i32>,
    /// Height-to-color ramp, ascending by height.
    pub color_steps: Vec<ColorStepConfig>,
    /// Number of creatures placed once the world exists.
    pub initial_population: u32,
    /// Number of food items placed once the world exists.
    pub food_count: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size_x: 256,
            size_z: 256,
            ..WorldConfig::preset(WorldPreset::Medium)
        }
    }
}

/// Upper bound on noise octaves. Past this the finest octaves fall below
/// one grid cell and only add cost.
pub const MAX_OCTAVES: u32 = 32;

impl WorldConfig {
    /// The configured seed, or one derived from the current time.
    pub fn resolved_seed(&self) -> i32 {
        self.seed.unwrap_or_else(|| {
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or_default();
            (nanos as u64 ^ (nanos >> 64) as u64) as i32
        })
    }

    /// Check the parameters a generator cannot work without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size_x == 0 || self.size_z == 0 {
            return Err(ConfigError::InvalidWorld(format!(
                "world size must be positive, got {}x{}",
                self.size_x, self.size_z
            )));
        }
        if self.num_octaves == 0 || self.num_octaves > MAX_OCTAVES {
            return Err(ConfigError::InvalidWorld(format!(
                "noise octaves must lie in 1..={MAX_OCTAVES}, got {}",
                self.num_octaves
            )));
        }
        if !(self.amplitude > 0.0 && self.amplitude.is_finite()) {
            return Err(ConfigError::InvalidWorld(format!(
                "amplitude must be positive, got {}",
                self.amplitude
            )));
        }
        if !(self.roughness > 0.0 && self.roughness <= 1.0) {
            return Err(ConfigError::InvalidWorld(format!(
                "roughness must lie in (0, 1], got {}",
                self.roughness
            )));
        }
        if self.color_steps.is_empty() {
            return Err(ConfigError::InvalidWorld(
                "color ramp needs at least one step".to_string(),
            ));
        }
        if self
            .color_steps
            .windows(2)
            .any(|pair| pair[0].height >= pair[1].height)
        {
            return Err(ConfigError::InvalidWorld(
                "color ramp heights must be strictly ascending".to_string(),
            ));
        }
        Ok(())
    }
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write a JSON log file next to the config in debug builds.
    pub log_to_file: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: true,
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Platform config directory for Shoreline, if the platform has one.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("shoreline"))
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::WriteError {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(false)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::WriteError {
            path: config_path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join("config.ron"))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("size_x: 256"));
        assert!(ron_str.contains("log_level: \"info\""));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(world: (size_x: 64, size_z: 32))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.debug, DebugConfig::default());
        assert_eq!(config.world.size_x, 64);
        assert_eq!(config.world.size_z, 32);
        assert_eq!(config.world.num_octaves, WorldConfig::default().num_octaves);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.world.size_x = 500;
        config.world.seed = Some(1234);
        config.debug.log_level = "debug".to_string();

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.world.water_level = 12.5;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().world.water_level, 12.5);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_reload_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::default().reload(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
        assert!(err.to_string().contains("config.ron"));
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_world_is_valid() {
        assert!(WorldConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_size() {
        let world = WorldConfig {
            size_z: 0,
            ..Default::default()
        };
        assert!(matches!(
            world.validate(),
            Err(ConfigError::InvalidWorld(_))
        ));
    }

    #[test]
    fn test_validate_octave_bounds() {
        let too_many = WorldConfig {
            num_octaves: 130,
            ..Default::default()
        };
        assert!(matches!(
            too_many.validate(),
            Err(ConfigError::InvalidWorld(_))
        ));

        let none = WorldConfig {
            num_octaves: 0,
            ..Default::default()
        };
        assert!(none.validate().is_err());

        let max = WorldConfig {
            num_octaves: MAX_OCTAVES,
            ..Default::default()
        };
        assert!(max.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_amplitude() {
        for amplitude in [-5.0, 0.0, f32::NAN] {
            let world = WorldConfig {
                amplitude,
                ..Default::default()
            };
            assert!(
                matches!(world.validate(), Err(ConfigError::InvalidWorld(_))),
                "amplitude {amplitude} accepted"
            );
        }
    }

    #[test]
    fn test_validate_rejects_unsorted_ramp() {
        let world = WorldConfig {
            color_steps: vec![
                ColorStepConfig::new(10.0, [0, 0, 0]),
                ColorStepConfig::new(5.0, [255, 255, 255]),
            ],
            ..Default::default()
        };
        assert!(world.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_ramp() {
        let world = WorldConfig {
            color_steps: Vec::new(),
            ..Default::default()
        };
        assert!(world.validate().is_err());
    }

    #[test]
    fn test_explicit_seed_is_kept() {
        let world = WorldConfig {
            seed: Some(-77),
            ..Default::default()
        };
        assert_eq!(world.resolved_seed(), -77);
    }

    #[test]
    fn test_rgb_f32_normalizes() {
        let step = ColorStepConfig::new(0.0, [255, 0, 51]);
        assert_eq!(step.rgb_f32(), [1.0, 0.0, 0.2]);
    }
}
