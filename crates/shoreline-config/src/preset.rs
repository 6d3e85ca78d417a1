//! Built-in world presets.

use serde::{Deserialize, Serialize};

use crate::config::{ColorStepConfig, WorldConfig};

/// A named parameter set tuned for a given world scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum WorldPreset {
    /// Gentle terrain for smaller worlds.
    Small,
    /// Tall terrain for massive worlds.
    Massive,
    /// Between the two.
    Medium,
}

impl WorldConfig {
    /// Build the parameter set for a preset.
    ///
    /// All presets share the same ten-band ramp (deep ocean, ocean, gravel,
    /// sand, two grasses, two grays, reddish peak, white peak); only the
    /// band heights scale with the amplitude.
    pub fn preset(preset: WorldPreset) -> Self {
        let (size, amplitude, num_octaves, roughness, heights) = match preset {
            WorldPreset::Small => (
                1000,
                100.0,
                7,
                0.5,
                [-100.0, -80.0, -10.0, 0.0, 2.0, 40.0, 50.0, 70.0, 85.0, 90.0],
            ),
            WorldPreset::Massive => (
                1000,
                500.0,
                9,
                0.5,
                [
                    -500.0, -420.0, -50.0, 0.0, 25.0, 140.0, 190.0, 250.0, 285.0, 300.0,
                ],
            ),
            WorldPreset::Medium => (
                1500,
                300.0,
                8,
                0.425,
                [
                    -300.0, -220.0, -50.0, 0.0, 15.0, 110.0, 175.0, 200.0, 225.0, 250.0,
                ],
            ),
        };

        const RAMP_COLORS: [[u8; 3]; 10] = [
            [50, 50, 130],
            [50, 50, 180],
            [100, 100, 110],
            [180, 175, 120],
            [80, 170, 120],
            [80, 190, 120],
            [100, 100, 100],
            [120, 120, 120],
            [220, 210, 200],
            [205, 235, 255],
        ];

        let color_steps = heights
            .iter()
            .zip(RAMP_COLORS)
            .map(|(&height, rgb)| ColorStepConfig::new(height, rgb))
            .collect();

        Self {
            size_x: size,
            size_z: size,
            water_level: 0.0,
            amplitude,
            num_octaves,
            roughness,
            seed: None,
            color_steps,
            initial_population: 100,
            food_count: 2_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_presets_validate() {
        for preset in [WorldPreset::Small, WorldPreset::Massive, WorldPreset::Medium] {
            let world = WorldConfig::preset(preset);
            assert!(
                world.validate().is_ok(),
                "Preset {preset:?} should be a valid world"
            );
        }
    }

    #[test]
    fn test_preset_ramp_spans_amplitude() {
        let world = WorldConfig::preset(WorldPreset::Massive);
        assert_eq!(world.color_steps.len(), 10);
        assert_eq!(world.color_steps[0].height, -world.amplitude);
        assert_eq!(world.color_steps[9].height, 300.0);
    }

    #[test]
    fn test_presets_leave_seed_unset() {
        assert_eq!(WorldConfig::preset(WorldPreset::Small).seed, None);
    }
}
