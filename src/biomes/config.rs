//! Biome classification thresholds.

use serde::{Deserialize, Serialize};

/// Height bands and the steep-slope override used by the classifier.
///
/// Heights and slopes are normalized to [0, 1]. Each band is upper-inclusive:
/// a height equal to `water_max` is still water.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeConfig {
    /// Heights at or below this are water.
    pub water_max: f32,
    /// Upper bound of the beach band.
    pub sand_max: f32,
    /// Upper bound of the grassland band.
    pub grass_max: f32,
    /// Upper bound of the forest band.
    pub forest_max: f32,
    /// Upper bound of the bare rock band; anything higher is snow.
    pub rock_max: f32,
    /// Slopes above this turn land strictly between `water_max` and
    /// `rock_max` into rock.
    pub cliff_slope: f32,
}

impl BiomeConfig {
    pub const DEFAULT: BiomeConfig = BiomeConfig {
        water_max: 0.2,
        sand_max: 0.225,
        grass_max: 0.45,
        forest_max: 0.85,
        rock_max: 0.9,
        cliff_slope: 0.45,
    };
}

impl Default for BiomeConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
