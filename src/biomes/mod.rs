//! Biome classification from normalized height and slope.
//!
//! Classification is a pure per-cell function: an ordered set of height bands
//! with a steep-slope override that turns mid-elevation cliffs into rock.

mod config;

pub use config::BiomeConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::terrain::Grid;

/// Surface classification of a terrain cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    Water,
    Sand,
    Grass,
    Forest,
    Rock,
    Snow,
}

impl Biome {
    /// All biomes in ascending elevation order.
    pub const ALL: [Biome; 6] = [
        Biome::Water,
        Biome::Sand,
        Biome::Grass,
        Biome::Forest,
        Biome::Rock,
        Biome::Snow,
    ];

    /// Stable position in [`Biome::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Biome::Water => "water",
            Biome::Sand => "sand",
            Biome::Grass => "grass",
            Biome::Forest => "forest",
            Biome::Rock => "rock",
            Biome::Snow => "snow",
        }
    }

    /// RGB preview color for this biome.
    pub fn preview_rgb(self) -> [u8; 3] {
        match self {
            Biome::Water => [65, 105, 225],
            Biome::Sand => [238, 214, 175],
            Biome::Grass => [34, 139, 34],
            Biome::Forest => [0, 100, 0],
            Biome::Rock => [139, 137, 137],
            Biome::Snow => [255, 250, 250],
        }
    }
}

/// Errors that can occur while classifying a grid.
#[derive(Error, Debug)]
pub enum BiomeError {
    #[error("Height grid is {0}x{1} but slope grid is {2}x{3}")]
    DimensionMismatch(u32, u32, u32, u32),
}

impl BiomeConfig {
    /// Classifies one cell.
    pub fn classify(&self, height: f32, slope: f32) -> Biome {
        // Steep ground between the shoreline and the snow line is bare rock.
        if height > self.water_max && height < self.rock_max && slope > self.cliff_slope {
            return Biome::Rock;
        }

        if height <= self.water_max {
            Biome::Water
        } else if height <= self.sand_max {
            Biome::Sand
        } else if height <= self.grass_max {
            Biome::Grass
        } else if height <= self.forest_max {
            Biome::Forest
        } else if height <= self.rock_max {
            Biome::Rock
        } else {
            Biome::Snow
        }
    }
}

/// Classifies one cell with the default thresholds.
pub fn classify(height: f32, slope: f32) -> Biome {
    BiomeConfig::DEFAULT.classify(height, slope)
}

/// Classifies every cell of a heightfield/slopefield pair.
pub fn classify_grid(
    heights: &Grid<f32>,
    slopes: &Grid<f32>,
    cfg: &BiomeConfig,
) -> Result<Grid<Biome>, BiomeError> {
    if !heights.same_shape(slopes) {
        return Err(BiomeError::DimensionMismatch(
            heights.width(),
            heights.height(),
            slopes.width(),
            slopes.height(),
        ));
    }

    let (h, s) = (heights.cells(), slopes.cells());
    Ok(Grid::par_from_fn(heights.width(), heights.height(), |x, y| {
        let i = x as usize * heights.height() as usize + y as usize;
        cfg.classify(h[i], s[i])
    }))
}
