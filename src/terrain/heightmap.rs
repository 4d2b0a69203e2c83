//! Heightmap generation using fractal noise.

use log::debug;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use crate::config::{validate_dimensions, ConfigError};
use crate::noise::NoiseSampler;

/// A normalized heightfield together with the raw noise range it was scaled from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heightmap {
    /// Normalized heights in [0, 1].
    pub heights: Grid<f32>,
    /// Smallest raw noise value observed.
    pub raw_min: f32,
    /// Largest raw noise value observed.
    pub raw_max: f32,
}

/// Rescales `grid` from `[min, max]` to [0, 1] and applies `exponent` as a curve.
///
/// Exponents above 1 push low values toward 0 (flatter lowlands) and
/// sharpen peaks. Results are clamped to [0, 1]. When `max` is not greater
/// than `min` the field carries no variation and every cell becomes 0.
pub fn normalize(grid: &Grid<f32>, min: f32, max: f32, exponent: f32) -> Grid<f32> {
    let range = max - min;
    if !(range > 0.0) || !range.is_finite() {
        return Grid::filled(grid.width(), grid.height(), 0.0);
    }
    grid.par_map(|&raw| (((raw - min) / range).powf(exponent)).clamp(0.0, 1.0))
}

/// Two-phase normalization: reduce to `(min, max)`, then map every cell.
///
/// Returns the normalized grid and the observed range. An empty grid yields
/// an empty grid and a `(0, 0)` range.
pub fn normalize_by_range(grid: &Grid<f32>, exponent: f32) -> (Grid<f32>, f32, f32) {
    let (min, max) = grid.value_range().unwrap_or((0.0, 0.0));
    (normalize(grid, min, max, exponent), min, max)
}

/// Builds heightmaps by sampling a [`NoiseSampler`] at every grid cell.
pub struct HeightmapGenerator<S> {
    sampler: S,
    width: u32,
    height: u32,
    exponent: f32,
}

impl<S: NoiseSampler> HeightmapGenerator<S> {
    pub fn new(sampler: S, width: u32, height: u32, exponent: f32) -> Self {
        Self {
            sampler,
            width,
            height,
            exponent,
        }
    }

    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    /// Samples the raw, unnormalized noise field. Cells are sampled in parallel.
    pub fn sample_raw(&self, seed: i32) -> Grid<f32> {
        Grid::par_from_fn(self.width, self.height, |x, y| {
            self.sampler.sample(x as f32, y as f32, seed)
        })
    }

    /// Generates a normalized heightmap for `seed`.
    ///
    /// Dimensions are checked before any sampling takes place.
    pub fn generate(&self, seed: i32) -> Result<Heightmap, ConfigError> {
        validate_dimensions(self.width, self.height)?;

        let raw = self.sample_raw(seed);
        let (heights, raw_min, raw_max) = normalize_by_range(&raw, self.exponent);
        debug!(
            "heightmap {}x{} seed={} raw range [{:.4}, {:.4}]",
            self.width, self.height, seed, raw_min, raw_max
        );

        Ok(Heightmap {
            heights,
            raw_min,
            raw_max,
        })
    }
}
