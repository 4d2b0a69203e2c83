//! Slope analysis over a normalized heightfield.
//!
//! Slope at a cell is the mean absolute height difference to its Moore
//! neighbors, normalized over the whole grid to [0, 1].

use log::debug;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::heightmap::normalize_by_range;
use crate::geometry::neighbor_8;

/// Divisor used when averaging neighbor differences at a fully interior cell.
pub const MOORE_NEIGHBOR_COUNT: f32 = 8.0;

/// How the summed neighbor differences are averaged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlopeDivisor {
    /// Always divide by 8, even at edges and corners where fewer neighbors
    /// exist. Border cells therefore read flatter than interior cells with
    /// the same local relief.
    #[default]
    Fixed,
    /// Divide by the number of neighbors that actually exist.
    NeighborCount,
}

/// Derives slope fields from heightfields.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlopeAnalyzer {
    divisor: SlopeDivisor,
}

impl SlopeAnalyzer {
    pub fn new(divisor: SlopeDivisor) -> Self {
        Self { divisor }
    }

    pub fn divisor(&self) -> SlopeDivisor {
        self.divisor
    }

    /// Raw (unnormalized) slope at a single cell, or `None` if `(x, y)` is off the grid.
    pub fn slope_at(&self, heights: &Grid<f32>, x: u32, y: u32) -> Option<f32> {
        let center = *heights.get(x, y)?;
        let (width, height) = heights.dimensions();

        let mut sum = 0.0f32;
        let mut count = 0u32;
        for (nx, ny) in neighbor_8(width, height, x, y) {
            if let Some(&h) = heights.get(nx, ny) {
                sum += (center - h).abs();
                count += 1;
            }
        }

        let divisor = match self.divisor {
            SlopeDivisor::Fixed => MOORE_NEIGHBOR_COUNT,
            SlopeDivisor::NeighborCount => count.max(1) as f32,
        };
        Some(sum / divisor)
    }

    /// Raw slope grid, before normalization.
    pub fn raw_slopes(&self, heights: &Grid<f32>) -> Grid<f32> {
        Grid::par_from_fn(heights.width(), heights.height(), |x, y| {
            self.slope_at(heights, x, y).unwrap_or(0.0)
        })
    }

    /// Normalized slope grid in [0, 1] (linear rescale by the raw min/max).
    pub fn generate(&self, heights: &Grid<f32>) -> Grid<f32> {
        let raw = self.raw_slopes(heights);
        let (slopes, min, max) = normalize_by_range(&raw, 1.0);
        debug!("slope raw range [{:.5}, {:.5}] ({:?} divisor)", min, max, self.divisor);
        slopes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3x3 grid with a single raised center cell.
    fn spike() -> Grid<f32> {
        let mut grid = Grid::filled(3, 3, 0.0f32);
        grid.set(1, 1, 1.0);
        grid
    }

    #[test]
    fn test_interior_cell_uses_all_neighbors() {
        let analyzer = SlopeAnalyzer::default();
        assert_eq!(analyzer.slope_at(&spike(), 1, 1), Some(1.0));
    }

    #[test]
    fn test_border_cells_keep_fixed_divisor() {
        // A corner sees 3 neighbors and an edge cell 5, but the divisor stays 8.
        let analyzer = SlopeAnalyzer::new(SlopeDivisor::Fixed);
        let grid = spike();
        assert_eq!(analyzer.slope_at(&grid, 0, 0), Some(1.0 / 8.0));
        assert_eq!(analyzer.slope_at(&grid, 1, 0), Some(1.0 / 8.0));
        assert_eq!(analyzer.slope_at(&grid, 2, 2), Some(1.0 / 8.0));
    }

    #[test]
    fn test_neighbor_count_divisor_variant() {
        let analyzer = SlopeAnalyzer::new(SlopeDivisor::NeighborCount);
        let grid = spike();
        assert_eq!(analyzer.slope_at(&grid, 0, 0), Some(1.0 / 3.0));
        assert_eq!(analyzer.slope_at(&grid, 1, 0), Some(1.0 / 5.0));
        assert_eq!(analyzer.slope_at(&grid, 1, 1), Some(1.0));
    }

    #[test]
    fn test_uniform_tilt_reads_flatter_at_edges() {
        // A constant ramp has identical local relief everywhere, yet the fixed
        // divisor gives border cells a smaller raw slope.
        let grid = Grid::from_fn(6, 6, |x, _| x as f32 * 0.1);
        let raw = SlopeAnalyzer::default().raw_slopes(&grid);
        let interior = *raw.get(3, 3).unwrap();
        let edge = *raw.get(3, 0).unwrap();
        let corner = *raw.get(0, 0).unwrap();
        assert!(edge < interior);
        assert!(corner < edge);
    }

    #[test]
    fn test_out_of_bounds_cell() {
        assert_eq!(SlopeAnalyzer::default().slope_at(&spike(), 3, 0), None);
    }

    #[test]
    fn test_generate_normalizes() {
        let grid = Grid::from_fn(8, 8, |x, y| ((x * y) as f32 * 0.3).sin() * 0.5 + 0.5);
        let slopes = SlopeAnalyzer::default().generate(&grid);
        assert_eq!(slopes.dimensions(), (8, 8));
        assert!(slopes.cells().iter().all(|&s| (0.0..=1.0).contains(&s)));
        assert!(slopes.cells().iter().any(|&s| s == 1.0));
        assert!(slopes.cells().iter().any(|&s| s == 0.0));
    }

    #[test]
    fn test_flat_field_has_zero_slope() {
        let slopes = SlopeAnalyzer::default().generate(&Grid::filled(4, 4, 0.0));
        assert!(slopes.cells().iter().all(|&s| s == 0.0));
    }
}
