//! Terrain generation module.
//!
//! Provides the grid abstraction, heightmap generation and slope analysis,
//! plus the [`Terrain`] bundle that pipeline stages populate.

mod grid;
mod heightmap;
mod slope;

use serde::{Deserialize, Serialize};

use crate::biomes::Biome;
use crate::mesh::TerrainMesh;

pub use grid::Grid;
pub use heightmap::{normalize, normalize_by_range, Heightmap, HeightmapGenerator};
pub use slope::{SlopeAnalyzer, SlopeDivisor, MOORE_NEIGHBOR_COUNT};

/// Outputs of one generation run.
///
/// Layers are `None` until the stage producing them has completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terrain {
    pub width: u32,
    pub height: u32,
    pub seed: i32,
    /// Normalized heightfield and raw noise range.
    pub heightmap: Option<Heightmap>,
    /// Normalized slope field.
    pub slopes: Option<Grid<f32>>,
    /// Per-cell biome classification.
    pub biomes: Option<Grid<Biome>>,
    /// Triangulated surface.
    #[serde(skip)]
    pub mesh: Option<TerrainMesh>,
}

impl Terrain {
    pub fn new(width: u32, height: u32, seed: i32) -> Self {
        Self {
            width,
            height,
            seed,
            heightmap: None,
            slopes: None,
            biomes: None,
            mesh: None,
        }
    }

    /// Normalized heights, if the heightmap stage has run.
    pub fn heights(&self) -> Option<&Grid<f32>> {
        self.heightmap.as_ref().map(|h| &h.heights)
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Number of biome cells of each kind, in [`Biome::ALL`] order.
    pub fn biome_histogram(&self) -> Option<[usize; 6]> {
        let biomes = self.biomes.as_ref()?;
        let mut counts = [0usize; 6];
        for &b in biomes.cells() {
            counts[b.index()] += 1;
        }
        Some(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terrain_creation() {
        let terrain = Terrain::new(64, 32, 7);
        assert_eq!(terrain.cell_count(), 2048);
        assert!(terrain.heights().is_none());
        assert!(terrain.biome_histogram().is_none());
    }

    #[test]
    fn test_biome_histogram() {
        let mut terrain = Terrain::new(2, 2, 0);
        terrain.biomes = Grid::from_cells(2, 2, vec![Biome::Water, Biome::Snow, Biome::Water, Biome::Rock]);
        let counts = terrain.biome_histogram().unwrap();
        assert_eq!(counts[Biome::Water.index()], 2);
        assert_eq!(counts[Biome::Snow.index()], 1);
        assert_eq!(counts[Biome::Rock.index()], 1);
        assert_eq!(counts.iter().sum::<usize>(), 4);
    }
}
