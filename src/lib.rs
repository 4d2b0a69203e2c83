//! Procedural terrain synthesis.
//!
//! Builds a normalized heightfield from fractal noise, derives a slope field,
//! classifies every cell into a biome and triangulates the surface into a
//! mesh. Layers can be exported as PNG images and Wavefront OBJ.

pub mod config;
pub mod geometry;
pub mod noise;
pub mod terrain;
pub mod biomes;
pub mod mesh;
pub mod export;
pub mod pipeline;

pub use biomes::{classify, classify_grid, Biome, BiomeConfig};
pub use config::{ConfigError, TerrainConfig};
pub use mesh::{build_mesh, triangulate, MeshConfig, TerrainMesh};
pub use crate::noise::{FractalNoiseConfig, NoiseBackend, NoiseSampler};
pub use pipeline::{GenerationStage, Pipeline, PipelineError, StageId};
pub use terrain::{Grid, Heightmap, HeightmapGenerator, SlopeAnalyzer, SlopeDivisor, Terrain};
