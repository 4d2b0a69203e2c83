//! Generation stage trait and pipeline orchestration.

use log::{debug, info};
use thiserror::Error;

use crate::biomes::classify_grid;
use crate::config::{validate_dimensions, ConfigError, TerrainConfig};
use crate::mesh::build_mesh;
use crate::noise::NoiseSampler;
use crate::terrain::{HeightmapGenerator, SlopeAnalyzer, Terrain};

/// Unique identifier for generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Heightmap sampling and normalization.
    Heightmap,
    /// Slope field derived from the heightmap.
    Slope,
    /// Per-cell biome classification.
    Biomes,
    /// Vertex grid and triangulation.
    Mesh,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Heightmap => "heightmap",
            StageId::Slope => "slope",
            StageId::Biomes => "biomes",
            StageId::Mesh => "mesh",
        }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Stage '{0}' failed: {1}")]
    StageFailed(String, String),
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
}

/// Trait for implementing generation stages.
///
/// Each stage fills in one layer of the [`Terrain`], building upon the layers
/// of earlier stages.
pub trait GenerationStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the generation stage, modifying the terrain in place.
    ///
    /// A stage must only store fully finished layers on the terrain.
    fn execute(&self, terrain: &mut Terrain, config: &TerrainConfig) -> Result<(), PipelineError>;
}

/// Orchestrates multiple generation stages into a complete pipeline.
pub struct Pipeline {
    stages: Vec<Box<dyn GenerationStage>>,
    config: TerrainConfig,
}

impl Pipeline {
    /// Creates a new empty pipeline with the given configuration.
    pub fn new(config: TerrainConfig) -> Self {
        Self {
            stages: Vec::new(),
            config,
        }
    }

    /// Creates a pipeline running every stage: heightmap, slope, biomes and mesh.
    pub fn standard(config: TerrainConfig) -> Self {
        let mut pipeline = Self::new(config);
        pipeline
            .add_stage(HeightmapStage::new())
            .add_stage(SlopeStage)
            .add_stage(BiomeStage)
            .add_stage(MeshStage);
        pipeline
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: GenerationStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Validates the configuration, creates a terrain for it and runs every stage.
    ///
    /// On failure no terrain is returned.
    pub fn generate(&self) -> Result<Terrain, PipelineError> {
        let mut terrain = Terrain::new(self.config.width, self.config.height, self.config.seed);
        self.run(&mut terrain)?;
        Ok(terrain)
    }

    /// Executes all stages in order on the given terrain.
    pub fn run(&self, terrain: &mut Terrain) -> Result<(), PipelineError> {
        self.run_with_callbacks(terrain, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// # Arguments
    /// * `terrain` - The terrain to generate
    /// * `on_stage_start` - Called when each stage begins
    /// * `on_stage_complete` - Called when each stage finishes
    pub fn run_with_callbacks<F1, F2>(
        &self,
        terrain: &mut Terrain,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<(), PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        self.config.validate()?;
        validate_dimensions(terrain.width, terrain.height)?;

        let total = self.stages.len();
        let mut completed: Vec<StageId> = Vec::new();

        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);

            // Check dependencies
            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            info!("[{}/{}] {}", i + 1, total, stage.name());
            stage.execute(terrain, &self.config)?;
            completed.push(stage.id());

            on_stage_complete(stage.name(), i, total);
        }

        Ok(())
    }
}

/// Heightmap generation stage using fractal noise.
///
/// By default the sampler is built from the configured backend; a custom
/// [`NoiseSampler`] can be supplied instead.
#[derive(Default)]
pub struct HeightmapStage {
    sampler: Option<Box<dyn NoiseSampler>>,
}

impl HeightmapStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `sampler` instead of the configured backend.
    pub fn with_sampler<S: NoiseSampler + 'static>(sampler: S) -> Self {
        Self {
            sampler: Some(Box::new(sampler)),
        }
    }
}

impl GenerationStage for HeightmapStage {
    fn id(&self) -> StageId {
        StageId::Heightmap
    }

    fn name(&self) -> &str {
        "Heightmap Generation"
    }

    fn execute(&self, terrain: &mut Terrain, config: &TerrainConfig) -> Result<(), PipelineError> {
        let (width, height) = (terrain.width, terrain.height);

        let heightmap = match &self.sampler {
            Some(sampler) => {
                HeightmapGenerator::new(sampler, width, height, config.height_exponent)
                    .generate(terrain.seed)?
            }
            None => {
                let period = config.wrap.then_some((width, height));
                let sampler = config.backend.sampler(config.noise.clone(), period);
                debug!("noise backend: {}", config.backend.name());
                HeightmapGenerator::new(sampler, width, height, config.height_exponent)
                    .generate(terrain.seed)?
            }
        };

        terrain.heightmap = Some(heightmap);
        Ok(())
    }
}

/// Slope analysis stage.
pub struct SlopeStage;

impl GenerationStage for SlopeStage {
    fn id(&self) -> StageId {
        StageId::Slope
    }

    fn name(&self) -> &str {
        "Slope Analysis"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Heightmap]
    }

    fn execute(&self, terrain: &mut Terrain, config: &TerrainConfig) -> Result<(), PipelineError> {
        let heights = terrain.heights().ok_or_else(|| {
            PipelineError::StageFailed(self.name().to_string(), "No heightmap available".to_string())
        })?;

        let slopes = SlopeAnalyzer::new(config.slope_divisor).generate(heights);
        terrain.slopes = Some(slopes);
        Ok(())
    }
}

/// Biome classification stage.
pub struct BiomeStage;

impl GenerationStage for BiomeStage {
    fn id(&self) -> StageId {
        StageId::Biomes
    }

    fn name(&self) -> &str {
        "Biome Classification"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Heightmap, StageId::Slope]
    }

    fn execute(&self, terrain: &mut Terrain, config: &TerrainConfig) -> Result<(), PipelineError> {
        let (heights, slopes) = match (terrain.heights(), terrain.slopes.as_ref()) {
            (Some(h), Some(s)) => (h, s),
            _ => {
                return Err(PipelineError::StageFailed(
                    self.name().to_string(),
                    "Missing height or slope data (run Heightmap and Slope stages first)".to_string(),
                ))
            }
        };

        let biomes = classify_grid(heights, slopes, &config.biomes)
            .map_err(|e| PipelineError::StageFailed(self.name().to_string(), e.to_string()))?;
        terrain.biomes = Some(biomes);
        Ok(())
    }
}

/// Mesh construction stage.
pub struct MeshStage;

impl GenerationStage for MeshStage {
    fn id(&self) -> StageId {
        StageId::Mesh
    }

    fn name(&self) -> &str {
        "Mesh Construction"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Heightmap]
    }

    fn execute(&self, terrain: &mut Terrain, config: &TerrainConfig) -> Result<(), PipelineError> {
        let heights = terrain.heights().ok_or_else(|| {
            PipelineError::StageFailed(self.name().to_string(), "No heightmap available".to_string())
        })?;

        terrain.mesh = Some(build_mesh(heights, &config.mesh));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biomes::Biome;
    use crate::noise::FractalNoiseConfig;

    /// Returns the same value everywhere.
    struct ConstantSampler(f32);

    impl NoiseSampler for ConstantSampler {
        fn sample(&self, _x: f32, _y: f32, _seed: i32) -> f32 {
            self.0
        }

        fn period(&self) -> Option<(u32, u32)> {
            None
        }
    }

    fn small_config(width: u32, height: u32) -> TerrainConfig {
        TerrainConfig {
            noise: FractalNoiseConfig {
                scale: 8.0,
                ..Default::default()
            },
            ..TerrainConfig::new(width, height, 42)
        }
    }

    #[test]
    fn test_standard_pipeline_populates_everything() {
        let pipeline = Pipeline::standard(small_config(24, 16));
        assert_eq!(pipeline.stage_count(), 4);

        let terrain = pipeline.generate().unwrap();
        let heights = terrain.heights().unwrap();
        assert_eq!(heights.dimensions(), (24, 16));
        assert!(heights.cells().iter().all(|&h| (0.0..=1.0).contains(&h)));

        let slopes = terrain.slopes.as_ref().unwrap();
        assert!(slopes.cells().iter().all(|&s| (0.0..=1.0).contains(&s)));

        let biomes = terrain.biomes.as_ref().unwrap();
        assert_eq!(biomes.len(), 24 * 16);

        let mesh = terrain.mesh.as_ref().unwrap();
        assert_eq!(mesh.vertex_count(), 24 * 16);
        assert_eq!(mesh.triangle_count(), 2 * 23 * 15);
        assert!(mesh.triangles.iter().flatten().all(|&i| (i as usize) < 24 * 16));
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let a = Pipeline::standard(small_config(16, 16)).generate().unwrap();
        let b = Pipeline::standard(small_config(16, 16)).generate().unwrap();
        assert_eq!(a.heightmap, b.heightmap);
        assert_eq!(a.biomes, b.biomes);
    }

    #[test]
    fn test_flat_noise_scenario_is_all_water() {
        // A constant raw field normalizes to zero, has zero slope and is all water.
        let mut pipeline = Pipeline::new(small_config(4, 4));
        pipeline
            .add_stage(HeightmapStage::with_sampler(ConstantSampler(0.0)))
            .add_stage(SlopeStage)
            .add_stage(BiomeStage);

        let terrain = pipeline.generate().unwrap();
        assert!(terrain.heights().unwrap().cells().iter().all(|&h| h == 0.0));
        assert!(terrain.slopes.as_ref().unwrap().cells().iter().all(|&s| s == 0.0));
        assert!(terrain
            .biomes
            .as_ref()
            .unwrap()
            .cells()
            .iter()
            .all(|&b| b == Biome::Water));
        assert_eq!(terrain.biome_histogram().unwrap()[Biome::Water.index()], 16);
    }

    #[test]
    fn test_missing_dependency() {
        let mut pipeline = Pipeline::new(small_config(8, 8));
        pipeline.add_stage(SlopeStage);

        let result = pipeline.generate();
        assert!(matches!(result, Err(PipelineError::MissingDependency(_, _))));
    }

    #[test]
    fn test_invalid_config_aborts_before_stages() {
        let mut pipeline = Pipeline::new(small_config(1, 8));
        pipeline.add_stage(HeightmapStage::new());

        let mut started = false;
        let mut terrain = Terrain::new(1, 8, 0);
        let result = pipeline.run_with_callbacks(&mut terrain, |_, _, _| started = true, |_, _, _| {});

        assert!(matches!(
            result,
            Err(PipelineError::Config(ConfigError::InvalidDimensions { .. }))
        ));
        assert!(!started);
        assert!(terrain.heightmap.is_none());
    }

    #[test]
    fn test_zero_octaves_rejected() {
        let mut config = small_config(8, 8);
        config.noise.octaves = 0;
        let result = Pipeline::standard(config).generate();
        assert!(matches!(result, Err(PipelineError::Config(ConfigError::InvalidOctaves))));
    }

    #[test]
    fn test_pipeline_with_callbacks() {
        let mut pipeline = Pipeline::new(small_config(8, 8));
        pipeline.add_stage(HeightmapStage::new());

        let mut terrain = Terrain::new(8, 8, 42);
        let mut started = false;
        let mut completed = false;

        pipeline
            .run_with_callbacks(
                &mut terrain,
                |name, _, _| {
                    assert_eq!(name, "Heightmap Generation");
                    started = true;
                },
                |name, _, _| {
                    assert_eq!(name, "Heightmap Generation");
                    completed = true;
                },
            )
            .unwrap();

        assert!(started);
        assert!(completed);
        assert!(terrain.heightmap.is_some());
    }

    #[test]
    fn test_open_simplex_backend() {
        let mut config = small_config(12, 12);
        config.backend = crate::noise::NoiseBackend::OpenSimplex;
        let terrain = Pipeline::standard(config).generate().unwrap();
        let map = terrain.heightmap.unwrap();
        assert!(map.raw_min < map.raw_max);
    }

    #[test]
    fn test_stage_id_name() {
        assert_eq!(StageId::Heightmap.name(), "heightmap");
        assert_eq!(StageId::Mesh.name(), "mesh");
    }
}
