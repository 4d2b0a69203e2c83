//! Run configuration for terrain generation.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::biomes::BiomeConfig;
use crate::mesh::MeshConfig;
use crate::noise::{FractalNoiseConfig, NoiseBackend};
use crate::terrain::SlopeDivisor;

/// Errors raised while loading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Grid dimensions must both be greater than 1, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Grid of {width}x{height} cells exceeds the 32-bit vertex index space")]
    GridTooLarge { width: u32, height: u32 },
    #[error("Octave count must be positive")]
    InvalidOctaves,
    #[error("Noise parameter '{0}' must be finite and positive, got {1}")]
    InvalidNoiseParameter(&'static str, f32),
    #[error("Height exponent must be finite and positive, got {0}")]
    InvalidExponent(f32),
    #[error("Mesh parameter '{0}' must be finite, got {1}")]
    InvalidMeshParameter(&'static str, f32),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejects grids that are too small to normalize, slope or triangulate, and
/// grids whose vertex indices would not fit in `u32`.
pub fn validate_dimensions(width: u32, height: u32) -> Result<(), ConfigError> {
    if width <= 1 || height <= 1 {
        return Err(ConfigError::InvalidDimensions { width, height });
    }
    if (width as u64) * (height as u64) > u32::MAX as u64 {
        return Err(ConfigError::GridTooLarge { width, height });
    }
    Ok(())
}

/// Validates the noise parameters that would otherwise yield a flat or NaN field.
pub fn validate_noise(noise: &FractalNoiseConfig) -> Result<(), ConfigError> {
    if noise.octaves == 0 {
        return Err(ConfigError::InvalidOctaves);
    }
    for (name, value) in [
        ("scale", noise.scale),
        ("lacunarity", noise.lacunarity),
        ("persistence", noise.persistence),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::InvalidNoiseParameter(name, value));
        }
    }
    Ok(())
}

/// Complete description of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Cells along x.
    pub width: u32,
    /// Cells along y.
    pub height: u32,
    /// Noise seed.
    pub seed: i32,
    pub noise: FractalNoiseConfig,
    pub backend: NoiseBackend,
    /// Sample noise periodically with period (width, height) so the terrain tiles.
    pub wrap: bool,
    /// Height curve exponent applied after rescaling to [0, 1].
    pub height_exponent: f32,
    pub slope_divisor: SlopeDivisor,
    pub biomes: BiomeConfig,
    pub mesh: MeshConfig,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            seed: 0,
            noise: FractalNoiseConfig::default(),
            backend: NoiseBackend::default(),
            wrap: true,
            height_exponent: 2.0,
            slope_divisor: SlopeDivisor::default(),
            biomes: BiomeConfig::default(),
            mesh: MeshConfig::default(),
        }
    }
}

impl TerrainConfig {
    /// Creates a default configuration for the given grid and seed.
    pub fn new(width: u32, height: u32, seed: i32) -> Self {
        Self {
            width,
            height,
            seed,
            ..Default::default()
        }
    }

    /// Checks every parameter that must hold before generation starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_dimensions(self.width, self.height)?;
        validate_noise(&self.noise)?;
        if !self.height_exponent.is_finite() || self.height_exponent <= 0.0 {
            return Err(ConfigError::InvalidExponent(self.height_exponent));
        }
        self.mesh.validate()?;
        Ok(())
    }

    /// Wrap period handed to the noise sampler.
    pub fn period(&self) -> Option<(u32, u32)> {
        self.wrap.then_some((self.width, self.height))
    }

    /// Loads a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
