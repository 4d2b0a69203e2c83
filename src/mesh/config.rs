//! Mesh footprint configuration.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Placement and vertical exaggeration of the terrain mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Position of the vertex for grid cell (0, 0) at height 0.
    pub base: [f32; 3],
    /// Side length of the square footprint along x and z.
    pub size: f32,
    /// World-space height of a cell with normalized height 1.
    pub height_scale: f32,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            base: [-1.0, -0.75, -1.0],
            size: 2.0,
            height_scale: 0.5,
        }
    }
}

impl MeshConfig {
    pub fn base(&self) -> Vec3 {
        Vec3::from_array(self.base)
    }

    /// Spacing between adjacent vertices along x and z for a `width` x `height` grid.
    pub fn steps(&self, width: u32, height: u32) -> (f32, f32) {
        let span = |n: u32| if n > 1 { self.size / (n - 1) as f32 } else { 0.0 };
        (span(width), span(height))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, &c) in self.base.iter().enumerate() {
            if !c.is_finite() {
                let name = ["base.x", "base.y", "base.z"][i];
                return Err(ConfigError::InvalidMeshParameter(name, c));
            }
        }
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(ConfigError::InvalidMeshParameter("size", self.size));
        }
        if !self.height_scale.is_finite() {
            return Err(ConfigError::InvalidMeshParameter("height_scale", self.height_scale));
        }
        Ok(())
    }
}
