//! Noise generation module for terrain synthesis.
//!
//! The default backend uses simdnoise; an OpenSimplex backend from the `noise`
//! crate is available through [`NoiseBackend`].

mod fractal;
mod open_simplex;

use serde::{Deserialize, Serialize};

pub use fractal::{
    noise_space_point, sample_fractal_noise, FractalNoiseConfig, NoiseSampler, SimplexSampler,
};
pub use open_simplex::OpenSimplexSampler;

/// Selects the noise implementation behind a [`NoiseSampler`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoiseBackend {
    #[default]
    Simplex,
    OpenSimplex,
}

impl NoiseBackend {
    pub fn name(&self) -> &'static str {
        match self {
            NoiseBackend::Simplex => "simplex",
            NoiseBackend::OpenSimplex => "open-simplex",
        }
    }

    /// Builds a sampler for this backend. `period` enables wrapping.
    pub fn sampler(
        &self,
        config: FractalNoiseConfig,
        period: Option<(u32, u32)>,
    ) -> Box<dyn NoiseSampler> {
        match (self, period) {
            (NoiseBackend::Simplex, Some((w, h))) => Box::new(SimplexSampler::periodic(config, w, h)),
            (NoiseBackend::Simplex, None) => Box::new(SimplexSampler::new(config)),
            (NoiseBackend::OpenSimplex, Some((w, h))) => {
                Box::new(OpenSimplexSampler::periodic(config, w, h))
            }
            (NoiseBackend::OpenSimplex, None) => Box::new(OpenSimplexSampler::new(config)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backends_honor_period() {
        for backend in [NoiseBackend::Simplex, NoiseBackend::OpenSimplex] {
            let sampler = backend.sampler(FractalNoiseConfig::default(), Some((64, 32)));
            assert_eq!(sampler.period(), Some((64, 32)), "{}", backend.name());
            let flat = backend.sampler(FractalNoiseConfig::default(), None);
            assert_eq!(flat.period(), None);
        }
    }
}
