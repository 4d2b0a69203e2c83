//! Multi-octave fractal Brownian motion (fBm) noise generation.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};
use simdnoise::NoiseBuilder;

/// Configuration for multi-octave fractal noise generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalNoiseConfig {
    /// Number of noise octaves (4-8 typical).
    pub octaves: u8,
    /// Spatial scale divisor: grid cells per unit of noise space.
    pub scale: f32,
    /// Frequency multiplier per octave (typically 2.0).
    pub lacunarity: f32,
    /// Amplitude decay per octave (0.4-0.6 typical).
    pub persistence: f32,
}

impl Default for FractalNoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 6,
            scale: 256.0,
            lacunarity: 2.0,
            persistence: 0.5,
        }
    }
}

impl FractalNoiseConfig {
    /// Creates a smoother configuration with fewer, broader octaves.
    pub fn smooth() -> Self {
        Self {
            octaves: 4,
            scale: 384.0,
            lacunarity: 2.0,
            persistence: 0.4,
        }
    }

    /// Creates a rugged configuration with more high-frequency detail.
    pub fn rugged() -> Self {
        Self {
            octaves: 8,
            scale: 192.0,
            lacunarity: 2.1,
            persistence: 0.55,
        }
    }

    /// Sum of the per-octave amplitudes, used to bring fBm back to roughly [-1, 1].
    pub fn amplitude_sum(&self) -> f32 {
        let mut amplitude = 1.0f32;
        let mut sum = 0.0f32;
        for _ in 0..self.octaves {
            sum += amplitude;
            amplitude *= self.persistence;
        }
        sum
    }
}

/// A deterministic coherent-noise source sampled at grid coordinates.
///
/// Implementations must return the same value for the same `(x, y, seed)`.
/// When [`NoiseSampler::period`] returns `Some((w, h))`, the sampler is
/// periodic: `sample(x + w, y, seed)` and `sample(x, y + h, seed)` equal
/// `sample(x, y, seed)` up to float rounding, so terrain built on a `w` x `h`
/// grid tiles without a seam. Values are approximately in [-1, 1] but callers
/// must not rely on exact bounds.
pub trait NoiseSampler: Send + Sync {
    fn sample(&self, x: f32, y: f32, seed: i32) -> f32;

    /// Wrap period in grid cells, if any.
    fn period(&self) -> Option<(u32, u32)>;
}

impl<S: NoiseSampler + ?Sized> NoiseSampler for &S {
    fn sample(&self, x: f32, y: f32, seed: i32) -> f32 {
        (**self).sample(x, y, seed)
    }

    fn period(&self) -> Option<(u32, u32)> {
        (**self).period()
    }
}

impl<S: NoiseSampler + ?Sized> NoiseSampler for Box<S> {
    fn sample(&self, x: f32, y: f32, seed: i32) -> f32 {
        (**self).sample(x, y, seed)
    }

    fn period(&self) -> Option<(u32, u32)> {
        (**self).period()
    }
}

/// Maps a grid coordinate to a point in 4D noise space.
///
/// With a period each axis is wound onto a circle whose circumference is
/// `period / scale` noise units, so a single grid step always covers
/// `1 / scale` units of arc and the coordinate wraps after `period` cells.
/// Without a period the point lies on the plane `z = w = 0`.
pub fn noise_space_point(x: f32, y: f32, scale: f32, period: Option<(u32, u32)>) -> [f32; 4] {
    match period {
        Some((pw, ph)) => {
            let (pw, ph) = (pw as f32, ph as f32);
            let rx = pw / (TAU * scale);
            let ry = ph / (TAU * scale);
            let ax = TAU * x / pw;
            let ay = TAU * y / ph;
            [rx * ax.cos(), rx * ax.sin(), ry * ay.cos(), ry * ay.sin()]
        }
        None => [x / scale, y / scale, 0.0, 0.0],
    }
}

/// Fractal simplex noise evaluated in 4D, so periodic terrain can be taken
/// from a torus embedded in noise space.
#[derive(Debug, Clone)]
pub struct SimplexSampler {
    config: FractalNoiseConfig,
    period: Option<(u32, u32)>,
}

impl SimplexSampler {
    pub fn new(config: FractalNoiseConfig) -> Self {
        Self { config, period: None }
    }

    /// A sampler that wraps every `width` cells along x and `height` cells along y.
    pub fn periodic(config: FractalNoiseConfig, width: u32, height: u32) -> Self {
        Self {
            config,
            period: Some((width, height)),
        }
    }

    pub fn config(&self) -> &FractalNoiseConfig {
        &self.config
    }
}

impl NoiseSampler for SimplexSampler {
    fn sample(&self, x: f32, y: f32, seed: i32) -> f32 {
        let p = noise_space_point(x, y, self.config.scale, self.period);
        sample_fractal_noise(p, seed, &self.config)
    }

    fn period(&self) -> Option<(u32, u32)> {
        self.period
    }
}

/// Samples fractal noise at a 4D position.
///
/// Each octave gets its own seed offset so layers are decorrelated.
///
/// # Returns
/// A noise value in approximately [-1, 1] range (normalized by amplitude sum)
pub fn sample_fractal_noise(pos: [f32; 4], seed: i32, config: &FractalNoiseConfig) -> f32 {
    let mut total = 0.0f32;
    let mut amplitude = 1.0f32;
    let mut frequency = 1.0f32;

    for octave in 0..config.octaves {
        let octave_seed = seed.wrapping_add(octave as i32 * 31337);

        let [x, y, z, w] = pos.map(|c| c * frequency);

        let noise_value = NoiseBuilder::fbm_4d_offset(x, 1, y, 1, z, 1, w, 1)
            .with_seed(octave_seed)
            .with_freq(1.0)
            .with_octaves(1)
            .generate()
            .0[0];

        total += noise_value * amplitude;
        amplitude *= config.persistence;
        frequency *= config.lacunarity;
    }

    let sum = config.amplitude_sum();
    if sum > 0.0 {
        total / sum
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FractalNoiseConfig::default();
        assert_eq!(config.octaves, 6);
        assert_eq!(config.scale, 256.0);
        assert_eq!(config.lacunarity, 2.0);
        assert_eq!(config.persistence, 0.5);
    }

    #[test]
    fn test_amplitude_sum() {
        let config = FractalNoiseConfig {
            octaves: 3,
            persistence: 0.5,
            ..Default::default()
        };
        assert!((config.amplitude_sum() - 1.75).abs() < 1e-6);
    }

    #[test]
    fn test_noise_reproducibility() {
        let sampler = SimplexSampler::new(FractalNoiseConfig::default());

        let result1 = sampler.sample(12.0, 40.0, 12345);
        let result2 = sampler.sample(12.0, 40.0, 12345);

        assert_eq!(result1, result2, "Same seed and position should produce same result");
    }

    #[test]
    fn test_noise_range() {
        let config = FractalNoiseConfig {
            scale: 16.0,
            ..Default::default()
        };
        let sampler = SimplexSampler::periodic(config, 64, 64);
        for x in 0..64 {
            for y in (0..64).step_by(7) {
                let value = sampler.sample(x as f32, y as f32, 7);
                assert!(
                    (-1.5..=1.5).contains(&value),
                    "Noise value {} at ({}, {}) out of expected range",
                    value,
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn test_different_seeds_produce_different_results() {
        let config = FractalNoiseConfig {
            scale: 8.0,
            ..Default::default()
        };
        let sampler = SimplexSampler::new(config);

        let differs = (0..16).any(|i| {
            let x = i as f32 * 3.7;
            sampler.sample(x, 5.3, 1) != sampler.sample(x, 5.3, 2)
        });
        assert!(differs, "Different seeds should produce different results");
    }

    #[test]
    fn test_periodic_sampler_wraps() {
        let config = FractalNoiseConfig {
            scale: 8.0,
            ..Default::default()
        };
        let sampler = SimplexSampler::periodic(config, 32, 24);
        assert_eq!(sampler.period(), Some((32, 24)));

        for y in 0..24 {
            let a = sampler.sample(0.0, y as f32, 99);
            let b = sampler.sample(32.0, y as f32, 99);
            assert!((a - b).abs() < 1e-3, "x seam mismatch at y={}: {} vs {}", y, a, b);
        }
        for x in 0..32 {
            let a = sampler.sample(x as f32, 0.0, 99);
            let b = sampler.sample(x as f32, 24.0, 99);
            assert!((a - b).abs() < 1e-3, "y seam mismatch at x={}: {} vs {}", x, a, b);
        }
    }

    #[test]
    fn test_noise_space_step_length_matches_scale() {
        let scale = 10.0;
        let a = noise_space_point(3.0, 0.0, scale, Some((1000, 1000)));
        let b = noise_space_point(4.0, 0.0, scale, Some((1000, 1000)));
        let step = ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt();
        assert!((step - 1.0 / scale).abs() < 1e-4);

        let planar = noise_space_point(5.0, 20.0, scale, None);
        assert_eq!(planar, [0.5, 2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_zero_octaves_is_flat() {
        let config = FractalNoiseConfig {
            octaves: 0,
            ..Default::default()
        };
        assert_eq!(sample_fractal_noise([0.3, 0.1, 0.0, 0.0], 1, &config), 0.0);
    }
}
