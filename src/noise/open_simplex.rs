//! OpenSimplex fBm backend built on the `noise` crate.

use ::noise::{NoiseFn, OpenSimplex};

use super::fractal::{noise_space_point, FractalNoiseConfig, NoiseSampler};

/// Fractal OpenSimplex noise.
///
/// The permutation table is built once; the per-call seed selects a distant,
/// deterministic region of 4D noise space instead, so one sampler serves any
/// number of seeds.
pub struct OpenSimplexSampler {
    source: OpenSimplex,
    config: FractalNoiseConfig,
    period: Option<(u32, u32)>,
}

impl OpenSimplexSampler {
    pub fn new(config: FractalNoiseConfig) -> Self {
        Self {
            source: OpenSimplex::new(0),
            config,
            period: None,
        }
    }

    pub fn periodic(config: FractalNoiseConfig, width: u32, height: u32) -> Self {
        Self {
            period: Some((width, height)),
            ..Self::new(config)
        }
    }
}

/// Offset in noise space for a seed/octave pair (splitmix64 finalizer).
fn seed_offset(seed: i32, octave: u8) -> [f64; 4] {
    let mut z = (seed as u32 as u64) << 8 | octave as u64;
    let mut out = [0.0f64; 4];
    for slot in &mut out {
        z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut v = z;
        v = (v ^ (v >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        v = (v ^ (v >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        v ^= v >> 31;
        // Keep offsets well inside the range where f64 coordinates stay precise.
        *slot = (v >> 40) as f64 / 16.0;
    }
    out
}

impl NoiseSampler for OpenSimplexSampler {
    fn sample(&self, x: f32, y: f32, seed: i32) -> f32 {
        let p = noise_space_point(x, y, self.config.scale, self.period).map(f64::from);

        let mut total = 0.0f64;
        let mut amplitude = 1.0f64;
        let mut frequency = 1.0f64;
        for octave in 0..self.config.octaves {
            let offset = seed_offset(seed, octave);
            let point = [
                p[0] * frequency + offset[0],
                p[1] * frequency + offset[1],
                p[2] * frequency + offset[2],
                p[3] * frequency + offset[3],
            ];
            total += self.source.get(point) * amplitude;
            amplitude *= self.config.persistence as f64;
            frequency *= self.config.lacunarity as f64;
        }

        let sum = self.config.amplitude_sum() as f64;
        if sum > 0.0 {
            (total / sum) as f32
        } else {
            0.0
        }
    }

    fn period(&self) -> Option<(u32, u32)> {
        self.period
    }
}
