//! Fractal simplex noise shared by every generation pass.
//!
//! Composites octaves of simplex noise, each doubling in frequency and scaled
//! by `persistence` in amplitude, then divides by the amplitude sum so the
//! result stays in roughly `[-1, 1]` regardless of octave count.

use glam::DVec3;
use noise::{NoiseFn, Simplex};

use crate::seed::noise_seed;

/// A seeded, smooth 2D/3D noise function.
pub struct NoiseField {
    noise: Simplex,
    octaves: u32,
    persistence: f64,
    lacunarity: f64,
}

impl NoiseField {
    /// Single-octave field for `world_seed`, decorrelated by `salt`.
    pub fn new(world_seed: u64, salt: u64) -> Self {
        Self {
            noise: Simplex::new(noise_seed(world_seed, salt)),
            octaves: 1,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }

    /// Sets the number of fBm octaves (minimum one) and amplitude falloff.
    pub fn with_octaves(mut self, octaves: u32, persistence: f64) -> Self {
        self.octaves = octaves.max(1);
        self.persistence = persistence;
        self
    }

    fn fbm<F: Fn(f64) -> f64>(&self, sample_at: F) -> f64 {
        let mut total = 0.0;
        let mut norm = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;

        for _ in 0..self.octaves {
            total += sample_at(frequency) * amplitude;
            norm += amplitude;
            frequency *= self.lacunarity;
            amplitude *= self.persistence;
        }

        if norm > 0.0 { total / norm } else { 0.0 }
    }

    /// Samples the field at `(x, z)`. Output is roughly `[-1, 1]`.
    pub fn sample_2d(&self, x: f64, z: f64) -> f64 {
        self.fbm(|f| self.noise.get([x * f, z * f]))
    }

    /// Samples the field at a 3D point. Output is roughly `[-1, 1]`.
    pub fn sample_3d(&self, p: DVec3) -> f64 {
        self.fbm(|f| self.noise.get([p.x * f, p.y * f, p.z * f]))
    }

    /// [`sample_2d`](Self::sample_2d) remapped to `[0, 1]`.
    pub fn normalized_2d(&self, x: f64, z: f64) -> f64 {
        normalize(self.sample_2d(x, z))
    }

    /// [`sample_3d`](Self::sample_3d) remapped to `[0, 1]`.
    pub fn normalized_3d(&self, p: DVec3) -> f64 {
        normalize(self.sample_3d(p))
    }
}

#[inline]
fn normalize(v: f64) -> f64 {
    ((v + 1.0) * 0.5).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_values() {
        let a = NoiseField::new(99, 1).with_octaves(4, 0.5);
        let b = NoiseField::new(99, 1).with_octaves(4, 0.5);
        for i in 0..200 {
            let x = i as f64 * 0.37;
            let z = i as f64 * -1.13;
            assert_eq!(a.sample_2d(x, z), b.sample_2d(x, z));
            assert_eq!(
                a.sample_3d(DVec3::new(x, z, x * 0.5)),
                b.sample_3d(DVec3::new(x, z, x * 0.5))
            );
        }
    }

    #[test]
    fn test_output_range() {
        let field = NoiseField::new(5, 0).with_octaves(6, 0.6);
        for i in 0..2000 {
            let x = i as f64 * 0.173;
            let v = field.sample_2d(x, x * 0.61);
            assert!(v.is_finite() && v.abs() < 1.5, "sample {v} out of range");
            let n = field.normalized_3d(DVec3::new(x, -x, x * 2.0));
            assert!((0.0..=1.0).contains(&n));
        }
    }

    #[test]
    fn test_different_salts_differ() {
        let a = NoiseField::new(5, 1);
        let b = NoiseField::new(5, 2);
        let differs = (0..100).any(|i| {
            let x = i as f64 * 0.41 + 0.2;
            a.sample_2d(x, x) != b.sample_2d(x, x)
        });
        assert!(differs, "salted fields should not be identical");
    }

    #[test]
    fn test_field_is_smooth() {
        let field = NoiseField::new(11, 0);
        let step = 1e-4;
        for i in 0..100 {
            let x = i as f64 * 0.29;
            let d = (field.sample_2d(x, 1.5) - field.sample_2d(x + step, 1.5)).abs();
            assert!(d < 0.01, "adjacent samples jumped by {d}");
        }
    }
}
