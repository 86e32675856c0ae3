//! Trigonometric terrain sampled at random positions.

use rand::Rng;

use crate::error::{Result, TerrainError};
use crate::projector::Point;

/// Height of the trigonometric surface at `(x, y)`.
///
/// Four layers from broad hills down to fine ridges, plus a diagonal
/// cross-wave. Every term vanishes at the origin.
pub fn trig_height(x: f64, y: f64) -> f64 {
    let base = 10.0 * (x * 0.1).sin() * (y * 0.1).cos();
    let rolling = 5.0 * (x * 0.3).sin() * (y * 0.2).sin();
    let detail = 2.0 * (x * 0.8).cos() * (y * 0.7).sin();
    let cross = 1.5 * (x * 0.15 + y * 0.1).sin() * (x * 0.1 - y * 0.2).cos();
    base + rolling + detail + cross
}

/// Samples the trigonometric surface over `[0, width) x [0, length)`.
#[derive(Debug, Clone, Copy)]
pub struct TrigTerrain {
    width: f64,
    length: f64,
    samples: usize,
}

impl TrigTerrain {
    pub fn new(width: f64, length: f64, samples: usize) -> Result<Self> {
        for (name, value) in [("width", width), ("length", length)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TerrainError::InvalidParameter(format!(
                    "terrain {name} must be a positive number, got {value}"
                )));
            }
        }
        Ok(Self {
            width,
            length,
            samples,
        })
    }

    /// Draws `samples` uniformly placed points and evaluates their height.
    pub fn generate(&self, rng: &mut impl Rng) -> Vec<Point> {
        (0..self.samples)
            .map(|_| {
                let x = rng.gen_range(0.0..self.width);
                let y = rng.gen_range(0.0..self.length);
                Point::new(x, y, trig_height(x, y))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_height_at_origin_is_zero() {
        assert_eq!(trig_height(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_height_is_bounded() {
        // Sum of amplitudes.
        let max = 10.0 + 5.0 + 2.0 + 1.5;
        for i in 0..100 {
            let x = i as f64 * 0.37;
            let y = i as f64 * 0.91;
            assert!(trig_height(x, y).abs() <= max);
        }
    }

    #[test]
    fn test_samples_stay_in_bounds() {
        let terrain = TrigTerrain::new(10.0, 4.0, 500).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let points = terrain.generate(&mut rng);

        assert_eq!(points.len(), 500);
        for p in &points {
            assert!((0.0..10.0).contains(&p.x));
            assert!((0.0..4.0).contains(&p.y));
            assert_eq!(p.z, trig_height(p.x, p.y));
        }
    }

    #[test]
    fn test_rejects_empty_bounds() {
        assert!(TrigTerrain::new(0.0, 10.0, 1).is_err());
        assert!(TrigTerrain::new(10.0, -1.0, 1).is_err());
        assert!(TrigTerrain::new(f64::NAN, 10.0, 1).is_err());
    }
}
