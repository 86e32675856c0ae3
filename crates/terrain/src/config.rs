//! Configuration types for terrain generation.

use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::Result;
use crate::grid::HeightGrid;
use crate::midpoint::MidpointDisplacement;
use crate::projector::{AxisScale, Point, project};
use crate::trig::TrigTerrain;

/// Parameters for a midpoint-displacement heightmap.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalConfig {
    /// Grid dimension. Values of the form `2^k + 1` subdivide evenly.
    pub size: usize,

    /// Perturbation magnitude relative to `height_scale`.
    pub roughness: f64,

    /// Overall elevation magnitude.
    pub height_scale: f64,

    /// Multipliers applied when projecting to points.
    pub scale: AxisScale,

    /// Seed for the random source.
    pub seed: u64,

    /// Track visited cells with a mask instead of the zero sentinel.
    pub track_unset_with_mask: bool,
}

impl Default for FractalConfig {
    fn default() -> Self {
        Self {
            size: (1 << 10) + 1,
            roughness: 0.35,
            height_scale: 150.0,
            scale: AxisScale::new(5.0, 5.0, 1.0),
            seed: 42,
            track_unset_with_mask: false,
        }
    }
}

impl FractalConfig {
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_roughness(mut self, roughness: f64) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn with_height_scale(mut self, height_scale: f64) -> Self {
        self.height_scale = height_scale;
        self
    }

    pub fn with_scale(mut self, scale: AxisScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builds and fills the heightmap.
    pub fn heightmap(&self) -> Result<HeightGrid> {
        let displacement = MidpointDisplacement::new(self.roughness, self.height_scale)?;
        let mut grid = if self.track_unset_with_mask {
            HeightGrid::with_mask(self.size)?
        } else {
            HeightGrid::new(self.size)?
        };
        let mut rng = StdRng::seed_from_u64(self.seed);
        displacement.generate(&mut grid, &mut rng);
        Ok(grid)
    }

    /// Generates the heightmap and projects it to points.
    pub fn generate(&self) -> Result<Vec<Point>> {
        let grid = self.heightmap()?;
        Ok(project(&grid, self.scale))
    }
}

/// Parameters for the trigonometric surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrigConfig {
    pub width: f64,
    pub length: f64,
    /// Number of random sample points.
    pub samples: usize,
    /// Seed for sample placement. Unseeded runs use the thread RNG.
    pub seed: Option<u64>,
}

impl Default for TrigConfig {
    fn default() -> Self {
        Self {
            width: 10.0,
            length: 10.0,
            samples: 2000,
            seed: None,
        }
    }
}

impl TrigConfig {
    pub fn generate(&self) -> Result<Vec<Point>> {
        let terrain = TrigTerrain::new(self.width, self.length, self.samples)?;
        let points = match self.seed {
            Some(seed) => terrain.generate(&mut StdRng::seed_from_u64(seed)),
            None => terrain.generate(&mut rand::thread_rng()),
        };
        Ok(points)
    }
}

/// Where generated points go.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// CSV destination.
    pub path: PathBuf,
    /// Base URL of a plot server to upload the CSV to, if any.
    pub plotter_url: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("terrain.csv"),
            plotter_url: None,
        }
    }
}

impl OutputConfig {
    /// Reads `TERRAIN_OUTPUT` and `PLOTTER_URL`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("TERRAIN_OUTPUT") {
            config.path = PathBuf::from(path);
        }
        config.plotter_url = std::env::var("PLOTTER_URL").ok().filter(|s| !s.is_empty());
        config
    }
}

/// Loads a JSON config file. Missing fields take their defaults.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Reads `TERRAIN_SEED`, ignoring values that are not a `u64`.
pub fn seed_from_env() -> Option<u64> {
    let raw = std::env::var("TERRAIN_SEED").ok()?;
    match raw.parse() {
        Ok(seed) => Some(seed),
        Err(_) => {
            tracing::warn!("Ignoring invalid TERRAIN_SEED: {}", raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fractal_defaults() {
        let config = FractalConfig::default();
        assert_eq!(config.size, 1025);
        assert_eq!(config.seed, 42);
        assert_eq!(config.scale, AxisScale::new(5.0, 5.0, 1.0));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: FractalConfig = serde_json::from_str(r#"{"size": 9, "roughness": 0.1}"#).unwrap();
        assert_eq!(config.size, 9);
        assert_eq!(config.roughness, 0.1);
        assert_eq!(config.height_scale, 150.0);
    }

    #[test]
    fn test_fractal_generate() {
        let config = FractalConfig::default().with_size(9).with_seed(3);
        let points = config.generate().unwrap();
        assert_eq!(points.len(), 81);
        assert_eq!(points[80].x, 40.0);
        assert_eq!(points[80].y, 40.0);
        assert_eq!(points, config.generate().unwrap());
    }

    #[test]
    fn test_fractal_rejects_tiny_grid() {
        let err = FractalConfig::default().with_size(1).generate().unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_seeded_trig_is_reproducible() {
        let config = TrigConfig {
            samples: 20,
            seed: Some(9),
            ..Default::default()
        };
        assert_eq!(config.generate().unwrap(), config.generate().unwrap());
    }
}
