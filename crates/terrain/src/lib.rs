//! Synthetic terrain generation.
//!
//! This crate builds 3-D point clouds that can be fed to a plotting tool:
//! fractal heightmaps produced by recursive midpoint displacement, and
//! smooth surfaces sampled from a fixed sum of sinusoids. Points are written
//! as `x,y,z` CSV.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use terrain::prelude::*;
//!
//! let points = FractalConfig::default()
//!     .with_size(257)
//!     .with_roughness(0.35)
//!     .generate()?;
//!
//! export(&points, "terrain.csv")?;
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod midpoint;
pub mod projector;
pub mod trig;
pub mod upload;

pub use error::{Result, TerrainError};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{FractalConfig, OutputConfig, TrigConfig};
    pub use crate::error::{Result, TerrainError};
    pub use crate::export::{export, read_points, to_csv_string, write_points};
    pub use crate::grid::HeightGrid;
    pub use crate::midpoint::MidpointDisplacement;
    pub use crate::projector::{AxisScale, Point, project};
    pub use crate::trig::{TrigTerrain, trig_height};
    pub use crate::upload::{DatasetInfo, PlotterClient};
}
