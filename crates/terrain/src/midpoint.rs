//! Midpoint-displacement heightmap synthesis.
//!
//! The grid is filled by recursively splitting it into quadrants. Each split
//! assigns the four edge midpoints and the centre of the current square from
//! the average of the square's corners plus a normally distributed offset.
//! Sibling quadrants share edges, so later quadrants read midpoints written by
//! earlier ones: the traversal order is part of the output.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{Result, TerrainError};
use crate::grid::HeightGrid;

/// Fills a [`HeightGrid`] with fractal terrain.
#[derive(Debug, Clone, Copy)]
pub struct MidpointDisplacement {
    roughness: f64,
    height_scale: f64,
    offset: Normal<f64>,
}

impl MidpointDisplacement {
    /// Validates the parameters and prepares the displacement distribution.
    ///
    /// Offsets are drawn from `Normal(0, roughness * height_scale)`.
    pub fn new(roughness: f64, height_scale: f64) -> Result<Self> {
        if !roughness.is_finite() || roughness < 0.0 {
            return Err(TerrainError::InvalidParameter(format!(
                "roughness must be a non-negative number, got {roughness}"
            )));
        }
        if !height_scale.is_finite() || height_scale < 0.0 {
            return Err(TerrainError::InvalidParameter(format!(
                "height scale must be a non-negative number, got {height_scale}"
            )));
        }

        let offset = Normal::new(0.0, roughness * height_scale)
            .map_err(|e| TerrainError::InvalidParameter(e.to_string()))?;

        Ok(Self {
            roughness,
            height_scale,
            offset,
        })
    }

    pub fn roughness(&self) -> f64 {
        self.roughness
    }

    pub fn height_scale(&self) -> f64 {
        self.height_scale
    }

    /// Seeds the corners, then subdivides the whole grid.
    pub fn generate<R: Rng + ?Sized>(&self, grid: &mut HeightGrid, rng: &mut R) {
        self.seed_corners(grid, rng);
        let last = grid.size() - 1;
        tracing::debug!(
            size = grid.size(),
            roughness = self.roughness,
            height_scale = self.height_scale,
            "Subdividing height grid"
        );
        self.displace(grid, rng, 0, 0, last, last);
    }

    /// Assigns the four corners uniform values in `[0, height_scale / 2)`.
    pub fn seed_corners<R: Rng + ?Sized>(&self, grid: &mut HeightGrid, rng: &mut R) {
        let last = grid.size() - 1;
        for (row, col) in [(0, 0), (last, 0), (0, last), (last, last)] {
            let value = self.corner_value(rng);
            grid.set(row, col, value);
        }
    }

    fn corner_value<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let upper = self.height_scale / 2.0;
        // An empty range collapses to its lower bound.
        if upper > 0.0 {
            rng.gen_range(0.0..upper)
        } else {
            0.0
        }
    }

    fn displace<R: Rng + ?Sized>(
        &self,
        grid: &mut HeightGrid,
        rng: &mut R,
        x1: usize,
        y1: usize,
        x2: usize,
        y2: usize,
    ) {
        if x2 - x1 <= 1 {
            return;
        }

        let mid_x = (x1 + x2) / 2;
        let mid_y = (y1 + y2) / 2;

        // Edge midpoints are write-once: a neighbour may already have set them.
        let edges = [
            (mid_x, y1, (x1, y1), (x2, y1)),
            (mid_x, y2, (x1, y2), (x2, y2)),
            (x1, mid_y, (x1, y1), (x1, y2)),
            (x2, mid_y, (x2, y1), (x2, y2)),
        ];
        for (row, col, a, b) in edges {
            if grid.is_unset(row, col) {
                let avg = (grid.get(a.0, a.1) + grid.get(b.0, b.1)) / 2.0;
                grid.set(row, col, avg + self.offset.sample(rng));
            }
        }

        let avg = (grid.get(x1, y1) + grid.get(x2, y1) + grid.get(x1, y2) + grid.get(x2, y2)) / 4.0;
        grid.set(mid_x, mid_y, avg + self.offset.sample(rng));

        self.displace(grid, rng, x1, y1, mid_x, mid_y);
        self.displace(grid, rng, mid_x, y1, x2, mid_y);
        self.displace(grid, rng, x1, mid_y, mid_x, y2);
        self.displace(grid, rng, mid_x, mid_y, x2, y2);
    }
}
