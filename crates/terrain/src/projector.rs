//! Heightmap to point-cloud projection.

use serde::{Deserialize, Serialize};

use crate::grid::HeightGrid;

/// A single terrain sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Independent multipliers applied to each axis during projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisScale {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AxisScale {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl Default for AxisScale {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

/// Flattens a grid into `size * size` points in row-major order.
///
/// The row index becomes `x`, the column index `y` and the cell value `z`,
/// each multiplied by its axis scale.
pub fn project(grid: &HeightGrid, scale: AxisScale) -> Vec<Point> {
    let mut points = Vec::with_capacity(grid.size() * grid.size());
    for (row, cells) in grid.rows().enumerate() {
        for (col, &z) in cells.iter().enumerate() {
            points.push(Point {
                x: row as f64 * scale.x,
                y: col as f64 * scale.y,
                z: z * scale.z,
            });
        }
    }
    points
}
