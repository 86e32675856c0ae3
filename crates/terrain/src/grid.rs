//! Square heightmap storage.

use crate::error::{Result, TerrainError};

/// Value a cell holds before anything has been written to it.
pub const UNSET: f64 = 0.0;

/// A square grid of elevations addressed by `(row, col)`.
///
/// Cells are stored row-major in a single flat buffer. By default a cell
/// counts as unset while it holds [`UNSET`], so a computed elevation of
/// exactly zero is indistinguishable from a cell nobody has visited. Grids
/// built with [`HeightGrid::with_mask`] track writes in a separate mask
/// instead.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightGrid {
    size: usize,
    cells: Vec<f64>,
    written: Option<Vec<bool>>,
}

impl HeightGrid {
    /// Allocates a `size` x `size` grid with every cell unset.
    pub fn new(size: usize) -> Result<Self> {
        if size < 2 {
            return Err(TerrainError::InvalidDimension { size });
        }
        Ok(Self {
            size,
            cells: vec![UNSET; size * size],
            written: None,
        })
    }

    /// Allocates a grid that records writes in a per-cell mask.
    pub fn with_mask(size: usize) -> Result<Self> {
        let mut grid = Self::new(size)?;
        grid.written = Some(vec![false; size * size]);
        Ok(grid)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.size && col < self.size,
            "cell ({row}, {col}) out of bounds for grid of size {}",
            self.size
        );
        row * self.size + col
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[self.index(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let idx = self.index(row, col);
        self.cells[idx] = value;
        if let Some(written) = self.written.as_mut() {
            written[idx] = true;
        }
    }

    /// Returns true while the cell has not been assigned.
    pub fn is_unset(&self, row: usize, col: usize) -> bool {
        let idx = self.index(row, col);
        match &self.written {
            Some(written) => !written[idx],
            None => self.cells[idx] == UNSET,
        }
    }

    /// True when no cell is unset.
    pub fn is_filled(&self) -> bool {
        (0..self.size).all(|row| (0..self.size).all(|col| !self.is_unset(row, col)))
    }

    /// Corner values in the order `(0,0)`, `(N-1,0)`, `(0,N-1)`, `(N-1,N-1)`.
    pub fn corners(&self) -> [f64; 4] {
        let last = self.size - 1;
        [
            self.get(0, 0),
            self.get(last, 0),
            self.get(0, last),
            self.get(last, last),
        ]
    }

    /// Iterates over rows, each a slice of `size` cells.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks_exact(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_small_sizes() {
        assert!(matches!(
            HeightGrid::new(0),
            Err(TerrainError::InvalidDimension { size: 0 })
        ));
        assert!(matches!(
            HeightGrid::new(1),
            Err(TerrainError::InvalidDimension { size: 1 })
        ));
        assert!(HeightGrid::new(2).is_ok());
    }

    #[test]
    fn test_new_grid_is_unset() {
        let grid = HeightGrid::new(3).unwrap();
        assert_eq!(grid.size(), 3);
        for row in 0..3 {
            for col in 0..3 {
                assert!(grid.is_unset(row, col));
                assert_eq!(grid.get(row, col), UNSET);
            }
        }
        assert!(!grid.is_filled());
    }

    #[test]
    fn test_set_and_get() {
        let mut grid = HeightGrid::new(3).unwrap();
        grid.set(1, 2, 4.5);
        assert_eq!(grid.get(1, 2), 4.5);
        assert!(!grid.is_unset(1, 2));
        assert!(grid.is_unset(2, 1));
    }

    #[test]
    fn test_zero_write_reads_as_unset_without_mask() {
        let mut grid = HeightGrid::new(2).unwrap();
        grid.set(0, 1, 0.0);
        assert!(grid.is_unset(0, 1));
    }

    #[test]
    fn test_mask_tracks_zero_writes() {
        let mut grid = HeightGrid::with_mask(2).unwrap();
        assert!(grid.is_unset(0, 1));
        grid.set(0, 1, 0.0);
        assert!(!grid.is_unset(0, 1));
    }

    #[test]
    fn test_rows_are_row_major() {
        let mut grid = HeightGrid::new(2).unwrap();
        grid.set(0, 0, 1.0);
        grid.set(0, 1, 2.0);
        grid.set(1, 0, 3.0);
        grid.set(1, 1, 4.0);
        let rows: Vec<&[f64]> = grid.rows().collect();
        assert_eq!(rows, vec![&[1.0, 2.0][..], &[3.0, 4.0][..]]);
        assert_eq!(grid.corners(), [1.0, 3.0, 2.0, 4.0]);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_out_of_bounds_panics() {
        let grid = HeightGrid::new(2).unwrap();
        grid.get(2, 0);
    }
}
