//! Inclusive rectangle of cells that limits the search.

use serde::{Deserialize, Serialize};

use crate::core::GridCoord;

/// Inclusive cell rectangle `[min_x, max_x] × [min_y, max_y]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridBounds {
    /// Minimum column (inclusive)
    pub min_x: i32,
    /// Minimum row (inclusive)
    pub min_y: i32,
    /// Maximum column (inclusive)
    pub max_x: i32,
    /// Maximum row (inclusive)
    pub max_y: i32,
}

impl GridBounds {
    /// Create a bounds rectangle. Callers guarantee `min <= max` on each axis.
    #[inline]
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Bounds covering a whole `size_x × size_y` grid.
    #[inline]
    pub fn full(size_x: usize, size_y: usize) -> Self {
        Self::new(0, 0, size_x as i32 - 1, size_y as i32 - 1)
    }

    /// Does the rectangle contain `(x, y)`?
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Does the rectangle contain the coordinate?
    #[inline]
    pub fn contains_coord(&self, coord: GridCoord) -> bool {
        self.contains(coord.x, coord.y)
    }

    /// Side length along x, in cells spanned minus one.
    #[inline]
    pub fn span_x(&self) -> i32 {
        self.max_x - self.min_x
    }

    /// Side length along y, in cells spanned minus one.
    #[inline]
    pub fn span_y(&self) -> i32 {
        self.max_y - self.min_y
    }

    /// Number of cells inside the rectangle.
    #[inline]
    pub fn cell_count(&self) -> usize {
        ((self.span_x() + 1) * (self.span_y() + 1)) as usize
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &GridBounds) -> GridBounds {
        GridBounds::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Iterate every coordinate, row by row.
    pub fn coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        (self.min_y..=self.max_y)
            .flat_map(move |y| (self.min_x..=self.max_x).map(move |x| GridCoord::new(x, y)))
    }
}
