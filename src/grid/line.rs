//! Bresenham line traversal used by the visibility and carrot checks.
//!
//! ```text
//! From (0,0) to (7,3):
//!
//!     3 │        ●
//!     2 │     ●●
//!     1 │  ●●
//!     0 ●●
//!       └──────────
//!        0 1 2 3 4 5 6 7
//! ```

use crate::core::GridCoord;

/// Iterator over every cell on the segment between two cells, both ends included.
pub struct BresenhamLine {
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
    x_inc: i32,
    y_inc: i32,
    error: i32,
    steep: bool,
    end_x: i32,
    end_y: i32,
    done: bool,
}

impl BresenhamLine {
    /// Create a line iterator from `start` to `end`.
    pub fn new(start: GridCoord, end: GridCoord) -> Self {
        let dx = (end.x - start.x).abs();
        let dy = (end.y - start.y).abs();
        let steep = dy > dx;

        // Walk along the major axis; swap so it is always `x`.
        let (x, y, end_x, end_y, dx, dy) = if steep {
            (start.y, start.x, end.y, end.x, dy, dx)
        } else {
            (start.x, start.y, end.x, end.y, dx, dy)
        };

        Self {
            x,
            y,
            dx,
            dy,
            x_inc: if end_x > x { 1 } else { -1 },
            y_inc: if end_y > y { 1 } else { -1 },
            error: dx / 2,
            steep,
            end_x,
            end_y,
            done: false,
        }
    }
}

impl Iterator for BresenhamLine {
    type Item = GridCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let current = if self.steep {
            GridCoord::new(self.y, self.x)
        } else {
            GridCoord::new(self.x, self.y)
        };

        if self.x == self.end_x && self.y == self.end_y {
            self.done = true;
            return Some(current);
        }

        self.error -= self.dy;
        if self.error < 0 {
            self.y += self.y_inc;
            self.error += self.dx;
        }
        self.x += self.x_inc;

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(from: (i32, i32), to: (i32, i32)) -> Vec<GridCoord> {
        BresenhamLine::new(GridCoord::new(from.0, from.1), GridCoord::new(to.0, to.1)).collect()
    }

    #[test]
    fn test_single_cell() {
        assert_eq!(cells((3, 3), (3, 3)), vec![GridCoord::new(3, 3)]);
    }

    #[test]
    fn test_endpoints_included() {
        let line = cells((0, 0), (7, 3));
        assert_eq!(line.len(), 8);
        assert_eq!(line.first(), Some(&GridCoord::new(0, 0)));
        assert_eq!(line.last(), Some(&GridCoord::new(7, 3)));
    }

    #[test]
    fn test_steep_negative_direction() {
        let line = cells((2, 5), (1, -1));
        assert_eq!(line.len(), 7);
        assert_eq!(line.last(), Some(&GridCoord::new(1, -1)));
        // Consecutive cells are always 8-connected
        for pair in line.windows(2) {
            assert_eq!(pair[0].chebyshev_distance(&pair[1]), 1);
        }
    }
}
