//! Planning grid storage.
//!
//! Owns the flat, row-major cell array (`index = cj * size_x + ci`), the
//! world-to-grid mapping, and the active search bounds.

use crate::core::{GridCoord, WorldPoint};
use crate::error::{MargaError, Result};

use super::bounds::GridBounds;
use super::cell::{Cell, Occupancy};

/// Planning grid.
///
/// The grid uses a coordinate system where:
/// - (0, 0) is the cell whose lower-left corner is `origin`
/// - Positive X is to the right, positive Y is up
/// - Cell (i, j) covers `origin + [i, i+1) * scale` × `origin + [j, j+1) * scale`
///
/// Cloning performs a deep copy of the cell array.
#[derive(Clone, Debug)]
pub struct PlanGrid {
    size_x: usize,
    size_y: usize,
    origin: WorldPoint,
    scale: f32,
    cells: Vec<Cell>,
    bounds: GridBounds,
}

impl PlanGrid {
    /// Create a grid of unknown cells.
    ///
    /// Fails when either dimension is zero or `scale` is not a positive number.
    pub fn new(size_x: usize, size_y: usize, scale: f32, origin: WorldPoint) -> Result<Self> {
        if size_x == 0 || size_y == 0 {
            return Err(MargaError::Map(format!(
                "grid dimensions must be non-zero, got {}x{}",
                size_x, size_y
            )));
        }
        if !(scale > 0.0 && scale.is_finite()) {
            return Err(MargaError::Map(format!(
                "grid scale must be positive, got {}",
                scale
            )));
        }
        if size_x > i32::MAX as usize || size_y > i32::MAX as usize {
            return Err(MargaError::Map(format!(
                "grid dimensions {}x{} exceed the coordinate range",
                size_x, size_y
            )));
        }

        let cells = (0..size_y)
            .flat_map(|j| (0..size_x).map(move |i| Cell::new(GridCoord::new(i as i32, j as i32))))
            .collect();

        Ok(Self {
            size_x,
            size_y,
            origin,
            scale,
            cells,
            bounds: GridBounds::full(size_x, size_y),
        })
    }

    // === Basic Properties ===

    /// Grid width in cells.
    #[inline]
    pub fn size_x(&self) -> usize {
        self.size_x
    }

    /// Grid height in cells.
    #[inline]
    pub fn size_y(&self) -> usize {
        self.size_y
    }

    /// World units per cell.
    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// World coordinates of the lower-left corner of cell (0, 0).
    #[inline]
    pub fn origin(&self) -> WorldPoint {
        self.origin
    }

    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Active search bounds.
    #[inline]
    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Bounds covering the whole grid.
    #[inline]
    pub fn full_bounds(&self) -> GridBounds {
        GridBounds::full(self.size_x, self.size_y)
    }

    // === Coordinate Conversion ===

    /// Convert world coordinates to grid coordinates (floor quantization).
    #[inline]
    pub fn world_to_grid(&self, point: WorldPoint) -> GridCoord {
        let x = ((point.x - self.origin.x) / self.scale).floor() as i32;
        let y = ((point.y - self.origin.y) / self.scale).floor() as i32;
        GridCoord::new(x, y)
    }

    /// Convert grid coordinates to world coordinates (cell center).
    #[inline]
    pub fn grid_to_world(&self, coord: GridCoord) -> WorldPoint {
        WorldPoint::new(
            self.origin.x + (coord.x as f32 + 0.5) * self.scale,
            self.origin.y + (coord.y as f32 + 0.5) * self.scale,
        )
    }

    /// Is `(i, j)` inside the full grid?
    #[inline]
    pub fn is_valid(&self, i: i32, j: i32) -> bool {
        i >= 0 && j >= 0 && (i as usize) < self.size_x && (j as usize) < self.size_y
    }

    /// Is `(i, j)` inside the active search bounds?
    #[inline]
    pub fn is_valid_in_bounds(&self, i: i32, j: i32) -> bool {
        self.bounds.contains(i, j)
    }

    /// Does the world point fall inside the active search bounds?
    pub fn check_in_bounds(&self, point: WorldPoint) -> bool {
        point.x.is_finite()
            && point.y.is_finite()
            && self.bounds.contains_coord(self.world_to_grid(point))
    }

    /// Flat index of `(i, j)`. The coordinate must be valid.
    #[inline]
    pub fn index(&self, i: i32, j: i32) -> usize {
        debug_assert!(self.is_valid(i, j), "cell ({}, {}) outside grid", i, j);
        j as usize * self.size_x + i as usize
    }

    /// Flat index of a coordinate, or `None` when it lies outside the grid.
    #[inline]
    pub fn index_of(&self, coord: GridCoord) -> Option<usize> {
        self.is_valid(coord.x, coord.y)
            .then(|| self.index(coord.x, coord.y))
    }

    /// Flat index of the cell containing a world point.
    ///
    /// Non-finite coordinates (e.g. no-return beams) are outside the grid.
    #[inline]
    pub fn index_of_world(&self, point: WorldPoint) -> Option<usize> {
        if !(point.x.is_finite() && point.y.is_finite()) {
            return None;
        }
        self.index_of(self.world_to_grid(point))
    }

    // === Cell Access ===

    /// Cell at a coordinate.
    #[inline]
    pub fn cell(&self, coord: GridCoord) -> Option<&Cell> {
        self.index_of(coord).map(|idx| &self.cells[idx])
    }

    /// Cell at a flat index. Panics on an out-of-range index.
    #[inline]
    pub fn cell_at(&self, idx: usize) -> &Cell {
        &self.cells[idx]
    }

    #[inline]
    pub(crate) fn cell_at_mut(&mut self, idx: usize) -> &mut Cell {
        &mut self.cells[idx]
    }

    /// All cells, row-major.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Static occupancy at a coordinate (`Unknown` outside the grid).
    pub fn occupancy(&self, coord: GridCoord) -> Occupancy {
        self.cell(coord)
            .map(|c| c.occ_state)
            .unwrap_or(Occupancy::Unknown)
    }

    /// Set the static occupancy of a cell. Returns false outside the grid.
    ///
    /// Distances are not updated; call the planner's `init()` and rebuild
    /// the configuration space after editing occupancy.
    pub fn set_occupancy(&mut self, coord: GridCoord, occupancy: Occupancy) -> bool {
        match self.index_of(coord) {
            Some(idx) => {
                self.cells[idx].occ_state = occupancy;
                true
            }
            None => false,
        }
    }

    /// Set every cell's static occupancy.
    pub fn fill(&mut self, occupancy: Occupancy) {
        for cell in &mut self.cells {
            cell.occ_state = occupancy;
        }
    }

    /// Static obstacle distance at a coordinate (0 outside the grid).
    pub fn obstacle_distance(&self, coord: GridCoord) -> f32 {
        self.cell(coord).map(|c| c.occ_dist).unwrap_or(0.0)
    }

    /// Static-plus-dynamic obstacle distance at a coordinate (0 outside the grid).
    pub fn dynamic_obstacle_distance(&self, coord: GridCoord) -> f32 {
        self.cell(coord).map(|c| c.occ_dist_dyn).unwrap_or(0.0)
    }

    // === Search Bounds ===

    /// Restrict the search to `[min_x, max_x] × [min_y, max_y]`.
    ///
    /// Each bound is clamped into the grid first.
    ///
    /// # Panics
    /// If `min > max` on either axis after clamping.
    pub fn set_bounds(&mut self, min_x: i32, min_y: i32, max_x: i32, max_y: i32) {
        let hx = self.size_x as i32 - 1;
        let hy = self.size_y as i32 - 1;

        let min_x = min_x.clamp(0, hx);
        let min_y = min_y.clamp(0, hy);
        let max_x = max_x.clamp(0, hx);
        let max_y = max_y.clamp(0, hy);

        assert!(
            min_x <= max_x,
            "invalid search bounds: min_x {} > max_x {}",
            min_x,
            max_x
        );
        assert!(
            min_y <= max_y,
            "invalid search bounds: min_y {} > max_y {}",
            min_y,
            max_y
        );

        self.bounds = GridBounds::new(min_x, min_y, max_x, max_y);
    }

    /// Reset the search bounds to the whole grid.
    pub fn set_full_bounds(&mut self) {
        self.bounds = self.full_bounds();
    }

    /// Size the search bounds around two world points.
    ///
    /// The box enclosing both points is padded by `padding` (half on each
    /// side), then grown symmetrically until each side spans at least
    /// `min_size`, never past the grid edges.
    pub fn set_bounding_box(&mut self, padding: f32, min_size: f32, p0: WorldPoint, p1: WorldPoint) {
        let g0 = self.world_to_grid(p0);
        let g1 = self.world_to_grid(p1);

        let hx = self.size_x as i32 - 1;
        let hy = self.size_y as i32 - 1;

        let mut min_x = g0.x.min(g1.x);
        let mut min_y = g0.y.min(g1.y);
        let mut max_x = g0.x.max(g1.x);
        let mut max_y = g0.y.max(g1.y);

        // The minimum size must be achievable inside the grid
        let gmin_size = ((min_size / self.scale).ceil() as i32).min(hx.min(hy)).max(0);

        let gpadding = (padding / self.scale).ceil() as i32;
        min_x = (min_x - gpadding / 2).max(0);
        max_x = (max_x + gpadding / 2).min(hx);
        min_y = (min_y - gpadding / 2).max(0);
        max_y = (max_y + gpadding / 2).min(hy);

        // Points beyond the grid can leave min past max; pin them first
        min_x = min_x.min(hx);
        min_y = min_y.min(hy);
        max_x = max_x.max(0);
        max_y = max_y.max(0);

        let (min_x, max_x) = grow_span(min_x, max_x, gmin_size, hx);
        let (min_y, max_y) = grow_span(min_y, max_y, gmin_size, hy);

        self.set_bounds(min_x, min_y, max_x, max_y);
    }
}

/// Grow `[lo, hi]` symmetrically until `hi - lo >= target`, clamped to `[0, limit]`.
fn grow_span(mut lo: i32, mut hi: i32, target: i32, limit: i32) -> (i32, i32) {
    while hi - lo < target {
        let step = ((target - (hi - lo)) as f32 / 2.0).ceil() as i32;
        lo = (lo - step).max(0);
        hi = (hi + step).min(limit);
    }
    (lo, hi)
}
