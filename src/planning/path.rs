//! Path extraction and waypoint reduction over a live cost field.

use crate::core::GridCoord;
use crate::grid::{BresenhamLine, PlanGrid};

use super::wavefront::PlanError;

/// Follow back-pointers from `start` to the goal (the cell with cost 0).
///
/// Returns cell indices ordered start to goal. Fails with
/// [`PlanError::Unreachable`] when `start` has no finite cost and
/// [`PlanError::BrokenPath`] when the chain ends early or runs longer than
/// the grid has cells.
pub fn extract_path(grid: &PlanGrid, start: usize) -> Result<Vec<usize>, PlanError> {
    if !grid.cell_at(start).is_reached() {
        return Err(PlanError::Unreachable);
    }

    let mut path = Vec::new();
    let mut current = start;

    loop {
        path.push(current);
        if path.len() > grid.cell_count() {
            return Err(PlanError::BrokenPath);
        }

        let cell = grid.cell_at(current);
        if cell.plan_cost == 0.0 {
            return Ok(path);
        }
        match cell.plan_next {
            Some(next) => current = next,
            None => return Err(PlanError::BrokenPath),
        }
    }
}

/// Is the straight segment `a`-`b` clear by at least `min_distance`?
///
/// Samples every cell on the Bresenham line, both ends included, against the
/// dynamic obstacle distance. Cells off the grid fail.
pub fn test_reachable(grid: &PlanGrid, a: GridCoord, b: GridCoord, min_distance: f32) -> bool {
    BresenhamLine::new(a, b).all(|c| {
        grid.cell(c)
            .is_some_and(|cell| cell.occ_dist_dyn >= min_distance)
    })
}

/// Greedy string-pulling of a cell path.
///
/// From each waypoint, the next one is the furthest path cell still visible
/// from it. The first and last path cells are always kept and the
/// reduction always advances by at least one cell.
pub fn reduce_waypoints(grid: &PlanGrid, path: &[usize], min_distance: f32) -> Vec<usize> {
    let Some(&first) = path.first() else {
        return Vec::new();
    };

    let mut waypoints = vec![first];
    let mut i = 0;

    while i + 1 < path.len() {
        let from = grid.cell_at(path[i]).coord;
        let mut j = i + 1;
        while j + 1 < path.len()
            && test_reachable(grid, from, grid.cell_at(path[j + 1]).coord, min_distance)
        {
            j += 1;
        }
        waypoints.push(path[j]);
        i = j;
    }

    waypoints
}
