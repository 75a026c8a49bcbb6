//! Configuration-space construction.
//!
//! The static pass stamps the distance kernel around every non-free map
//! cell. The dynamic pass resets the overlay to the static baseline and
//! stamps the kernel around each observed obstacle point.

use crate::core::{GridCoord, WorldPoint};
use crate::grid::{Cell, GridBounds, Occupancy, PlanGrid};

use super::kernel::DistanceKernel;

/// Seed obstacle distances from static occupancy.
///
/// Free cells start at `max_radius`, everything else at 0. The dynamic
/// overlay is copied from the static layer and all search state is cleared.
pub fn init_distances(grid: &mut PlanGrid, max_radius: f32) {
    for cell in grid.cells_mut() {
        cell.occ_dist = if cell.occ_state.is_free() {
            max_radius
        } else {
            0.0
        };
        cell.occ_state_dyn = cell.occ_state;
        cell.occ_dist_dyn = cell.occ_dist;
        cell.lpath_mark = false;
        cell.reset_plan();
    }
}

/// Build static obstacle distances inside the grid's active bounds.
///
/// Every non-free cell inside the bounds is a source. Both layers are only
/// lowered, so repeated builds are idempotent and keep the dynamic overlay.
/// Returns the number of sources.
///
/// # Panics
/// If the kernel was built for a different grid scale.
pub fn build_static(grid: &mut PlanGrid, kernel: &DistanceKernel) -> usize {
    assert!(
        kernel.scale() == grid.scale(),
        "distance kernel built for scale {} used on grid with scale {}",
        kernel.scale(),
        grid.scale()
    );

    let bounds = grid.bounds();
    let mut sources = 0;

    for coord in bounds.coords() {
        let idx = grid.index(coord.x, coord.y);
        if grid.cell_at(idx).occ_state.is_free() {
            continue;
        }
        sources += 1;
        stamp(grid, kernel, coord, bounds, |cell, w| {
            cell.occ_dist = cell.occ_dist.min(w);
            cell.occ_dist_dyn = cell.occ_dist_dyn.min(w);
        });
    }

    sources
}

/// Replace the dynamic obstacle overlay.
///
/// Resets every cell's dynamic state to its static baseline, then marks each
/// point's cell occupied and stamps the kernel around it over the full grid.
/// Points outside the grid and repeated cells are skipped. Returns the number
/// of distinct cells applied.
pub fn apply_dynamic_obstacles(
    grid: &mut PlanGrid,
    kernel: &DistanceKernel,
    points: &[WorldPoint],
) -> usize {
    for cell in grid.cells_mut() {
        cell.occ_state_dyn = cell.occ_state;
        cell.occ_dist_dyn = cell.occ_dist;
        cell.mark = false;
    }

    let full = grid.full_bounds();
    let mut applied = 0;

    for &point in points {
        let Some(idx) = grid.index_of_world(point) else {
            continue;
        };

        let cell = grid.cell_at_mut(idx);
        if cell.mark {
            continue;
        }
        cell.mark = true;
        cell.occ_state_dyn = Occupancy::Occupied;
        cell.occ_dist_dyn = 0.0;
        let center = cell.coord;

        applied += 1;
        stamp(grid, kernel, center, full, |cell, w| {
            cell.occ_dist_dyn = cell.occ_dist_dyn.min(w);
        });
    }

    tracing::trace!(
        "Dynamic overlay: {} of {} points applied",
        applied,
        points.len()
    );

    applied
}

/// Apply `update` to every cell under the kernel centered at `center`, limited to `bounds`.
fn stamp<F>(grid: &mut PlanGrid, kernel: &DistanceKernel, center: GridCoord, bounds: GridBounds, update: F)
where
    F: Fn(&mut Cell, f32),
{
    let h = kernel.half_width();
    let min_x = (center.x - h).max(bounds.min_x);
    let max_x = (center.x + h).min(bounds.max_x);
    let min_y = (center.y - h).max(bounds.min_y);
    let max_y = (center.y + h).min(bounds.max_y);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let Some(w) = kernel.weight(x - center.x, y - center.y) else {
                continue;
            };
            let idx = grid.index(x, y);
            update(grid.cell_at_mut(idx), w);
        }
    }
}
