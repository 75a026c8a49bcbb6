//! Lookahead target selection along the live cost field.

use crate::config::PlannerConfig;
use crate::core::{GridCoord, WorldPoint};
use crate::grid::{BresenhamLine, PlanGrid};
use crate::planning::proximity_penalty;

/// Lookahead target for local steering
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Carrot {
    /// Target position in world coordinates
    pub point: WorldPoint,
    /// Selection score (lower is better)
    pub cost: f32,
}

/// Pick a carrot for a robot standing in cell `robot`.
///
/// Candidate lookahead lengths run from `lookahead` down to one cell; a
/// lookahead shorter than a cell still tries one step. For each
/// length the back-pointer chain is walked that many cells (stopping at the
/// goal) and the straight segment from the robot to the candidate is scored
/// by its accumulated proximity penalty plus `distance_weight / length²`.
/// Segments that pass closer than `abs_min_radius` to an obstacle are
/// rejected. The lowest score wins.
///
/// Returns `None` when the robot cell is unreached or no segment is clear.
pub fn find_carrot(
    grid: &PlanGrid,
    config: &PlannerConfig,
    robot: usize,
    lookahead: f32,
    distance_weight: f32,
) -> Option<Carrot> {
    let robot_cell = grid.cell_at(robot);
    if !robot_cell.is_reached() {
        return None;
    }
    let origin = robot_cell.coord;
    let scale = grid.scale();

    let mut best: Option<Carrot> = None;
    // At least one single-step candidate
    let mut length = lookahead.max(scale);

    while length >= scale {
        let steps = (length / scale).round() as usize;

        let mut idx = robot;
        for _ in 0..steps {
            match grid.cell_at(idx).plan_next {
                Some(next) => idx = next,
                None => break,
            }
        }

        let target = grid.cell_at(idx).coord;
        if let Some(penalty) = segment_penalty(grid, config, origin, target) {
            let cost = penalty + distance_weight / (length * length);
            if best.is_none_or(|b| cost < b.cost) {
                best = Some(Carrot {
                    point: grid.grid_to_world(target),
                    cost,
                });
            }
        }

        length -= scale;
    }

    best
}

/// Sum of proximity penalties along `from`-`to`, `from` excluded.
///
/// `None` if any cell is off the grid or inside `abs_min_radius`.
fn segment_penalty(
    grid: &PlanGrid,
    config: &PlannerConfig,
    from: GridCoord,
    to: GridCoord,
) -> Option<f32> {
    let mut total = 0.0;
    for coord in BresenhamLine::new(from, to).skip(1) {
        let d = grid.cell(coord)?.occ_dist_dyn;
        if d < config.abs_min_radius {
            return None;
        }
        total += proximity_penalty(d, config);
    }
    Some(total)
}
