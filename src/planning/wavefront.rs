//! Wavefront cost propagation.
//!
//! Dijkstra-style expansion from a goal cell over the 8-connected grid,
//! restricted to the grid's active bounds. Every reached cell ends with its
//! minimal cost-to-goal and a back-pointer to the next cell toward the goal.
//!
//! Edge cost into a neighbor `n`:
//!
//! ```text
//! step(n)    = |offset| * scale            (3×3 kernel)
//!            * hysteresis_factor           (if n was on the previous local path)
//! penalty(n) = dist_penalty * (max_radius - occ_dist_dyn(n))   when occ_dist_dyn < max_radius
//! cost(n)    = cost(popped) + step(n) + penalty(n)
//! ```
//!
//! Neighbors closer than `abs_min_radius` to an obstacle are never entered,
//! except the search's start cell.

use thiserror::Error;

use crate::config::PlannerConfig;
use crate::cspace::DistanceKernel;
use crate::grid::{GridBounds, PlanGrid};

use super::queue::CostQueue;

/// Recoverable planning outcome
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    /// Start position is outside the grid
    #[error("start position is outside the grid")]
    StartOutOfBounds,

    /// Goal position is outside the grid
    #[error("goal position is outside the grid")]
    GoalOutOfBounds,

    /// The wavefront never reached the start cell
    #[error("goal is unreachable from start")]
    Unreachable,

    /// Local planning needs a global path first
    #[error("no global path to follow")]
    NoGlobalPath,

    /// The global path does not pass through the local window
    #[error("global path does not enter the local window")]
    NoLocalGoal,

    /// A back-pointer chain ended or looped before the goal
    #[error("back-pointer chain is broken")]
    BrokenPath,
}

/// Lifecycle of a single search
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SearchState {
    /// No search has run
    #[default]
    Idle,
    /// Cost field cleared and goal queued
    Seeded,
    /// Popping and relaxing cells
    Expanding,
    /// Queue exhausted; the cost field is live
    Done,
}

/// Counters from one propagation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchStats {
    /// Cells settled
    pub expanded: usize,
    /// Queue pushes, including re-pushes on cost improvement
    pub pushed: usize,
    /// Bounds the search ran in
    pub bounds: GridBounds,
    /// Cost of the search's start cell, infinite if unreached
    pub start_cost: f32,
}

/// Obstacle-proximity penalty for entering a cell at distance `d`.
#[inline]
pub fn proximity_penalty(d: f32, config: &PlannerConfig) -> f32 {
    if d < config.max_radius {
        config.dist_penalty * (config.max_radius - d)
    } else {
        0.0
    }
}

/// Reusable wavefront search.
///
/// The propagator remembers the bounds of its previous search so that
/// seeding clears every cell an earlier search could have labeled.
#[derive(Clone, Debug, Default)]
pub struct Propagator {
    queue: CostQueue,
    state: SearchState,
    last_bounds: Option<GridBounds>,
}

impl Propagator {
    /// Create an idle propagator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current search state.
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Forget the previous search.
    ///
    /// Call after the grid's search fields were reset externally.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.state = SearchState::Idle;
        self.last_bounds = None;
    }

    /// Clear the cost field and queue the goal at cost 0.
    pub fn seed(&mut self, grid: &mut PlanGrid, goal: usize) {
        let bounds = grid.bounds();
        let region = match self.last_bounds {
            Some(last) => last.union(&bounds),
            None => bounds,
        };

        for coord in region.coords() {
            let idx = grid.index(coord.x, coord.y);
            grid.cell_at_mut(idx).reset_plan();
        }

        self.queue.clear();
        let cell = grid.cell_at_mut(goal);
        cell.plan_cost = 0.0;
        cell.plan_next = None;
        self.queue.push(goal, 0.0);

        self.last_bounds = Some(bounds);
        self.state = SearchState::Seeded;
    }

    /// Expand the seeded search until the queue is exhausted.
    ///
    /// `start` is always admissible, whatever its obstacle distance.
    pub fn expand(
        &mut self,
        grid: &mut PlanGrid,
        kernel: &DistanceKernel,
        config: &PlannerConfig,
        start: Option<usize>,
    ) -> SearchStats {
        self.state = SearchState::Expanding;

        let bounds = grid.bounds();
        let mut expanded = 0;
        let mut pushed = 1;

        while let Some((idx, _)) = self.queue.pop() {
            let (center, cost) = {
                let cell = grid.cell_at_mut(idx);
                if cell.mark {
                    continue;
                }
                cell.mark = true;
                (cell.coord, cell.plan_cost)
            };
            expanded += 1;

            for n in center.neighbors_8() {
                if !bounds.contains_coord(n) {
                    continue;
                }
                let n_idx = grid.index(n.x, n.y);
                let neighbor = grid.cell_at(n_idx);
                if neighbor.mark {
                    continue;
                }
                if neighbor.occ_dist_dyn < config.abs_min_radius && Some(n_idx) != start {
                    continue;
                }

                let Some(mut step) = kernel.local_weight(n.x - center.x, n.y - center.y) else {
                    continue;
                };
                if neighbor.lpath_mark {
                    step *= config.hysteresis_factor;
                }
                let new_cost = cost + step + proximity_penalty(neighbor.occ_dist_dyn, config);

                if new_cost < neighbor.plan_cost {
                    let neighbor = grid.cell_at_mut(n_idx);
                    neighbor.plan_cost = new_cost;
                    neighbor.plan_next = Some(idx);
                    self.queue.push(n_idx, new_cost);
                    pushed += 1;
                }
            }
        }

        self.state = SearchState::Done;

        SearchStats {
            expanded,
            pushed,
            bounds,
            start_cost: start
                .map(|s| grid.cell_at(s).plan_cost)
                .unwrap_or(f32::INFINITY),
        }
    }

    /// Seed at `goal` and expand to exhaustion.
    pub fn propagate(
        &mut self,
        grid: &mut PlanGrid,
        kernel: &DistanceKernel,
        config: &PlannerConfig,
        goal: usize,
        start: Option<usize>,
    ) -> SearchStats {
        self.seed(grid, goal);
        let stats = self.expand(grid, kernel, config, start);
        tracing::debug!(
            "Wavefront: expanded {} cells ({} pushes) in [{},{}]x[{},{}]",
            stats.expanded,
            stats.pushed,
            stats.bounds.min_x,
            stats.bounds.max_x,
            stats.bounds.min_y,
            stats.bounds.max_y
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GridCoord, WorldPoint};
    use crate::cspace::{build_static, init_distances};
    use crate::grid::Occupancy;
    use approx::assert_relative_eq;

    fn config() -> PlannerConfig {
        PlannerConfig {
            abs_min_radius: 0.5,
            des_min_radius: 1.0,
            max_radius: 2.0,
            dist_penalty: 1.0,
            hysteresis_factor: 0.5,
        }
    }

    fn setup(size: usize, occupied: &[(i32, i32)]) -> (PlanGrid, DistanceKernel) {
        let mut grid = PlanGrid::new(size, size, 1.0, WorldPoint::new(-0.5, -0.5)).unwrap();
        grid.fill(Occupancy::Free);
        for &(x, y) in occupied {
            grid.set_occupancy(GridCoord::new(x, y), Occupancy::Occupied);
        }
        let cfg = config();
        init_distances(&mut grid, cfg.max_radius);
        let kernel = DistanceKernel::new(1.0, cfg.max_radius);
        build_static(&mut grid, &kernel);
        (grid, kernel)
    }

    #[test]
    fn test_penalty_shape() {
        let cfg = config();
        assert_relative_eq!(proximity_penalty(0.0, &cfg), 2.0);
        assert_relative_eq!(proximity_penalty(1.5, &cfg), 0.5);
        assert_eq!(proximity_penalty(2.0, &cfg), 0.0);
        assert_eq!(proximity_penalty(5.0, &cfg), 0.0);
    }

    #[test]
    fn test_open_grid_costs_are_euclidean() {
        let (mut grid, kernel) = setup(6, &[]);
        let goal = grid.index(0, 0);
        let mut p = Propagator::new();
        let stats = p.propagate(&mut grid, &kernel, &config(), goal, None);

        assert_eq!(p.state(), SearchState::Done);
        assert_eq!(stats.expanded, 36);
        assert_relative_eq!(grid.cell_at(grid.index(3, 0)).plan_cost, 3.0);
        assert_relative_eq!(grid.cell_at(grid.index(2, 2)).plan_cost, 2.0 * 2f32.sqrt(), epsilon = 1e-5);
        assert_eq!(grid.cell_at(goal).plan_next, None);
        assert_eq!(grid.cell_at(grid.index(1, 0)).plan_next, Some(goal));
    }

    #[test]
    fn test_blocked_cells_not_entered() {
        // Wall along x = 3 except the top row
        let wall: Vec<(i32, i32)> = (0..9).map(|y| (3, y)).collect();
        let (mut grid, kernel) = setup(10, &wall);
        let goal = grid.index(0, 0);
        let mut p = Propagator::new();
        p.propagate(&mut grid, &kernel, &config(), goal, None);

        assert!(!grid.cell_at(grid.index(3, 4)).is_reached());
        // Reached around the wall through the top row gap
        assert!(grid.cell_at(grid.index(6, 0)).is_reached());
    }

    #[test]
    fn test_start_cell_always_admissible() {
        let (mut grid, kernel) = setup(8, &[(4, 4)]);
        let start = grid.index(4, 4);
        let goal = grid.index(0, 0);
        let mut p = Propagator::new();

        let stats = p.propagate(&mut grid, &kernel, &config(), goal, None);
        assert!(stats.start_cost.is_infinite());

        let stats = p.propagate(&mut grid, &kernel, &config(), goal, Some(start));
        assert!(stats.start_cost.is_finite());
    }

    #[test]
    fn test_bounds_limit_search_and_stale_fields_cleared() {
        let (mut grid, kernel) = setup(10, &[]);
        let mut p = Propagator::new();

        let goal = grid.index(0, 0);
        p.propagate(&mut grid, &kernel, &config(), goal, None);
        assert!(grid.cell_at(grid.index(9, 9)).is_reached());

        grid.set_bounds(0, 0, 3, 3);
        let stats = p.propagate(&mut grid, &kernel, &config(), goal, None);
        assert_eq!(stats.expanded, 16);
        // Labels from the earlier full search are gone
        assert!(!grid.cell_at(grid.index(9, 9)).is_reached());
        assert_eq!(grid.cell_at(grid.index(9, 9)).plan_next, None);
    }

    #[test]
    fn test_hysteresis_discounts_marked_cells() {
        let (mut grid, kernel) = setup(6, &[]);
        let goal = grid.index(0, 0);
        let marked = grid.index(1, 0);
        grid.cell_at_mut(marked).lpath_mark = true;

        let mut p = Propagator::new();
        p.propagate(&mut grid, &kernel, &config(), goal, None);
        assert_relative_eq!(grid.cell_at(marked).plan_cost, 0.5);
    }
}
