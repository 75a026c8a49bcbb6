//! Wavefront planner.
//!
//! Owns the grid, distance kernel and propagator, and drives one planning
//! cycle: obstacles, configuration space, global or local search, waypoints,
//! carrot.

use std::path::Path;

use crate::config::PlannerConfig;
use crate::control::{Carrot, find_carrot};
use crate::core::WorldPoint;
use crate::cspace::{
    DistanceKernel, apply_dynamic_obstacles, build_static, init_distances, load_cspace,
    save_cspace,
};
use crate::error::Result;
use crate::grid::PlanGrid;

use super::path::{extract_path, reduce_waypoints};
use super::wavefront::{PlanError, Propagator, SearchState, SearchStats};

/// Grid-search navigation planner.
///
/// Typical cycle:
///
/// ```text
/// set_obstacles(points)          dynamic overlay
/// do_global(start, goal)         full-grid wavefront, caches the global path
/// do_local(pose, half_width)     windowed wavefront toward the global path
/// update_waypoints(pose)         string-pulled waypoints
/// get_carrot(pose, ...)          steering target
/// ```
#[derive(Debug)]
pub struct WavefrontPlanner {
    config: PlannerConfig,
    grid: PlanGrid,
    kernel: DistanceKernel,
    propagator: Propagator,
    global_path: Vec<usize>,
    local_path: Vec<usize>,
    waypoints: Vec<usize>,
}

impl WavefrontPlanner {
    /// Create a planner over a grid whose static occupancy is populated.
    ///
    /// Runs [`init`](Self::init); the configuration space still has to be
    /// built with [`build_cspace`](Self::build_cspace).
    pub fn new(config: PlannerConfig, grid: PlanGrid) -> Result<Self> {
        config.validate()?;
        let kernel = DistanceKernel::new(grid.scale(), config.max_radius);
        let mut planner = Self {
            config,
            grid,
            kernel,
            propagator: Propagator::new(),
            global_path: Vec::new(),
            local_path: Vec::new(),
            waypoints: Vec::new(),
        };
        planner.init();
        Ok(planner)
    }

    /// Planner configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Planning grid.
    pub fn grid(&self) -> &PlanGrid {
        &self.grid
    }

    /// Mutable planning grid.
    ///
    /// After editing static occupancy call [`init`](Self::init) and rebuild
    /// the configuration space.
    pub fn grid_mut(&mut self) -> &mut PlanGrid {
        &mut self.grid
    }

    /// Distance kernel for the current geometry.
    pub fn kernel(&self) -> &DistanceKernel {
        &self.kernel
    }

    /// State of the most recent search.
    pub fn search_state(&self) -> SearchState {
        self.propagator.state()
    }

    /// Re-seed distances from static occupancy and clear all search state.
    ///
    /// Rebuilds the kernel if the grid scale or `max_radius` changed and
    /// resets the search bounds to the full grid.
    pub fn init(&mut self) {
        self.refresh_kernel();
        init_distances(&mut self.grid, self.config.max_radius);
        self.grid.set_full_bounds();
        self.propagator.reset();
        self.clear_paths();
    }

    /// Clear cost fields, back-pointers, marks and cached paths.
    ///
    /// Obstacle distances are kept.
    pub fn reset(&mut self) {
        for cell in self.grid.cells_mut() {
            cell.reset_plan();
            cell.lpath_mark = false;
        }
        self.propagator.reset();
        self.clear_paths();
    }

    /// Build static obstacle distances inside the active bounds.
    ///
    /// Returns the number of obstacle cells stamped.
    pub fn build_cspace(&mut self) -> usize {
        self.refresh_kernel();
        let sources = build_static(&mut self.grid, &self.kernel);
        tracing::info!(
            "Configuration space built: {} obstacle cells, kernel {}x{}",
            sources,
            self.kernel.width(),
            self.kernel.width()
        );
        sources
    }

    /// Load static distances from a cache file, or build and save them.
    ///
    /// Returns `true` when the cache was used. A rejected cache is rebuilt
    /// over the full grid and overwritten; only a failed write is an error.
    pub fn build_cspace_cached(&mut self, path: &Path) -> Result<bool> {
        self.grid.set_full_bounds();

        match load_cspace(&mut self.grid, self.config.max_radius, path) {
            Ok(()) => {
                tracing::info!("Configuration space loaded from {}", path.display());
                return Ok(true);
            }
            Err(e) => {
                tracing::warn!(
                    "Configuration space cache {} not used ({}), recomputing",
                    path.display(),
                    e
                );
            }
        }

        self.build_cspace();
        save_cspace(&self.grid, self.config.max_radius, path)?;
        tracing::info!("Configuration space saved to {}", path.display());
        Ok(false)
    }

    /// Replace the dynamic obstacle overlay.
    ///
    /// Points outside the grid are ignored. Returns the number of distinct
    /// cells marked.
    pub fn set_obstacles(&mut self, points: &[WorldPoint]) -> usize {
        self.refresh_kernel();
        apply_dynamic_obstacles(&mut self.grid, &self.kernel, points)
    }

    /// Replace the dynamic obstacle overlay from flat `[x0, y0, x1, y1, ...]`.
    ///
    /// A trailing unpaired value is ignored.
    pub fn set_obstacles_xy(&mut self, coords: &[f32]) -> usize {
        if coords.len() % 2 != 0 {
            tracing::warn!(
                "Obstacle array has odd length {}, ignoring last value",
                coords.len()
            );
        }
        let points: Vec<WorldPoint> = coords
            .chunks_exact(2)
            .map(|xy| WorldPoint::new(xy[0], xy[1]))
            .collect();
        self.set_obstacles(&points)
    }

    // === Global and local planning ===

    /// Plan from `start` to `goal` over the whole grid.
    pub fn do_global(&mut self, start: WorldPoint, goal: WorldPoint) -> bool {
        self.plan_global(start, goal).is_ok()
    }

    /// Plan from `start` to `goal` over the whole grid, caching the global path.
    pub fn plan_global(
        &mut self,
        start: WorldPoint,
        goal: WorldPoint,
    ) -> std::result::Result<SearchStats, PlanError> {
        self.grid.set_full_bounds();

        let start_idx = self
            .grid
            .index_of_world(start)
            .ok_or(PlanError::StartOutOfBounds)?;
        let goal_idx = self
            .grid
            .index_of_world(goal)
            .ok_or(PlanError::GoalOutOfBounds)?;

        self.waypoints.clear();
        let stats = self.propagator.propagate(
            &mut self.grid,
            &self.kernel,
            &self.config,
            goal_idx,
            Some(start_idx),
        );

        match extract_path(&self.grid, start_idx) {
            Ok(path) => {
                tracing::debug!(
                    "Global path: {} cells, cost {:.3}",
                    path.len(),
                    stats.start_cost
                );
                self.global_path = path;
                Ok(stats)
            }
            Err(e) => {
                tracing::warn!(
                    "Global plan ({:.2}, {:.2}) -> ({:.2}, {:.2}) failed: {}",
                    start.x,
                    start.y,
                    goal.x,
                    goal.y,
                    e
                );
                self.global_path.clear();
                Err(e)
            }
        }
    }

    /// Replan inside a window around `start` toward the global path.
    pub fn do_local(&mut self, start: WorldPoint, half_width: f32) -> bool {
        self.plan_local(start, half_width).is_ok()
    }

    /// Replan inside a `2 * half_width` square around `start`.
    ///
    /// The local goal is the furthest global path cell, continuing forward
    /// from the one nearest `start`, that is still inside the window. On
    /// success the new local path replaces the previous one for hysteresis;
    /// on failure the previous local path is kept.
    pub fn plan_local(
        &mut self,
        start: WorldPoint,
        half_width: f32,
    ) -> std::result::Result<SearchStats, PlanError> {
        if self.global_path.is_empty() {
            return Err(PlanError::NoGlobalPath);
        }
        let start_idx = self
            .grid
            .index_of_world(start)
            .ok_or(PlanError::StartOutOfBounds)?;

        self.grid
            .set_bounding_box(0.0, 2.0 * half_width, start, start);
        let goal_idx = self.local_goal(start_idx)?;

        self.waypoints.clear();
        let stats = self.propagator.propagate(
            &mut self.grid,
            &self.kernel,
            &self.config,
            goal_idx,
            Some(start_idx),
        );

        let path = extract_path(&self.grid, start_idx).inspect_err(|e| {
            tracing::warn!("Local plan from ({:.2}, {:.2}) failed: {}", start.x, start.y, e);
        })?;

        for &idx in &self.local_path {
            self.grid.cell_at_mut(idx).lpath_mark = false;
        }
        for &idx in &path {
            self.grid.cell_at_mut(idx).lpath_mark = true;
        }
        tracing::debug!("Local path: {} cells", path.len());
        self.local_path = path;

        Ok(stats)
    }

    /// Furthest in-window global path cell, walking forward from the one nearest `start`.
    fn local_goal(&self, start: usize) -> std::result::Result<usize, PlanError> {
        let bounds = self.grid.bounds();
        let origin = self.grid.cell_at(start).coord;

        let nearest = self
            .global_path
            .iter()
            .enumerate()
            .min_by_key(|&(_, &idx)| self.grid.cell_at(idx).coord.distance_squared(&origin))
            .map(|(i, _)| i)
            .ok_or(PlanError::NoGlobalPath)?;

        let mut goal = self.global_path[nearest];
        if !bounds.contains_coord(self.grid.cell_at(goal).coord) {
            return Err(PlanError::NoLocalGoal);
        }
        for &idx in &self.global_path[nearest + 1..] {
            if !bounds.contains_coord(self.grid.cell_at(idx).coord) {
                break;
            }
            goal = idx;
        }
        Ok(goal)
    }

    // === Waypoints and carrot ===

    /// Extract and reduce waypoints from `pose` on the live cost field.
    ///
    /// Returns the waypoint count; 0 when `pose` is off the grid or has no
    /// path to the current goal.
    pub fn update_waypoints(&mut self, pose: WorldPoint) -> usize {
        self.waypoints.clear();

        let Some(start) = self.grid.index_of_world(pose) else {
            tracing::debug!("Waypoint update: pose outside grid");
            return 0;
        };
        match extract_path(&self.grid, start) {
            Ok(path) => {
                self.waypoints = reduce_waypoints(&self.grid, &path, self.config.des_min_radius);
            }
            Err(e) => tracing::debug!("Waypoint update failed: {}", e),
        }
        self.waypoints.len()
    }

    /// Waypoint `i` in world coordinates, `None` past the end.
    pub fn waypoint(&self, i: usize) -> Option<WorldPoint> {
        self.waypoints
            .get(i)
            .map(|&idx| self.grid.grid_to_world(self.grid.cell_at(idx).coord))
    }

    /// Number of waypoints from the last update.
    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    /// All waypoints in world coordinates.
    pub fn waypoints(&self) -> Vec<WorldPoint> {
        self.to_world(&self.waypoints)
    }

    /// Lookahead target for a robot at `pose`.
    pub fn get_carrot(
        &self,
        pose: WorldPoint,
        lookahead: f32,
        distance_weight: f32,
    ) -> Option<Carrot> {
        let robot = self.grid.index_of_world(pose)?;
        find_carrot(&self.grid, &self.config, robot, lookahead, distance_weight)
    }

    /// Last successful global path, start to goal.
    pub fn global_path(&self) -> Vec<WorldPoint> {
        self.to_world(&self.global_path)
    }

    /// Last successful local path, start to local goal.
    pub fn local_path(&self) -> Vec<WorldPoint> {
        self.to_world(&self.local_path)
    }

    /// Does `point` fall inside the active search bounds?
    pub fn check_in_bounds(&self, point: WorldPoint) -> bool {
        self.grid.check_in_bounds(point)
    }

    /// Independent planner over a copy of this grid.
    ///
    /// Geometry, occupancy and obstacle distances are copied. The kernel is
    /// rebuilt and all search state (costs, marks, paths, waypoints) starts
    /// empty.
    pub fn fork(&self) -> Self {
        let mut grid = self.grid.clone();
        for cell in grid.cells_mut() {
            cell.reset_plan();
            cell.lpath_mark = false;
        }

        Self {
            config: self.config.clone(),
            kernel: DistanceKernel::new(grid.scale(), self.config.max_radius),
            grid,
            propagator: Propagator::new(),
            global_path: Vec::new(),
            local_path: Vec::new(),
            waypoints: Vec::new(),
        }
    }

    fn refresh_kernel(&mut self) {
        if !self.kernel.matches(self.grid.scale(), self.config.max_radius) {
            self.kernel = DistanceKernel::new(self.grid.scale(), self.config.max_radius);
        }
    }

    fn clear_paths(&mut self) {
        self.global_path.clear();
        self.local_path.clear();
        self.waypoints.clear();
    }

    fn to_world(&self, cells: &[usize]) -> Vec<WorldPoint> {
        cells
            .iter()
            .map(|&idx| self.grid.grid_to_world(self.grid.cell_at(idx).coord))
            .collect()
    }
}
