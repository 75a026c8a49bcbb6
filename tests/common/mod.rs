//! Shared fixtures for integration tests.
//!
//! Test grids use scale 1.0 and origin (-0.5, -0.5), so the center of cell
//! (i, j) is the world point (i, j).

#![allow(dead_code)]

use marga::{GridCoord, Occupancy, PlanGrid, PlannerConfig, WavefrontPlanner, WorldPoint};

/// Planner parameters sized for unit-scale grids.
pub fn unit_config() -> PlannerConfig {
    PlannerConfig {
        abs_min_radius: 0.5,
        des_min_radius: 1.0,
        max_radius: 3.0,
        dist_penalty: 1.0,
        hysteresis_factor: 0.5,
    }
}

/// All-free unit-scale grid.
pub fn free_grid(size_x: usize, size_y: usize) -> PlanGrid {
    let mut grid = PlanGrid::new(size_x, size_y, 1.0, WorldPoint::new(-0.5, -0.5)).unwrap();
    grid.fill(Occupancy::Free);
    grid
}

/// Planner over a free grid with the given cells occupied, c-space built.
pub fn planner_with(
    size_x: usize,
    size_y: usize,
    occupied: &[(i32, i32)],
    config: PlannerConfig,
) -> WavefrontPlanner {
    let mut grid = free_grid(size_x, size_y);
    for &(x, y) in occupied {
        grid.set_occupancy(GridCoord::new(x, y), Occupancy::Occupied);
    }
    let mut planner = WavefrontPlanner::new(config, grid).unwrap();
    planner.build_cspace();
    planner
}

/// World point shorthand.
pub fn pt(x: f32, y: f32) -> WorldPoint {
    WorldPoint::new(x, y)
}
