//! Structural properties that hold over many grids and parameters.

mod common;

use common::{planner_with, pt, unit_config};
use marga::cspace::DistanceKernel;
use marga::{GridCoord, Occupancy, PlanGrid, WorldPoint};

/// Deterministic pseudo-random obstacle layout (xorshift).
fn scattered_obstacles(size: i32, density_pct: u32, seed: u32) -> Vec<(i32, i32)> {
    let mut state = seed.max(1);
    let mut cells = Vec::new();
    for y in 0..size {
        for x in 0..size {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            if state % 100 < density_pct {
                cells.push((x, y));
            }
        }
    }
    cells
}

#[test]
fn test_world_grid_round_trip() {
    for &(scale, ox, oy) in &[(0.05, -3.2, 1.7), (0.1, 0.0, 0.0), (0.25, 12.5, -7.75)] {
        let grid = PlanGrid::new(37, 23, scale, WorldPoint::new(ox, oy)).unwrap();
        for coord in grid.full_bounds().coords() {
            assert_eq!(grid.world_to_grid(grid.grid_to_world(coord)), coord);
        }
    }
}

#[test]
fn test_kernel_symmetry() {
    for &(scale, max_radius) in &[(1.0, 3.0), (0.05, 0.5), (0.1, 0.37)] {
        let kernel = DistanceKernel::new(scale, max_radius);
        let h = kernel.half_width();
        for di in -h..=h {
            for dj in -h..=h {
                let w = kernel.weight(di, dj);
                assert_eq!(w, kernel.weight(-di, -dj));
                assert_eq!(w, kernel.weight(dj, di));
                assert_eq!(w, kernel.weight(-di, dj));
            }
        }
    }
}

#[test]
fn test_distance_bounds() {
    let config = unit_config();
    let max = config.max_radius;
    for seed in [3, 17, 101] {
        let occupied = scattered_obstacles(24, 8, seed);
        let planner = planner_with(24, 24, &occupied, config.clone());
        let grid = planner.grid();
        let h = planner.kernel().half_width();

        for cell in grid.cells() {
            assert!(cell.occ_dist >= 0.0 && cell.occ_dist <= max);
            assert!(cell.occ_dist_dyn <= cell.occ_dist);
            if !cell.occ_state.is_free() {
                assert_eq!(cell.occ_dist, 0.0);
                continue;
            }

            let clear = (-h..=h).all(|dj| {
                (-h..=h).all(|di| {
                    let c = GridCoord::new(cell.coord.x + di, cell.coord.y + dj);
                    grid.cell(c).is_none_or(|n| n.occ_state.is_free())
                })
            });
            if clear {
                assert_eq!(cell.occ_dist, max);
            }
        }
    }
}

#[test]
fn test_back_pointers_descend_to_goal() {
    for seed in [5, 42, 977] {
        let mut occupied = scattered_obstacles(30, 15, seed);
        occupied.retain(|&c| c != (29, 29));
        let mut planner = planner_with(30, 30, &occupied, unit_config());
        let _ = planner.plan_global(pt(0.0, 0.0), pt(29.0, 29.0));

        let grid = planner.grid();
        let goal = grid.index(29, 29);
        assert_eq!(grid.cell_at(goal).plan_cost, 0.0);

        for (idx, cell) in grid.cells().iter().enumerate() {
            if !cell.is_reached() {
                assert!(cell.plan_next.is_none());
                continue;
            }
            let mut current = idx;
            let mut steps = 0;
            while let Some(next) = grid.cell_at(current).plan_next {
                assert!(grid.cell_at(next).plan_cost < grid.cell_at(current).plan_cost);
                assert_eq!(
                    grid.cell_at(next).coord.chebyshev_distance(&grid.cell_at(current).coord),
                    1
                );
                current = next;
                steps += 1;
                assert!(steps <= grid.cell_count());
            }
            assert_eq!(current, goal);
        }
    }
}

#[test]
fn test_set_bounds_idempotent() {
    let mut grid = PlanGrid::new(20, 12, 0.1, WorldPoint::ZERO).unwrap();
    for &(a, b, c, d) in &[(-5, -5, 50, 50), (3, 2, 8, 9), (0, 11, 19, 40), (19, -1, 25, 0)] {
        grid.set_bounds(a, b, c, d);
        let once = grid.bounds();
        grid.set_bounds(once.min_x, once.min_y, once.max_x, once.max_y);
        assert_eq!(grid.bounds(), once);
        assert!(grid.full_bounds().contains(once.min_x, once.min_y));
        assert!(grid.full_bounds().contains(once.max_x, once.max_y));
    }
}

#[test]
fn test_bounding_box_reaches_min_size() {
    let mut grid = PlanGrid::new(60, 40, 0.1, WorldPoint::ZERO).unwrap();
    grid.fill(Occupancy::Free);
    let hx = grid.size_x() as i32 - 1;
    let hy = grid.size_y() as i32 - 1;

    let points = [
        (pt(0.05, 0.05), pt(0.05, 0.05)),
        (pt(3.05, 2.05), pt(3.05, 2.05)),
        (pt(5.95, 3.95), pt(5.55, 3.15)),
        (pt(-2.0, 1.0), pt(1.0, 9.0)),
    ];
    for &min_size in &[0.0f32, 1.0, 2.5, 10.0] {
        for &(p0, p1) in &points {
            grid.set_bounding_box(0.4, min_size, p0, p1);
            let b = grid.bounds();
            let wanted = ((min_size / 0.1).ceil() as i32).min(hx.min(hy));
            assert!(b.span_x() >= wanted, "x span {} < {}", b.span_x(), wanted);
            assert!(b.span_y() >= wanted, "y span {} < {}", b.span_y(), wanted);
            assert!(b.min_x >= 0 && b.max_x <= hx);
            assert!(b.min_y >= 0 && b.max_y <= hy);
        }
    }
}
