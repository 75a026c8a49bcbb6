//! Benchmark configuration space and wavefront planning.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use marga::{GridCoord, Occupancy, PlanGrid, PlannerConfig, WavefrontPlanner, WorldPoint};

const SCALE: f32 = 0.05;

/// Square room with a border wall and a row of pillars through the middle.
fn create_room(size: usize) -> PlanGrid {
    let mut grid = PlanGrid::new(size, size, SCALE, WorldPoint::ZERO).unwrap();
    grid.fill(Occupancy::Free);

    let last = size as i32 - 1;
    for i in 0..=last {
        for coord in [
            GridCoord::new(i, 0),
            GridCoord::new(i, last),
            GridCoord::new(0, i),
            GridCoord::new(last, i),
        ] {
            grid.set_occupancy(coord, Occupancy::Occupied);
        }
    }

    let mid = size as i32 / 2;
    for x in (4..last - 4).step_by(12) {
        for dx in 0..4 {
            for dy in -2..2 {
                grid.set_occupancy(GridCoord::new(x + dx, mid + dy), Occupancy::Occupied);
            }
        }
    }
    grid
}

fn create_planner(size: usize) -> WavefrontPlanner {
    let mut planner = WavefrontPlanner::new(PlannerConfig::default(), create_room(size)).unwrap();
    planner.build_cspace();
    planner
}

fn corners(size: usize) -> (WorldPoint, WorldPoint) {
    let far = (size as f32 - 4.5) * SCALE;
    let near = 3.5 * SCALE;
    (WorldPoint::new(near, near), WorldPoint::new(far, far))
}

fn create_scan(center: WorldPoint, n: usize, radius: f32) -> Vec<WorldPoint> {
    (0..n)
        .map(|i| {
            let angle = i as f32 * std::f32::consts::TAU / n as f32;
            WorldPoint::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

fn bench_cspace_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("cspace_build");

    for size in [100, 200, 400].iter() {
        let mut planner = WavefrontPlanner::new(PlannerConfig::default(), create_room(*size)).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                planner.init();
                black_box(planner.build_cspace())
            })
        });
    }

    group.finish();
}

fn bench_dynamic_overlay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dynamic_overlay");
    let mut planner = create_planner(200);
    let center = WorldPoint::new(5.0, 5.0);

    for n in [90, 360, 720].iter() {
        let scan = create_scan(center, *n, 1.5);

        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, _| {
            b.iter(|| black_box(planner.set_obstacles(black_box(&scan))))
        });
    }

    group.finish();
}

fn bench_global_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("global_plan");

    for size in [100, 200, 400].iter() {
        let mut planner = create_planner(*size);
        let (start, goal) = corners(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(planner.do_global(black_box(start), black_box(goal))))
        });
    }

    group.finish();
}

fn bench_local_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("local_plan");
    let mut planner = create_planner(400);
    let (start, goal) = corners(400);
    planner.do_global(start, goal);

    for half_width in [0.5f32, 1.0, 2.0].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(half_width),
            half_width,
            |b, &hw| b.iter(|| black_box(planner.do_local(black_box(start), hw))),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_cspace_build,
    bench_dynamic_overlay,
    bench_global_plan,
    bench_local_plan
);
criterion_main!(benches);
