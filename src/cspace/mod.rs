//! Configuration space: per-cell distance to the nearest obstacle.
//!
//! Distances come from stamping a precomputed [`DistanceKernel`] around every
//! obstacle cell. This is a bounded-radius approximation of the Euclidean
//! distance transform: cells further than `max_radius` from every obstacle
//! saturate at `max_radius`.

mod builder;
mod cache;
mod kernel;

pub use builder::{apply_dynamic_obstacles, build_static, init_distances};
pub use cache::{CacheError, load_cspace, occupancy_hash, read_cspace, save_cspace, write_cspace};
pub use kernel::DistanceKernel;
