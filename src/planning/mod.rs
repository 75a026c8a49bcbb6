//! Wavefront path planning.
//!
//! This module provides:
//! - Dijkstra-style cost propagation from a goal cell ([`Propagator`])
//! - Back-pointer path extraction and visibility-based waypoint reduction
//! - The [`WavefrontPlanner`] façade for global and local planning cycles

mod path;
mod planner;
mod queue;
mod wavefront;

pub use path::{extract_path, reduce_waypoints, test_reachable};
pub use planner::WavefrontPlanner;
pub use queue::CostQueue;
pub use wavefront::{PlanError, Propagator, SearchState, SearchStats, proximity_penalty};
