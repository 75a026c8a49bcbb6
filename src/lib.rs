//! # Marga
//!
//! Wavefront navigation planner for differential-drive robots on 2D
//! occupancy grids.
//!
//! ## Overview
//!
//! A planning cycle runs strictly downstream:
//!
//! 1. **Obstacles** - dynamic points are overlaid on the static map
//! 2. **Configuration space** - every cell learns its distance to the
//!    nearest obstacle, capped at `max_radius`
//! 3. **Wavefront** - Dijkstra-style cost propagation from the goal, over
//!    the whole grid (global) or a window around the robot (local)
//! 4. **Waypoints** - back-pointer path reduced by visibility tests
//! 5. **Carrot** - lookahead target pulled away from tight passages
//! 6. **Drive** - bounded translational/rotational velocity command
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use marga::{DriveController, MargaConfig, Pose2D, WavefrontPlanner, WorldPoint};
//! use marga::io::load_ascii_map;
//!
//! let config = MargaConfig::default();
//! let grid = load_ascii_map(Path::new("maps/two_rooms.txt"), 0.05, WorldPoint::ZERO)?;
//! let mut planner = WavefrontPlanner::new(config.planner.clone(), grid)?;
//! planner.build_cspace();
//!
//! planner.set_obstacles(&scan_points);
//! if planner.do_global(start, goal) {
//!     planner.update_waypoints(start);
//!     let mut drive = DriveController::new(config.drive.clone());
//!     let (cmd, status) = drive.compute(&planner, pose, goal_pose, 0.1);
//! }
//! ```
//!
//! ## Coordinate System
//!
//! Uses ROS REP-103 convention:
//! - X: Forward (positive ahead of robot)
//! - Y: Left (positive to robot's left)
//! - Theta: Rotation in radians, CCW positive from +X axis

#![warn(missing_docs)]

// Geometry types
pub mod core;

// Grid model
pub mod grid;

// Configuration space
pub mod cspace;

// Wavefront search and path extraction
pub mod planning;

// Carrot and drive commands
pub mod control;

// Map loading
pub mod io;

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{DriveConfig, LocalPlanConfig, MargaConfig, PlannerConfig};
pub use control::{Carrot, DriveCommand, DriveController, DriveStatus};
pub use core::{GridCoord, Pose2D, WorldPoint};
pub use error::{MargaError, Result};
pub use grid::{Cell, GridBounds, Occupancy, PlanGrid};
pub use planning::{PlanError, SearchStats, WavefrontPlanner};
