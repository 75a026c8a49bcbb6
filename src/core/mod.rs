//! Core geometry types shared by every planning stage.
//!
//! All types follow the ROS REP-103 coordinate convention:
//! - **X-axis**: Forward (positive ahead of robot)
//! - **Y-axis**: Left (positive to robot's left)
//! - **Theta**: Counter-clockwise rotation from +X axis (radians)
//!
//! - [`GridCoord`]: Integer cell indices `(ci, cj)`
//! - [`WorldPoint`]: Floating-point world coordinates in meters
//! - [`Pose2D`]: Robot position (x, y) and orientation (theta)

mod math;
mod point;
mod pose;

pub use math::{TWO_PI, angle_diff, normalize_angle};
pub use point::{GridCoord, WorldPoint};
pub use pose::Pose2D;
