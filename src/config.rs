//! Configuration loading for Marga
//!
//! Every section and field has a default, so an empty file (or no file at
//! all) yields a usable configuration. Distances are meters, angles radians,
//! velocities m/s and rad/s.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MargaError, Result};

/// Main configuration structure
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MargaConfig {
    /// Configuration space and wavefront search
    #[serde(default)]
    pub planner: PlannerConfig,

    /// Carrot selection and drive command synthesis
    #[serde(default)]
    pub drive: DriveConfig,

    /// Local replanning window
    #[serde(default)]
    pub local: LocalPlanConfig,
}

/// Configuration space and wavefront search parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Cells closer than this to an obstacle are never entered (default: 0.10)
    #[serde(default = "default_abs_min_radius")]
    pub abs_min_radius: f32,

    /// Clearance required between consecutive waypoints (default: 0.20)
    #[serde(default = "default_des_min_radius")]
    pub des_min_radius: f32,

    /// Obstacle distances saturate here; no penalty beyond it (default: 0.50)
    #[serde(default = "default_max_radius")]
    pub max_radius: f32,

    /// Cost per meter of intrusion inside `max_radius` (default: 1.0)
    #[serde(default = "default_dist_penalty")]
    pub dist_penalty: f32,

    /// Step cost multiplier on the previous local path, in (0, 1] (default: 0.2)
    #[serde(default = "default_hysteresis_factor")]
    pub hysteresis_factor: f32,
}

/// Carrot and differential-drive command parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Position tolerance for goal reached (default: 0.10)
    #[serde(default = "default_goal_distance")]
    pub goal_distance: f32,

    /// Heading tolerance for goal reached (default: 10°)
    #[serde(default = "default_goal_angle")]
    pub goal_angle: f32,

    /// Carrot lookahead along the path (default: 0.60)
    #[serde(default = "default_lookahead")]
    pub lookahead: f32,

    /// Weight of the short-carrot term in carrot scoring (default: 0.10)
    #[serde(default = "default_distance_weight")]
    pub distance_weight: f32,

    /// Minimum translational velocity (default: 0.05)
    #[serde(default = "default_tv_min")]
    pub tv_min: f32,

    /// Maximum translational velocity (default: 0.20)
    #[serde(default = "default_tv_max")]
    pub tv_max: f32,

    /// Minimum rotational velocity (default: 0.10)
    #[serde(default = "default_av_min")]
    pub av_min: f32,

    /// Maximum rotational velocity (default: 0.50)
    #[serde(default = "default_av_max")]
    pub av_max: f32,

    /// Rotate-in-place threshold when the carrot is close (default: 10°)
    #[serde(default = "default_rotate_angle_min")]
    pub rotate_angle_min: f32,

    /// Rotate-in-place threshold when the carrot is at full lookahead (default: 80°)
    #[serde(default = "default_rotate_angle_max")]
    pub rotate_angle_max: f32,

    /// Translational acceleration limit, 0 disables (default: 0.5)
    #[serde(default = "default_linear_accel")]
    pub linear_accel: f32,

    /// Rotational acceleration limit, 0 disables (default: 2.0)
    #[serde(default = "default_angular_accel")]
    pub angular_accel: f32,
}

/// Local planning window
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocalPlanConfig {
    /// Half the side of the square window around the robot (default: 2.0)
    #[serde(default = "default_half_width")]
    pub half_width: f32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            abs_min_radius: default_abs_min_radius(),
            des_min_radius: default_des_min_radius(),
            max_radius: default_max_radius(),
            dist_penalty: default_dist_penalty(),
            hysteresis_factor: default_hysteresis_factor(),
        }
    }
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            goal_distance: default_goal_distance(),
            goal_angle: default_goal_angle(),
            lookahead: default_lookahead(),
            distance_weight: default_distance_weight(),
            tv_min: default_tv_min(),
            tv_max: default_tv_max(),
            av_min: default_av_min(),
            av_max: default_av_max(),
            rotate_angle_min: default_rotate_angle_min(),
            rotate_angle_max: default_rotate_angle_max(),
            linear_accel: default_linear_accel(),
            angular_accel: default_angular_accel(),
        }
    }
}

impl Default for LocalPlanConfig {
    fn default() -> Self {
        Self {
            half_width: default_half_width(),
        }
    }
}

// Planner defaults
fn default_abs_min_radius() -> f32 {
    0.10
}
fn default_des_min_radius() -> f32 {
    0.20
}
fn default_max_radius() -> f32 {
    0.50
}
fn default_dist_penalty() -> f32 {
    1.0
}
fn default_hysteresis_factor() -> f32 {
    0.2
}

// Drive defaults
fn default_goal_distance() -> f32 {
    0.10
}
fn default_goal_angle() -> f32 {
    10f32.to_radians()
}
fn default_lookahead() -> f32 {
    0.60
}
fn default_distance_weight() -> f32 {
    0.10
}
fn default_tv_min() -> f32 {
    0.05
}
fn default_tv_max() -> f32 {
    0.20
}
fn default_av_min() -> f32 {
    0.10
}
fn default_av_max() -> f32 {
    0.50
}
fn default_rotate_angle_min() -> f32 {
    10f32.to_radians()
}
fn default_rotate_angle_max() -> f32 {
    80f32.to_radians()
}
fn default_linear_accel() -> f32 {
    0.5
}
fn default_angular_accel() -> f32 {
    2.0
}

fn default_half_width() -> f32 {
    2.0
}

impl MargaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MargaError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: MargaConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section
    pub fn validate(&self) -> Result<()> {
        self.planner.validate()?;
        self.drive.validate()?;
        if !(self.local.half_width > 0.0) {
            return Err(MargaError::Config(format!(
                "local.half_width must be positive, got {}",
                self.local.half_width
            )));
        }
        Ok(())
    }
}

impl PlannerConfig {
    /// Check radius ordering and factor ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.max_radius > 0.0 && self.max_radius.is_finite()) {
            return Err(MargaError::Config(format!(
                "planner.max_radius must be positive, got {}",
                self.max_radius
            )));
        }
        if !(0.0 <= self.abs_min_radius
            && self.abs_min_radius <= self.des_min_radius
            && self.des_min_radius <= self.max_radius)
        {
            return Err(MargaError::Config(format!(
                "planner radii must satisfy 0 <= abs_min_radius ({}) <= des_min_radius ({}) <= max_radius ({})",
                self.abs_min_radius, self.des_min_radius, self.max_radius
            )));
        }
        if !(self.dist_penalty >= 0.0) {
            return Err(MargaError::Config(format!(
                "planner.dist_penalty must be non-negative, got {}",
                self.dist_penalty
            )));
        }
        if !(self.hysteresis_factor > 0.0 && self.hysteresis_factor <= 1.0) {
            return Err(MargaError::Config(format!(
                "planner.hysteresis_factor must be in (0, 1], got {}",
                self.hysteresis_factor
            )));
        }
        Ok(())
    }
}

impl DriveConfig {
    /// Check velocity limits and angle thresholds
    pub fn validate(&self) -> Result<()> {
        let ordered = |name: &str, min: f32, max: f32| {
            if !(0.0 <= min && min <= max) {
                return Err(MargaError::Config(format!(
                    "drive.{name} limits must satisfy 0 <= min ({min}) <= max ({max})"
                )));
            }
            Ok(())
        };
        ordered("tv", self.tv_min, self.tv_max)?;
        ordered("av", self.av_min, self.av_max)?;
        ordered("rotate_angle", self.rotate_angle_min, self.rotate_angle_max)?;

        for (name, value) in [
            ("goal_distance", self.goal_distance),
            ("goal_angle", self.goal_angle),
            ("distance_weight", self.distance_weight),
            ("linear_accel", self.linear_accel),
            ("angular_accel", self.angular_accel),
        ] {
            if !(value >= 0.0) {
                return Err(MargaError::Config(format!(
                    "drive.{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        if !(self.lookahead > 0.0) {
            return Err(MargaError::Config(format!(
                "drive.lookahead must be positive, got {}",
                self.lookahead
            )));
        }
        Ok(())
    }
}
