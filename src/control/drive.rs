//! Differential-drive command synthesis.
//!
//! Steers toward the carrot with a two-phase behavior: when the heading
//! error exceeds a distance-dependent threshold the robot rotates in place,
//! otherwise it drives forward while correcting heading. Near the goal it
//! rotates in place onto the goal heading.

use std::f32::consts::PI;

use crate::config::DriveConfig;
use crate::core::{Pose2D, WorldPoint, angle_diff};
use crate::planning::WavefrontPlanner;

/// Velocity command for a differential-drive base
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DriveCommand {
    /// Translational velocity (m/s, positive forward)
    pub linear: f32,
    /// Rotational velocity (rad/s, positive counter-clockwise)
    pub angular: f32,
}

impl DriveCommand {
    /// Zero velocity
    pub const STOP: DriveCommand = DriveCommand {
        linear: 0.0,
        angular: 0.0,
    };

    /// Create a command
    pub fn new(linear: f32, angular: f32) -> Self {
        Self { linear, angular }
    }

    /// Is this the zero command?
    pub fn is_stop(&self) -> bool {
        self.linear == 0.0 && self.angular == 0.0
    }
}

/// Outcome of one control step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriveStatus {
    /// Command issued, goal not yet reached
    Navigating,
    /// Within position and heading tolerance of the goal
    GoalReached,
    /// No clear carrot; the base is stopped
    NoCommand,
}

/// Stateful drive command synthesizer.
///
/// Tracks the previous command for acceleration limiting and the latched
/// rotation direction for the final alignment turn.
#[derive(Clone, Debug)]
pub struct DriveController {
    config: DriveConfig,
    previous: DriveCommand,
    rotate_dir: Option<f32>,
}

impl DriveController {
    /// Create a controller at rest.
    pub fn new(config: DriveConfig) -> Self {
        Self {
            config,
            previous: DriveCommand::STOP,
            rotate_dir: None,
        }
    }

    /// Controller configuration.
    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    /// Last command issued.
    pub fn previous(&self) -> DriveCommand {
        self.previous
    }

    /// Forget velocity history and the latched rotation.
    pub fn reset(&mut self) {
        self.previous = DriveCommand::STOP;
        self.rotate_dir = None;
    }

    /// Compute the next command from the planner's live cost field.
    ///
    /// `dt` is the time since the previous command, in seconds.
    pub fn compute(
        &mut self,
        planner: &WavefrontPlanner,
        pose: Pose2D,
        goal: Pose2D,
        dt: f32,
    ) -> (DriveCommand, DriveStatus) {
        let carrot = planner
            .get_carrot(pose.position(), self.config.lookahead, self.config.distance_weight)
            .map(|c| c.point);
        self.step(pose, goal, carrot, dt)
    }

    /// Compute the next command toward an already chosen carrot.
    pub fn step(
        &mut self,
        pose: Pose2D,
        goal: Pose2D,
        carrot: Option<WorldPoint>,
        dt: f32,
    ) -> (DriveCommand, DriveStatus) {
        let goal_dist = pose.distance_to(goal.position());
        let goal_err = angle_diff(goal.theta, pose.theta);

        if goal_dist < self.config.goal_distance && goal_err.abs() < self.config.goal_angle {
            self.reset();
            return (DriveCommand::STOP, DriveStatus::GoalReached);
        }

        let target = if goal_dist < self.config.goal_distance {
            let dir = *self
                .rotate_dir
                .get_or_insert(if goal_err < 0.0 { -1.0 } else { 1.0 });
            DriveCommand::new(0.0, dir * angular_speed(&self.config, goal_err.abs()))
        } else {
            self.rotate_dir = None;
            match carrot {
                Some(point) => command_toward(&self.config, pose, point),
                None => {
                    tracing::debug!("No carrot, stopping");
                    self.previous = DriveCommand::STOP;
                    return (DriveCommand::STOP, DriveStatus::NoCommand);
                }
            }
        };

        let command = DriveCommand::new(
            ramp(self.previous.linear, target.linear, self.config.linear_accel, dt),
            ramp(self.previous.angular, target.angular, self.config.angular_accel, dt),
        );
        self.previous = command;
        (command, DriveStatus::Navigating)
    }
}

/// Unlimited command steering from `pose` toward `target`.
///
/// Linear velocity is zero (rotate in place) while the heading error exceeds
/// a threshold that widens from `rotate_angle_min` to `rotate_angle_max` as
/// the target moves out to `lookahead`.
pub fn command_toward(config: &DriveConfig, pose: Pose2D, target: WorldPoint) -> DriveCommand {
    let position = pose.position();
    let d = position.distance(&target);
    let err = angle_diff(position.angle_to(&target), pose.theta);
    let reach = (d / config.lookahead).min(1.0);

    let threshold =
        config.rotate_angle_min + reach * (config.rotate_angle_max - config.rotate_angle_min);
    let linear = if err.abs() > threshold {
        0.0
    } else {
        config.tv_min + reach * (config.tv_max - config.tv_min)
    };

    let angular = if err == 0.0 {
        0.0
    } else {
        err.signum() * angular_speed(config, err.abs())
    };

    DriveCommand::new(linear, angular)
}

/// Rotational speed magnitude for a heading error in `[0, π]`.
fn angular_speed(config: &DriveConfig, abs_err: f32) -> f32 {
    config.av_min + (abs_err / PI).min(1.0) * (config.av_max - config.av_min)
}

/// Limit the change from `previous` to `target` to `accel * dt`.
///
/// Braking toward zero is immediate; a sign reversal ramps up from zero.
fn ramp(previous: f32, target: f32, accel: f32, dt: f32) -> f32 {
    if accel <= 0.0 {
        return target;
    }
    let same_sign = previous * target > 0.0;
    if target == 0.0 || (same_sign && target.abs() <= previous.abs()) {
        return target;
    }
    let base = if same_sign { previous.abs() } else { 0.0 };
    let magnitude = target.abs().min(base + accel * dt.max(0.0));
    magnitude.copysign(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn unlimited() -> DriveConfig {
        DriveConfig {
            linear_accel: 0.0,
            angular_accel: 0.0,
            ..DriveConfig::default()
        }
    }

    #[test]
    fn test_straight_ahead_drives_forward() {
        let config = unlimited();
        let cmd = command_toward(&config, Pose2D::new(0.0, 0.0, 0.0), WorldPoint::new(2.0, 0.0));
        assert_relative_eq!(cmd.linear, config.tv_max);
        assert_eq!(cmd.angular, 0.0);
    }

    #[test]
    fn test_large_heading_error_rotates_in_place() {
        let config = unlimited();
        // Target directly to the left
        let cmd = command_toward(&config, Pose2D::new(0.0, 0.0, 0.0), WorldPoint::new(0.0, 2.0));
        assert_eq!(cmd.linear, 0.0);
        assert!(cmd.angular > 0.0);

        // Target directly to the right
        let cmd = command_toward(&config, Pose2D::new(0.0, 0.0, 0.0), WorldPoint::new(0.0, -2.0));
        assert_eq!(cmd.linear, 0.0);
        assert!(cmd.angular < 0.0);
        assert_relative_eq!(
            cmd.angular,
            -(config.av_min + 0.5 * (config.av_max - config.av_min)),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_close_target_scales_speed() {
        let config = unlimited();
        let half = config.lookahead / 2.0;
        let cmd = command_toward(&config, Pose2D::new(0.0, 0.0, 0.0), WorldPoint::new(half, 0.0));
        assert_relative_eq!(cmd.linear, (config.tv_min + config.tv_max) / 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_goal_reached() {
        let mut ctrl = DriveController::new(unlimited());
        let goal = Pose2D::new(1.0, 1.0, 0.5);
        let (cmd, status) = ctrl.step(Pose2D::new(1.02, 0.99, 0.52), goal, None, 0.1);
        assert_eq!(status, DriveStatus::GoalReached);
        assert!(cmd.is_stop());
    }

    #[test]
    fn test_final_alignment_direction_latched() {
        let mut ctrl = DriveController::new(unlimited());
        let goal = Pose2D::new(0.0, 0.0, FRAC_PI_2);

        let (cmd, status) = ctrl.step(Pose2D::new(0.0, 0.0, 0.0), goal, None, 0.1);
        assert_eq!(status, DriveStatus::Navigating);
        assert_eq!(cmd.linear, 0.0);
        assert!(cmd.angular > 0.0);

        // Overshoot past the goal heading keeps turning the same way
        let (cmd, _) = ctrl.step(Pose2D::new(0.0, 0.0, 2.0), goal, None, 0.1);
        assert!(cmd.angular > 0.0);
    }

    #[test]
    fn test_no_carrot_stops() {
        let mut ctrl = DriveController::new(unlimited());
        let goal = Pose2D::new(5.0, 0.0, 0.0);
        let (cmd, status) = ctrl.step(Pose2D::new(0.0, 0.0, 0.0), goal, None, 0.1);
        assert_eq!(status, DriveStatus::NoCommand);
        assert!(cmd.is_stop());
    }

    #[test]
    fn test_acceleration_limited() {
        let mut ctrl = DriveController::new(DriveConfig {
            linear_accel: 0.5,
            angular_accel: 2.0,
            ..DriveConfig::default()
        });
        let pose = Pose2D::new(0.0, 0.0, 0.0);
        let goal = Pose2D::new(5.0, 0.0, 0.0);
        let carrot = Some(WorldPoint::new(2.0, 0.0));

        let (cmd, _) = ctrl.step(pose, goal, carrot, 0.1);
        assert_relative_eq!(cmd.linear, 0.05, epsilon = 1e-6);
        let (cmd, _) = ctrl.step(pose, goal, carrot, 0.1);
        assert_relative_eq!(cmd.linear, 0.10, epsilon = 1e-6);
        assert_eq!(ctrl.previous(), cmd);
    }

    #[test]
    fn test_ramp() {
        // Disabled
        assert_eq!(ramp(0.0, 1.0, 0.0, 0.1), 1.0);
        // Accelerating
        assert_relative_eq!(ramp(0.1, 1.0, 1.0, 0.1), 0.2, epsilon = 1e-6);
        // Braking is immediate
        assert_eq!(ramp(0.8, 0.2, 1.0, 0.1), 0.2);
        assert_eq!(ramp(0.8, 0.0, 1.0, 0.1), 0.0);
        // Reversal ramps from zero
        assert_relative_eq!(ramp(0.5, -1.0, 1.0, 0.1), -0.1, epsilon = 1e-6);
    }
}
