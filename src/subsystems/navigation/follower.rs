//! Target follower
//!
//! Consumes decoded network directives and produces the guidance target for
//! the current tick.
//!
//! # Behavior
//!
//! - `SetTarget` appends to the target list and cancels any active homing.
//! - `ReturnHome` clears the list, resets the traversal cursor and switches
//!   to homing toward the position recorded at construction.
//! - The cursor advances when the current target is reached within tolerance;
//!   the last entry sticks once the list is exhausted.
//! - With no targets and no homing, the follower holds the current position.
//! - Reaching home within tolerance is reported via [`TargetFollower::home_reached`];
//!   the vehicle layer disarms the controller on that signal (terminal).
//!
//! A directive that never arrives simply leaves the follower in its previous
//! target state indefinitely; there is no delivery timeout.

use nalgebra::Vector3;

use super::TargetSource;
use crate::communication::targets::TargetDirective;

/// Follower tuning
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FollowerConfig {
    /// Distance at which a target (or home) counts as reached [m]
    pub tolerance: f32,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self { tolerance: 0.5 }
    }
}

/// Ordered target list with traversal cursor and homing mode
pub struct TargetFollower {
    targets: Vec<Vector3<f32>>,
    cursor: usize,
    homing: bool,
    home: Vector3<f32>,
    config: FollowerConfig,
}

impl TargetFollower {
    /// Create a follower with the given home position
    pub fn new(home: Vector3<f32>, config: FollowerConfig) -> Self {
        Self {
            targets: Vec::new(),
            cursor: 0,
            homing: false,
            home,
            config,
        }
    }

    /// Apply one decoded directive
    pub fn apply(&mut self, directive: TargetDirective) {
        match directive {
            TargetDirective::SetTarget(target) => {
                self.targets.push(target);
                self.homing = false;
                log::info!("target added: {:?}", target);
            }
            TargetDirective::ReturnHome => {
                self.targets.clear();
                self.cursor = 0;
                self.homing = true;
                log::info!("returning to home position {:?}", self.home);
            }
        }
    }

    /// True while homing toward the recorded start position
    pub fn is_homing(&self) -> bool {
        self.homing
    }

    /// Recorded home position
    pub fn home(&self) -> Vector3<f32> {
        self.home
    }

    /// Number of queued targets
    pub fn pending(&self) -> usize {
        self.targets.len()
    }

    /// Current traversal cursor
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// True once a homing vehicle is within tolerance of home
    pub fn home_reached(&self, position: Vector3<f32>) -> bool {
        self.homing && (position - self.home).norm() <= self.config.tolerance
    }
}

impl TargetSource for TargetFollower {
    fn current_target(&mut self, position: Vector3<f32>) -> Vector3<f32> {
        if self.homing {
            return self.home;
        }
        if self.targets.is_empty() {
            // Hold: no directive has arrived yet (or ever will).
            return position;
        }

        if self.cursor < self.targets.len() {
            let target = self.targets[self.cursor];
            if (position - target).norm() < self.config.tolerance {
                log::info!("target {} reached: {:?}", self.cursor, target);
                self.cursor += 1;
            }
            target
        } else {
            // List exhausted: the last entry sticks.
            self.targets[self.targets.len() - 1]
        }
    }
}
