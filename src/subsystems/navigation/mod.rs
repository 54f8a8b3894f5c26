//! Navigation subsystem
//!
//! Target production and the shared force-correction law used by the
//! autopilot and guided flows.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────┐   ┌──────────────────────────┐
//! │   AutopilotSequencer      │   │   TargetFollower         │
//! │   (phase state machine)   │   │   (queued targets/homing)│
//! └─────────────┬─────────────┘   └─────────────┬────────────┘
//!               │        TargetSource           │
//!               └───────────────┬───────────────┘
//!                               ▼
//!               ┌───────────────────────────────┐
//!               │ PositionController /          │
//!               │ StepperController             │
//!               │  force via ForceCorrector     │
//!               └───────────────────────────────┘
//! ```
//!
//! A target source only decides *what* the target is each tick; how the
//! corrective force is computed is the controller's business.

pub mod follower;

pub use follower::{FollowerConfig, TargetFollower};

use nalgebra::Vector3;

use crate::sim::{ForceMode, RigidBody};
use crate::subsystems::control::{ControlInputs, FlightController};

/// Produces the position target for the current tick
pub trait TargetSource {
    /// Target for this tick, given the vehicle's current position
    ///
    /// Called exactly once per tick; implementations may advance internal
    /// state (phase machines, waypoint cursors) when called.
    fn current_target(&mut self, position: Vector3<f32>) -> Vector3<f32>;
}

/// Shared desired-force law
///
/// `normalize(target − position) * acceleration − velocity * damping_factor`.
/// The direction term has constant magnitude; the damping term settles the
/// approach. A zero error contributes no direction term.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceCorrector {
    /// Correction acceleration toward the target [m/s²]
    pub acceleration: f32,
    /// Velocity damping factor [1/s]
    pub damping_factor: f32,
}

impl Default for ForceCorrector {
    fn default() -> Self {
        Self {
            acceleration: 10.0,
            damping_factor: 2.0,
        }
    }
}

impl ForceCorrector {
    /// Desired acceleration toward `target`
    pub fn force_toward(
        &self,
        target: Vector3<f32>,
        position: Vector3<f32>,
        velocity: Vector3<f32>,
    ) -> Vector3<f32> {
        let direction = (target - position)
            .try_normalize(1e-6)
            .unwrap_or_else(Vector3::zeros);
        direction * self.acceleration - velocity * self.damping_factor
    }
}

/// Direct force-correction controller
///
/// The simplest [`FlightController`]: applies the corrector output as an
/// acceleration-mode force toward the guidance target, every tick, regardless
/// of how far along the guidance layer is. Used by the autopilot flow, which
/// needs no stepper.
pub struct PositionController {
    corrector: ForceCorrector,
    armed: bool,
}

impl PositionController {
    pub fn new(corrector: ForceCorrector) -> Self {
        Self {
            corrector,
            armed: true,
        }
    }
}

impl FlightController for PositionController {
    fn update(&mut self, body: &mut dyn RigidBody, inputs: &ControlInputs, _dt: f32) {
        if !self.armed {
            return;
        }
        let target = inputs.target.unwrap_or_else(|| body.position());
        let force = self
            .corrector
            .force_toward(target, body.position(), body.velocity());
        body.apply_force(force, ForceMode::Acceleration);
    }

    fn set_armed(&mut self, armed: bool, _body: &dyn RigidBody) {
        self.armed = armed;
    }

    fn is_armed(&self) -> bool {
        self.armed
    }

    fn name(&self) -> &'static str {
        "Position"
    }
}
