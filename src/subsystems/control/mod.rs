//! Flight control
//!
//! Two interchangeable controller architectures implement [`FlightController`]:
//!
//! - [`AttitudeController`]: attitude/altitude PD over a live rigid body,
//!   driven by shaped stick input (three flight-mode laws, arming, ground
//!   assist).
//! - [`StepperController`]: an opaque target stepper propagates the desired
//!   state and a thin wrapper applies the corrective delta as a force.
//!
//! They are selected per vehicle instance and never run together on one
//! body. A third, simpler implementation lives in the navigation subsystem
//! ([`crate::subsystems::navigation::PositionController`]) for the autopilot
//! path, which needs no stepper.

pub mod attitude;
pub mod corrective;
pub mod flight;
pub mod pid;

pub use corrective::StepperController;
pub use flight::{AttitudeController, FlightMode, PhysicsConfig};
pub use pid::PdController;

use nalgebra::Vector3;

use crate::libraries::rc_input::ChannelCommand;
use crate::sim::RigidBody;

/// Per-tick controller input
///
/// Carries both input flavors; each controller reads the one it is driven
/// by. `target` is `None` when no guidance layer is active.
#[derive(Clone, Copy, Debug, Default)]
pub struct ControlInputs {
    /// Shaped pilot command
    pub command: ChannelCommand,
    /// Guidance target position, if any
    pub target: Option<Vector3<f32>>,
}

impl ControlInputs {
    /// Input for a stick-driven controller
    pub fn from_command(command: ChannelCommand) -> Self {
        Self {
            command,
            target: None,
        }
    }

    /// Input for a target-driven controller
    pub fn from_target(target: Vector3<f32>) -> Self {
        Self {
            command: ChannelCommand::default(),
            target: Some(target),
        }
    }
}

/// One flight-control architecture
///
/// `update` runs once per physics tick, reads the body state and applies
/// forces/torques for this tick. It cannot fail: degenerate input produces a
/// degenerate (possibly zero) command, never an error.
pub trait FlightController {
    /// Advance one physics tick
    fn update(&mut self, body: &mut dyn RigidBody, inputs: &ControlInputs, dt: f32);

    /// Arm or disarm the controller
    ///
    /// Disarmed controllers apply nothing. The body is passed so controllers
    /// can re-capture their references from the current pose on a transition.
    fn set_armed(&mut self, armed: bool, body: &dyn RigidBody);

    /// True while armed
    fn is_armed(&self) -> bool;

    /// Controller name for logs
    fn name(&self) -> &'static str;
}
