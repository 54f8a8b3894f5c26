//! Stepper-corrective controller
//!
//! The alternate flight-control architecture: an opaque [`TargetStepper`]
//! owns the translational dynamics, and this controller only nudges the real
//! body toward the stepper's propagated state with a gravity-compensated
//! corrective force. Rotation is frozen; the stepper models a point mass.
//!
//! Disarming is terminal in the guided flow (the vehicle disarms itself once
//! it returns home); re-arming snaps the propagated state back to the body's
//! current position so the controller never chases a stale trajectory.

use super::{ControlInputs, FlightController};
use crate::sim::{BodyState, ForceMode, RigidBody, StepperParams, TargetStepper};
use crate::subsystems::navigation::ForceCorrector;

/// Corrective wrapper around an opaque target stepper
pub struct StepperController {
    stepper: Box<dyn TargetStepper + Send>,
    params: StepperParams,
    corrector: ForceCorrector,
    state: BodyState,
    armed: bool,
}

impl StepperController {
    /// Create a controller and freeze the body's rotation
    ///
    /// The propagated state starts at rest at the body's current position.
    pub fn new(
        stepper: Box<dyn TargetStepper + Send>,
        params: StepperParams,
        corrector: ForceCorrector,
        body: &mut dyn RigidBody,
    ) -> Self {
        body.freeze_rotation(true);
        Self {
            stepper,
            params,
            corrector,
            state: BodyState::at_rest(body.position()),
            armed: true,
        }
    }

    /// The stepper's propagated state
    pub fn propagated_state(&self) -> BodyState {
        self.state
    }
}

impl FlightController for StepperController {
    fn update(&mut self, body: &mut dyn RigidBody, inputs: &ControlInputs, dt: f32) {
        if !self.armed {
            return;
        }

        // No guidance target means hold: the stepper is fed the current
        // position and settles there.
        let target = inputs.target.unwrap_or_else(|| body.position());

        self.state = self.stepper.step(&self.state, target, dt, &self.params);

        let correction =
            self.corrector
                .force_toward(self.state.pos, body.position(), body.velocity());
        let gravity_compensation = -body.gravity();
        body.apply_force(gravity_compensation + correction, ForceMode::Acceleration);
    }

    fn set_armed(&mut self, armed: bool, body: &dyn RigidBody) {
        if armed && !self.armed {
            self.state = BodyState::at_rest(body.position());
        }
        self.armed = armed;
    }

    fn is_armed(&self) -> bool {
        self.armed
    }

    fn name(&self) -> &'static str {
        "Stepper"
    }
}
