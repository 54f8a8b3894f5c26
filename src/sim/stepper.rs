//! Opaque target stepper interface
//!
//! The alternate controller path does not run the attitude/altitude PD loops;
//! it hands the whole translation problem to a deterministic stepper that,
//! given the current state and a target, returns the next state. The stepper
//! is side-effect free: the controller owns the propagated state and only
//! ever applies a corrective force toward it.
//!
//! [`Rk4Stepper`] is the in-crate reference implementation; an FFI-backed
//! native stepper plugs in behind the same trait.

use nalgebra::Vector3;

/// Translational state propagated by a stepper
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyState {
    /// Position [m]
    pub pos: Vector3<f32>,
    /// Velocity [m/s]
    pub vel: Vector3<f32>,
}

impl Default for BodyState {
    fn default() -> Self {
        Self::at_rest(Vector3::zeros())
    }
}

impl BodyState {
    /// State at rest at the given position
    pub fn at_rest(pos: Vector3<f32>) -> Self {
        Self {
            pos,
            vel: Vector3::zeros(),
        }
    }
}

/// Stepper tuning
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepperParams {
    /// Maximum control force [N]
    pub thrust: f32,
    /// Mass [kg]
    pub mass: f32,
    /// Linear drag coefficient
    pub drag: f32,
    /// Proportional gain
    pub kp: f32,
    /// Derivative gain
    pub kd: f32,
}

impl Default for StepperParams {
    fn default() -> Self {
        Self {
            thrust: 100.0,
            mass: 1.0,
            drag: 0.1,
            kp: 10.0,
            kd: 2.0,
        }
    }
}

/// Deterministic single-step state propagator
pub trait TargetStepper {
    /// Advance `state` toward `target` by `dt` seconds
    fn step(
        &self,
        state: &BodyState,
        target: Vector3<f32>,
        dt: f32,
        params: &StepperParams,
    ) -> BodyState;
}

/// Reference stepper: thrust-clamped PD acceleration integrated with RK4
pub struct Rk4Stepper;

impl Rk4Stepper {
    /// State derivative under the PD control law
    ///
    /// `force = kp * error − (kd + drag) * velocity`, clamped to `thrust`.
    fn derivatives(state: &BodyState, target: Vector3<f32>, params: &StepperParams) -> BodyState {
        let error = target - state.pos;
        let mut control = error * params.kp - state.vel * (params.kd + params.drag);

        let magnitude = control.norm();
        if magnitude > params.thrust {
            control = control / magnitude * params.thrust;
        }

        BodyState {
            pos: state.vel,
            vel: control / params.mass,
        }
    }

    fn scaled(state: &BodyState, factor: f32) -> BodyState {
        BodyState {
            pos: state.pos * factor,
            vel: state.vel * factor,
        }
    }

    fn offset(state: &BodyState, delta: &BodyState) -> BodyState {
        BodyState {
            pos: state.pos + delta.pos,
            vel: state.vel + delta.vel,
        }
    }
}

impl TargetStepper for Rk4Stepper {
    fn step(
        &self,
        state: &BodyState,
        target: Vector3<f32>,
        dt: f32,
        params: &StepperParams,
    ) -> BodyState {
        let k1 = Self::scaled(&Self::derivatives(state, target, params), dt);
        let k2 = Self::scaled(
            &Self::derivatives(&Self::offset(state, &Self::scaled(&k1, 0.5)), target, params),
            dt,
        );
        let k3 = Self::scaled(
            &Self::derivatives(&Self::offset(state, &Self::scaled(&k2, 0.5)), target, params),
            dt,
        );
        let k4 = Self::scaled(
            &Self::derivatives(&Self::offset(state, &k3), target, params),
            dt,
        );

        BodyState {
            pos: state.pos + (k1.pos + k2.pos * 2.0 + k3.pos * 2.0 + k4.pos) / 6.0,
            vel: state.vel + (k1.vel + k2.vel * 2.0 + k3.vel * 2.0 + k4.vel) / 6.0,
        }
    }
}
