//! PD evaluator
//!
//! Discrete-time proportional-derivative correction over a 3-component error
//! vector. The only state is the previous error, used for the finite
//! difference in the derivative term.
//!
//! # Cadence contract
//!
//! `evaluate` must be called once per fixed control tick with that tick's
//! `dt`. Calling at a different cadence silently changes the effective
//! derivative gain; the evaluator does not guard against it.
//!
//! Integral gains exist in [`super::PhysicsConfig`] but are reserved: this is
//! deliberately a pure PD law, and no accumulator is kept.

use nalgebra::Vector3;

/// Stateful PD evaluator
///
/// Rotation and altitude control each own an independent instance; the
/// instances must never share state.
#[derive(Clone, Copy, Debug)]
pub struct PdController {
    last_error: Vector3<f32>,
}

impl Default for PdController {
    fn default() -> Self {
        Self::new()
    }
}

impl PdController {
    pub fn new() -> Self {
        Self {
            last_error: Vector3::zeros(),
        }
    }

    /// Evaluate one correction
    ///
    /// `error * kp + ((error − last_error) / dt) * kd`. The stored error is
    /// updated on every call; the first call differentiates against zero.
    pub fn evaluate(&mut self, error: Vector3<f32>, kp: f32, kd: f32, dt: f32) -> Vector3<f32> {
        let proportional = error * kp;
        let derivative = (error - self.last_error) / dt * kd;
        self.last_error = error;
        proportional + derivative
    }

    /// Clear the stored error (e.g. on re-arm)
    pub fn reset(&mut self) {
        self.last_error = Vector3::zeros();
    }
}
