//! Rigid-body integrator interface
//!
//! The sole interface between the control stack and the external physics
//! engine. All operations are infallible: a simulated body always has a pose
//! and always accepts a force, so the control loop stays total over its input
//! domain.

use nalgebra::{UnitQuaternion, Vector3};

/// How an applied force is interpreted by the integrator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForceMode {
    /// Newtons; the integrator divides by mass
    Force,
    /// Direct acceleration, mass-independent
    Acceleration,
}

/// Handle to one simulated rigid body
///
/// Forces and torques accumulate within a physics tick and are consumed by
/// the integrator's own step; the controller recomputes its commands from
/// scratch every tick rather than accumulating them.
pub trait RigidBody {
    /// World-frame position
    fn position(&self) -> Vector3<f32>;

    /// World-frame orientation
    fn orientation(&self) -> UnitQuaternion<f32>;

    /// World-frame linear velocity
    fn velocity(&self) -> Vector3<f32>;

    /// World-frame angular velocity
    fn angular_velocity(&self) -> Vector3<f32>;

    /// World gravity vector acting on the body
    fn gravity(&self) -> Vector3<f32>;

    /// Apply a world-frame force this tick
    fn apply_force(&mut self, force: Vector3<f32>, mode: ForceMode);

    /// Apply a body-frame torque this tick
    fn apply_torque_local(&mut self, torque: Vector3<f32>);

    /// Push physical parameters to the integrator
    ///
    /// Called every tick so tuning changes take effect live.
    fn set_physical_params(&mut self, mass: f32, drag: f32, angular_drag: f32);

    /// Distance to the nearest surface directly below the body, probed along
    /// the body-frame down axis up to `max_range`
    ///
    /// Returns `None` when no surface is within range.
    fn ground_distance(&self, max_range: f32) -> Option<f32>;

    /// Lock or unlock the body's rotational degrees of freedom
    fn freeze_rotation(&mut self, frozen: bool);
}
