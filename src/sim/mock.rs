//! Mock rigid body for host tests
//!
//! Functional stand-in for the external integrator: records every applied
//! force and torque, and offers a minimal Euler `step` so closed-loop tests
//! can watch the body actually move. Not a physics engine, just enough
//! dynamics to exercise the controllers.

use nalgebra::{UnitQuaternion, Vector3};

use super::rigid_body::{ForceMode, RigidBody};

/// Mock rigid body with settable state and simple Euler integration
pub struct MockRigidBody {
    position: Vector3<f32>,
    orientation: UnitQuaternion<f32>,
    velocity: Vector3<f32>,
    angular_velocity: Vector3<f32>,
    gravity: Vector3<f32>,
    mass: f32,
    drag: f32,
    angular_drag: f32,
    ground_distance: Option<f32>,
    rotation_frozen: bool,
    pending_accel: Vector3<f32>,
    applied_forces: Vec<(Vector3<f32>, ForceMode)>,
    applied_torques: Vec<Vector3<f32>>,
}

impl MockRigidBody {
    pub fn new() -> Self {
        Self {
            position: Vector3::zeros(),
            orientation: UnitQuaternion::identity(),
            velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            gravity: Vector3::new(0.0, -9.81, 0.0),
            mass: 1.0,
            drag: 0.0,
            angular_drag: 0.0,
            ground_distance: None,
            rotation_frozen: false,
            pending_accel: Vector3::zeros(),
            applied_forces: Vec::new(),
            applied_torques: Vec::new(),
        }
    }

    pub fn at(position: Vector3<f32>) -> Self {
        let mut body = Self::new();
        body.position = position;
        body
    }

    // ---- test controls ----

    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
    }

    pub fn set_orientation(&mut self, orientation: UnitQuaternion<f32>) {
        self.orientation = orientation;
    }

    pub fn set_velocity(&mut self, velocity: Vector3<f32>) {
        self.velocity = velocity;
    }

    pub fn set_gravity(&mut self, gravity: Vector3<f32>) {
        self.gravity = gravity;
    }

    /// Simulate a surface below the body at the given distance
    pub fn set_ground_distance(&mut self, distance: Option<f32>) {
        self.ground_distance = distance;
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn drag(&self) -> f32 {
        self.drag
    }

    pub fn angular_drag(&self) -> f32 {
        self.angular_drag
    }

    pub fn rotation_frozen(&self) -> bool {
        self.rotation_frozen
    }

    /// Forces applied since the last `step`/`take_applied_forces`
    pub fn take_applied_forces(&mut self) -> Vec<(Vector3<f32>, ForceMode)> {
        std::mem::take(&mut self.applied_forces)
    }

    /// Torques applied since the last `step`/`take_applied_torques`
    pub fn take_applied_torques(&mut self) -> Vec<Vector3<f32>> {
        std::mem::take(&mut self.applied_torques)
    }

    /// Euler-integrate the accumulated forces plus gravity over `dt`
    ///
    /// Linear drag is applied as velocity damping. Rotation is not
    /// integrated; orientation is set directly by tests.
    pub fn step(&mut self, dt: f32) {
        self.velocity += (self.pending_accel + self.gravity) * dt;
        self.velocity /= 1.0 + self.drag * dt;
        self.position += self.velocity * dt;

        self.pending_accel = Vector3::zeros();
        self.applied_forces.clear();
        self.applied_torques.clear();
    }
}

impl Default for MockRigidBody {
    fn default() -> Self {
        Self::new()
    }
}

impl RigidBody for MockRigidBody {
    fn position(&self) -> Vector3<f32> {
        self.position
    }

    fn orientation(&self) -> UnitQuaternion<f32> {
        self.orientation
    }

    fn velocity(&self) -> Vector3<f32> {
        self.velocity
    }

    fn angular_velocity(&self) -> Vector3<f32> {
        self.angular_velocity
    }

    fn gravity(&self) -> Vector3<f32> {
        self.gravity
    }

    fn apply_force(&mut self, force: Vector3<f32>, mode: ForceMode) {
        self.pending_accel += match mode {
            ForceMode::Force => force / self.mass,
            ForceMode::Acceleration => force,
        };
        self.applied_forces.push((force, mode));
    }

    fn apply_torque_local(&mut self, torque: Vector3<f32>) {
        self.applied_torques.push(torque);
    }

    fn set_physical_params(&mut self, mass: f32, drag: f32, angular_drag: f32) {
        self.mass = mass;
        self.drag = drag;
        self.angular_drag = angular_drag;
    }

    fn ground_distance(&self, max_range: f32) -> Option<f32> {
        self.ground_distance.filter(|d| *d <= max_range)
    }

    fn freeze_rotation(&mut self, frozen: bool) {
        self.rotation_frozen = frozen;
    }
}
