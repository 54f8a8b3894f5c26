//! Attitude flight controller
//!
//! The per-tick control law for a stick-flown quadrotor: one of three
//! flight-mode laws shapes a target attitude (and, in altitude hold, a target
//! altitude), a PD loop over the quaternion error produces body-frame torque,
//! and thrust is applied along the body up axis with a ground-proximity
//! assist near surfaces.
//!
//! # Behavior
//!
//! - Disarmed ticks do nothing: no forces, no torques, no parameter sync.
//! - Arming and disarming each fire exactly one edge event and re-capture the
//!   target attitude/altitude from the current pose.
//! - The law is total: malformed tuning (zero gains, zero mass) degrades
//!   control quality but never fails a tick.
//!
//! # Flight modes
//!
//! - **Acro**: shaped yaw/pitch/roll are angular-velocity commands integrated
//!   into the target attitude each tick; thrust directly sets force.
//! - **SelfLeveling**: raw pitch/roll set the target attitude absolutely,
//!   bounded by the configured max angle; yaw stays rate-integrated.
//! - **AltitudeHold**: raw thrust becomes a climb-rate command on a target
//!   altitude held by the altitude PD loop; attitude follows the
//!   self-leveling law. Descent is left to gravity and drag; the altitude
//!   loop never commands downward thrust.

use nalgebra::{UnitQuaternion, Vector3};

use super::attitude;
use super::pid::PdController;
use super::{ControlInputs, FlightController};
use crate::core::arming::{ArmEventHandler, ArmState, ArmSwitch};
use crate::libraries::rc_input::{ChannelCommand, RatesConfig};
use crate::sim::{ForceMode, RigidBody};

/// Ground-effect probe range [m]
const GROUND_ASSIST_RANGE: f32 = 0.3;

/// Peak ground-effect assist as a fraction of applied lift
const GROUND_ASSIST_GAIN: f32 = 0.25;

/// Largest instantaneous altitude error the hold loop will chase [m]
const ALTITUDE_ERROR_CLAMP: f32 = 0.5;

/// Below this mass the configuration is considered implausible [kg]
const MIN_PLAUSIBLE_MASS: f32 = 0.01;

/// Yaw offset applied when re-capturing the target attitude [deg]
///
/// The target frame is rotated 90° about up relative to the body frame; the
/// control law is consistent as long as the offset is applied on every
/// re-capture.
const TARGET_YAW_OFFSET_DEG: f32 = 90.0;

/// Flight-mode law selector
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlightMode {
    Acro,
    #[default]
    SelfLeveling,
    AltitudeHold,
}

/// Physical and gain configuration
///
/// Copied by value into the controller. Pushed to the rigid-body integrator
/// every tick so live edits take effect immediately. The only validation is
/// the non-fatal mass floor warning; tuning is the operator's responsibility.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsConfig {
    /// Maximum thrust [N]
    pub thrust: f32,
    /// Mass [kg]
    pub mass: f32,
    /// Linear drag
    pub drag: f32,
    /// Angular drag
    pub angular_drag: f32,
    /// Rotation proportional gain [Nm/deg]
    pub p: f32,
    /// Rotation integral gain; reserved, not consumed by the PD law
    pub i: f32,
    /// Rotation derivative gain [Nm/deg]
    pub d: f32,
    /// Altitude proportional gain [N/m]
    pub p_altitude: f32,
    /// Altitude integral gain; reserved, not consumed by the PD law
    pub i_altitude: f32,
    /// Altitude derivative gain [N/m]
    pub d_altitude: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            thrust: 100.0,
            mass: 1.0,
            drag: 0.1,
            angular_drag: 0.1,
            p: 0.0,
            i: 0.0,
            d: 0.0,
            p_altitude: 0.0,
            i_altitude: 0.0,
            d_altitude: 0.0,
        }
    }
}

/// Stick-driven attitude/altitude PD controller
pub struct AttitudeController {
    config: PhysicsConfig,
    max_angle: f32,
    flight_mode: FlightMode,
    arming: ArmSwitch,
    target_attitude: UnitQuaternion<f32>,
    target_altitude: f32,
    rotation_pid: PdController,
    altitude_pid: PdController,
    applied_force: Vector3<f32>,
    applied_torque: Vector3<f32>,
}

impl AttitudeController {
    /// Create a controller armed against the body's current pose
    ///
    /// Starts armed, mirroring a bench vehicle powered up in place; no arm
    /// event fires for the initial state.
    pub fn new(
        config: PhysicsConfig,
        rates: &RatesConfig,
        mode: FlightMode,
        body: &dyn RigidBody,
    ) -> Self {
        let mut controller = Self {
            config,
            max_angle: rates.max_angle,
            flight_mode: mode,
            arming: ArmSwitch::new(ArmState::Armed),
            target_attitude: UnitQuaternion::identity(),
            target_altitude: 0.0,
            rotation_pid: PdController::new(),
            altitude_pid: PdController::new(),
            applied_force: Vector3::zeros(),
            applied_torque: Vector3::zeros(),
        };
        controller.reset_internals(body);
        controller
    }

    /// Active flight mode
    pub fn flight_mode(&self) -> FlightMode {
        self.flight_mode
    }

    /// Switch the flight-mode law
    pub fn set_flight_mode(&mut self, mode: FlightMode) {
        self.flight_mode = mode;
    }

    /// Subscribe to arm/disarm edge events
    pub fn subscribe_arm_events(&mut self, handler: Box<dyn ArmEventHandler + Send>) {
        self.arming.subscribe(handler);
    }

    /// Target altitude currently held by the altitude loop [m]
    pub fn target_altitude(&self) -> f32 {
        self.target_altitude
    }

    /// Target attitude currently chased by the rotation loop
    pub fn target_attitude(&self) -> UnitQuaternion<f32> {
        self.target_attitude
    }

    /// Force vector produced by the last armed tick
    pub fn applied_force(&self) -> Vector3<f32> {
        self.applied_force
    }

    /// Body-frame torque produced by the last armed tick
    pub fn applied_torque(&self) -> Vector3<f32> {
        self.applied_torque
    }

    /// Re-capture control references from the current pose
    ///
    /// Target altitude snaps to the current altitude; target attitude snaps
    /// to the current orientation composed with the target-frame yaw offset.
    fn reset_internals(&mut self, body: &dyn RigidBody) {
        self.target_altitude = body.position().y;
        self.target_attitude = body.orientation()
            * attitude::from_pitch_yaw_roll_deg(0.0, TARGET_YAW_OFFSET_DEG, 0.0);
    }

    fn acro(&mut self, command: &ChannelCommand, dt: f32) {
        self.target_attitude *= attitude::from_pitch_yaw_roll_deg(
            command.pitch * dt,
            command.yaw * dt,
            command.roll * dt,
        );
        self.applied_force = Vector3::repeat(self.config.thrust * command.thrust);
    }

    /// Bounded-angle attitude shared by self-leveling and altitude hold
    fn level_attitude(&mut self, command: &ChannelCommand, dt: f32) {
        let heading = attitude::yaw_deg(&self.target_attitude);
        self.target_attitude = attitude::from_pitch_yaw_roll_deg(
            command.raw_pitch * self.max_angle,
            heading,
            command.raw_roll * self.max_angle,
        );
        self.target_attitude *= attitude::from_pitch_yaw_roll_deg(0.0, command.yaw * dt, 0.0);
    }

    fn self_leveling(&mut self, command: &ChannelCommand, dt: f32) {
        self.level_attitude(command, dt);
        self.applied_force = Vector3::repeat(self.config.thrust * command.thrust);
    }

    fn altitude_hold(&mut self, body: &dyn RigidBody, command: &ChannelCommand, dt: f32) {
        self.target_altitude += command.raw_thrust * dt;

        let altitude = body.position().y;
        let error = self.target_altitude - altitude;
        if error.abs() > ALTITUDE_ERROR_CLAMP {
            self.target_altitude = altitude + ALTITUDE_ERROR_CLAMP * error.signum();
        }

        let correction = self.altitude_pid.evaluate(
            Vector3::repeat(error),
            self.config.p_altitude,
            self.config.d_altitude,
            dt,
        );
        let lift = correction.y.max(0.0);
        self.applied_force = Vector3::new(0.0, lift, 0.0);

        self.level_attitude(command, dt);
    }

    /// Torque from the rotation PD over the attitude error, in body frame
    fn pid_torque(&mut self, body: &dyn RigidBody, dt: f32) -> Vector3<f32> {
        let error = attitude::attitude_error_deg(&self.target_attitude, &body.orientation());
        let torque = self
            .rotation_pid
            .evaluate(error, self.config.p, self.config.d, dt);
        body.orientation().inverse_transform_vector(&torque)
    }

    /// Supplemental lift near a surface, approximating ground effect
    fn ground_assist(&self, body: &mut dyn RigidBody, up: Vector3<f32>) {
        if let Some(distance) = body.ground_distance(GROUND_ASSIST_RANGE) {
            let factor = (1.0 - distance / GROUND_ASSIST_RANGE) * GROUND_ASSIST_GAIN;
            body.apply_force(up * (self.applied_force.y * factor), ForceMode::Force);
        }
    }

    fn sync_body_params(&self, body: &mut dyn RigidBody) {
        body.set_physical_params(self.config.mass, self.config.drag, self.config.angular_drag);
        if self.config.mass < MIN_PLAUSIBLE_MASS {
            log::warn!(
                "configured mass {} kg is implausibly low; check the physics configuration",
                self.config.mass
            );
        }
    }
}

impl FlightController for AttitudeController {
    fn update(&mut self, body: &mut dyn RigidBody, inputs: &ControlInputs, dt: f32) {
        if !self.arming.is_armed() {
            return;
        }
        let command = inputs.command;

        match self.flight_mode {
            FlightMode::Acro => self.acro(&command, dt),
            FlightMode::SelfLeveling => self.self_leveling(&command, dt),
            FlightMode::AltitudeHold => self.altitude_hold(body, &command, dt),
        }

        self.applied_torque = self.pid_torque(body, dt);
        if self.applied_torque.norm() > 0.0 {
            body.apply_torque_local(self.applied_torque);
        }

        // Thrust magnitude is bounded; only the vertical component is applied,
        // along body up. Horizontal translation comes from attitude tilt.
        let magnitude = self.applied_force.norm();
        if magnitude > self.config.thrust {
            self.applied_force = self.applied_force / magnitude * self.config.thrust;
        }
        let up = body.orientation() * Vector3::y();
        body.apply_force(up * self.applied_force.y, ForceMode::Force);

        self.ground_assist(body, up);
        self.sync_body_params(body);
    }

    fn set_armed(&mut self, armed: bool, body: &dyn RigidBody) {
        if self.arming.request(armed).is_some() {
            self.reset_internals(body);
        }
    }

    fn is_armed(&self) -> bool {
        self.arming.is_armed()
    }

    fn name(&self) -> &'static str {
        "Attitude"
    }
}
