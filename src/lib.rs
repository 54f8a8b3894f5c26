//! quad-pilot: simulated quadrotor flight-control stack
//!
//! Converts raw pilot/autopilot input into commanded attitude and altitude,
//! runs a discrete-time PD control loop against the vehicle's current pose,
//! and exposes a waypoint/target-following layer driven either by an internal
//! autopilot routine or by targets injected asynchronously over a TCP socket.
//!
//! The crate produces force/torque commands only; rigid-body integration is
//! owned by an external simulation reached through the [`sim::RigidBody`]
//! trait. See [`copter::Copter`] for the three vehicle configurations.

// Core systems (arming state machine)
pub mod core;

// Input shaping libraries
pub mod libraries;

// External simulation boundary (rigid body, target stepper, mocks)
pub mod sim;

// Flight subsystems (control laws, navigation, autopilot sequencer)
pub mod subsystems;

// Network target ingestion
pub mod communication;

// Vehicle assembly
pub mod copter;

pub use copter::{Copter, GuidedConfig};
