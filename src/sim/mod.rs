//! External simulation boundary
//!
//! The control stack never integrates rigid-body dynamics itself; it produces
//! force/torque commands and reads back pose and velocity through the
//! [`RigidBody`] trait, which the host simulation implements. The alternate
//! controller path delegates full state propagation to an opaque
//! [`TargetStepper`].
//!
//! [`MockRigidBody`] is a functional test double with simple Euler
//! integration, used by unit and integration tests.

pub mod mock;
pub mod rigid_body;
pub mod stepper;

pub use mock::MockRigidBody;
pub use rigid_body::{ForceMode, RigidBody};
pub use stepper::{BodyState, Rk4Stepper, StepperParams, TargetStepper};
