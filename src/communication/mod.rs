//! Communication protocols.

pub mod targets;
