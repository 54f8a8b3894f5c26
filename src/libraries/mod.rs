//! Reusable input/output libraries.

pub mod rc_input;

pub use rc_input::{ChannelCommand, RatesConfig, StickInputs, TransmitterMode};
