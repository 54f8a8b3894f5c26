//! Copter assembly
//!
//! Wires one flight-control architecture to its input side and runs the
//! per-tick sequence. Three vehicle configurations exist, mirroring the three
//! ways the stack is deployed:
//!
//! - **Manual**: shaped stick input drives the attitude controller.
//! - **Autopilot**: the phase sequencer feeds the direct force-correction
//!   controller through a scripted takeoff → square → hover flight.
//! - **Guided**: targets arrive over a TCP socket, the follower sequences
//!   them and the stepper controller flies the vehicle; returning home
//!   disarms it.
//!
//! The control tick is synchronous and total: it drains the network inbox,
//! resolves the tick's target, and runs the controller. All I/O stays on the
//! background listener thread.

use std::io;

use crate::communication::targets::{decode, ListenerConfig, TargetInbox, TargetListener};
use crate::libraries::rc_input::{RatesConfig, StickInputs};
use crate::sim::{RigidBody, StepperParams, TargetStepper};
use crate::subsystems::autopilot::{AutopilotConfig, AutopilotSequencer, FlightPhase};
use crate::subsystems::control::{
    AttitudeController, ControlInputs, FlightController, StepperController,
};
use crate::subsystems::navigation::{
    FollowerConfig, ForceCorrector, PositionController, TargetFollower, TargetSource,
};

/// Configuration for the network-guided vehicle
#[derive(Clone, Debug)]
pub struct GuidedConfig {
    /// Stepper tuning handed to the opaque propagator
    pub stepper: StepperParams,
    /// Corrective force law toward the propagated state
    pub corrector: ForceCorrector,
    /// Target follower tuning
    pub follower: FollowerConfig,
    /// Listener socket configuration
    pub listener: ListenerConfig,
}

impl Default for GuidedConfig {
    fn default() -> Self {
        Self {
            stepper: StepperParams::default(),
            corrector: ForceCorrector::default(),
            follower: FollowerConfig::default(),
            listener: ListenerConfig::default(),
        }
    }
}

enum Guidance {
    Pilot,
    Autopilot(AutopilotSequencer),
    Guided {
        follower: TargetFollower,
        listener: TargetListener,
        inbox: TargetInbox,
    },
}

/// One simulated quadrotor
pub struct Copter {
    rates: RatesConfig,
    sticks: StickInputs,
    controller: Box<dyn FlightController>,
    guidance: Guidance,
}

impl Copter {
    /// Stick-flown vehicle
    ///
    /// The caller builds (and may subscribe arm events on) the attitude
    /// controller; the copter shapes stick input with `rates` every tick.
    pub fn manual(controller: AttitudeController, rates: RatesConfig) -> Self {
        Self {
            rates,
            sticks: StickInputs::default(),
            controller: Box::new(controller),
            guidance: Guidance::Pilot,
        }
    }

    /// Scripted takeoff → square → hover vehicle
    pub fn autopilot(config: AutopilotConfig, body: &dyn RigidBody) -> Self {
        let corrector = ForceCorrector {
            acceleration: config.acceleration,
            damping_factor: config.damping_factor,
        };
        Self {
            rates: RatesConfig::default(),
            sticks: StickInputs::default(),
            controller: Box::new(PositionController::new(corrector)),
            guidance: Guidance::Autopilot(AutopilotSequencer::new(config, body.position())),
        }
    }

    /// Network-guided vehicle
    ///
    /// Binds the listener socket and spawns the background ingestion thread;
    /// the body's current position becomes the follower's home.
    pub fn guided(
        stepper: Box<dyn TargetStepper + Send>,
        config: GuidedConfig,
        body: &mut dyn RigidBody,
    ) -> io::Result<Self> {
        let (listener, inbox) = TargetListener::spawn(config.listener)?;
        let follower = TargetFollower::new(body.position(), config.follower);
        let controller =
            StepperController::new(stepper, config.stepper, config.corrector, body);
        Ok(Self {
            rates: RatesConfig::default(),
            sticks: StickInputs::default(),
            controller: Box::new(controller),
            guidance: Guidance::Guided {
                follower,
                listener,
                inbox,
            },
        })
    }

    /// Inject the latest stick state (read by the next tick)
    pub fn set_sticks(&mut self, sticks: StickInputs) {
        self.sticks = sticks;
    }

    /// Arm or disarm the active controller
    pub fn set_armed(&mut self, armed: bool, body: &dyn RigidBody) {
        self.controller.set_armed(armed, body);
    }

    pub fn is_armed(&self) -> bool {
        self.controller.is_armed()
    }

    /// Name of the active controller, for logs and diagnostics
    pub fn controller_name(&self) -> &'static str {
        self.controller.name()
    }

    /// Autopilot phase, when flying the autopilot configuration
    pub fn autopilot_phase(&self) -> Option<FlightPhase> {
        match &self.guidance {
            Guidance::Autopilot(sequencer) => Some(sequencer.phase()),
            _ => None,
        }
    }

    /// Whether the follower is homing, when network-guided
    pub fn is_homing(&self) -> Option<bool> {
        match &self.guidance {
            Guidance::Guided { follower, .. } => Some(follower.is_homing()),
            _ => None,
        }
    }

    /// Bound listener address, when network-guided
    pub fn listener_addr(&self) -> Option<std::net::SocketAddr> {
        match &self.guidance {
            Guidance::Guided { listener, .. } => Some(listener.local_addr()),
            _ => None,
        }
    }

    /// Signal the listener thread to stop without waiting for it
    ///
    /// Dropping the copter also releases the socket.
    pub fn shutdown(&self) {
        if let Guidance::Guided { listener, .. } = &self.guidance {
            listener.shutdown();
        }
    }

    /// Run one control tick
    ///
    /// Shapes stick input, drains and applies queued directives, resolves the
    /// guidance target and runs the controller. Never fails; decode failures
    /// are logged and skipped.
    pub fn tick(&mut self, body: &mut dyn RigidBody, dt: f32) {
        let command = self.rates.shape(&self.sticks);
        let position = body.position();

        let mut reached_home = false;
        let target = match &mut self.guidance {
            Guidance::Pilot => None,
            Guidance::Autopilot(sequencer) => Some(sequencer.current_target(position)),
            Guidance::Guided {
                follower, inbox, ..
            } => {
                for raw in inbox.drain() {
                    match decode(&raw) {
                        Ok(directive) => follower.apply(directive),
                        Err(e) => log::warn!("dropping target message {:?}: {}", raw, e),
                    }
                }
                let target = follower.current_target(position);
                reached_home = follower.home_reached(position);
                Some(target)
            }
        };

        let inputs = ControlInputs { command, target };
        self.controller.update(body, &inputs, dt);

        if reached_home && self.controller.is_armed() {
            log::info!("returned to start position; disarming");
            self.controller.set_armed(false, body);
        }
    }
}
