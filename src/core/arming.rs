//! Arm/disarm state machine
//!
//! Models the armed flag as an explicit two-state machine with edge-triggered
//! event delivery. Each transition fires its event exactly once, regardless of
//! how often the same request is repeated, and regardless of how the owning
//! controller polls.
//!
//! # Behavior
//!
//! - `request(true)` while disarmed: transition to Armed, notify handlers once
//! - `request(false)` while armed: transition to Disarmed, notify handlers once
//! - Redundant requests (same state): no transition, no event
//!
//! The machine itself carries no vehicle state; the owning controller reacts
//! to the returned transition (e.g. re-captures its target attitude and
//! altitude from the current pose).

/// Armed/disarmed state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArmState {
    Disarmed,
    Armed,
}

/// Edge event emitted on a state transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArmEvent {
    /// Fired on the Disarmed → Armed edge
    Armed,
    /// Fired on the Armed → Disarmed edge
    Disarmed,
}

/// Subscriber for arm/disarm edge events
///
/// Intended for presentation-layer consumers (sound, animation, telemetry).
/// Events carry no payload beyond the edge itself.
pub trait ArmEventHandler {
    /// Called once per Disarmed → Armed transition
    fn on_armed(&mut self) {}

    /// Called once per Armed → Disarmed transition
    fn on_disarmed(&mut self) {}
}

/// Two-state arm switch with exactly-once edge notification
pub struct ArmSwitch {
    state: ArmState,
    handlers: Vec<Box<dyn ArmEventHandler + Send>>,
}

impl ArmSwitch {
    /// Create a switch in the given initial state
    ///
    /// No event is fired for the initial state.
    pub fn new(initial: ArmState) -> Self {
        Self {
            state: initial,
            handlers: Vec::new(),
        }
    }

    /// Current state
    pub fn state(&self) -> ArmState {
        self.state
    }

    /// True when armed
    pub fn is_armed(&self) -> bool {
        self.state == ArmState::Armed
    }

    /// Register an event subscriber
    pub fn subscribe(&mut self, handler: Box<dyn ArmEventHandler + Send>) {
        self.handlers.push(handler);
    }

    /// Request a state; returns the transition if one occurred
    ///
    /// A request matching the current state is a no-op and returns `None`.
    pub fn request(&mut self, armed: bool) -> Option<ArmEvent> {
        let requested = if armed {
            ArmState::Armed
        } else {
            ArmState::Disarmed
        };
        if requested == self.state {
            return None;
        }
        self.state = requested;

        let event = match requested {
            ArmState::Armed => ArmEvent::Armed,
            ArmState::Disarmed => ArmEvent::Disarmed,
        };
        for handler in &mut self.handlers {
            match event {
                ArmEvent::Armed => handler.on_armed(),
                ArmEvent::Disarmed => handler.on_disarmed(),
            }
        }
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct CountingHandler {
        armed: Arc<AtomicU32>,
        disarmed: Arc<AtomicU32>,
    }

    impl ArmEventHandler for CountingHandler {
        fn on_armed(&mut self) {
            self.armed.fetch_add(1, Ordering::Relaxed);
        }

        fn on_disarmed(&mut self) {
            self.disarmed.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn counting_switch(initial: ArmState) -> (ArmSwitch, Arc<AtomicU32>, Arc<AtomicU32>) {
        let armed = Arc::new(AtomicU32::new(0));
        let disarmed = Arc::new(AtomicU32::new(0));
        let mut switch = ArmSwitch::new(initial);
        switch.subscribe(Box::new(CountingHandler {
            armed: armed.clone(),
            disarmed: disarmed.clone(),
        }));
        (switch, armed, disarmed)
    }

    // ========== Transition Tests ==========

    #[test]
    fn test_arm_fires_single_event() {
        let (mut switch, armed, disarmed) = counting_switch(ArmState::Disarmed);

        let transition = switch.request(true);
        assert_eq!(transition, Some(ArmEvent::Armed));
        assert!(switch.is_armed());
        assert_eq!(armed.load(Ordering::Relaxed), 1);
        assert_eq!(disarmed.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_redundant_arm_fires_no_second_event() {
        let (mut switch, armed, _) = counting_switch(ArmState::Disarmed);

        assert!(switch.request(true).is_some());
        assert!(switch.request(true).is_none());
        assert!(switch.request(true).is_none());
        assert_eq!(armed.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_disarm_fires_single_event() {
        let (mut switch, armed, disarmed) = counting_switch(ArmState::Armed);

        let transition = switch.request(false);
        assert_eq!(transition, Some(ArmEvent::Disarmed));
        assert!(!switch.is_armed());
        assert_eq!(armed.load(Ordering::Relaxed), 0);
        assert_eq!(disarmed.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_full_cycle_fires_one_event_per_edge() {
        let (mut switch, armed, disarmed) = counting_switch(ArmState::Disarmed);

        switch.request(true);
        switch.request(false);
        switch.request(true);
        assert_eq!(armed.load(Ordering::Relaxed), 2);
        assert_eq!(disarmed.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_initial_state_fires_no_event() {
        let (switch, armed, disarmed) = counting_switch(ArmState::Armed);
        assert!(switch.is_armed());
        assert_eq!(armed.load(Ordering::Relaxed), 0);
        assert_eq!(disarmed.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_multiple_subscribers_all_notified() {
        let (mut switch, armed_a, _) = counting_switch(ArmState::Disarmed);
        let armed_b = Arc::new(AtomicU32::new(0));
        switch.subscribe(Box::new(CountingHandler {
            armed: armed_b.clone(),
            disarmed: Arc::new(AtomicU32::new(0)),
        }));

        switch.request(true);
        assert_eq!(armed_a.load(Ordering::Relaxed), 1);
        assert_eq!(armed_b.load(Ordering::Relaxed), 1);
    }
}
