//! Autopilot sequencer
//!
//! A three-phase waypoint state machine, advancing strictly forward:
//!
//! 1. **Takeoff**: climb to the configured altitude above the start point.
//! 2. **FlySquare**: traverse a closed square path (forward, right, right,
//!    return), each corner reached within tolerance before the next.
//! 3. **Hover**: pin the target to the current position; terminal.
//!
//! The sequencer is a [`TargetSource`]: it only decides *what* the target is
//! each tick. The corrective force toward that target is applied by
//! [`crate::subsystems::navigation::PositionController`] at the fixed control
//! cadence, regardless of phase.

use heapless::Vec as BoundedVec;
use nalgebra::Vector3;

use crate::subsystems::navigation::TargetSource;

/// Altitude window that completes the takeoff phase [m]
pub const TAKEOFF_TOLERANCE: f32 = 0.5;

/// Upper bound on path length
pub const MAX_WAYPOINTS: usize = 8;

/// Autopilot tuning
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutopilotConfig {
    /// Takeoff altitude above the origin [m]
    pub takeoff_altitude: f32,
    /// Side length of the square path [m]
    pub square_side_length: f32,
    /// Correction acceleration toward the target [m/s²]
    pub acceleration: f32,
    /// Velocity damping factor [1/s]
    pub damping_factor: f32,
    /// Distance at which a waypoint counts as reached [m]
    pub waypoint_tolerance: f32,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            takeoff_altitude: 10.0,
            square_side_length: 10.0,
            acceleration: 10.0,
            damping_factor: 2.0,
            waypoint_tolerance: 1.0,
        }
    }
}

/// Autopilot phase, strictly forward-progressing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlightPhase {
    #[default]
    Takeoff,
    FlySquare,
    Hover,
}

/// Ordered waypoint sequence; insertion order defines traversal order
#[derive(Clone, Debug, Default)]
pub struct WaypointPath {
    waypoints: BoundedVec<Vector3<f32>, MAX_WAYPOINTS>,
}

impl WaypointPath {
    /// Closed square of the given side length starting at `start`
    ///
    /// Forward along +Z, right turn along +X, right turn back, return to
    /// start.
    pub fn square(start: Vector3<f32>, side: f32) -> Self {
        let mut waypoints = BoundedVec::new();
        let corners = [
            start + Vector3::new(0.0, 0.0, side),
            start + Vector3::new(side, 0.0, side),
            start + Vector3::new(side, 0.0, 0.0),
            start,
        ];
        for corner in corners {
            // Capacity is MAX_WAYPOINTS ≥ 4.
            let _ = waypoints.push(corner);
        }
        Self { waypoints }
    }

    pub fn get(&self, index: usize) -> Option<Vector3<f32>> {
        self.waypoints.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// Three-phase waypoint sequencer
pub struct AutopilotSequencer {
    config: AutopilotConfig,
    phase: FlightPhase,
    takeoff_target: Vector3<f32>,
    path: WaypointPath,
    waypoint_index: usize,
    hover_target: Option<Vector3<f32>>,
}

impl AutopilotSequencer {
    /// Create a sequencer anchored at the vehicle's initial position
    pub fn new(config: AutopilotConfig, initial_position: Vector3<f32>) -> Self {
        let takeoff_target = Vector3::new(
            initial_position.x,
            config.takeoff_altitude,
            initial_position.z,
        );
        let path = WaypointPath::square(takeoff_target, config.square_side_length);
        Self {
            config,
            phase: FlightPhase::Takeoff,
            takeoff_target,
            path,
            waypoint_index: 0,
            hover_target: None,
        }
    }

    /// Current phase
    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    /// Waypoint currently being flown in the square phase
    pub fn waypoint_index(&self) -> usize {
        self.waypoint_index
    }

    /// The planned square path
    pub fn path(&self) -> &WaypointPath {
        &self.path
    }
}

impl TargetSource for AutopilotSequencer {
    fn current_target(&mut self, position: Vector3<f32>) -> Vector3<f32> {
        match self.phase {
            FlightPhase::Takeoff => {
                if (position.y - self.config.takeoff_altitude).abs() <= TAKEOFF_TOLERANCE {
                    self.phase = FlightPhase::FlySquare;
                    log::info!(
                        "takeoff complete at {:.2} m, flying square path",
                        position.y
                    );
                }
                self.takeoff_target
            }
            FlightPhase::FlySquare => match self.path.get(self.waypoint_index) {
                Some(waypoint) => {
                    if (position - waypoint).norm() <= self.config.waypoint_tolerance {
                        log::info!("waypoint {} reached: {:?}", self.waypoint_index, waypoint);
                        self.waypoint_index += 1;
                    }
                    waypoint
                }
                None => {
                    self.phase = FlightPhase::Hover;
                    let target = *self.hover_target.insert(position);
                    log::info!("square path complete, hovering at {:?}", target);
                    target
                }
            },
            FlightPhase::Hover => *self.hover_target.get_or_insert(position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== WaypointPath Tests ==========

    #[test]
    fn test_square_path_corners() {
        let start = Vector3::new(2.0, 10.0, -3.0);
        let path = WaypointPath::square(start, 10.0);

        assert_eq!(path.len(), 4);
        assert_eq!(path.get(0), Some(start + Vector3::new(0.0, 0.0, 10.0)));
        assert_eq!(path.get(1), Some(start + Vector3::new(10.0, 0.0, 10.0)));
        assert_eq!(path.get(2), Some(start + Vector3::new(10.0, 0.0, 0.0)));
        assert_eq!(path.get(3), Some(start));
        assert_eq!(path.get(4), None);
    }

    // ========== Phase Machine Tests ==========

    #[test]
    fn test_takeoff_targets_initial_xz_at_altitude() {
        let mut seq = AutopilotSequencer::new(
            AutopilotConfig::default(),
            Vector3::new(5.0, 0.0, -5.0),
        );
        let target = seq.current_target(Vector3::new(5.0, 0.0, -5.0));
        assert_eq!(target, Vector3::new(5.0, 10.0, -5.0));
        assert_eq!(seq.phase(), FlightPhase::Takeoff);
    }

    #[test]
    fn test_takeoff_completes_within_half_meter() {
        let mut seq =
            AutopilotSequencer::new(AutopilotConfig::default(), Vector3::zeros());

        seq.current_target(Vector3::new(0.0, 9.0, 0.0));
        assert_eq!(seq.phase(), FlightPhase::Takeoff);

        seq.current_target(Vector3::new(0.0, 9.6, 0.0));
        assert_eq!(seq.phase(), FlightPhase::FlySquare);
    }

    #[test]
    fn test_waypoints_visited_strictly_in_sequence() {
        let mut seq =
            AutopilotSequencer::new(AutopilotConfig::default(), Vector3::zeros());

        // Complete takeoff.
        seq.current_target(Vector3::new(0.0, 10.0, 0.0));
        assert_eq!(seq.phase(), FlightPhase::FlySquare);

        // Standing at a *later* corner must not advance the cursor past the
        // current one.
        seq.current_target(Vector3::new(10.0, 10.0, 0.0));
        assert_eq!(seq.waypoint_index(), 0);

        // Visit each corner in order.
        let corners = [
            Vector3::new(0.0, 10.0, 10.0),
            Vector3::new(10.0, 10.0, 10.0),
            Vector3::new(10.0, 10.0, 0.0),
            Vector3::new(0.0, 10.0, 0.0),
        ];
        for (i, corner) in corners.iter().enumerate() {
            let target = seq.current_target(*corner);
            assert_eq!(target, *corner, "unexpected target at corner {}", i);
            assert_eq!(seq.waypoint_index(), i + 1);
        }
    }

    #[test]
    fn test_hover_only_after_all_corners() {
        let mut seq =
            AutopilotSequencer::new(AutopilotConfig::default(), Vector3::zeros());

        seq.current_target(Vector3::new(0.0, 10.0, 0.0)); // takeoff done
        for corner in [
            Vector3::new(0.0, 10.0, 10.0),
            Vector3::new(10.0, 10.0, 10.0),
            Vector3::new(10.0, 10.0, 0.0),
        ] {
            seq.current_target(corner);
            assert_eq!(seq.phase(), FlightPhase::FlySquare);
        }
        seq.current_target(Vector3::new(0.0, 10.0, 0.0)); // final corner
        assert_eq!(seq.phase(), FlightPhase::FlySquare);

        // Next tick rolls into Hover.
        seq.current_target(Vector3::new(0.1, 10.0, 0.0));
        assert_eq!(seq.phase(), FlightPhase::Hover);
    }

    #[test]
    fn test_hover_pins_entry_position() {
        let mut seq =
            AutopilotSequencer::new(AutopilotConfig::default(), Vector3::zeros());

        seq.current_target(Vector3::new(0.0, 10.0, 0.0));
        for corner in [
            Vector3::new(0.0, 10.0, 10.0),
            Vector3::new(10.0, 10.0, 10.0),
            Vector3::new(10.0, 10.0, 0.0),
            Vector3::new(0.0, 10.0, 0.0),
        ] {
            seq.current_target(corner);
        }
        let entry = Vector3::new(0.2, 10.1, 0.0);
        let pinned = seq.current_target(entry);
        assert_eq!(pinned, entry);
        assert_eq!(seq.phase(), FlightPhase::Hover);

        // The pin survives later drift.
        assert_eq!(seq.current_target(Vector3::new(5.0, 5.0, 5.0)), entry);
    }

    #[test]
    fn test_phase_never_regresses() {
        let mut seq =
            AutopilotSequencer::new(AutopilotConfig::default(), Vector3::zeros());

        seq.current_target(Vector3::new(0.0, 10.0, 0.0));
        assert_eq!(seq.phase(), FlightPhase::FlySquare);

        // Falling back below the takeoff window must not re-enter Takeoff.
        seq.current_target(Vector3::new(0.0, 2.0, 0.0));
        assert_eq!(seq.phase(), FlightPhase::FlySquare);
    }
}
