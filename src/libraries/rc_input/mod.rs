//! Pilot input shaping
//!
//! Maps raw bipolar stick input to thrust/yaw/pitch/roll commands. Two stages:
//!
//! 1. **Channel assignment**: a fixed permutation selected by
//!    [`TransmitterMode`] decides which physical stick axis feeds which
//!    command channel (the four standard transmitter modes).
//! 2. **Rate shaping**: thrust is remapped from `[-1, 1]` to `[0, 1]`; the
//!    rotational channels pass through a proportional + signed-square
//!    exponential curve, preserving sign and growing super-linearly away from
//!    center when the expo gain is non-zero.
//!
//! Shaping is a pure function of the sticks and config. Out-of-range input is
//! not rejected; it simply produces an out-of-range command.

/// Transmitter stick layout
///
/// Selects one of the four fixed channel-assignment permutations. There is no
/// interpolation between modes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransmitterMode {
    /// Throttle right, pitch left
    Mode1,
    /// Throttle left, pitch right (the common default)
    #[default]
    Mode2,
    /// Like Mode1 with yaw/roll swapped
    Mode3,
    /// Like Mode2 with yaw/roll swapped
    Mode4,
}

/// Rate-shaping configuration
///
/// Immutable per flight session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RatesConfig {
    /// Linear gain on the rotational channels [deg/s per unit stick]
    pub proportional_gain: f32,
    /// Signed-square expo gain on the rotational channels [deg/s]
    pub exponential_gain: f32,
    /// Channel-assignment permutation
    pub mode: TransmitterMode,
    /// Attitude bound for the self-leveling law [deg]
    pub max_angle: f32,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            proportional_gain: 45.0,
            exponential_gain: 0.0,
            mode: TransmitterMode::Mode2,
            max_angle: 15.0,
        }
    }
}

/// Raw two-stick input, each axis in `[-1, 1]`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StickInputs {
    pub left_horizontal: f32,
    pub left_vertical: f32,
    pub right_horizontal: f32,
    pub right_vertical: f32,
}

/// Channel-mapped and shaped command
///
/// Carries both the shaped values and the channel-mapped raw values: the acro
/// law consumes the shaped rates, while the self-leveling and altitude-hold
/// laws consume the raw channel values directly.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChannelCommand {
    /// Shaped thrust in `[0, 1]`
    pub thrust: f32,
    /// Shaped yaw rate [deg/s]
    pub yaw: f32,
    /// Shaped pitch rate [deg/s]
    pub pitch: f32,
    /// Shaped roll rate [deg/s]
    pub roll: f32,
    /// Channel-mapped raw thrust, `[-1, 1]`
    pub raw_thrust: f32,
    /// Channel-mapped raw yaw, `[-1, 1]`
    pub raw_yaw: f32,
    /// Channel-mapped raw pitch, `[-1, 1]`
    pub raw_pitch: f32,
    /// Channel-mapped raw roll, `[-1, 1]`
    pub raw_roll: f32,
}

impl RatesConfig {
    /// Shape raw stick input into a channel command
    pub fn shape(&self, sticks: &StickInputs) -> ChannelCommand {
        let (raw_thrust, raw_yaw, raw_pitch, raw_roll) = match self.mode {
            TransmitterMode::Mode1 => (
                sticks.right_vertical,
                sticks.left_horizontal,
                sticks.left_vertical,
                sticks.right_horizontal,
            ),
            TransmitterMode::Mode2 => (
                sticks.left_vertical,
                sticks.left_horizontal,
                sticks.right_vertical,
                sticks.right_horizontal,
            ),
            TransmitterMode::Mode3 => (
                sticks.right_vertical,
                sticks.right_horizontal,
                sticks.left_vertical,
                sticks.left_horizontal,
            ),
            TransmitterMode::Mode4 => (
                sticks.left_vertical,
                sticks.right_horizontal,
                sticks.right_vertical,
                sticks.left_horizontal,
            ),
        };

        ChannelCommand {
            thrust: (raw_thrust + 1.0) * 0.5,
            yaw: expo_curve(raw_yaw, self.proportional_gain, self.exponential_gain),
            pitch: expo_curve(raw_pitch, self.proportional_gain, self.exponential_gain),
            roll: expo_curve(raw_roll, self.proportional_gain, self.exponential_gain),
            raw_thrust,
            raw_yaw,
            raw_pitch,
            raw_roll,
        }
    }
}

/// Proportional + signed-square expo curve
///
/// `input * p + input² * sign(input) * e`; sign-preserving, so the curve is
/// odd in the input for any gain pair.
pub fn expo_curve(input: f32, proportional: f32, exponential: f32) -> f32 {
    input * proportional + input * input * input.signum() * exponential
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    fn sticks(lh: f32, lv: f32, rh: f32, rv: f32) -> StickInputs {
        StickInputs {
            left_horizontal: lh,
            left_vertical: lv,
            right_horizontal: rh,
            right_vertical: rv,
        }
    }

    // ========== Thrust Remap Tests ==========

    #[test]
    fn test_thrust_remaps_bipolar_to_unit_range() {
        let config = RatesConfig::default();
        for i in 0..=20 {
            let raw = -1.0 + i as f32 * 0.1;
            let command = config.shape(&sticks(0.0, raw, 0.0, 0.0));
            assert!(
                (0.0..=1.0).contains(&command.thrust),
                "thrust {} out of range for raw {}",
                command.thrust,
                raw
            );
        }
    }

    #[test]
    fn test_thrust_endpoints() {
        let config = RatesConfig::default();
        assert!((config.shape(&sticks(0.0, -1.0, 0.0, 0.0)).thrust - 0.0).abs() < EPS);
        assert!((config.shape(&sticks(0.0, 0.0, 0.0, 0.0)).thrust - 0.5).abs() < EPS);
        assert!((config.shape(&sticks(0.0, 1.0, 0.0, 0.0)).thrust - 1.0).abs() < EPS);
    }

    // ========== Expo Curve Tests ==========

    #[test]
    fn test_centered_stick_commands_zero_rate() {
        let config = RatesConfig {
            exponential_gain: 20.0,
            ..RatesConfig::default()
        };
        let command = config.shape(&sticks(0.0, 0.0, 0.0, 0.0));
        assert!(command.yaw.abs() < EPS);
        assert!(command.pitch.abs() < EPS);
        assert!(command.roll.abs() < EPS);
    }

    #[test]
    fn test_expo_curve_is_odd() {
        for i in 1..=10 {
            let x = i as f32 * 0.1;
            let positive = expo_curve(x, 45.0, 30.0);
            let negative = expo_curve(-x, 45.0, 30.0);
            assert!(
                (positive + negative).abs() < EPS,
                "curve not odd at {}: {} vs {}",
                x,
                positive,
                negative
            );
        }
    }

    #[test]
    fn test_expo_grows_super_linearly() {
        // With expo the command at full deflection exceeds the linear term.
        let linear = expo_curve(1.0, 45.0, 0.0);
        let with_expo = expo_curve(1.0, 45.0, 25.0);
        assert!((linear - 45.0).abs() < EPS);
        assert!((with_expo - 70.0).abs() < EPS);
    }

    #[test]
    fn test_proportional_only_is_linear() {
        assert!((expo_curve(0.5, 45.0, 0.0) - 22.5).abs() < EPS);
        assert!((expo_curve(-0.5, 45.0, 0.0) + 22.5).abs() < EPS);
    }

    // ========== Channel Assignment Tests ==========

    #[test]
    fn test_mode1_assignment() {
        let config = RatesConfig {
            mode: TransmitterMode::Mode1,
            ..RatesConfig::default()
        };
        let command = config.shape(&sticks(0.1, 0.2, 0.3, 0.4));
        assert!((command.raw_thrust - 0.4).abs() < EPS);
        assert!((command.raw_yaw - 0.1).abs() < EPS);
        assert!((command.raw_pitch - 0.2).abs() < EPS);
        assert!((command.raw_roll - 0.3).abs() < EPS);
    }

    #[test]
    fn test_mode2_assignment() {
        let config = RatesConfig {
            mode: TransmitterMode::Mode2,
            ..RatesConfig::default()
        };
        let command = config.shape(&sticks(0.1, 0.2, 0.3, 0.4));
        assert!((command.raw_thrust - 0.2).abs() < EPS);
        assert!((command.raw_yaw - 0.1).abs() < EPS);
        assert!((command.raw_pitch - 0.4).abs() < EPS);
        assert!((command.raw_roll - 0.3).abs() < EPS);
    }

    #[test]
    fn test_mode3_assignment() {
        let config = RatesConfig {
            mode: TransmitterMode::Mode3,
            ..RatesConfig::default()
        };
        let command = config.shape(&sticks(0.1, 0.2, 0.3, 0.4));
        assert!((command.raw_thrust - 0.4).abs() < EPS);
        assert!((command.raw_yaw - 0.3).abs() < EPS);
        assert!((command.raw_pitch - 0.2).abs() < EPS);
        assert!((command.raw_roll - 0.1).abs() < EPS);
    }

    #[test]
    fn test_mode4_assignment() {
        let config = RatesConfig {
            mode: TransmitterMode::Mode4,
            ..RatesConfig::default()
        };
        let command = config.shape(&sticks(0.1, 0.2, 0.3, 0.4));
        assert!((command.raw_thrust - 0.2).abs() < EPS);
        assert!((command.raw_yaw - 0.3).abs() < EPS);
        assert!((command.raw_pitch - 0.4).abs() < EPS);
        assert!((command.raw_roll - 0.1).abs() < EPS);
    }

    #[test]
    fn test_shaped_rates_scale_with_proportional_gain() {
        let config = RatesConfig {
            proportional_gain: 90.0,
            ..RatesConfig::default()
        };
        let command = config.shape(&sticks(0.5, 0.0, 0.0, 0.0));
        assert!((command.yaw - 45.0).abs() < EPS);
    }
}
