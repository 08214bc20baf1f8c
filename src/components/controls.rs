use bevy::prelude::*;

use crate::resources::{ControlChannel, ControlSmoothingConfig, SmoothingRates};
use crate::utils::SimError;

/// Drive direction implied by the latest throttle command of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveDirection {
    Forward,
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThrottleCommand {
    Forward(f64),
    Reverse(f64),
}

impl ThrottleCommand {
    pub fn direction(self) -> DriveDirection {
        match self {
            ThrottleCommand::Forward(_) => DriveDirection::Forward,
            ThrottleCommand::Reverse(_) => DriveDirection::Reverse,
        }
    }

    fn amount(self) -> f64 {
        match self {
            ThrottleCommand::Forward(amount) | ThrottleCommand::Reverse(amount) => amount,
        }
    }
}

/// Raw per-tick command latch. Input systems write it while keys/axes are
/// held; the smoothing step drains it once per tick. Repeated writes within
/// one tick resolve last-write-wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDriverInput {
    throttle: Option<ThrottleCommand>,
    brake: Option<f64>,
    handbrake: Option<f64>,
    steer: Option<f64>,
    steer_left: bool,
    steer_right: bool,
}

/// Shapes one raw channel value into its smoothed output for this tick.
pub trait InputShaper: Send + Sync {
    fn apply(&self, channel: ControlChannel, current: f64, target: f64, dt: f64) -> f64;
}

/// Keyboard-style shaping: bang-bang targets rate-limited by per-channel
/// rise/fall rates.
#[derive(Debug, Clone)]
pub struct DigitalShaper {
    rates: SmoothingRates,
}

impl DigitalShaper {
    pub fn new(rates: SmoothingRates) -> Self {
        Self { rates }
    }
}

impl InputShaper for DigitalShaper {
    fn apply(&self, channel: ControlChannel, current: f64, target: f64, dt: f64) -> f64 {
        if target > current {
            (current + self.rates.rise(channel) * dt).min(target)
        } else {
            (current - self.rates.fall(channel) * dt).max(target)
        }
    }
}

/// Gamepad-style shaping: the device reports true channel values (including
/// neutral), so they are applied directly. The rate table travels with the
/// shaper as configuration so mode selection is a pure strategy swap.
#[derive(Debug, Clone)]
pub struct AnalogShaper {
    #[allow(dead_code)]
    rates: SmoothingRates,
}

impl AnalogShaper {
    pub fn new(rates: SmoothingRates) -> Self {
        Self { rates }
    }
}

impl InputShaper for AnalogShaper {
    fn apply(&self, _channel: ControlChannel, _current: f64, target: f64, _dt: f64) -> f64 {
        target
    }
}

/// The shaping strategies, built once from configuration.
#[derive(Resource)]
pub struct InputShapers {
    pub digital: DigitalShaper,
    pub analog: AnalogShaper,
}

impl InputShapers {
    pub fn from_config(config: &ControlSmoothingConfig) -> Self {
        Self {
            digital: DigitalShaper::new(config.digital.clone()),
            analog: AnalogShaper::new(config.analog.clone()),
        }
    }
}

/// Bounded, time-smoothed control channels for one vehicle, together with
/// the raw input latch feeding them.
#[derive(Component, Debug, Clone)]
pub struct CarControls {
    pub accelerator: f64,
    pub brake: f64,
    pub handbrake: f64,
    /// Combined steering channel in `[-1, 1]`, positive steering left.
    pub steer: f64,
    steer_left: f64,
    steer_right: f64,
    digital_input_enabled: bool,
    raw: RawDriverInput,
}

impl CarControls {
    pub fn new(digital_input_enabled: bool) -> Self {
        Self {
            accelerator: 0.0,
            brake: 0.0,
            handbrake: 0.0,
            steer: 0.0,
            steer_left: 0.0,
            steer_right: 0.0,
            digital_input_enabled,
            raw: RawDriverInput::default(),
        }
    }

    /// Switches input interpretation without touching current channel values.
    pub fn set_digital_mode(&mut self, enabled: bool) {
        self.digital_input_enabled = enabled;
    }

    pub fn digital_input_enabled(&self) -> bool {
        self.digital_input_enabled
    }

    pub fn accelerate_forward(&mut self, amount: f64) {
        self.raw.throttle = Some(ThrottleCommand::Forward(amount.clamp(0.0, 1.0)));
    }

    pub fn accelerate_reverse(&mut self, amount: f64) {
        self.raw.throttle = Some(ThrottleCommand::Reverse(amount.clamp(0.0, 1.0)));
    }

    pub fn brake(&mut self, amount: f64) {
        self.raw.brake = Some(amount.clamp(0.0, 1.0));
    }

    pub fn handbrake(&mut self, amount: f64) {
        self.raw.handbrake = Some(amount.clamp(0.0, 1.0));
    }

    /// Direct steering from a normalized axis. Only valid in analog mode;
    /// digital steering goes through [`Self::steer_left`]/[`Self::steer_right`].
    pub fn steer(&mut self, amount: f64) -> Result<(), SimError> {
        if self.digital_input_enabled {
            debug_assert!(
                false,
                "analog steer called while digital input is enabled"
            );
            return Err(SimError::InvalidControl(
                "analog steer called while digital input is enabled".into(),
            ));
        }
        self.raw.steer = Some(amount.clamp(-1.0, 1.0));
        Ok(())
    }

    pub fn steer_left(&mut self) {
        self.raw.steer_left = true;
    }

    pub fn steer_right(&mut self) {
        self.raw.steer_right = true;
    }

    /// Releases every control. Digital channels decay through the fall-rate
    /// path on the next smoothing tick; analog channels zero immediately,
    /// matching what the device itself would report.
    pub fn release_all_controls(&mut self) {
        self.raw = RawDriverInput::default();
        if !self.digital_input_enabled {
            self.accelerator = 0.0;
            self.brake = 0.0;
            self.handbrake = 0.0;
            self.steer = 0.0;
            self.steer_left = 0.0;
            self.steer_right = 0.0;
        }
    }

    /// Drains the raw latch and advances every channel one tick through the
    /// given shaper. Returns the drive direction of the tick's throttle
    /// command, if any, so gear arbitration can run before the channels reach
    /// the wheels.
    pub fn apply_smoothing(&mut self, shaper: &dyn InputShaper, dt: f64) -> Option<DriveDirection> {
        let raw = std::mem::take(&mut self.raw);
        let direction = raw.throttle.map(ThrottleCommand::direction);
        let digital = self.digital_input_enabled;

        let accel_target = raw
            .throttle
            .map(|command| if digital { 1.0 } else { command.amount() })
            .unwrap_or(0.0);
        let brake_target = raw
            .brake
            .map(|amount| if digital { 1.0 } else { amount })
            .unwrap_or(0.0);
        let handbrake_target = raw
            .handbrake
            .map(|amount| if digital { 1.0 } else { amount })
            .unwrap_or(0.0);

        self.accelerator = shaper
            .apply(ControlChannel::Accel, self.accelerator, accel_target, dt)
            .clamp(0.0, 1.0);
        self.brake = shaper
            .apply(ControlChannel::Brake, self.brake, brake_target, dt)
            .clamp(0.0, 1.0);
        self.handbrake = shaper
            .apply(
                ControlChannel::Handbrake,
                self.handbrake,
                handbrake_target,
                dt,
            )
            .clamp(0.0, 1.0);

        if digital {
            let left_target = if raw.steer_left { 1.0 } else { 0.0 };
            let right_target = if raw.steer_right { 1.0 } else { 0.0 };
            self.steer_left = shaper
                .apply(ControlChannel::SteerLeft, self.steer_left, left_target, dt)
                .clamp(0.0, 1.0);
            self.steer_right = shaper
                .apply(
                    ControlChannel::SteerRight,
                    self.steer_right,
                    right_target,
                    dt,
                )
                .clamp(0.0, 1.0);
            self.steer = (self.steer_left - self.steer_right).clamp(-1.0, 1.0);
        } else {
            let steer_target = raw.steer.unwrap_or(0.0);
            self.steer = shaper
                .apply(ControlChannel::SteerLeft, self.steer, steer_target, dt)
                .clamp(-1.0, 1.0);
        }

        direction
    }
}
