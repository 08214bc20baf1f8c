use std::fs;
use std::path::Path;

use bevy::prelude::*;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::utils::SimError;

/// Control channels a driver input is shaped into. Steering is split into
/// left/right halves so digital (bang-bang) steering can rate-limit each side
/// independently before they are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlChannel {
    Accel,
    Brake,
    Handbrake,
    SteerLeft,
    SteerRight,
}

pub const CHANNEL_COUNT: usize = 5;

impl ControlChannel {
    pub const ALL: [ControlChannel; CHANNEL_COUNT] = [
        ControlChannel::Accel,
        ControlChannel::Brake,
        ControlChannel::Handbrake,
        ControlChannel::SteerLeft,
        ControlChannel::SteerRight,
    ];

    pub fn index(self) -> usize {
        match self {
            ControlChannel::Accel => 0,
            ControlChannel::Brake => 1,
            ControlChannel::Handbrake => 2,
            ControlChannel::SteerLeft => 3,
            ControlChannel::SteerRight => 4,
        }
    }
}

/// Per-channel rise/fall rates (units of channel value per second).
///
/// A channel moves toward its target at the rise rate and back toward neutral
/// at the fall rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmoothingRates {
    rise: [f64; CHANNEL_COUNT],
    fall: [f64; CHANNEL_COUNT],
}

impl SmoothingRates {
    pub fn new(rise: [f64; CHANNEL_COUNT], fall: [f64; CHANNEL_COUNT]) -> Self {
        Self { rise, fall }
    }

    pub fn rise(&self, channel: ControlChannel) -> f64 {
        self.rise[channel.index()]
    }

    pub fn fall(&self, channel: ControlChannel) -> f64 {
        self.fall[channel.index()]
    }

    pub fn validate(&self) -> Result<(), SimError> {
        for channel in ControlChannel::ALL {
            if self.rise(channel) <= 0.0 || self.fall(channel) <= 0.0 {
                return Err(SimError::InvalidConfig(format!(
                    "smoothing rates for {:?} must be positive",
                    channel
                )));
            }
        }
        Ok(())
    }
}

impl Default for SmoothingRates {
    fn default() -> Self {
        Self {
            rise: [6.0, 6.0, 6.0, 2.5, 2.5],
            fall: [10.0, 10.0, 10.0, 5.0, 5.0],
        }
    }
}

/// Input-shaping configuration: one rate set for keyboard-style digital
/// input, one for gamepad-style analog input, plus the startup mode.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControlSmoothingConfig {
    pub digital: SmoothingRates,
    pub analog: SmoothingRates,
    pub digital_input: bool,
}

impl ControlSmoothingConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        self.digital.validate()?;
        self.analog.validate()
    }
}

/// Lookup table attenuating steering authority with forward speed.
///
/// Pairs of `(forward_speed, max_steer_fraction)`, sampled with linear
/// interpolation and clamped to the end values outside the table range.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct SteerSpeedCurve {
    points: Vec<(f64, f64)>,
}

impl SteerSpeedCurve {
    pub fn new(points: Vec<(f64, f64)>) -> Result<Self, SimError> {
        let curve = Self { points };
        curve.validate()?;
        Ok(curve)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.points.is_empty() {
            return Err(SimError::InvalidConfig(
                "steer-speed curve needs at least one point".into(),
            ));
        }
        for window in self.points.windows(2) {
            if window[1].0 <= window[0].0 {
                return Err(SimError::InvalidConfig(
                    "steer-speed curve speeds must be strictly increasing".into(),
                ));
            }
            if window[1].1 > window[0].1 {
                return Err(SimError::InvalidConfig(
                    "steer-speed curve fractions must be non-increasing".into(),
                ));
            }
        }
        for &(speed, fraction) in &self.points {
            if speed < 0.0 {
                return Err(SimError::InvalidConfig(
                    "steer-speed curve speeds must be non-negative".into(),
                ));
            }
            if fraction <= 0.0 || fraction > 1.0 {
                return Err(SimError::InvalidConfig(
                    "steer-speed curve fractions must lie in (0, 1]".into(),
                ));
            }
        }
        Ok(())
    }

    /// Maximum steering fraction available at the given forward speed.
    pub fn sample(&self, forward_speed: f64) -> f64 {
        let speed = forward_speed.abs();
        let first = self.points[0];
        if speed <= first.0 {
            return first.1;
        }
        for window in self.points.windows(2) {
            let (s0, f0) = window[0];
            let (s1, f1) = window[1];
            if speed <= s1 {
                let t = (speed - s0) / (s1 - s0);
                return f0 + (f1 - f0) * t;
            }
        }
        self.points[self.points.len() - 1].1
    }
}

impl Default for SteerSpeedCurve {
    fn default() -> Self {
        Self {
            points: vec![(0.0, 0.75), (5.0, 0.75), (30.0, 0.125), (120.0, 0.1)],
        }
    }
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    pub timestep: f64,
    /// Upper clamp applied to every step handed to the vehicle backend.
    pub max_timestep: f64,
    pub gravity: Vector3<f64>,
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.timestep <= 0.0 || self.max_timestep <= 0.0 {
            return Err(SimError::InvalidConfig(
                "timesteps must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 120.0,
            max_timestep: 0.1,
            gravity: Vector3::new(0.0, -9.81, 0.0),
        }
    }
}

/// Chase camera tuning. All values are runtime-adjustable through the
/// `ChaseCamera` component; these are the spawn defaults.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    pub distance: f64,
    pub height: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    pub angle: f64,
    pub tilt: f64,
    pub lerp_speed: f64,
    pub zoom_step_bounds: f64,
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.min_distance <= 0.0 || self.max_distance <= self.min_distance {
            return Err(SimError::InvalidConfig(
                "camera distance bounds must satisfy 0 < min < max".into(),
            ));
        }
        if self.lerp_speed < 0.0 {
            return Err(SimError::InvalidConfig(
                "camera lerp speed must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 5.0,
            height: 2.0,
            min_distance: 1.0,
            max_distance: 32.0,
            angle: 90.0,
            tilt: -70.0,
            lerp_speed: 6.0,
            zoom_step_bounds: 10.0,
        }
    }
}

/// Chassis/wheel tuning handed to the vehicle backend at creation.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct CarPhysicsConfig {
    pub mass: f64,
    /// Suspension hard points in chassis space, front-left first,
    /// x forward, y up, z right.
    pub wheel_offsets: [Vector3<f64>; 4],
    pub wheel_radius: f64,
    pub suspension_rest_length: f64,
    pub suspension_travel: f64,
    pub suspension_stiffness: f64,
    pub suspension_damping: f64,
    pub max_drive_force: f64,
    pub max_brake_force: f64,
    pub max_steer_angle: f64,
    /// Lateral grip rate (per second); handbrake scales it down.
    pub tire_grip: f64,
    pub handbrake_grip_fraction: f64,
    pub sleep_speed_threshold: f64,
    pub sleep_ticks: u32,
}

impl CarPhysicsConfig {
    pub fn wheelbase(&self) -> f64 {
        (self.wheel_offsets[0].x - self.wheel_offsets[2].x).abs()
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.mass <= 0.0 {
            return Err(SimError::InvalidConfig("mass must be positive".into()));
        }
        if self.wheel_radius <= 0.0
            || self.suspension_rest_length <= 0.0
            || self.suspension_travel <= 0.0
        {
            return Err(SimError::InvalidConfig(
                "wheel and suspension dimensions must be positive".into(),
            ));
        }
        if self.wheelbase() <= 0.0 {
            return Err(SimError::InvalidConfig(
                "front and rear wheel rows must not coincide".into(),
            ));
        }
        Ok(())
    }
}

impl Default for CarPhysicsConfig {
    fn default() -> Self {
        Self {
            mass: 1500.0,
            wheel_offsets: [
                Vector3::new(1.25, -0.3, 0.8),
                Vector3::new(1.25, -0.3, -0.8),
                Vector3::new(-1.25, -0.3, 0.8),
                Vector3::new(-1.25, -0.3, -0.8),
            ],
            wheel_radius: 0.35,
            suspension_rest_length: 0.3,
            suspension_travel: 0.15,
            suspension_stiffness: 35000.0,
            suspension_damping: 4500.0,
            max_drive_force: 8000.0,
            max_brake_force: 12000.0,
            max_steer_angle: 0.6,
            tire_grip: 8.0,
            handbrake_grip_fraction: 0.15,
            sleep_speed_threshold: 0.05,
            sleep_ticks: 120,
        }
    }
}

/// Top-level simulation configuration, loadable from YAML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub control: ControlSmoothingConfig,
    #[serde(default)]
    pub steer_curve: SteerSpeedCurve,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub car: CarPhysicsConfig,
}

impl SimConfig {
    pub fn from_yaml(path: &Path) -> Result<Self, SimError> {
        let raw = fs::read_to_string(path)?;
        let config: SimConfig = serde_yaml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        self.control.validate()?;
        self.steer_curve.validate()?;
        self.physics.validate()?;
        self.camera.validate()?;
        self.car.validate()
    }
}
