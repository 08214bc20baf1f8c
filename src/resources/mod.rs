pub mod config;

pub use config::{
    CameraConfig, CarPhysicsConfig, ControlChannel, ControlSmoothingConfig, PhysicsConfig,
    SimConfig, SmoothingRates, SteerSpeedCurve, CHANNEL_COUNT,
};
