//! Driving simulation core: driver input shaping, a per-tick 4-wheel
//! vehicle update protocol over a pluggable physics backend, and a smoothed
//! chase camera.

pub mod components;
pub mod plugins;
pub mod resources;
pub mod systems;
pub mod utils;
pub mod vehicle;

pub use plugins::{CarPlugin, CarUpdateSet, ChaseCameraPlugin, StartupSet};
