use bevy::prelude::*;

mod camera;
mod car;

pub use camera::ChaseCameraPlugin;
pub use car::CarPlugin;

/// Per-tick execution order of the vehicle control core. The chain must not
/// be reordered: smoothing feeds the backend's drive input, the physics step
/// consumes it together with the same tick's raycasts, and the camera reads
/// the pose the physics step exposed.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum CarUpdateSet {
    Input,
    Smoothing,
    Physics,
    CameraFollow,
}

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum StartupSet {
    SpawnPlayer,
    SpawnCamera,
}
