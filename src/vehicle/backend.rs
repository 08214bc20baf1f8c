use nalgebra::{UnitQuaternion, Vector3};

use crate::components::Gear;
use crate::resources::CarPhysicsConfig;
use crate::utils::SimError;
use crate::vehicle::query::{RaycastQueryBuffer, TireFrictionTable, WheelQueryBuffer};

/// Opaque identifier for a vehicle actor owned by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VehicleHandle(u32);

impl VehicleHandle {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Smoothed control channels handed to the backend as this tick's drive
/// input. Thrust direction comes from the current gear, not from the sign of
/// the accelerator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DriveInput {
    pub accelerator: f64,
    pub brake: f64,
    pub handbrake: f64,
    pub steer: f64,
}

/// Narrow capability the control core needs from a physics engine to animate
/// a 4-wheel vehicle. Implementations must be deterministic: identical world
/// state, inputs and `dt` produce identical results.
pub trait VehicleBackend: Send + Sync {
    fn create_vehicle(&mut self, config: &CarPhysicsConfig) -> Result<VehicleHandle, SimError>;

    fn release_vehicle(&mut self, handle: VehicleHandle) -> Result<(), SimError>;

    /// Issues one batched raycast query for all wheels of all `handles`,
    /// overwriting `buffer` (already sized for the batch).
    fn run_suspension_raycasts(
        &mut self,
        handles: &[VehicleHandle],
        buffer: &mut RaycastQueryBuffer,
    ) -> Result<(), SimError>;

    /// Advances the wheel/rigid-body simulation by `dt` using this tick's
    /// raycast results, writing per-wheel output into `results`.
    fn integrate_vehicles(
        &mut self,
        dt: f64,
        gravity: Vector3<f64>,
        friction: &TireFrictionTable,
        handles: &[VehicleHandle],
        raycasts: &RaycastQueryBuffer,
        results: &mut WheelQueryBuffer,
    ) -> Result<(), SimError>;

    fn apply_drive_input(&mut self, handle: VehicleHandle, input: DriveInput)
        -> Result<(), SimError>;

    fn force_gear_change(&mut self, handle: VehicleHandle, gear: Gear) -> Result<(), SimError>;

    fn global_pose(
        &self,
        handle: VehicleHandle,
    ) -> Result<(Vector3<f64>, UnitQuaternion<f64>), SimError>;

    /// Chassis speed projected on its forward basis; negative when rolling
    /// backwards.
    fn forward_speed(&self, handle: VehicleHandle) -> Result<f64, SimError>;

    fn is_sleeping(&self, handle: VehicleHandle) -> Result<bool, SimError>;
}
