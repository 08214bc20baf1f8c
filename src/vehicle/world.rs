use bevy::prelude::*;
use nalgebra::{UnitQuaternion, Vector3};

use crate::components::Gear;
use crate::resources::CarPhysicsConfig;
use crate::utils::SimError;
use crate::vehicle::backend::{DriveInput, VehicleBackend, VehicleHandle};
use crate::vehicle::query::{
    RaycastQueryBuffer, TireFrictionTable, WheelQueryBuffer, WheelQueryResult,
};

/// Owns the vehicle backend together with the reusable query buffers and the
/// tire friction table, and enforces the raycast-before-integrate ordering
/// within a tick.
#[derive(Resource)]
pub struct VehicleWorld {
    backend: Box<dyn VehicleBackend>,
    friction: TireFrictionTable,
    raycasts: RaycastQueryBuffer,
    wheel_results: WheelQueryBuffer,
}

impl VehicleWorld {
    pub fn new(backend: Box<dyn VehicleBackend>) -> Self {
        Self {
            backend,
            friction: TireFrictionTable::default(),
            raycasts: RaycastQueryBuffer::new(),
            wheel_results: WheelQueryBuffer::new(),
        }
    }

    pub fn with_friction_table(mut self, friction: TireFrictionTable) -> Self {
        self.friction = friction;
        self
    }

    pub fn friction_table(&self) -> &TireFrictionTable {
        &self.friction
    }

    pub fn create_vehicle(&mut self, config: &CarPhysicsConfig) -> Result<VehicleHandle, SimError> {
        self.backend.create_vehicle(config)
    }

    pub fn release_vehicle(&mut self, handle: VehicleHandle) -> Result<(), SimError> {
        self.backend.release_vehicle(handle)
    }

    /// Batched suspension raycasts for all wheels of `handles`. Must run
    /// before [`Self::integrate_vehicles`] every tick.
    pub fn run_suspension_raycasts(&mut self, handles: &[VehicleHandle]) -> Result<(), SimError> {
        self.raycasts.prepare(handles.len());
        self.backend
            .run_suspension_raycasts(handles, &mut self.raycasts)?;
        self.raycasts.mark_fresh();
        Ok(())
    }

    /// Integrates the batch against this tick's raycast buffer. Rejects the
    /// call if the buffer was not freshly written this tick.
    pub fn integrate_vehicles(
        &mut self,
        dt: f64,
        gravity: Vector3<f64>,
        handles: &[VehicleHandle],
    ) -> Result<(), SimError> {
        if !self.raycasts.consume() {
            return Err(SimError::StateError(
                "suspension raycasts must run before vehicle integration in the same tick".into(),
            ));
        }
        self.wheel_results.prepare(handles.len());
        self.backend.integrate_vehicles(
            dt,
            gravity,
            &self.friction,
            handles,
            &self.raycasts,
            &mut self.wheel_results,
        )
    }

    /// Per-wheel output for the `batch_index`-th vehicle of the last
    /// integrated batch.
    pub fn wheel_results(&self, batch_index: usize) -> &[WheelQueryResult] {
        self.wheel_results.vehicle_results(batch_index)
    }

    pub fn apply_drive_input(
        &mut self,
        handle: VehicleHandle,
        input: DriveInput,
    ) -> Result<(), SimError> {
        self.backend.apply_drive_input(handle, input)
    }

    pub fn force_gear_change(&mut self, handle: VehicleHandle, gear: Gear) -> Result<(), SimError> {
        self.backend.force_gear_change(handle, gear)
    }

    pub fn global_pose(
        &self,
        handle: VehicleHandle,
    ) -> Result<(Vector3<f64>, UnitQuaternion<f64>), SimError> {
        self.backend.global_pose(handle)
    }

    pub fn forward_speed(&self, handle: VehicleHandle) -> Result<f64, SimError> {
        self.backend.forward_speed(handle)
    }

    pub fn is_sleeping(&self, handle: VehicleHandle) -> Result<bool, SimError> {
        self.backend.is_sleeping(handle)
    }
}
