use std::sync::{Arc, Mutex};

use nalgebra::{UnitQuaternion, Vector3};

use roadster::components::Gear;
use roadster::resources::{CarPhysicsConfig, SimConfig};
use roadster::utils::SimError;
use roadster::vehicle::{
    DriveInput, RaycastQueryBuffer, SuspensionHit, SurfaceMaterial, TireFrictionTable,
    VehicleBackend, VehicleHandle, WheelQueryBuffer,
};

pub fn create_digital_sim_config() -> SimConfig {
    let mut config = SimConfig::default();
    config.control.digital_input = true;
    config
}

pub fn create_analog_sim_config() -> SimConfig {
    let mut config = SimConfig::default();
    config.control.digital_input = false;
    config
}

/// Shared knobs controlling what a [`ScriptedBackend`] reports.
#[derive(Debug, Clone)]
pub struct ScriptedWheels {
    pub wheels_in_contact: bool,
    pub sleeping: bool,
}

impl Default for ScriptedWheels {
    fn default() -> Self {
        Self {
            wheels_in_contact: true,
            sleeping: false,
        }
    }
}

pub type SharedScript = Arc<Mutex<ScriptedWheels>>;

pub fn shared_script() -> SharedScript {
    Arc::new(Mutex::new(ScriptedWheels::default()))
}

/// Minimal backend reporting scripted wheel contact and sleep state, for
/// exercising the update protocol through the public backend seam.
pub struct ScriptedBackend {
    script: SharedScript,
    vehicles: usize,
}

impl ScriptedBackend {
    pub fn new(script: SharedScript) -> Self {
        Self { script, vehicles: 0 }
    }

    fn check(&self, handle: VehicleHandle) -> Result<(), SimError> {
        if handle.index() < self.vehicles {
            Ok(())
        } else {
            Err(SimError::VehicleUnavailable(format!(
                "no vehicle at handle {}",
                handle.index()
            )))
        }
    }
}

impl VehicleBackend for ScriptedBackend {
    fn create_vehicle(&mut self, _config: &CarPhysicsConfig) -> Result<VehicleHandle, SimError> {
        let handle = VehicleHandle::new(self.vehicles);
        self.vehicles += 1;
        Ok(handle)
    }

    fn release_vehicle(&mut self, handle: VehicleHandle) -> Result<(), SimError> {
        self.check(handle)
    }

    fn run_suspension_raycasts(
        &mut self,
        handles: &[VehicleHandle],
        buffer: &mut RaycastQueryBuffer,
    ) -> Result<(), SimError> {
        let contact = self.script.lock().unwrap().wheels_in_contact;
        for (batch_index, handle) in handles.iter().enumerate() {
            self.check(*handle)?;
            for hit in buffer.wheel_hits_mut(batch_index) {
                *hit = SuspensionHit {
                    hit: contact,
                    point: Vector3::zeros(),
                    normal: if contact { Vector3::y() } else { Vector3::zeros() },
                    distance: 0.5,
                    drivable: contact,
                    material: contact.then_some(SurfaceMaterial::Tarmac),
                };
            }
        }
        Ok(())
    }

    fn integrate_vehicles(
        &mut self,
        _dt: f64,
        _gravity: Vector3<f64>,
        _friction: &TireFrictionTable,
        handles: &[VehicleHandle],
        raycasts: &RaycastQueryBuffer,
        results: &mut WheelQueryBuffer,
    ) -> Result<(), SimError> {
        for (batch_index, handle) in handles.iter().enumerate() {
            self.check(*handle)?;
            let hits = raycasts.wheel_hits(batch_index);
            for (result, hit) in results.vehicle_results_mut(batch_index).iter_mut().zip(hits) {
                result.in_contact = hit.hit;
                result.contact_normal = hit.normal;
                result.suspension_compression = 0.0;
                result.longitudinal_slip = 0.0;
                result.lateral_slip = 0.0;
            }
        }
        Ok(())
    }

    fn apply_drive_input(
        &mut self,
        handle: VehicleHandle,
        _input: DriveInput,
    ) -> Result<(), SimError> {
        self.check(handle)
    }

    fn force_gear_change(&mut self, handle: VehicleHandle, _gear: Gear) -> Result<(), SimError> {
        self.check(handle)
    }

    fn global_pose(
        &self,
        handle: VehicleHandle,
    ) -> Result<(Vector3<f64>, UnitQuaternion<f64>), SimError> {
        self.check(handle)?;
        Ok((Vector3::zeros(), UnitQuaternion::identity()))
    }

    fn forward_speed(&self, handle: VehicleHandle) -> Result<f64, SimError> {
        self.check(handle)?;
        Ok(0.0)
    }

    fn is_sleeping(&self, handle: VehicleHandle) -> Result<bool, SimError> {
        self.check(handle)?;
        Ok(self.script.lock().unwrap().sleeping)
    }
}
