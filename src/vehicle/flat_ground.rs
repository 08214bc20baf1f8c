use nalgebra::{UnitQuaternion, Vector3};

use crate::components::Gear;
use crate::resources::CarPhysicsConfig;
use crate::utils::SimError;
use crate::vehicle::backend::{DriveInput, VehicleBackend, VehicleHandle};
use crate::vehicle::query::{
    RaycastQueryBuffer, SurfaceMaterial, SuspensionHit, TireFrictionTable, WheelQueryBuffer,
    WheelQueryResult,
};

const WAKE_INPUT_THRESHOLD: f64 = 1e-3;

struct VehicleSlot {
    config: CarPhysicsConfig,
    position: Vector3<f64>,
    yaw: f64,
    velocity: Vector3<f64>,
    gear: Gear,
    input: DriveInput,
    sleeping: bool,
    quiet_ticks: u32,
}

impl VehicleSlot {
    fn new(config: CarPhysicsConfig) -> Self {
        // spawn with the suspension unloaded so the chassis settles onto the
        // springs during the first ticks
        let hard_point_height = config.suspension_rest_length + config.wheel_radius;
        let spawn_height = hard_point_height - config.wheel_offsets[0].y;
        Self {
            config,
            position: Vector3::new(0.0, spawn_height, 0.0),
            yaw: 0.0,
            velocity: Vector3::zeros(),
            gear: Gear::Neutral,
            input: DriveInput::default(),
            sleeping: false,
            quiet_ticks: 0,
        }
    }

    fn attitude(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), self.yaw)
    }

    fn forward(&self) -> Vector3<f64> {
        self.attitude() * Vector3::x()
    }

    fn lateral(&self) -> Vector3<f64> {
        self.attitude() * Vector3::z()
    }

    fn wake(&mut self) {
        self.sleeping = false;
        self.quiet_ticks = 0;
    }

    fn input_is_quiet(&self) -> bool {
        self.input.accelerator.abs() < WAKE_INPUT_THRESHOLD
            && self.input.brake.abs() < WAKE_INPUT_THRESHOLD
            && self.input.handbrake.abs() < WAKE_INPUT_THRESHOLD
            && self.input.steer.abs() < WAKE_INPUT_THRESHOLD
    }
}

/// Deterministic reference backend: an infinite drivable ground plane at
/// y = 0, per-wheel spring/damper suspension fed by the raycast buffer,
/// gear-signed drive forces and a kinematic steering model. The chassis stays
/// level (yaw only), which keeps the simulation exactly reproducible while
/// exercising the full query/update protocol.
#[derive(Default)]
pub struct FlatGroundBackend {
    slots: Vec<Option<VehicleSlot>>,
}

impl FlatGroundBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, handle: VehicleHandle) -> Result<&VehicleSlot, SimError> {
        self.slots
            .get(handle.index())
            .and_then(Option::as_ref)
            .ok_or_else(|| {
                SimError::VehicleUnavailable(format!("no vehicle at handle {}", handle.index()))
            })
    }

    fn slot_mut(&mut self, handle: VehicleHandle) -> Result<&mut VehicleSlot, SimError> {
        self.slots
            .get_mut(handle.index())
            .and_then(Option::as_mut)
            .ok_or_else(|| {
                SimError::VehicleUnavailable(format!("no vehicle at handle {}", handle.index()))
            })
    }

    fn integrate_slot(
        slot: &mut VehicleSlot,
        dt: f64,
        gravity: Vector3<f64>,
        friction: &TireFrictionTable,
        hits: &[SuspensionHit],
        results: &mut [WheelQueryResult],
    ) {
        let config = slot.config.clone();
        let input = slot.input;
        let gear = slot.gear;

        if slot.sleeping {
            for (result, hit) in results.iter_mut().zip(hits) {
                result.in_contact = hit.hit;
                result.contact_normal = hit.normal;
                result.suspension_compression = (config.suspension_rest_length
                    - (hit.distance - config.wheel_radius))
                    .max(0.0);
                result.longitudinal_slip = 0.0;
                result.lateral_slip = 0.0;
            }
            return;
        }

        let forward = slot.forward();
        let lateral = slot.lateral();
        let mut v_forward = slot.velocity.dot(&forward);
        let mut v_lateral = slot.velocity.dot(&lateral);
        let mut v_vertical = slot.velocity.y;

        // suspension forces from this tick's raycast results
        let mut suspension_total = 0.0;
        let mut contact_count = 0usize;
        let mut friction_sum = 0.0;
        let mut max_compression = f64::NEG_INFINITY;
        for (result, hit) in results.iter_mut().zip(hits) {
            let spring_length = hit.distance - config.wheel_radius;
            let compression = config.suspension_rest_length - spring_length;
            if hit.hit {
                let clamped = compression.clamp(-config.suspension_travel, config.suspension_travel);
                let force = (config.suspension_stiffness * clamped
                    - config.suspension_damping * v_vertical)
                    .max(0.0);
                suspension_total += force;
                contact_count += 1;
                friction_sum += hit
                    .material
                    .map(|m| friction.friction(m))
                    .unwrap_or_else(|| friction.friction(SurfaceMaterial::Tarmac));
                max_compression = max_compression.max(compression);
                result.in_contact = true;
                result.contact_normal = hit.normal;
                result.suspension_compression = clamped.max(0.0);
            } else {
                result.in_contact = false;
                result.contact_normal = Vector3::zeros();
                result.suspension_compression = 0.0;
            }
        }

        let grounded = contact_count > 0;
        let grip_friction = if grounded {
            friction_sum / contact_count as f64
        } else {
            0.0
        };

        v_vertical += (suspension_total / config.mass + gravity.y) * dt;

        let mut longitudinal_slip = 0.0;
        let mut lateral_slip = 0.0;
        if grounded {
            // drive thrust, signed by the current gear
            let drive_accel =
                input.accelerator * config.max_drive_force * gear.sign() * grip_friction
                    / config.mass;
            v_forward += drive_accel * dt;

            // braking opposes motion without reversing it within a step
            let brake_force = input.brake * config.max_brake_force
                + input.handbrake * config.max_brake_force * 0.5;
            let brake_dv = brake_force * grip_friction / config.mass * dt;
            v_forward -= v_forward.signum() * brake_dv.min(v_forward.abs());

            // tire grip bleeds lateral velocity; the handbrake lets it slide
            let grip_rate = config.tire_grip
                * grip_friction
                * (1.0 - input.handbrake * (1.0 - config.handbrake_grip_fraction));
            let v_lateral_before = v_lateral;
            v_lateral *= (-grip_rate * dt).exp();

            // kinematic single-track steering
            let steer_angle = input.steer * config.max_steer_angle;
            if steer_angle.abs() > f64::EPSILON {
                let yaw_rate = v_forward / config.wheelbase() * steer_angle.tan();
                slot.yaw += yaw_rate * dt;
            }

            longitudinal_slip = (drive_accel * dt / (v_forward.abs() + 1.0)).clamp(-1.0, 1.0);
            lateral_slip = ((v_lateral_before - v_lateral).abs() / (v_forward.abs() + 1.0))
                .clamp(0.0, 1.0);
        }

        for result in results.iter_mut() {
            result.longitudinal_slip = longitudinal_slip;
            result.lateral_slip = lateral_slip;
        }

        // reassemble velocity in the (possibly rotated) chassis frame
        let attitude = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), slot.yaw);
        let forward = attitude * Vector3::x();
        let lateral = attitude * Vector3::z();
        slot.velocity = forward * v_forward + lateral * v_lateral + Vector3::y() * v_vertical;
        slot.position += slot.velocity * dt;

        // keep the suspension from bottoming through the ground plane
        if grounded && max_compression > config.suspension_travel {
            let overshoot = max_compression - config.suspension_travel;
            slot.position.y += overshoot;
            slot.velocity.y = slot.velocity.y.max(0.0);
        }

        // sleep bookkeeping: a settled, uncommanded chassis goes dormant
        if grounded && slot.velocity.norm() < config.sleep_speed_threshold && slot.input_is_quiet()
        {
            slot.quiet_ticks += 1;
            if slot.quiet_ticks >= config.sleep_ticks {
                slot.sleeping = true;
                slot.velocity = Vector3::zeros();
            }
        } else {
            slot.quiet_ticks = 0;
        }
    }
}

impl VehicleBackend for FlatGroundBackend {
    fn create_vehicle(&mut self, config: &CarPhysicsConfig) -> Result<VehicleHandle, SimError> {
        config.validate()?;
        let slot = VehicleSlot::new(config.clone());
        if let Some(index) = self.slots.iter().position(Option::is_none) {
            self.slots[index] = Some(slot);
            Ok(VehicleHandle::new(index))
        } else {
            self.slots.push(Some(slot));
            Ok(VehicleHandle::new(self.slots.len() - 1))
        }
    }

    fn release_vehicle(&mut self, handle: VehicleHandle) -> Result<(), SimError> {
        self.slot(handle)?;
        self.slots[handle.index()] = None;
        Ok(())
    }

    fn run_suspension_raycasts(
        &mut self,
        handles: &[VehicleHandle],
        buffer: &mut RaycastQueryBuffer,
    ) -> Result<(), SimError> {
        for (batch_index, handle) in handles.iter().enumerate() {
            let slot = self.slot(*handle)?;
            let attitude = slot.attitude();
            let ray_length = slot.config.suspension_rest_length
                + slot.config.suspension_travel
                + slot.config.wheel_radius;
            let hits = buffer.wheel_hits_mut(batch_index);
            for (wheel, offset) in slot.config.wheel_offsets.iter().enumerate() {
                let hard_point = slot.position + attitude * *offset;
                // ray straight down onto the ground plane
                let distance = hard_point.y;
                let hit = distance >= 0.0 && distance <= ray_length;
                hits[wheel] = SuspensionHit {
                    hit,
                    point: Vector3::new(hard_point.x, 0.0, hard_point.z),
                    normal: if hit { Vector3::y() } else { Vector3::zeros() },
                    distance,
                    drivable: hit,
                    material: hit.then_some(SurfaceMaterial::Tarmac),
                };
            }
        }
        Ok(())
    }

    fn integrate_vehicles(
        &mut self,
        dt: f64,
        gravity: Vector3<f64>,
        friction: &TireFrictionTable,
        handles: &[VehicleHandle],
        raycasts: &RaycastQueryBuffer,
        results: &mut WheelQueryBuffer,
    ) -> Result<(), SimError> {
        if dt <= 0.0 {
            return Ok(());
        }
        for (batch_index, handle) in handles.iter().enumerate() {
            let slot = self
                .slots
                .get_mut(handle.index())
                .and_then(Option::as_mut)
                .ok_or_else(|| {
                    SimError::VehicleUnavailable(format!(
                        "no vehicle at handle {}",
                        handle.index()
                    ))
                })?;
            Self::integrate_slot(
                slot,
                dt,
                gravity,
                friction,
                raycasts.wheel_hits(batch_index),
                results.vehicle_results_mut(batch_index),
            );
        }
        Ok(())
    }

    fn apply_drive_input(
        &mut self,
        handle: VehicleHandle,
        input: DriveInput,
    ) -> Result<(), SimError> {
        let slot = self.slot_mut(handle)?;
        slot.input = input;
        if !slot.input_is_quiet() {
            slot.wake();
        }
        Ok(())
    }

    fn force_gear_change(&mut self, handle: VehicleHandle, gear: Gear) -> Result<(), SimError> {
        let slot = self.slot_mut(handle)?;
        slot.gear = gear;
        slot.wake();
        Ok(())
    }

    fn global_pose(
        &self,
        handle: VehicleHandle,
    ) -> Result<(Vector3<f64>, UnitQuaternion<f64>), SimError> {
        let slot = self.slot(handle)?;
        Ok((slot.position, slot.attitude()))
    }

    fn forward_speed(&self, handle: VehicleHandle) -> Result<f64, SimError> {
        let slot = self.slot(handle)?;
        Ok(slot.velocity.dot(&slot.forward()))
    }

    fn is_sleeping(&self, handle: VehicleHandle) -> Result<bool, SimError> {
        Ok(self.slot(handle)?.sleeping)
    }
}
