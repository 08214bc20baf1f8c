use bevy::prelude::*;
use nalgebra::{UnitQuaternion, Vector3};

use crate::components::controls::DriveDirection;
use crate::vehicle::{VehicleHandle, WheelQueryResult, WHEELS_PER_VEHICLE};

/// Drive gear. Only the `Reverse`/`Neutral`/`Forward(1)` transitions are
/// driven by the input model; higher forward gears belong to the backend's
/// ratio table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gear {
    Reverse,
    Neutral,
    Forward(u8),
}

impl Gear {
    pub const FIRST: Gear = Gear::Forward(1);

    /// Sign of the thrust produced by the accelerator in this gear.
    pub fn sign(self) -> f64 {
        match self {
            Gear::Reverse => -1.0,
            Gear::Neutral => 0.0,
            Gear::Forward(_) => 1.0,
        }
    }

    /// Gear resulting from a throttle command in the given direction.
    /// A forward command out of reverse or neutral lands in first; an
    /// already-engaged forward gear is left alone. A reverse command always
    /// selects reverse.
    pub fn arbitrate(self, direction: DriveDirection) -> Gear {
        match direction {
            DriveDirection::Forward => match self {
                Gear::Reverse | Gear::Neutral => Gear::FIRST,
                gear => gear,
            },
            DriveDirection::Reverse => Gear::Reverse,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleAvailability {
    Available,
    Unavailable,
}

/// Binding to the backend actor. `handle: None` means the vehicle is not
/// currently simulated (not yet created, or released mid-session); ticks
/// degrade to a pose-frozen no-op until it is rebound.
#[derive(Component, Debug, Clone)]
pub struct CarActor {
    pub handle: Option<VehicleHandle>,
}

/// Per-tick vehicle runtime state: gear, airborne flag, last wheel query
/// results and the cached pose exposed to camera/render consumers.
#[derive(Component, Debug, Clone)]
pub struct CarState {
    pub gear: Gear,
    pub is_airborne: bool,
    pub wheel_contacts: [WheelQueryResult; WHEELS_PER_VEHICLE],
    pub forward_speed: f64,
    availability: VehicleAvailability,
    warned_unavailable: bool,
    position: Vector3<f64>,
    attitude: UnitQuaternion<f64>,
}

impl Default for CarState {
    fn default() -> Self {
        Self::new()
    }
}

impl CarState {
    pub fn new() -> Self {
        Self {
            gear: Gear::Neutral,
            is_airborne: false,
            wheel_contacts: [WheelQueryResult::default(); WHEELS_PER_VEHICLE],
            forward_speed: 0.0,
            availability: VehicleAvailability::Available,
            warned_unavailable: false,
            position: Vector3::zeros(),
            attitude: UnitQuaternion::identity(),
        }
    }

    pub fn position(&self) -> Vector3<f64> {
        self.position
    }

    pub fn attitude(&self) -> UnitQuaternion<f64> {
        self.attitude
    }

    pub fn forward_basis(&self) -> Vector3<f64> {
        self.attitude * Vector3::x()
    }

    pub fn global_pose(&self) -> (Vector3<f64>, UnitQuaternion<f64>) {
        (self.position, self.attitude)
    }

    pub fn set_pose(&mut self, position: Vector3<f64>, attitude: UnitQuaternion<f64>) {
        self.position = position;
        self.attitude = attitude;
    }

    /// Recomputes the airborne flag from the current wheel contacts. A
    /// sleeping chassis is always treated as grounded: sleep implies settled,
    /// not falling.
    pub fn update_airborne(&mut self, chassis_sleeping: bool) {
        self.is_airborne =
            !chassis_sleeping && self.wheel_contacts.iter().all(|wheel| !wheel.in_contact);
    }

    pub fn availability(&self) -> VehicleAvailability {
        self.availability
    }

    /// Marks the vehicle unavailable for this tick; returns true on the first
    /// transition so the caller can log it once.
    pub(crate) fn mark_unavailable(&mut self) -> bool {
        self.availability = VehicleAvailability::Unavailable;
        !std::mem::replace(&mut self.warned_unavailable, true)
    }

    pub(crate) fn mark_available(&mut self) {
        self.availability = VehicleAvailability::Available;
        self.warned_unavailable = false;
    }
}

#[derive(Component, Debug, Default)]
pub struct PlayerController {
    pub active: bool,
}

impl PlayerController {
    pub fn new() -> Self {
        Self { active: true }
    }

    pub fn disabled() -> Self {
        Self { active: false }
    }
}
