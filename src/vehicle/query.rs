use nalgebra::Vector3;

pub const WHEELS_PER_VEHICLE: usize = 4;

/// Surface classes a wheel ray can land on, looked up in the tire friction
/// table during integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceMaterial {
    Tarmac,
    Gravel,
    Ice,
}

/// Drivable-surface-to-tire-friction lookup.
#[derive(Debug, Clone)]
pub struct TireFrictionTable {
    friction: [f64; 3],
}

impl TireFrictionTable {
    pub fn new(tarmac: f64, gravel: f64, ice: f64) -> Self {
        Self {
            friction: [tarmac, gravel, ice],
        }
    }

    pub fn friction(&self, material: SurfaceMaterial) -> f64 {
        self.friction[material as usize]
    }

    pub fn set_friction(&mut self, material: SurfaceMaterial, value: f64) {
        self.friction[material as usize] = value.max(0.0);
    }
}

impl Default for TireFrictionTable {
    fn default() -> Self {
        Self::new(1.0, 0.6, 0.1)
    }
}

/// Result of one wheel's suspension raycast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuspensionHit {
    pub hit: bool,
    pub point: Vector3<f64>,
    pub normal: Vector3<f64>,
    pub distance: f64,
    pub drivable: bool,
    pub material: Option<SurfaceMaterial>,
}

impl Default for SuspensionHit {
    fn default() -> Self {
        Self {
            hit: false,
            point: Vector3::zeros(),
            normal: Vector3::zeros(),
            distance: 0.0,
            drivable: false,
            material: None,
        }
    }
}

/// Per-wheel output of the integration step, used for airborne detection and
/// exposed through the vehicle runtime state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelQueryResult {
    pub in_contact: bool,
    pub suspension_compression: f64,
    pub contact_normal: Vector3<f64>,
    pub longitudinal_slip: f64,
    pub lateral_slip: f64,
}

/// Preallocated, reusable buffer for batched suspension raycasts.
///
/// The raycast step fully overwrites the entries for every vehicle passed and
/// marks the buffer fresh; the integration step consumes that freshness in
/// the same tick. Reading a stale buffer is a protocol violation and is
/// rejected by [`crate::vehicle::VehicleWorld`].
#[derive(Debug, Default)]
pub struct RaycastQueryBuffer {
    hits: Vec<SuspensionHit>,
    fresh: bool,
}

impl RaycastQueryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resizes for `vehicle_count` vehicles and stales every entry so the
    /// raycast step starts from a clean slate.
    pub fn prepare(&mut self, vehicle_count: usize) {
        self.hits.clear();
        self.hits
            .resize(vehicle_count * WHEELS_PER_VEHICLE, SuspensionHit::default());
        self.fresh = false;
    }

    pub fn vehicle_capacity(&self) -> usize {
        self.hits.len() / WHEELS_PER_VEHICLE
    }

    pub fn wheel_hits(&self, vehicle_index: usize) -> &[SuspensionHit] {
        let start = vehicle_index * WHEELS_PER_VEHICLE;
        &self.hits[start..start + WHEELS_PER_VEHICLE]
    }

    pub fn wheel_hits_mut(&mut self, vehicle_index: usize) -> &mut [SuspensionHit] {
        let start = vehicle_index * WHEELS_PER_VEHICLE;
        &mut self.hits[start..start + WHEELS_PER_VEHICLE]
    }

    pub fn mark_fresh(&mut self) {
        self.fresh = true;
    }

    /// Takes the freshness flag; returns false if the buffer was already
    /// consumed this tick or never populated.
    pub fn consume(&mut self) -> bool {
        std::mem::take(&mut self.fresh)
    }

    pub fn is_fresh(&self) -> bool {
        self.fresh
    }
}

/// Preallocated, reusable buffer for per-wheel integration output.
#[derive(Debug, Default)]
pub struct WheelQueryBuffer {
    results: Vec<WheelQueryResult>,
}

impl WheelQueryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prepare(&mut self, vehicle_count: usize) {
        self.results.clear();
        self.results.resize(
            vehicle_count * WHEELS_PER_VEHICLE,
            WheelQueryResult::default(),
        );
    }

    pub fn vehicle_results(&self, vehicle_index: usize) -> &[WheelQueryResult] {
        let start = vehicle_index * WHEELS_PER_VEHICLE;
        &self.results[start..start + WHEELS_PER_VEHICLE]
    }

    pub fn vehicle_results_mut(&mut self, vehicle_index: usize) -> &mut [WheelQueryResult] {
        let start = vehicle_index * WHEELS_PER_VEHICLE;
        &mut self.results[start..start + WHEELS_PER_VEHICLE]
    }
}
