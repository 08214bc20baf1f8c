pub mod backend;
pub mod flat_ground;
pub mod query;
pub mod world;

pub use backend::{DriveInput, VehicleBackend, VehicleHandle};
pub use flat_ground::FlatGroundBackend;
pub use query::{
    RaycastQueryBuffer, SurfaceMaterial, SuspensionHit, TireFrictionTable, WheelQueryBuffer,
    WheelQueryResult, WHEELS_PER_VEHICLE,
};
pub use world::VehicleWorld;
