pub mod camera;
pub mod car;
pub mod controls;

pub use camera::ChaseCamera;
pub use car::{CarActor, CarState, Gear, PlayerController, VehicleAvailability};
pub use controls::{
    AnalogShaper, CarControls, DigitalShaper, DriveDirection, InputShaper, InputShapers,
    ThrottleCommand,
};
