mod camera;
mod input;
mod smoothing;
mod vehicle;

pub use camera::chase_camera_system;
pub use input::{gamepad_input_system, keyboard_input_system};
pub use smoothing::control_smoothing_system;
pub use vehicle::car_physics_system;
