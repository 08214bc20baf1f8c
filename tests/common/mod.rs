mod assertions;
mod fixtures;
mod test_app;

// Re-export
pub use assertions::{assert_car_state_valid, assert_controls_bounded};
pub use fixtures::*;
pub use test_app::{TestApp, TestAppBuilder};
