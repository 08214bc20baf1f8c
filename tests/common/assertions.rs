use roadster::components::{CarControls, CarState};

pub fn assert_car_state_valid(state: &CarState) {
    let position = state.position();
    assert!(
        position.iter().all(|v| v.is_finite()),
        "position became non-finite: {:?}",
        position
    );
    assert!(
        state.forward_speed.is_finite(),
        "forward speed became non-finite: {}",
        state.forward_speed
    );
    for wheel in &state.wheel_contacts {
        assert!(wheel.suspension_compression.is_finite());
        assert!(wheel.longitudinal_slip.is_finite());
        assert!(wheel.lateral_slip.is_finite());
    }
}

pub fn assert_controls_bounded(controls: &CarControls) {
    assert!(
        (0.0..=1.0).contains(&controls.accelerator),
        "accelerator {} out of bounds",
        controls.accelerator
    );
    assert!((0.0..=1.0).contains(&controls.brake));
    assert!((0.0..=1.0).contains(&controls.handbrake));
    assert!(
        (-1.0..=1.0).contains(&controls.steer),
        "steer {} out of bounds",
        controls.steer
    );
}
