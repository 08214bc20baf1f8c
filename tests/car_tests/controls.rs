use approx::assert_relative_eq;
use roadster::components::{CarControls, CarState, Gear};
use roadster::resources::SmoothingRates;

use crate::common::{
    assert_controls_bounded, create_analog_sim_config, create_digital_sim_config, TestAppBuilder,
};

#[test]
fn test_forward_from_reverse_forces_first_gear_once() {
    let mut app = TestAppBuilder::new()
        .with_config(create_digital_sim_config())
        .build();

    app.query_single_mut::<CarControls>()
        .unwrap()
        .accelerate_reverse(1.0);
    app.run_frame();
    assert_eq!(app.query_single::<CarState>().unwrap().gear, Gear::Reverse);

    let mut gear = Gear::Reverse;
    let mut transitions = 0;
    for _ in 0..10 {
        app.query_single_mut::<CarControls>()
            .unwrap()
            .accelerate_forward(1.0);
        app.run_frame();
        let current = app.query_single::<CarState>().unwrap().gear;
        if current != gear {
            transitions += 1;
            gear = current;
        }
    }
    assert_eq!(gear, Gear::FIRST);
    assert_eq!(transitions, 1, "gear must change exactly once, on the first command");
}

#[test]
fn test_conflicting_throttle_commands_resolve_last_write_wins() {
    let mut app = TestAppBuilder::new()
        .with_config(create_digital_sim_config())
        .build();

    {
        let mut controls = app.query_single_mut::<CarControls>().unwrap();
        controls.accelerate_forward(1.0);
        controls.accelerate_reverse(1.0);
    }
    app.run_frame();
    assert_eq!(app.query_single::<CarState>().unwrap().gear, Gear::Reverse);

    {
        let mut controls = app.query_single_mut::<CarControls>().unwrap();
        controls.accelerate_reverse(1.0);
        controls.accelerate_forward(1.0);
    }
    app.run_frame();
    assert_eq!(app.query_single::<CarState>().unwrap().gear, Gear::FIRST);
}

#[test]
fn test_digital_channels_stay_bounded_through_press_release_pattern() {
    let mut app = TestAppBuilder::new()
        .with_config(create_digital_sim_config())
        .build();

    for tick in 0..480 {
        {
            let mut controls = app.query_single_mut::<CarControls>().unwrap();
            if (tick / 11) % 2 == 0 {
                controls.accelerate_forward(1.0);
            }
            if (tick / 5) % 3 == 0 {
                controls.brake(1.0);
            }
            if (tick / 17) % 2 == 1 {
                controls.steer_left();
            }
        }
        app.run_frame();
        let controls = app.query_single::<CarControls>().unwrap();
        assert_controls_bounded(controls);
    }
}

#[test]
fn test_digital_release_decays_over_fall_rate_ticks() {
    // exact binary rates: fall 8/s at a 128 Hz tick drains a full channel in
    // exactly 16 ticks
    let mut config = create_digital_sim_config();
    config.physics.timestep = 1.0 / 128.0;
    config.control.digital = SmoothingRates::new(
        [6.0, 6.0, 6.0, 2.5, 2.5],
        [8.0, 8.0, 8.0, 4.0, 4.0],
    );
    let mut app = TestAppBuilder::new().with_config(config).build();

    for _ in 0..256 {
        app.query_single_mut::<CarControls>()
            .unwrap()
            .accelerate_forward(1.0);
        app.run_frame();
    }
    assert_relative_eq!(app.query_single::<CarControls>().unwrap().accelerator, 1.0);

    app.query_single_mut::<CarControls>()
        .unwrap()
        .release_all_controls();

    let mut previous = 1.0;
    let mut ticks = 0;
    loop {
        app.run_frame();
        let accelerator = app.query_single::<CarControls>().unwrap().accelerator;
        assert!(accelerator <= previous, "decay must be monotonic");
        previous = accelerator;
        ticks += 1;
        if accelerator == 0.0 {
            break;
        }
        assert!(ticks < 64, "channel failed to reach zero");
    }
    assert_eq!(ticks, 16);
}

#[test]
fn test_analog_channels_apply_directly_and_release_instantly() {
    let mut app = TestAppBuilder::new()
        .with_config(create_analog_sim_config())
        .build();

    {
        let mut controls = app.query_single_mut::<CarControls>().unwrap();
        controls.accelerate_forward(0.8);
        controls.steer(-0.5).unwrap();
        controls.brake(0.25);
    }
    app.run_frame();
    {
        let controls = app.query_single::<CarControls>().unwrap();
        assert_relative_eq!(controls.accelerator, 0.8);
        assert_relative_eq!(controls.steer, -0.5);
        assert_relative_eq!(controls.brake, 0.25);
    }

    app.query_single_mut::<CarControls>()
        .unwrap()
        .release_all_controls();
    let controls = app.query_single::<CarControls>().unwrap();
    assert_relative_eq!(controls.accelerator, 0.0);
    assert_relative_eq!(controls.steer, 0.0);
    assert_relative_eq!(controls.brake, 0.0);
}
