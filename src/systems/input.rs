use bevy::prelude::*;

use crate::components::{CarControls, PlayerController};

const TRIGGER_DEADZONE: f64 = 0.1;

/// Samples keyboard state into the player car's raw input latch. Only active
/// while the car is in digital input mode.
pub fn keyboard_input_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut query: Query<&mut CarControls, With<PlayerController>>,
) {
    if let Ok(mut controls) = query.get_single_mut() {
        if !controls.digital_input_enabled() {
            return;
        }
        if keyboard.pressed(KeyCode::ArrowUp) {
            controls.accelerate_forward(1.0);
        }
        if keyboard.pressed(KeyCode::KeyR) {
            controls.accelerate_reverse(1.0);
        }
        if keyboard.pressed(KeyCode::ArrowDown) {
            controls.brake(1.0);
        }
        if keyboard.pressed(KeyCode::Space) {
            controls.handbrake(1.0);
        }
        if keyboard.pressed(KeyCode::ArrowLeft) {
            controls.steer_left();
        }
        if keyboard.pressed(KeyCode::ArrowRight) {
            controls.steer_right();
        }
        if keyboard.just_pressed(KeyCode::KeyE) {
            controls.release_all_controls();
        }
    }
}

/// Samples the first connected gamepad into the player car's raw input
/// latch. Only active in analog input mode; the stick and triggers report
/// true neutral, so every channel is written each tick.
pub fn gamepad_input_system(
    gamepads: Query<&Gamepad>,
    mut query: Query<&mut CarControls, With<PlayerController>>,
) {
    let Ok(mut controls) = query.get_single_mut() else {
        return;
    };
    if controls.digital_input_enabled() {
        return;
    }
    let Some(gamepad) = gamepads.iter().next() else {
        return;
    };

    let right_trigger = gamepad.get(GamepadButton::RightTrigger2).unwrap_or(0.0) as f64;
    let left_trigger = gamepad.get(GamepadButton::LeftTrigger2).unwrap_or(0.0) as f64;
    if right_trigger > TRIGGER_DEADZONE {
        controls.accelerate_forward(right_trigger);
    } else if left_trigger > TRIGGER_DEADZONE {
        controls.accelerate_reverse(left_trigger);
    }

    // stick x is positive to the right; the steer channel is positive left
    let steer = -(gamepad.get(GamepadAxis::LeftStickX).unwrap_or(0.0) as f64);
    if let Err(err) = controls.steer(steer) {
        warn!("steer input rejected: {err}");
    }

    if gamepad.pressed(GamepadButton::South) {
        controls.brake(1.0);
    }
    if gamepad.pressed(GamepadButton::East) {
        controls.handbrake(1.0);
    }
}
