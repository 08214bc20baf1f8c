use bevy::prelude::*;

use crate::components::{CarActor, CarControls, CarState, InputShaper, InputShapers};
use crate::resources::{PhysicsConfig, SteerSpeedCurve};
use crate::vehicle::{DriveInput, VehicleWorld};

/// Folds this tick's raw driver input into the smoothed control channels,
/// resolves forced gear changes (last write of the tick wins) and hands the
/// resulting drive input to the backend. Steering authority is attenuated by
/// the steer-speed curve before it reaches the wheels.
pub fn control_smoothing_system(
    mut world: ResMut<VehicleWorld>,
    shapers: Res<InputShapers>,
    curve: Res<SteerSpeedCurve>,
    config: Res<PhysicsConfig>,
    mut query: Query<(&CarActor, &mut CarControls, &mut CarState)>,
) {
    let dt = config.timestep.clamp(0.0, config.max_timestep);
    for (actor, mut controls, mut state) in &mut query {
        let shaper: &dyn InputShaper = if controls.digital_input_enabled() {
            &shapers.digital
        } else {
            &shapers.analog
        };

        let direction = controls.apply_smoothing(shaper, dt);

        // gear changes are forced synchronously with the triggering command,
        // before the throttle can take effect
        if let Some(direction) = direction {
            let gear = state.gear.arbitrate(direction);
            if gear != state.gear {
                state.gear = gear;
                if let Some(handle) = actor.handle {
                    if let Err(err) = world.force_gear_change(handle, gear) {
                        warn!("forced gear change failed: {err}");
                    }
                }
            }
        }

        if let Some(handle) = actor.handle {
            let steer_fraction = curve.sample(state.forward_speed);
            let input = DriveInput {
                accelerator: controls.accelerator,
                brake: controls.brake,
                handbrake: controls.handbrake,
                steer: controls.steer * steer_fraction,
            };
            if let Err(err) = world.apply_drive_input(handle, input) {
                warn!("drive input rejected: {err}");
            }
        }
    }
}
