use bevy::prelude::*;

use crate::components::{CarActor, CarState};
use crate::resources::PhysicsConfig;
use crate::utils::{to_render_quat, to_render_vec3};
use crate::vehicle::{VehicleHandle, VehicleWorld};

/// Per-tick vehicle update: batched suspension raycasts, wheel/rigid-body
/// integration against the fresh raycast buffer, airborne recomputation and
/// pose exposure, in that order.
///
/// A car whose backend actor is missing degrades to a no-op for the tick:
/// its last known pose is held and its availability flag flips, but the rest
/// of the frame proceeds.
pub fn car_physics_system(
    mut world: ResMut<VehicleWorld>,
    config: Res<PhysicsConfig>,
    mut handles: Local<Vec<VehicleHandle>>,
    mut query: Query<(&CarActor, &mut CarState, &mut Transform)>,
) {
    let dt = config.timestep.clamp(0.0, config.max_timestep);

    handles.clear();
    for (actor, mut state, _) in &mut query {
        match actor.handle {
            Some(handle) => handles.push(handle),
            None => {
                if state.mark_unavailable() {
                    warn!("vehicle actor not bound; holding last pose");
                }
            }
        }
    }
    if handles.is_empty() {
        return;
    }

    if let Err(err) = world.run_suspension_raycasts(&handles) {
        warn!("suspension raycasts failed: {err}");
        return;
    }
    if let Err(err) = world.integrate_vehicles(dt, config.gravity, &handles) {
        warn!("vehicle integration failed: {err}");
        return;
    }

    let mut batch_index = 0;
    for (actor, mut state, mut transform) in &mut query {
        let Some(handle) = actor.handle else {
            continue;
        };
        state
            .wheel_contacts
            .copy_from_slice(world.wheel_results(batch_index));
        batch_index += 1;

        let sleeping = world.is_sleeping(handle).unwrap_or(false);
        state.update_airborne(sleeping);

        match world.global_pose(handle) {
            Ok((position, attitude)) => {
                state.set_pose(position, attitude);
                state.forward_speed = world.forward_speed(handle).unwrap_or(state.forward_speed);
                state.mark_available();
                transform.translation = to_render_vec3(&position);
                transform.rotation = to_render_quat(&attitude);
            }
            Err(err) => {
                if state.mark_unavailable() {
                    warn!("vehicle pose unavailable: {err}");
                }
            }
        }
    }
}
