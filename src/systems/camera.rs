use bevy::prelude::*;

use crate::components::{CarState, ChaseCamera, PlayerController};
use crate::resources::PhysicsConfig;
use crate::utils::to_render_vec3;

/// Trails the player vehicle with the smoothed chase transform and
/// recomputes the look-at every tick. Runs after the vehicle update has
/// exposed this tick's pose.
pub fn chase_camera_system(
    config: Res<PhysicsConfig>,
    car_query: Query<&CarState, With<PlayerController>>,
    mut camera_query: Query<(&mut ChaseCamera, &mut Transform), Without<PlayerController>>,
) {
    let Ok(state) = car_query.get_single() else {
        return;
    };
    let dt = config.timestep.clamp(0.0, config.max_timestep);

    for (mut camera, mut transform) in &mut camera_query {
        camera.update(state.position(), state.forward_basis(), dt);

        transform.translation = to_render_vec3(&camera.position());
        let focal = to_render_vec3(&camera.focal_point());
        // a degenerate look direction keeps the previous orientation
        if (focal - transform.translation).length_squared() > 1e-6 {
            transform.look_at(focal, Vec3::Y);
        }
    }
}
