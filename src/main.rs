use bevy::prelude::*;

use roadster::components::{ChaseCamera, PlayerController};
use roadster::plugins::{CarPlugin, ChaseCameraPlugin, StartupSet};
use roadster::resources::SimConfig;

fn main() {
    let mut config = SimConfig::default();
    // keyboard demo
    config.control.digital_input = true;

    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(CarPlugin::with_config(config))
        .add_plugins(ChaseCameraPlugin::default())
        .add_systems(Startup, setup_scene.after(StartupSet::SpawnCamera))
        .run();
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    car: Query<Entity, With<PlayerController>>,
    camera: Query<Entity, With<ChaseCamera>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(400.0, 400.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
    ));

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(8.0, 16.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    if let Ok(entity) = car.get_single() {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Cuboid::new(2.8, 1.0, 1.6))),
            MeshMaterial3d(materials.add(Color::srgb(0.8, 0.2, 0.2))),
        ));
    }

    if let Ok(entity) = camera.get_single() {
        commands.entity(entity).insert(Camera3d::default());
    }
}
