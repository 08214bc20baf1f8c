use bevy::ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy::prelude::*;

use crate::components::ChaseCamera;
use crate::plugins::{CarUpdateSet, StartupSet};
use crate::resources::{CameraConfig, PhysicsConfig};
use crate::systems::chase_camera_system;

/// Spawns the chase camera entity and keeps it trailing the player vehicle
/// after each physics tick. Rendering apps attach their camera bundle to the
/// spawned entity.
pub struct ChaseCameraPlugin {
    config: CameraConfig,
    schedule: InternedScheduleLabel,
}

impl Default for ChaseCameraPlugin {
    fn default() -> Self {
        Self {
            config: CameraConfig::default(),
            schedule: FixedUpdate.intern(),
        }
    }
}

impl ChaseCameraPlugin {
    pub fn with_config(config: CameraConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn in_schedule(mut self, schedule: impl ScheduleLabel) -> Self {
        self.schedule = schedule.intern();
        self
    }
}

impl Plugin for ChaseCameraPlugin {
    fn build(&self, app: &mut App) {
        if let Err(err) = self.config.validate() {
            panic!("invalid camera config: {err}");
        }

        app.insert_resource(self.config.clone());
        app.init_resource::<PhysicsConfig>();
        app.configure_sets(
            self.schedule,
            CarUpdateSet::CameraFollow.after(CarUpdateSet::Physics),
        );
        app.add_systems(Startup, setup_camera.in_set(StartupSet::SpawnCamera));
        app.add_systems(
            self.schedule,
            chase_camera_system.in_set(CarUpdateSet::CameraFollow),
        );
    }
}

fn setup_camera(mut commands: Commands, config: Res<CameraConfig>) {
    commands.spawn((
        ChaseCamera::from_config(&config),
        Name::new("ChaseCamera"),
        Transform::default(),
    ));
}
