use bevy::ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy::prelude::*;

use crate::components::{CarActor, CarControls, CarState, InputShapers, PlayerController};
use crate::plugins::{CarUpdateSet, StartupSet};
use crate::resources::{CarPhysicsConfig, ControlSmoothingConfig, SimConfig};
use crate::systems::{
    car_physics_system, control_smoothing_system, gamepad_input_system, keyboard_input_system,
};
use crate::vehicle::{FlatGroundBackend, VehicleWorld};

/// Installs the vehicle control core: configuration resources, the vehicle
/// world (a flat-ground backend unless one was inserted beforehand), the
/// player car entity and the chained input → smoothing → physics tick.
pub struct CarPlugin {
    config: SimConfig,
    schedule: InternedScheduleLabel,
}

impl Default for CarPlugin {
    fn default() -> Self {
        Self {
            config: SimConfig::default(),
            schedule: FixedUpdate.intern(),
        }
    }
}

impl CarPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SimConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Runs the tick in a different schedule. The headless test harness uses
    /// `Update` so one `App::update` is exactly one tick.
    pub fn in_schedule(mut self, schedule: impl ScheduleLabel) -> Self {
        self.schedule = schedule.intern();
        self
    }
}

impl Plugin for CarPlugin {
    fn build(&self, app: &mut App) {
        if let Err(err) = self.config.validate() {
            panic!("invalid simulation config: {err}");
        }

        app.insert_resource(self.config.control.clone())
            .insert_resource(self.config.steer_curve.clone())
            .insert_resource(self.config.physics.clone())
            .insert_resource(self.config.car.clone())
            .insert_resource(InputShapers::from_config(&self.config.control));

        if !app.world().contains_resource::<VehicleWorld>() {
            app.insert_resource(VehicleWorld::new(Box::new(FlatGroundBackend::new())));
        }
        // headless apps may not carry the input plugin
        app.init_resource::<ButtonInput<KeyCode>>();

        app.configure_sets(
            self.schedule,
            (
                CarUpdateSet::Input,
                CarUpdateSet::Smoothing,
                CarUpdateSet::Physics,
                CarUpdateSet::CameraFollow,
            )
                .chain(),
        );
        app.configure_sets(Startup, (StartupSet::SpawnPlayer, StartupSet::SpawnCamera).chain());

        app.add_systems(Startup, setup_car.in_set(StartupSet::SpawnPlayer));
        app.add_systems(
            self.schedule,
            (
                (keyboard_input_system, gamepad_input_system).in_set(CarUpdateSet::Input),
                control_smoothing_system.in_set(CarUpdateSet::Smoothing),
                car_physics_system.in_set(CarUpdateSet::Physics),
            ),
        );

        app.insert_resource(Time::<Fixed>::from_seconds(self.config.physics.timestep));
    }
}

fn setup_car(
    mut commands: Commands,
    mut world: ResMut<VehicleWorld>,
    car_config: Res<CarPhysicsConfig>,
    control_config: Res<ControlSmoothingConfig>,
) {
    let handle = match world.create_vehicle(&car_config) {
        Ok(handle) => Some(handle),
        Err(err) => {
            warn!("vehicle creation failed: {err}");
            None
        }
    };

    commands.spawn((
        CarActor { handle },
        CarControls::new(control_config.digital_input),
        CarState::new(),
        PlayerController::new(),
        Name::new("Car"),
        Transform::default(),
    ));
}
