use bevy::prelude::*;

use roadster::plugins::{CarPlugin, ChaseCameraPlugin};
use roadster::resources::{CameraConfig, SimConfig};
use roadster::vehicle::{VehicleBackend, VehicleWorld};

/// Builder for a headless test application. The car and camera ticks run in
/// the `Update` schedule so one `App::update` is exactly one simulation tick.
pub struct TestAppBuilder {
    config: SimConfig,
    camera_config: CameraConfig,
    backend: Option<Box<dyn VehicleBackend>>,
    with_camera: bool,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self {
            config: SimConfig::default(),
            camera_config: CameraConfig::default(),
            backend: None,
            with_camera: false,
        }
    }
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_backend(mut self, backend: Box<dyn VehicleBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_chase_camera(mut self, config: CameraConfig) -> Self {
        self.with_camera = true;
        self.camera_config = config;
        self
    }

    pub fn build(self) -> TestApp {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<ButtonInput<KeyCode>>();

        if let Some(backend) = self.backend {
            app.insert_resource(VehicleWorld::new(backend));
        }

        app.add_plugins(CarPlugin::with_config(self.config).in_schedule(Update));
        if self.with_camera {
            app.add_plugins(
                ChaseCameraPlugin::with_config(self.camera_config).in_schedule(Update),
            );
        }

        // first update runs the startup systems
        app.update();

        TestApp { app }
    }
}

/// Main test application wrapper.
pub struct TestApp {
    pub app: App,
}

impl TestApp {
    pub fn run_steps(&mut self, steps: usize) {
        for _ in 0..steps {
            self.app.update();
        }
    }

    pub fn run_frame(&mut self) {
        self.app.update();
    }

    pub fn get_resource<T: Resource>(&self) -> Option<&T> {
        self.app.world().get_resource::<T>()
    }

    pub fn get_resource_mut<T: Resource>(&mut self) -> Option<Mut<T>> {
        self.app.world_mut().get_resource_mut::<T>()
    }

    pub fn query_single<T: Component>(&mut self) -> Option<&T> {
        let world = self.app.world_mut();
        let mut query = world.query::<&T>();
        query.get_single(world).ok()
    }

    pub fn query_single_mut<T: Component>(&mut self) -> Option<Mut<T>> {
        let world = self.app.world_mut();
        let mut query = world.query::<&mut T>();
        query.get_single_mut(world).ok()
    }
}
