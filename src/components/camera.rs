use bevy::prelude::*;
use nalgebra::Vector3;

use crate::resources::CameraConfig;
use crate::utils::{lerp_fraction, range_map};

/// Chase camera state: a smoothed position trailing the vehicle, plus the
/// runtime tunables. Adjusting a tunable never resets the smoothed state.
#[derive(Component, Debug, Clone)]
pub struct ChaseCamera {
    focal_point: Vector3<f64>,
    position: Vector3<f64>,
    distance: f64,
    height: f64,
    min_distance: f64,
    max_distance: f64,
    zoom: f64,
    zoom_steps: f64,
    zoom_step_bounds: f64,
    angle: f64,
    tilt: f64,
    lerp_speed: f64,
    initialized: bool,
}

impl ChaseCamera {
    pub fn from_config(config: &CameraConfig) -> Self {
        let distance = config.distance.clamp(config.min_distance, config.max_distance);
        let zoom = range_map(distance, config.min_distance, config.max_distance, 0.0, 1.0)
            .clamp(0.0, 1.0)
            .sqrt();
        Self {
            focal_point: Vector3::zeros(),
            position: Vector3::zeros(),
            distance,
            height: config.height,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            zoom,
            zoom_steps: range_map(zoom, 0.0, 1.0, -config.zoom_step_bounds, config.zoom_step_bounds),
            zoom_step_bounds: config.zoom_step_bounds,
            angle: config.angle,
            tilt: config.tilt,
            lerp_speed: config.lerp_speed,
            initialized: false,
        }
    }

    /// Where the camera wants to be for the given focal point and vehicle
    /// forward basis: behind the vehicle at the configured distance, raised
    /// by the configured height.
    pub fn target_position(&self, focal: Vector3<f64>, forward: Vector3<f64>) -> Vector3<f64> {
        focal - forward * self.distance + Vector3::y() * self.height
    }

    /// Advances the smoothed position one tick toward the target. The first
    /// update snaps so the camera does not sweep in from the origin.
    pub fn update(&mut self, focal: Vector3<f64>, forward: Vector3<f64>, dt: f64) {
        self.focal_point = focal;
        let target = self.target_position(focal, forward);
        if self.initialized {
            let fraction = lerp_fraction(self.lerp_speed, dt);
            self.position += (target - self.position) * fraction;
        } else {
            self.position = target;
            self.initialized = true;
        }
    }

    pub fn position(&self) -> Vector3<f64> {
        self.position
    }

    pub fn focal_point(&self) -> Vector3<f64> {
        self.focal_point
    }

    /// Sets the zoom fraction in `[0, 1]`, mapped quadratically onto the
    /// distance bounds so small zoom values stay close to the vehicle.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(0.0, 1.0);
        self.zoom_steps = range_map(
            self.zoom,
            0.0,
            1.0,
            -self.zoom_step_bounds,
            self.zoom_step_bounds,
        );
        self.apply_zoom();
    }

    /// Nudges the zoom by wheel steps, clamped to the step bounds.
    pub fn set_zoom_delta(&mut self, delta: f64) {
        self.zoom_steps =
            (self.zoom_steps + delta).clamp(-self.zoom_step_bounds, self.zoom_step_bounds);
        self.zoom = range_map(
            self.zoom_steps,
            -self.zoom_step_bounds,
            self.zoom_step_bounds,
            0.0,
            1.0,
        );
        self.apply_zoom();
    }

    fn apply_zoom(&mut self) {
        self.distance = range_map(
            self.zoom * self.zoom,
            0.0,
            1.0,
            self.min_distance,
            self.max_distance,
        )
        .clamp(self.min_distance, self.max_distance);
    }

    pub fn set_angle_offset(&mut self, offset: f64) {
        self.angle += offset;
    }

    pub fn set_angle(&mut self, angle: f64) {
        self.angle = angle;
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn set_tilt(&mut self, tilt: f64) {
        self.tilt = tilt;
    }

    pub fn tilt(&self) -> f64 {
        self.tilt
    }

    pub fn set_height(&mut self, height: f64) {
        self.height = height;
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn set_distance(&mut self, distance: f64) {
        self.distance = distance.clamp(self.min_distance, self.max_distance);
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn set_lerp_speed(&mut self, lerp_speed: f64) {
        self.lerp_speed = lerp_speed.max(0.0);
    }

    pub fn lerp_speed(&self) -> f64 {
        self.lerp_speed
    }
}
