use bevy::math::{Quat, Vec3};
use nalgebra::{UnitQuaternion, Vector3};

/// Maps `value` from `[in_min, in_max]` to `[out_min, out_max]`.
///
/// A degenerate input range yields `out_min` rather than dividing by zero.
pub fn range_map(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    let span = in_max - in_min;
    if span.abs() < f64::EPSILON {
        return out_min;
    }
    out_min + (value - in_min) / span * (out_max - out_min)
}

/// Frame-rate independent interpolation fraction for a given per-second rate.
///
/// Stays in `[0, 1)` for any `rate >= 0` and `dt >= 0`, so a smoothed value
/// approaches its target without ever overshooting.
pub fn lerp_fraction(rate: f64, dt: f64) -> f64 {
    1.0 - (-rate.max(0.0) * dt.max(0.0)).exp()
}

/// Simulation-space position to render-space translation.
pub fn to_render_vec3(v: &Vector3<f64>) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32)
}

/// Simulation-space attitude to render-space rotation.
pub fn to_render_quat(q: &UnitQuaternion<f64>) -> Quat {
    let coords = q.coords;
    Quat::from_xyzw(
        coords.x as f32,
        coords.y as f32,
        coords.z as f32,
        coords.w as f32,
    )
}
