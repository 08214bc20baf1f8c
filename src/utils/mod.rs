mod errors;
mod math;

pub use errors::SimError;
pub use math::{lerp_fraction, range_map, to_render_quat, to_render_vec3};
