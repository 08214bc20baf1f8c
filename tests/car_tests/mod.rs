mod camera;
mod controls;
