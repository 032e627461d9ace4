pub mod app;
pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod gui;
pub mod image_diff;
pub mod loaders;
pub mod math;
pub mod renderer;
pub mod scene;

pub use camera::{Camera, CameraController, ControllerKind, ViewerCameraController};
pub use math::AABB;
