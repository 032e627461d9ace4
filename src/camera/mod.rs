mod controller;
mod core;
mod first_person;
mod trackball;

pub use controller::{CameraController, ControllerKind, ViewerCameraController};
pub use self::core::Camera;
pub use first_person::FirstPersonCameraController;
pub use trackball::TrackballCameraController;
