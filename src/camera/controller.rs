use glam::{DVec2, Vec3};

use super::{Camera, FirstPersonCameraController, TrackballCameraController};
use crate::core::{Button, InputState};

/// Radians of pan/tilt/orbit per pixel of cursor motion, and world units of
/// trackball pan/zoom per pixel.
pub(crate) const CURSOR_SENSITIVITY: f32 = 0.01;

/// Camera movement driven by polled input.
pub trait CameraController {
    /// Interprets the input for one tick. Returns true if the camera changed.
    fn update(&mut self, elapsed_time: f32, input: &dyn InputState) -> bool;

    fn camera(&self) -> &Camera;

    fn set_camera(&mut self, camera: Camera);

    fn speed(&self) -> f32;

    fn set_speed(&mut self, speed: f32);

    fn world_up_axis(&self) -> Vec3;

    fn set_world_up_axis(&mut self, axis: Vec3);

    /// Adds `delta` to the speed, never going below zero.
    fn increase_speed(&mut self, delta: f32) {
        let speed = (self.speed() + delta).max(0.0);
        self.set_speed(speed);
    }
}

/// Press/release tracking for the mouse button that starts a drag.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DragTracker {
    button: Button,
    dragging: bool,
    last_cursor: DVec2,
}

impl DragTracker {
    pub(crate) fn new(button: Button) -> Self {
        Self {
            button,
            dragging: false,
            last_cursor: DVec2::ZERO,
        }
    }

    /// Cursor motion since the previous tick while the button is held; zero otherwise.
    ///
    /// The press edge only records the baseline, so the first dragging tick
    /// reports no motion.
    pub(crate) fn cursor_delta(&mut self, input: &dyn InputState) -> DVec2 {
        let down = input.is_down(self.button);
        if down && !self.dragging {
            self.dragging = true;
            self.last_cursor = input.cursor_position();
        } else if !down && self.dragging {
            self.dragging = false;
        }

        if !self.dragging {
            return DVec2::ZERO;
        }
        let cursor = input.cursor_position();
        let delta = cursor - self.last_cursor;
        self.last_cursor = cursor;
        delta
    }

    #[cfg(test)]
    pub(crate) fn is_dragging(&self) -> bool {
        self.dragging
    }
}

/// Controller variants selectable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ControllerKind {
    FirstPerson,
    Trackball,
}

impl ControllerKind {
    pub fn label(self) -> &'static str {
        match self {
            ControllerKind::FirstPerson => "First person",
            ControllerKind::Trackball => "Trackball",
        }
    }
}

/// The viewer's active controller. Switching kinds keeps the camera, speed
/// and world up axis.
#[derive(Debug, Clone)]
pub enum ViewerCameraController {
    FirstPerson(FirstPersonCameraController),
    Trackball(TrackballCameraController),
}

impl ViewerCameraController {
    pub fn new(kind: ControllerKind, speed: f32, world_up_axis: Vec3) -> Self {
        match kind {
            ControllerKind::FirstPerson => {
                Self::FirstPerson(FirstPersonCameraController::new(speed, world_up_axis))
            }
            ControllerKind::Trackball => {
                Self::Trackball(TrackballCameraController::new(speed, world_up_axis))
            }
        }
    }

    pub fn kind(&self) -> ControllerKind {
        match self {
            Self::FirstPerson(_) => ControllerKind::FirstPerson,
            Self::Trackball(_) => ControllerKind::Trackball,
        }
    }

    pub fn switch_to(&mut self, kind: ControllerKind) {
        if kind == self.kind() {
            return;
        }
        let camera = *self.camera();
        let mut next = Self::new(kind, self.speed(), self.world_up_axis());
        next.set_camera(camera);
        log::debug!("camera controller switched to {}", kind.label());
        *self = next;
    }

    fn inner(&self) -> &dyn CameraController {
        match self {
            Self::FirstPerson(controller) => controller,
            Self::Trackball(controller) => controller,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn CameraController {
        match self {
            Self::FirstPerson(controller) => controller,
            Self::Trackball(controller) => controller,
        }
    }
}

impl CameraController for ViewerCameraController {
    fn update(&mut self, elapsed_time: f32, input: &dyn InputState) -> bool {
        self.inner_mut().update(elapsed_time, input)
    }

    fn camera(&self) -> &Camera {
        self.inner().camera()
    }

    fn set_camera(&mut self, camera: Camera) {
        self.inner_mut().set_camera(camera);
    }

    fn speed(&self) -> f32 {
        self.inner().speed()
    }

    fn set_speed(&mut self, speed: f32) {
        self.inner_mut().set_speed(speed);
    }

    fn world_up_axis(&self) -> Vec3 {
        self.inner().world_up_axis()
    }

    fn set_world_up_axis(&mut self, axis: Vec3) {
        self.inner_mut().set_world_up_axis(axis);
    }
}
