use glam::{DVec2, Quat, Vec3};

use super::controller::{CameraController, DragTracker, CURSOR_SENSITIVITY};
use super::Camera;
use crate::core::{Button, InputState};

/// Zoom keeps the eye at least this far from the center...
const MIN_ZOOM_DISTANCE: f32 = 1e-4;
/// ...or this fraction of the current distance, whichever is larger.
const MIN_ZOOM_FRACTION: f32 = 1e-4;

/// Orbit/pan/zoom around the camera center, driven by middle-button drags.
///
/// Shift pans, Control zooms, no modifier orbits. Only one of the three is
/// applied per update, in that priority order.
#[derive(Debug, Clone)]
pub struct TrackballCameraController {
    camera: Camera,
    speed: f32,
    world_up_axis: Vec3,
    drag: DragTracker,
}

impl TrackballCameraController {
    pub fn new(speed: f32, world_up_axis: Vec3) -> Self {
        Self {
            camera: Camera::default(),
            speed,
            world_up_axis,
            drag: DragTracker::new(Button::MouseMiddle),
        }
    }

    fn pan(&mut self, cursor_delta: DVec2) -> bool {
        let truck_left = CURSOR_SENSITIVITY * cursor_delta.x as f32;
        let pedestal_up = CURSOR_SENSITIVITY * cursor_delta.y as f32;
        if truck_left == 0.0 && pedestal_up == 0.0 {
            return false;
        }
        self.camera.move_local(truck_left, pedestal_up, 0.0);
        true
    }

    fn zoom(&mut self, cursor_delta: DVec2) -> bool {
        let mut offset = CURSOR_SENSITIVITY * cursor_delta.x as f32;
        if offset == 0.0 {
            return false;
        }

        let eye = self.camera.eye();
        let center = self.camera.center();
        let view = center - eye;
        let distance = view.length();
        if offset > 0.0 {
            let max_step = (distance - MIN_ZOOM_DISTANCE).min(distance * (1.0 - MIN_ZOOM_FRACTION));
            offset = offset.min(max_step);
        }
        let new_eye = eye + offset * (view / distance);

        // Rounding can still land the eye on or past the center for large distances.
        if (center - new_eye).dot(view) <= 0.0 {
            log::debug!("zoom clamped at center, distance {distance}");
            return false;
        }
        self.rebuild(new_eye)
    }

    fn orbit(&mut self, cursor_delta: DVec2) -> bool {
        let longitude = CURSOR_SENSITIVITY * cursor_delta.y as f32;
        let latitude = -CURSOR_SENSITIVITY * cursor_delta.x as f32;
        if longitude == 0.0 && latitude == 0.0 {
            return false;
        }

        let center = self.camera.center();
        let depth_axis = self.camera.eye() - center;
        let longitude_rotation = Quat::from_axis_angle(self.camera.left(true), longitude);
        let latitude_rotation = Quat::from_axis_angle(self.world_up_axis.normalize(), latitude);
        let new_eye = center + latitude_rotation * (longitude_rotation * depth_axis);
        self.rebuild(new_eye)
    }

    /// Replaces the camera with one looking from `eye` at the current center,
    /// keeping the old camera when the view would align with the world up axis.
    fn rebuild(&mut self, eye: Vec3) -> bool {
        match Camera::try_new(eye, self.camera.center(), self.world_up_axis) {
            Some(camera) => {
                self.camera = camera;
                true
            }
            None => {
                log::debug!("ignoring camera motion aligned with world up axis");
                false
            }
        }
    }
}

impl Default for TrackballCameraController {
    fn default() -> Self {
        Self::new(1.0, Vec3::Y)
    }
}

impl CameraController for TrackballCameraController {
    fn update(&mut self, _elapsed_time: f32, input: &dyn InputState) -> bool {
        let cursor_delta = self.drag.cursor_delta(input);

        if input.is_down(Button::Shift) {
            self.pan(cursor_delta)
        } else if input.is_down(Button::Control) {
            self.zoom(cursor_delta)
        } else {
            self.orbit(cursor_delta)
        }
    }

    fn camera(&self) -> &Camera {
        &self.camera
    }

    fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn world_up_axis(&self) -> Vec3 {
        self.world_up_axis
    }

    fn set_world_up_axis(&mut self, axis: Vec3) {
        self.world_up_axis = axis;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn looking_at_origin(distance: f32) -> TrackballCameraController {
        let mut controller = TrackballCameraController::default();
        controller.set_camera(Camera::new(Vec3::new(0.0, 0.0, distance), Vec3::ZERO, Vec3::Y));
        controller
    }

    #[test]
    fn zoom_out_moves_eye_away() {
        let mut controller = looking_at_origin(2.0);
        assert!(controller.zoom(DVec2::new(-100.0, 0.0)));
        assert!((controller.camera().eye().z - 3.0).abs() < 1e-5);
    }

    #[test]
    fn zoom_clamps_before_center() {
        let mut controller = looking_at_origin(0.5);
        assert!(controller.zoom(DVec2::new(1000.0, 0.0)));
        let distance = controller.camera().front(false).length();
        assert!(distance > 0.0);
        assert!(distance <= 1e-3);
        assert!(controller.camera().eye().z > 0.0);
    }

    #[test]
    fn zoom_clamp_holds_far_from_center() {
        let mut controller = looking_at_origin(5000.0);
        assert!(controller.zoom(DVec2::new(1_000_000.0, 0.0)));
        let eye = controller.camera().eye();
        assert!(eye.z > 0.0);
        assert!(eye.z < 5000.0);
        assert_eq!(controller.camera().center(), Vec3::ZERO);
    }

    #[test]
    fn orbit_keeps_distance() {
        let mut controller = looking_at_origin(4.0);
        assert!(controller.orbit(DVec2::new(37.0, -12.0)));
        let distance = controller.camera().eye().length();
        assert!((distance - 4.0).abs() < 1e-4);
        assert_eq!(controller.camera().center(), Vec3::ZERO);
    }

    #[test]
    fn pan_without_motion_is_noop() {
        let mut controller = looking_at_origin(4.0);
        let before = *controller.camera();
        assert!(!controller.pan(DVec2::ZERO));
        assert_eq!(*controller.camera(), before);
    }
}
