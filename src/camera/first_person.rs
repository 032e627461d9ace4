use glam::Vec3;

use super::controller::{CameraController, DragTracker, CURSOR_SENSITIVITY};
use super::Camera;
use crate::core::{Button, InputState};

/// Roll applied per update while Q or E is held. Not scaled by elapsed time.
const ROLL_STEP: f32 = 0.001;

/// Fly-through controller: keyboard translates and rolls, left-drag looks around.
#[derive(Debug, Clone)]
pub struct FirstPersonCameraController {
    camera: Camera,
    speed: f32,
    world_up_axis: Vec3,
    drag: DragTracker,
}

impl FirstPersonCameraController {
    pub fn new(speed: f32, world_up_axis: Vec3) -> Self {
        Self {
            camera: Camera::default(),
            speed,
            world_up_axis,
            drag: DragTracker::new(Button::MouseLeft),
        }
    }

    fn axis(input: &dyn InputState, positive: Button, negative: Button) -> f32 {
        let mut value = 0.0;
        if input.is_down(positive) {
            value += 1.0;
        }
        if input.is_down(negative) {
            value -= 1.0;
        }
        value
    }
}

impl Default for FirstPersonCameraController {
    fn default() -> Self {
        Self::new(1.0, Vec3::Y)
    }
}

impl CameraController for FirstPersonCameraController {
    fn update(&mut self, elapsed_time: f32, input: &dyn InputState) -> bool {
        let cursor_delta = self.drag.cursor_delta(input);

        let step = self.speed * elapsed_time;
        let dolly_in = step * Self::axis(input, Button::KeyW, Button::KeyS);
        let truck_left = step * Self::axis(input, Button::KeyA, Button::KeyD);
        let pedestal_up = step * Self::axis(input, Button::ArrowUp, Button::ArrowDown);
        let roll_right = ROLL_STEP * Self::axis(input, Button::KeyE, Button::KeyQ);

        // Cursor moving right turns the camera right, i.e. a negative pan.
        let pan_left = -CURSOR_SENSITIVITY * cursor_delta.x as f32;
        let tilt_down = CURSOR_SENSITIVITY * cursor_delta.y as f32;

        let moved = [truck_left, pedestal_up, dolly_in, roll_right, tilt_down, pan_left]
            .iter()
            .any(|&v| v != 0.0);
        if !moved {
            return false;
        }

        self.camera.move_local(truck_left, pedestal_up, dolly_in);
        self.camera.rotate_local(roll_right, tilt_down, 0.0);
        self.camera.rotate_world(pan_left, self.world_up_axis);
        true
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
