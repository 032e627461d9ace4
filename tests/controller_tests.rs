mod common;

use common::assert_vec3_near;
use glam::Vec3;
use gltf_viewer::camera::{
    Camera, CameraController, ControllerKind, FirstPersonCameraController,
    TrackballCameraController, ViewerCameraController,
};
use gltf_viewer::core::{Button, InputSnapshot};

#[cfg(test)]
mod first_person_tests {
    use super::*;

    #[test]
    fn test_idle_update_is_exact_no_op() {
        let mut controller = FirstPersonCameraController::new(3.0, Vec3::Y);
        let start = Camera::new(Vec3::new(0.1, 0.2, 0.3), Vec3::new(4.0, -1.0, 2.0), Vec3::Y);
        controller.set_camera(start);

        let input = InputSnapshot::new();
        assert!(!controller.update(0.0, &input));
        assert!(!controller.update(0.25, &input));
        assert_eq!(*controller.camera(), start);
    }

    #[test]
    fn test_cursor_motion_without_drag_is_ignored() {
        let mut controller = FirstPersonCameraController::default();
        let mut input = InputSnapshot::new();
        input.move_cursor_to(10.0, 10.0);
        assert!(!controller.update(0.016, &input));
        input.move_cursor_to(200.0, 50.0);
        assert!(!controller.update(0.016, &input));
        assert_eq!(*controller.camera(), Camera::default());
    }

    #[test]
    fn test_forward_key_dollies_by_speed_times_elapsed() {
        let mut controller = FirstPersonCameraController::new(2.0, Vec3::Y);
        let mut input = InputSnapshot::new();
        input.press(Button::KeyW);

        assert!(controller.update(0.5, &input));
        assert_vec3_near(controller.camera().eye(), Vec3::new(0.0, 0.0, -1.0));
        assert_vec3_near(controller.camera().front(true), Vec3::NEG_Z);
    }

    #[test]
    fn test_strafe_and_pedestal_keys() {
        let mut controller = FirstPersonCameraController::new(1.0, Vec3::Y);
        let mut input = InputSnapshot::new();
        input.press(Button::KeyD).press(Button::ArrowUp);

        assert!(controller.update(1.0, &input));
        // D trucks right (+X for the default camera), ArrowUp raises along +Y.
        assert_vec3_near(controller.camera().eye(), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_drag_press_edge_reports_no_motion() {
        let mut controller = FirstPersonCameraController::default();
        let mut input = InputSnapshot::new();
        input.move_cursor_to(100.0, 100.0).press(Button::MouseLeft);
        assert!(!controller.update(0.016, &input));
        assert_eq!(*controller.camera(), Camera::default());
    }

    #[test]
    fn test_drag_right_turns_right() {
        let mut controller = FirstPersonCameraController::default();
        let mut input = InputSnapshot::new();
        input.move_cursor_to(100.0, 100.0).press(Button::MouseLeft);
        controller.update(0.016, &input);

        input.move_cursor_to(150.0, 100.0);
        assert!(controller.update(0.016, &input));

        let front = controller.camera().front(true);
        assert!(front.x > 0.0, "front {front} should turn toward +X");
        assert!((front.x - 0.5f32.sin()).abs() < 1e-5);
        assert_eq!(controller.camera().eye(), Vec3::ZERO);
        assert_vec3_near(controller.camera().up(), Vec3::Y);
    }

    #[test]
    fn test_drag_down_tilts_down() {
        let mut controller = FirstPersonCameraController::default();
        let mut input = InputSnapshot::new();
        input.move_cursor_to(0.0, 0.0).press(Button::MouseLeft);
        controller.update(0.016, &input);

        input.move_cursor_to(0.0, 30.0);
        assert!(controller.update(0.016, &input));
        assert!(controller.camera().front(true).y < 0.0);
    }
}

#[cfg(test)]
mod trackball_tests {
    use super::*;

    /// Middle button pressed at the origin, with the press edge consumed.
    fn start_drag(controller: &mut TrackballCameraController, modifiers: &[Button]) -> InputSnapshot {
        let mut input = InputSnapshot::new();
        input.move_cursor_to(0.0, 0.0).press(Button::MouseMiddle);
        for &modifier in modifiers {
            input.press(modifier);
        }
        assert!(!controller.update(0.016, &input));
        input
    }

    fn orbit_camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO, Vec3::Y)
    }

    #[test]
    fn test_zoom_never_passes_center() {
        let mut controller = TrackballCameraController::new(1.0, Vec3::Y);
        controller.set_camera(orbit_camera());
        let mut input = start_drag(&mut controller, &[Button::Control]);

        input.move_cursor_to(10_000.0, 0.0);
        assert!(controller.update(0.016, &input));

        let camera = controller.camera();
        assert_eq!(camera.center(), Vec3::ZERO);
        assert!(camera.eye().z > 0.0);
        assert!((camera.center() - camera.eye()).length() > 0.0);
        assert!((camera.center() - camera.eye()).length() < 1e-3);
    }

    #[test]
    fn test_zoom_clamp_far_from_center() {
        let mut controller = TrackballCameraController::default();
        controller.set_camera(Camera::new(Vec3::new(0.0, 0.0, 5000.0), Vec3::ZERO, Vec3::Y));
        let mut input = start_drag(&mut controller, &[Button::Control]);

        input.move_cursor_to(1_000_000.0, 0.0);
        assert!(controller.update(0.016, &input));

        let camera = controller.camera();
        assert_eq!(camera.center(), Vec3::ZERO);
        assert!(camera.eye().z > 0.0);
        assert!(camera.eye().z < 5000.0);
    }

    #[test]
    fn test_zoom_out_moves_away() {
        let mut controller = TrackballCameraController::default();
        controller.set_camera(orbit_camera());
        let mut input = start_drag(&mut controller, &[Button::Control]);

        input.move_cursor_to(-100.0, 0.0);
        assert!(controller.update(0.016, &input));
        assert_vec3_near(controller.camera().eye(), Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_shift_pan_takes_priority_over_zoom() {
        let mut controller = TrackballCameraController::default();
        controller.set_camera(orbit_camera());
        let mut input = start_drag(&mut controller, &[Button::Shift, Button::Control]);

        input.move_cursor_to(100.0, 0.0);
        assert!(controller.update(0.016, &input));

        let camera = controller.camera();
        // truck_left by 1.0 along -X; distance to the center is unchanged.
        assert_vec3_near(camera.center(), Vec3::new(-1.0, 0.0, 0.0));
        assert_vec3_near(camera.eye(), Vec3::new(-1.0, 0.0, 1.0));
    }

    #[test]
    fn test_orbit_keeps_center_and_distance() {
        let mut controller = TrackballCameraController::default();
        let start = Camera::new(Vec3::new(0.0, 1.0, 4.0), Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        controller.set_camera(start);
        let mut input = start_drag(&mut controller, &[]);

        input.move_cursor_to(40.0, -25.0);
        assert!(controller.update(0.016, &input));

        let camera = controller.camera();
        assert_eq!(camera.center(), start.center());
        let distance = (camera.eye() - camera.center()).length();
        assert!((distance - 4.0).abs() < 1e-4);
        assert!(camera.eye().x.abs() > 1e-3);
    }

    #[test]
    fn test_rightward_drag_orbits_eye_toward_negative_x() {
        let mut controller = TrackballCameraController::default();
        controller.set_camera(orbit_camera());
        let mut input = start_drag(&mut controller, &[]);

        input.move_cursor_to(10.0, 0.0);
        assert!(controller.update(0.016, &input));

        // -0.1 rad about +Y.
        let camera = controller.camera();
        assert_vec3_near(camera.eye(), Vec3::new(-(0.1f32.sin()), 0.0, 0.1f32.cos()));
        assert_eq!(camera.center(), Vec3::ZERO);
        assert_vec3_near(camera.up(), Vec3::Y);
    }

    #[test]
    fn test_downward_drag_raises_eye() {
        let mut controller = TrackballCameraController::default();
        controller.set_camera(orbit_camera());
        let mut input = start_drag(&mut controller, &[]);

        input.move_cursor_to(0.0, 10.0);
        assert!(controller.update(0.016, &input));

        // 0.1 rad about the camera's left axis (-X).
        let camera = controller.camera();
        assert_vec3_near(camera.eye(), Vec3::new(0.0, 0.1f32.sin(), 0.1f32.cos()));
        assert_eq!(camera.center(), Vec3::ZERO);
        assert!(camera.front(true).y < 0.0);
    }

    #[test]
    fn test_left_drag_does_nothing() {
        let mut controller = TrackballCameraController::default();
        let mut input = InputSnapshot::new();
        input.press(Button::MouseLeft);
        controller.update(0.016, &input);
        input.move_cursor_to(50.0, 50.0);
        assert!(!controller.update(0.016, &input));
        assert_eq!(*controller.camera(), Camera::default());
    }
}

#[cfg(test)]
mod viewer_controller_tests {
    use super::*;

    #[test]
    fn test_switch_keeps_camera_and_speed() {
        let mut controller = ViewerCameraController::new(ControllerKind::FirstPerson, 4.0, Vec3::Y);
        let camera = Camera::new(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y);
        controller.set_camera(camera);

        controller.switch_to(ControllerKind::Trackball);
        assert_eq!(controller.kind(), ControllerKind::Trackball);
        assert_eq!(*controller.camera(), camera);
        assert_eq!(controller.speed(), 4.0);
        assert_eq!(controller.world_up_axis(), Vec3::Y);
    }

    #[test]
    fn test_delegates_update_to_active_controller() {
        let mut controller = ViewerCameraController::new(ControllerKind::Trackball, 1.0, Vec3::Y);
        let mut input = InputSnapshot::new();
        input.press(Button::KeyW);
        // Trackball ignores keys.
        assert!(!controller.update(1.0, &input));

        controller.switch_to(ControllerKind::FirstPerson);
        assert!(controller.update(1.0, &input));
        assert_vec3_near(controller.camera().eye(), Vec3::NEG_Z);
    }

    #[test]
    fn test_increase_speed_clamps_at_zero() {
        let mut controller = ViewerCameraController::new(ControllerKind::FirstPerson, 1.0, Vec3::Y);
        controller.increase_speed(-5.0);
        assert_eq!(controller.speed(), 0.0);
    }
}
