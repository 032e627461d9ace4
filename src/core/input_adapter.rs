use glam::DVec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::input::{Button, InputState};

/// Bridges winit window events to [`InputState`].
#[derive(Debug, Clone, Default)]
pub struct WinitInput {
    pressed: HashSet<Button>,
    cursor: DVec2,
}

impl WinitInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one window event into the tracked state.
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    if let Some(button) = Self::keycode_to_button(keycode) {
                        self.set(button, event.state);
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = Self::mouse_button_to_button(*button) {
                    self.set(button, *state);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = DVec2::new(position.x, position.y);
            }
            // Releases are not delivered once focus is gone.
            WindowEvent::Focused(false) => self.pressed.clear(),
            _ => {}
        }
    }

    fn set(&mut self, button: Button, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.pressed.insert(button);
            }
            ElementState::Released => {
                self.pressed.remove(&button);
            }
        }
    }

    fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::KeyW => Some(Button::KeyW),
            KeyCode::KeyA => Some(Button::KeyA),
            KeyCode::KeyS => Some(Button::KeyS),
            KeyCode::KeyD => Some(Button::KeyD),
            KeyCode::KeyQ => Some(Button::KeyQ),
            KeyCode::KeyE => Some(Button::KeyE),
            KeyCode::ArrowUp => Some(Button::ArrowUp),
            KeyCode::ArrowDown => Some(Button::ArrowDown),
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Button::Shift),
            KeyCode::ControlLeft | KeyCode::ControlRight => Some(Button::Control),
            KeyCode::Escape => Some(Button::Escape),
            _ => None,
        }
    }

    fn mouse_button_to_button(button: MouseButton) -> Option<Button> {
        match button {
            MouseButton::Left => Some(Button::MouseLeft),
            MouseButton::Middle => Some(Button::MouseMiddle),
            _ => None,
        }
    }
}

impl InputState for WinitInput {
    fn is_down(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }

    fn cursor_position(&self) -> DVec2 {
        self.cursor
    }
}
