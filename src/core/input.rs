use glam::DVec2;
use std::collections::HashSet;

/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    KeyQ,
    KeyE,
    ArrowUp,
    ArrowDown,
    Shift,
    Control,
    Escape,
    MouseLeft,
    MouseMiddle,
}

/// Already-polled input state, sampled once per camera update.
pub trait InputState {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Cursor position in window coordinates (pixels, y down).
    fn cursor_position(&self) -> DVec2;
}

/// Plain in-memory input state.
///
/// Used wherever input does not come from a window: scripted camera moves,
/// headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    pressed: HashSet<Button>,
    cursor: DVec2,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, button: Button) -> &mut Self {
        self.pressed.insert(button);
        self
    }

    pub fn release(&mut self, button: Button) -> &mut Self {
        self.pressed.remove(&button);
        self
    }

    pub fn move_cursor_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.cursor = DVec2::new(x, y);
        self
    }
}

impl InputState for InputSnapshot {
    fn is_down(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }

    fn cursor_position(&self) -> DVec2 {
        self.cursor
    }
}
