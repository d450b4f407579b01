//! Input management system
//!
//! Tracks held keys and buttons together with a snapshot of the previous
//! frame, so callers can distinguish "held" from "pressed this frame".
//! `update` commits the snapshot and must run once at the end of every frame.

use crate::foundation::math::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Input manager
#[derive(Debug, Default)]
pub struct InputManager {
    keys: HashSet<KeyCode>,
    prev_keys: HashSet<KeyCode>,
    buttons: HashSet<MouseButton>,
    prev_buttons: HashSet<MouseButton>,
    mouse_position: (f64, f64),
    prev_mouse_position: (f64, f64),
    mouse_delta: (f64, f64),
}

impl InputManager {
    /// Create a new input manager
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Commit this frame's state as the previous-frame snapshot
    pub fn update(&mut self) {
        self.mouse_delta = (
            self.mouse_position.0 - self.prev_mouse_position.0,
            self.mouse_position.1 - self.prev_mouse_position.1,
        );
        self.prev_mouse_position = self.mouse_position;
        self.prev_keys.clone_from(&self.keys);
        self.prev_buttons.clone_from(&self.buttons);
    }
    
    /// Handle key input
    pub fn handle_key_input(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys.insert(key);
        } else {
            self.keys.remove(&key);
        }
    }
    
    /// Handle mouse button input
    pub fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.buttons.insert(button);
        } else {
            self.buttons.remove(&button);
        }
    }
    
    /// Handle mouse movement
    pub fn handle_mouse_move(&mut self, x: f64, y: f64) {
        self.mouse_position = (x, y);
    }

    /// Key currently held
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    /// Key currently released
    pub fn is_key_up(&self, key: KeyCode) -> bool {
        !self.is_key_down(key)
    }

    /// Key went from released to held since the last `update`
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.is_key_down(key) && !self.prev_keys.contains(&key)
    }

    /// Mouse button currently held
    pub fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Mouse button currently released
    pub fn is_mouse_button_up(&self, button: MouseButton) -> bool {
        !self.is_mouse_button_down(button)
    }

    /// Mouse button went from released to held since the last `update`
    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.is_mouse_button_down(button) && !self.prev_buttons.contains(&button)
    }

    /// Cursor position in window coordinates
    pub fn mouse_position(&self) -> (f64, f64) {
        self.mouse_position
    }

    /// Cursor movement over the last committed frame
    pub fn mouse_delta(&self) -> (f64, f64) {
        self.mouse_delta
    }

    /// Unit-ish planar direction from the arrow keys (X right, Z toward the viewer)
    pub fn arrow_axis(&self) -> Vec3 {
        let x = match (self.is_key_down(KeyCode::Left), self.is_key_down(KeyCode::Right)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        let z = match (self.is_key_down(KeyCode::Up), self.is_key_down(KeyCode::Down)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        Vec3::new(x, 0.0, z)
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Backquote / grave key (debug console on most layouts)
    Backquote,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressed_is_edge_only() {
        let mut input = InputManager::new();
        input.handle_key_input(KeyCode::P, true);
        assert!(input.is_key_pressed(KeyCode::P));
        assert!(input.is_key_down(KeyCode::P));

        input.update();
        assert!(!input.is_key_pressed(KeyCode::P));
        assert!(input.is_key_down(KeyCode::P));

        input.handle_key_input(KeyCode::P, false);
        input.update();
        input.handle_key_input(KeyCode::P, true);
        assert!(input.is_key_pressed(KeyCode::P));
    }

    #[test]
    fn test_mouse_delta_over_frame() {
        let mut input = InputManager::new();
        input.handle_mouse_move(10.0, 5.0);
        input.update();
        assert_eq!(input.mouse_delta(), (10.0, 5.0));
        input.update();
        assert_eq!(input.mouse_delta(), (0.0, 0.0));
    }

    #[test]
    fn test_mouse_button_edge() {
        let mut input = InputManager::new();
        input.handle_mouse_button(MouseButton::Left, true);
        assert!(input.is_mouse_button_pressed(MouseButton::Left));
        input.update();
        assert!(!input.is_mouse_button_pressed(MouseButton::Left));
        assert!(input.is_mouse_button_down(MouseButton::Left));
        assert!(input.is_mouse_button_up(MouseButton::Right));
    }

    #[test]
    fn test_arrow_axis() {
        let mut input = InputManager::new();
        input.handle_key_input(KeyCode::Up, true);
        input.handle_key_input(KeyCode::Right, true);
        assert_eq!(input.arrow_axis(), Vec3::new(1.0, 0.0, -1.0));
        input.handle_key_input(KeyCode::Left, true);
        assert_eq!(input.arrow_axis().x, 0.0);
    }
}
