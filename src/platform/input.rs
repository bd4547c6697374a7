//! Keyboard input to aiming/firing intent
//!
//! Events can arrive at any time between frames. Aim flags are
//! last-write-wins; fire edges are queued in arrival order so a press and
//! release that both land between two frames still make a shot.

use serde::{Deserialize, Serialize};

use crate::sim::{FireEdge, TickInput};

/// Logical controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    Fire,
    AimUp,
    AimDown,
}

impl Control {
    /// Default key binding (DOM `KeyboardEvent.code` names)
    pub fn from_key_code(code: &str) -> Option<Self> {
        match code {
            "Space" => Some(Control::Fire),
            "ArrowUp" => Some(Control::AimUp),
            "ArrowDown" => Some(Control::AimDown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEdge {
    Press,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub control: Control,
    pub edge: KeyEdge,
}

impl KeyEvent {
    pub fn press(control: Control) -> Self {
        Self {
            control,
            edge: KeyEdge::Press,
        }
    }

    pub fn release(control: Control) -> Self {
        Self {
            control,
            edge: KeyEdge::Release,
        }
    }
}

/// Collects key events between frames
#[derive(Debug, Clone, Default)]
pub struct InputController {
    aim_up: bool,
    aim_down: bool,
    fire_held: bool,
    fire_edges: Vec<FireEdge>,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: KeyEvent) {
        let pressed = event.edge == KeyEdge::Press;
        match event.control {
            Control::AimUp => self.aim_up = pressed,
            Control::AimDown => self.aim_down = pressed,
            Control::Fire => {
                // Key repeat sends extra presses; only real edges count
                if pressed != self.fire_held {
                    self.fire_held = pressed;
                    self.fire_edges.push(if pressed {
                        FireEdge::Press
                    } else {
                        FireEdge::Release
                    });
                }
            }
        }
    }

    pub fn press(&mut self, control: Control) {
        self.handle(KeyEvent::press(control));
    }

    pub fn release(&mut self, control: Control) {
        self.handle(KeyEvent::release(control));
    }

    /// Handle a raw key code; returns false for unbound keys
    pub fn handle_key_code(&mut self, code: &str, edge: KeyEdge) -> bool {
        match Control::from_key_code(code) {
            Some(control) => {
                self.handle(KeyEvent { control, edge });
                true
            }
            None => false,
        }
    }

    pub fn is_held(&self, control: Control) -> bool {
        match control {
            Control::Fire => self.fire_held,
            Control::AimUp => self.aim_up,
            Control::AimDown => self.aim_down,
        }
    }

    /// Input for the next frame. Held flags persist, queued edges are drained.
    pub fn take_frame(&mut self) -> TickInput {
        TickInput {
            aim_up: self.aim_up,
            aim_down: self.aim_down,
            fire_edges: std::mem::take(&mut self.fire_edges),
        }
    }

    /// Forget everything (new session)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aim_flags_last_write_wins() {
        let mut input = InputController::new();
        input.press(Control::AimUp);
        input.release(Control::AimUp);
        input.press(Control::AimUp);
        let frame = input.take_frame();
        assert!(frame.aim_up);
        assert!(!frame.aim_down);

        // Held flags persist into the next frame
        assert!(input.take_frame().aim_up);
    }

    #[test]
    fn test_fire_edges_queue_in_order() {
        let mut input = InputController::new();
        input.press(Control::Fire);
        input.release(Control::Fire);
        input.press(Control::Fire);
        let frame = input.take_frame();
        assert_eq!(
            frame.fire_edges,
            vec![FireEdge::Press, FireEdge::Release, FireEdge::Press]
        );
        assert!(input.take_frame().fire_edges.is_empty());
        assert!(input.is_held(Control::Fire));
    }

    #[test]
    fn test_key_repeat_ignored() {
        let mut input = InputController::new();
        input.press(Control::Fire);
        input.press(Control::Fire);
        input.press(Control::Fire);
        assert_eq!(input.take_frame().fire_edges, vec![FireEdge::Press]);
    }

    #[test]
    fn test_release_without_press_ignored() {
        let mut input = InputController::new();
        input.release(Control::Fire);
        assert!(input.take_frame().fire_edges.is_empty());
    }

    #[test]
    fn test_key_codes() {
        let mut input = InputController::new();
        assert!(input.handle_key_code("ArrowDown", KeyEdge::Press));
        assert!(!input.handle_key_code("KeyQ", KeyEdge::Press));
        assert!(input.is_held(Control::AimDown));
    }

    #[test]
    fn test_reset() {
        let mut input = InputController::new();
        input.press(Control::Fire);
        input.press(Control::AimUp);
        input.reset();
        let frame = input.take_frame();
        assert!(!frame.aim_up);
        assert!(frame.fire_edges.is_empty());
    }
}
