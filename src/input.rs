//! Directional input collaborator
//!
//! Turns keyboard/touch presses into a single held direction. Reversal into
//! the neck is rejected here, against the last direction the simulation
//! actually processed rather than the last key pressed.

use crate::sim::Direction;

/// What the simulation reads from the player each tick
pub trait InputSource {
    /// Currently intended direction, `None` until the player first presses one
    fn current_direction(&self) -> Option<Direction>;
    /// Mark the current direction as consumed by a tick
    fn acknowledge(&mut self);
}

/// Keyboard / virtual pad state
#[derive(Debug, Clone, Default)]
pub struct DirectionalInput {
    current: Option<Direction>,
    last_processed: Option<Direction>,
}

impl DirectionalInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a direction; ignored if it would reverse into the body
    pub fn press(&mut self, dir: Direction) {
        if self.last_processed == Some(dir.opposite()) {
            return;
        }
        self.current = Some(dir);
    }

    /// Map a keyboard key name (DOM `KeyboardEvent.key`) to a press.
    /// Returns true if the key was a movement key.
    pub fn press_key(&mut self, key: &str) -> bool {
        match key_direction(key) {
            Some(dir) => {
                self.press(dir);
                true
            }
            None => false,
        }
    }

    /// Forget all held/processed state (level start)
    pub fn reset(&mut self) {
        self.current = None;
        self.last_processed = None;
    }
}

impl InputSource for DirectionalInput {
    fn current_direction(&self) -> Option<Direction> {
        self.current
    }

    fn acknowledge(&mut self) {
        self.last_processed = self.current;
    }
}

/// WASD and arrow keys
pub fn key_direction(key: &str) -> Option<Direction> {
    match key.to_lowercase().as_str() {
        "w" | "arrowup" => Some(Direction::Up),
        "s" | "arrowdown" => Some(Direction::Down),
        "a" | "arrowleft" => Some(Direction::Left),
        "d" | "arrowright" => Some(Direction::Right),
        _ => None,
    }
}
