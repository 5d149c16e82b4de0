use serde::{Deserialize, Serialize};

use crate::*;

/// Decoded player intent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Input {
    Turn(Direction),
    DebugToggle,
}

impl Input {
    /// Maps a keyboard `code` (or `key`) value onto the fixed key set: arrows and WASD steer, backquote toggles
    /// debug.
    pub fn from_key(key: &str) -> Option<Self> {
        use Direction::*;
        Some(match key {
            "ArrowUp" | "KeyW" | "w" | "W" => Self::Turn(Up),
            "ArrowRight" | "KeyD" | "d" | "D" => Self::Turn(Right),
            "ArrowDown" | "KeyS" | "s" | "S" => Self::Turn(Down),
            "ArrowLeft" | "KeyA" | "a" | "A" => Self::Turn(Left),
            "Backquote" | "`" => Self::DebugToggle,
            _ => return None,
        })
    }
}

/// Flips the debug overlay after a number of presses; there is no time window.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugToggle {
    required: u8,
    presses: u8,
    enabled: bool,
}

impl DebugToggle {
    pub fn new(required: u8) -> Self {
        Self {
            required: required.max(1),
            presses: 0,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns whether this press flipped the flag.
    pub fn press(&mut self) -> bool {
        self.presses += 1;
        if self.presses < self.required {
            return false;
        }
        self.presses = 0;
        self.enabled = !self.enabled;
        true
    }
}
