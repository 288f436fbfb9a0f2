//! Input mapping
//!
//! Keyboard keys and pointer positions become lane indices or menu commands.
//! Anything unmapped is ignored.

use crate::consts::LANE_COUNT;

/// Non-lane commands reachable from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pause while playing, resume while paused
    TogglePause,
    /// Start from the menu, play again after game over
    Start,
}

/// Lane for a `KeyboardEvent.key` value.
///
/// `d f j k` and the arrow cluster map to lanes 0..3, left to right.
pub fn lane_for_key(key: &str) -> Option<u8> {
    match key {
        "ArrowLeft" => Some(0),
        "ArrowDown" => Some(1),
        "ArrowUp" => Some(2),
        "ArrowRight" => Some(3),
        _ => match key.to_ascii_lowercase().as_str() {
            "d" => Some(0),
            "f" => Some(1),
            "j" => Some(2),
            "k" => Some(3),
            _ => None,
        },
    }
}

pub fn command_for_key(key: &str) -> Option<Command> {
    match key {
        "Escape" | "p" | "P" => Some(Command::TogglePause),
        "Enter" | " " => Some(Command::Start),
        _ => None,
    }
}

/// Lane under a pointer at `x` on a playfield `width` wide
pub fn lane_for_pointer(x: f32, width: f32) -> Option<u8> {
    if width <= 0.0 || !(0.0..width).contains(&x) {
        return None;
    }
    let lane = (x / width * LANE_COUNT as f32).floor() as u8;
    Some(lane.min(LANE_COUNT - 1))
}
