//! Difficulty presets
//!
//! Selected from the menu and fixed for the whole run once playing starts.

use serde::{Deserialize, Serialize};

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Pixels each tile falls per tick
    pub fn speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 4.0,
            Difficulty::Medium => 7.0,
            Difficulty::Hard => 10.0,
        }
    }

    /// Minimum time between two spawns
    pub fn spawn_interval_ms(&self) -> f64 {
        match self {
            Difficulty::Easy => 900.0,
            Difficulty::Medium => 550.0,
            Difficulty::Hard => 350.0,
        }
    }

    /// Whether a spawn that repeats the previous lane gets shifted to the next lane
    pub fn anti_repeat(&self) -> bool {
        match self {
            Difficulty::Easy | Difficulty::Medium => true,
            Difficulty::Hard => false,
        }
    }
}
