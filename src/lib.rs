//! Tile Rush - a four-lane falling tile tap game
//!
//! Core modules:
//! - `sim`: Platform-free gameplay (tile motion, spawning, hit resolution)
//! - `session`: Menu/playing/paused/gameover state machine
//! - `recorder`: Turns a finished run into a leaderboard record
//! - `platform`: Tick sources and input mapping
//! - `persistence`: Key-value storage (LocalStorage on web)

pub mod difficulty;
pub mod feedback;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod recorder;
pub mod session;
pub mod settings;
pub mod sim;

pub use difficulty::Difficulty;
pub use highscores::{HighScoreRecord, HighScores, JsonLeaderboard, LeaderboardStore};
pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Number of lanes, indexed left to right
    pub const LANE_COUNT: u8 = 4;

    /// Tile dimensions
    pub const TILE_HEIGHT: f32 = 150.0;

    /// Band near the bottom of the playfield where tiles can be hit
    pub const HIT_ZONE_HEIGHT: f32 = 100.0;
    /// Gap between the hit zone and the bottom edge
    pub const BOTTOM_PADDING: f32 = 20.0;

    /// Base points for a hit
    pub const BASE_SCORE: u64 = 10;
    /// Base points for a perfect hit
    pub const PERFECT_SCORE: u64 = 15;
    /// Fraction of the hit zone height a tile center may be off for a perfect hit
    pub const PERFECT_TOLERANCE: f32 = 0.15;

    /// How long hit/miss feedback stays visible
    pub const FEEDBACK_DURATION_MS: f64 = 500.0;

    /// Label stamped on leaderboard records
    pub const DEFAULT_MODE_LABEL: &str = "Random Mode";
}
