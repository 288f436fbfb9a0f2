//! Run state and core simulation types
//!
//! Everything a single run mutates lives in [`RunState`]. Geometry comes from the
//! host through [`Playfield`].

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GamePhase {
    /// Difficulty selection, nothing running
    #[default]
    Menu,
    /// Clock running, lanes accept input
    Playing,
    /// Clock stopped, tiles frozen in place
    Paused,
    /// Run ended, score already recorded
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "gameover",
        }
    }
}

/// A falling tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: u32,
    pub lane: u8,
    /// Top edge, measured downward from the top of the playfield
    pub y: f32,
    pub height: f32,
}

impl Tile {
    /// New tile sitting fully above the playfield
    pub fn new(id: u32, lane: u8) -> Self {
        Self {
            id,
            lane,
            y: -TILE_HEIGHT,
            height: TILE_HEIGHT,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// Notifications for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    TileSpawned { id: u32, lane: u8 },
    /// Successful lane activation
    Hit { lane: u8, score_gain: u64, perfect: bool },
    /// Lane activation that found no tile in the hit zone
    Miss { lane: u8 },
    /// A tile left the playfield unhit
    BoundaryMiss { id: u32, lane: u8 },
    PhaseChanged { from: GamePhase, to: GamePhase },
    /// A leaderboard record was appended for the finished run
    RunRecorded { score: u64 },
}

/// Vertical band where tiles can be hit, `[top, bottom)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitZone {
    pub top: f32,
    pub bottom: f32,
}

impl HitZone {
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    /// Strict overlap of the tile span with the zone
    pub fn overlaps(&self, tile: &Tile) -> bool {
        tile.bottom() > self.top && tile.y < self.bottom
    }

    /// Tile center within the perfect tolerance of the zone center
    pub fn is_perfect(&self, tile: &Tile) -> bool {
        (tile.center() - self.center()).abs() <= self.height() * PERFECT_TOLERANCE
    }
}

/// Playfield geometry as measured by the host
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Playfield {
    height: Option<f32>,
}

impl Playfield {
    pub fn new(height: f32) -> Self {
        let mut field = Self::default();
        field.set_height(height);
        field
    }

    /// Record a measurement. Non-positive heights count as not yet measured.
    pub fn set_height(&mut self, height: f32) {
        self.height = (height.is_finite() && height > 0.0).then_some(height);
    }

    pub fn is_measured(&self) -> bool {
        self.height.is_some()
    }

    /// Measured height, zero while unmeasured
    pub fn height(&self) -> f32 {
        self.height.unwrap_or(0.0)
    }

    /// The hit zone, if the playfield has been measured
    pub fn hit_zone(&self) -> Option<HitZone> {
        let height = self.height?;
        let bottom = height - BOTTOM_PADDING;
        Some(HitZone {
            top: bottom - HIT_ZONE_HEIGHT,
            bottom,
        })
    }
}

/// Mutable state of one run: the score/combo ledger plus the active tiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub score: u64,
    pub combo: u32,
    /// Active tiles in spawn order
    pub tiles: Vec<Tile>,
    /// Timestamp (ms) of the last spawn, or of the last (re)arm of the clock
    pub last_spawn_ms: f64,
    /// Lane of the most recently spawned tile, hit or not
    pub last_spawned_lane: Option<u8>,
    /// Ticks processed this run
    pub ticks: u64,
    next_tile_id: u32,
}

impl Default for RunState {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl RunState {
    pub fn new(now_ms: f64) -> Self {
        Self {
            score: 0,
            combo: 0,
            tiles: Vec::new(),
            last_spawn_ms: now_ms,
            last_spawned_lane: None,
            ticks: 0,
            next_tile_id: 1,
        }
    }

    /// Clear everything back to a fresh run starting at `now_ms`
    pub fn reset(&mut self, now_ms: f64) {
        *self = Self::new(now_ms);
    }

    /// Allocate a new tile ID
    pub fn next_tile_id(&mut self) -> u32 {
        let id = self.next_tile_id;
        self.next_tile_id += 1;
        id
    }

    /// Successful hit: extend the streak and bank the points.
    /// Returns the score gained.
    pub fn register_hit(&mut self, base_score: u64) -> u64 {
        self.combo += 1;
        let gain = base_score + u64::from(self.combo);
        self.score += gain;
        gain
    }

    /// Any kind of miss breaks the streak
    pub fn break_combo(&mut self) {
        self.combo = 0;
    }
}
