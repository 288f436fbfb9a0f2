//! Gameplay simulation module
//!
//! All run logic lives here and stays free of platform dependencies:
//! - Time comes in as plain millisecond timestamps
//! - Randomness comes from a caller-supplied RNG
//! - Tiles are kept in spawn order

pub mod autoplay;
pub mod hit;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autoplay::choose_taps;
pub use hit::resolve_hit;
pub use spawn::{choose_lane, maybe_spawn};
pub use state::{GameEvent, GamePhase, HitZone, Playfield, RunState, Tile};
pub use tick::{TickOutcome, advance_tiles, tick};
