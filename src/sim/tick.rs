//! Per-frame simulation tick
//!
//! Moves tiles, detects boundary misses, then spawns. Motion always runs before the
//! spawn so a fresh tile is never checked for a miss on the tick it appears.

use rand::Rng;

use super::spawn::maybe_spawn;
use super::state::{GameEvent, Playfield, RunState};
use crate::difficulty::Difficulty;

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// At least one tile crossed the bottom edge; the run is over
    pub boundary_miss: bool,
    /// A tile was spawned this tick
    pub spawned: bool,
}

/// Advance every tile by `speed` and drop the ones past the bottom edge.
///
/// Returns true if any tile left the playfield. Miss detection is skipped until the
/// playfield has been measured.
pub fn advance_tiles(
    run: &mut RunState,
    playfield: &Playfield,
    speed: f32,
    events: &mut Vec<GameEvent>,
) -> bool {
    for tile in &mut run.tiles {
        tile.y += speed;
    }

    if !playfield.is_measured() {
        return false;
    }

    let bottom = playfield.height();
    let mut missed = false;
    run.tiles.retain(|tile| {
        if tile.y > bottom {
            events.push(GameEvent::BoundaryMiss {
                id: tile.id,
                lane: tile.lane,
            });
            missed = true;
            false
        } else {
            true
        }
    });

    if missed {
        run.break_combo();
    }
    missed
}

/// Run one tick of gameplay at `now_ms`
pub fn tick<R: Rng>(
    run: &mut RunState,
    playfield: &Playfield,
    difficulty: Difficulty,
    rng: &mut R,
    now_ms: f64,
    events: &mut Vec<GameEvent>,
) -> TickOutcome {
    run.ticks += 1;

    if advance_tiles(run, playfield, difficulty.speed(), events) {
        return TickOutcome {
            boundary_miss: true,
            spawned: false,
        };
    }

    let spawned = maybe_spawn(run, rng, difficulty, now_ms);
    if let Some(tile) = spawned {
        events.push(GameEvent::TileSpawned {
            id: tile.id,
            lane: tile.lane,
        });
    }

    TickOutcome {
        boundary_miss: false,
        spawned: spawned.is_some(),
    }
}
