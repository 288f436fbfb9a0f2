//! Hit resolution for lane activations

use super::state::{GameEvent, Playfield, RunState};
use crate::consts::*;

/// Resolve a tap on `lane`.
///
/// The first tile (in spawn order) in that lane overlapping the hit zone is removed and
/// scored. Without one the combo breaks; tiles and score are untouched either way
/// except for the hit tile.
pub fn resolve_hit(run: &mut RunState, playfield: &Playfield, lane: u8) -> GameEvent {
    let Some(zone) = playfield.hit_zone() else {
        run.break_combo();
        return GameEvent::Miss { lane };
    };

    let candidate = run
        .tiles
        .iter()
        .position(|tile| tile.lane == lane && zone.overlaps(tile));

    match candidate {
        Some(index) => {
            let tile = run.tiles.remove(index);
            let perfect = zone.is_perfect(&tile);
            let base = if perfect { PERFECT_SCORE } else { BASE_SCORE };
            let score_gain = run.register_hit(base);
            GameEvent::Hit {
                lane,
                score_gain,
                perfect,
            }
        }
        None => {
            run.break_combo();
            GameEvent::Miss { lane }
        }
    }
}
