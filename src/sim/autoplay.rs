//! Idle/demo mode - picks lanes to tap
//!
//! Taps a lane once its oldest tile is centred in the hit zone, so demo runs score
//! mostly perfect hits.

use super::state::{Playfield, RunState};
use crate::consts::LANE_COUNT;

/// Lanes worth tapping right now, at most one per lane
pub fn choose_taps(run: &RunState, playfield: &Playfield) -> Vec<u8> {
    let Some(zone) = playfield.hit_zone() else {
        return Vec::new();
    };

    (0..LANE_COUNT)
        .filter(|&lane| {
            run.tiles
                .iter()
                .find(|t| t.lane == lane && zone.overlaps(t))
                .is_some_and(|t| zone.is_perfect(t))
        })
        .collect()
}
