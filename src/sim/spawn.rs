//! Tile stream generation
//!
//! Decides when a new tile appears and which lane it falls in.

use rand::Rng;

use super::state::{RunState, Tile};
use crate::consts::LANE_COUNT;
use crate::difficulty::Difficulty;

/// Pick a lane for the next tile.
///
/// Uniform over all lanes. On difficulties with anti-repeat, a roll that matches the
/// previous spawn is shifted to the next lane so two consecutive tiles never share one.
pub fn choose_lane<R: Rng>(rng: &mut R, previous: Option<u8>, difficulty: Difficulty) -> u8 {
    let lane = rng.random_range(0..LANE_COUNT);
    if difficulty.anti_repeat() && previous == Some(lane) {
        (lane + 1) % LANE_COUNT
    } else {
        lane
    }
}

/// Spawn a tile if the spawn interval has elapsed since the last spawn.
///
/// Resets the spawn timer to `now_ms` when a tile is created.
pub fn maybe_spawn<R: Rng>(
    run: &mut RunState,
    rng: &mut R,
    difficulty: Difficulty,
    now_ms: f64,
) -> Option<Tile> {
    if now_ms - run.last_spawn_ms < difficulty.spawn_interval_ms() {
        return None;
    }
    run.last_spawn_ms = now_ms;

    let lane = choose_lane(rng, run.last_spawned_lane, difficulty);
    let tile = Tile::new(run.next_tile_id(), lane);
    run.last_spawned_lane = Some(lane);
    run.tiles.push(tile);
    Some(tile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_no_spawn_before_interval() {
        let mut run = RunState::new(0.0);
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(maybe_spawn(&mut run, &mut rng, Difficulty::Easy, 899.0).is_none());
        assert!(run.tiles.is_empty());
        assert_eq!(run.last_spawn_ms, 0.0);
    }

    #[test]
    fn test_spawn_at_interval_resets_timer() {
        let mut run = RunState::new(0.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let tile = maybe_spawn(&mut run, &mut rng, Difficulty::Easy, 900.0).unwrap();
        assert_eq!(tile.id, 1);
        assert!(tile.lane < LANE_COUNT);
        assert_eq!(run.last_spawn_ms, 900.0);
        assert_eq!(run.last_spawned_lane, Some(tile.lane));

        // Timer restarted, so nothing until another full interval passes
        assert!(maybe_spawn(&mut run, &mut rng, Difficulty::Easy, 1000.0).is_none());
        let second = maybe_spawn(&mut run, &mut rng, Difficulty::Easy, 1800.0).unwrap();
        assert_eq!(second.id, 2);
        assert_eq!(run.tiles.len(), 2);
    }

    #[test]
    fn test_anti_repeat_on_easy_and_medium() {
        for difficulty in [Difficulty::Easy, Difficulty::Medium] {
            let mut rng = Pcg32::seed_from_u64(42);
            let mut previous = None;
            for _ in 0..500 {
                let lane = choose_lane(&mut rng, previous, difficulty);
                assert_ne!(Some(lane), previous);
                previous = Some(lane);
            }
        }
    }

    #[test]
    fn test_hard_allows_repeats() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut previous = None;
        let mut repeats = 0;
        for _ in 0..500 {
            let lane = choose_lane(&mut rng, previous, Difficulty::Hard);
            if Some(lane) == previous {
                repeats += 1;
            }
            previous = Some(lane);
        }
        assert!(repeats > 0);
    }

    #[test]
    fn test_anti_repeat_wraps_last_lane() {
        // Replay the same roll with and without the previous lane set
        let mut probe = Pcg32::seed_from_u64(7);
        let rolled = choose_lane(&mut probe, None, Difficulty::Easy);

        let mut rng = Pcg32::seed_from_u64(7);
        let shifted = choose_lane(&mut rng, Some(rolled), Difficulty::Easy);
        assert_eq!(shifted, (rolled + 1) % LANE_COUNT);
    }
}
