//! Game session state machine
//!
//! Owns the run, the tick source and the leaderboard, and gates which parts of the
//! simulation run in each phase:
//!
//! ```text
//! Menu --start--> Playing --pause--> Paused --resume--> Playing
//! Playing --boundary miss--> GameOver
//! Paused/GameOver --restart--> Playing
//! Paused/GameOver --exit--> Menu
//! ```
//!
//! Inputs that arrive in a phase that doesn't expect them are ignored.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::LANE_COUNT;
use crate::difficulty::Difficulty;
use crate::highscores::{HighScoreRecord, LeaderboardStore};
use crate::platform::TickSource;
use crate::recorder::RunRecorder;
use crate::settings::Settings;
use crate::sim::{self, GameEvent, GamePhase, Playfield, RunState, Tile};

pub struct Session<C: TickSource, L: LeaderboardStore> {
    phase: GamePhase,
    /// Menu selection; locked while a run is in progress
    difficulty: Difficulty,
    run: RunState,
    playfield: Playfield,
    clock: C,
    leaderboard: L,
    recorder: RunRecorder,
    rng: Pcg32,
    /// Pending notifications for the presentation layer
    events: Vec<GameEvent>,
    last_record: Option<HighScoreRecord>,
}

impl<C: TickSource, L: LeaderboardStore> Session<C, L> {
    /// New session sitting in the menu
    pub fn new(clock: C, leaderboard: L, settings: &Settings, seed: u64) -> Self {
        let now = clock.now_ms();
        Self {
            phase: GamePhase::Menu,
            difficulty: settings.difficulty,
            run: RunState::new(now),
            playfield: Playfield::default(),
            clock,
            leaderboard,
            recorder: RunRecorder::new(settings.mode_label.clone()),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            last_record: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn score(&self) -> u64 {
        self.run.score
    }

    pub fn combo(&self) -> u32 {
        self.run.combo
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.run.tiles
    }

    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn leaderboard(&self) -> &L {
        &self.leaderboard
    }

    pub fn leaderboard_mut(&mut self) -> &mut L {
        &mut self.leaderboard
    }

    /// Record appended at the end of the last run, if it scored
    pub fn last_record(&self) -> Option<&HighScoreRecord> {
        self.last_record.as_ref()
    }

    pub fn set_mode_label(&mut self, label: impl Into<String>) {
        self.recorder.set_label(label);
    }

    /// Update the playfield height after the host measures its layout
    pub fn set_playfield_height(&mut self, height: f32) {
        self.playfield.set_height(height);
    }

    /// Take all pending presentation events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Change difficulty. Only allowed from the menu.
    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.phase != GamePhase::Menu {
            log::debug!("Difficulty change ignored in {}", self.phase.as_str());
            return false;
        }
        self.difficulty = difficulty;
        log::info!("Difficulty set to {}", difficulty.as_str());
        true
    }

    /// Menu -> Playing
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Menu {
            log::debug!("Start ignored in {}", self.phase.as_str());
            return false;
        }
        self.begin_run();
        true
    }

    /// Playing -> Paused. Tiles stay where they are.
    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            log::debug!("Pause ignored in {}", self.phase.as_str());
            return false;
        }
        self.clock.cancel();
        self.set_phase(GamePhase::Paused);
        true
    }

    /// Paused -> Playing
    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            log::debug!("Resume ignored in {}", self.phase.as_str());
            return false;
        }
        // Time spent paused must not count toward the next spawn
        self.run.last_spawn_ms = self.clock.now_ms();
        self.set_phase(GamePhase::Playing);
        self.clock.arm();
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => false,
        }
    }

    /// Paused/GameOver -> Playing with a fresh run
    pub fn restart(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::Paused | GamePhase::GameOver) {
            log::debug!("Restart ignored in {}", self.phase.as_str());
            return false;
        }
        self.begin_run();
        true
    }

    /// Paused/GameOver -> Menu. The difficulty selection is kept.
    pub fn exit_to_menu(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::Paused | GamePhase::GameOver) {
            log::debug!("Exit ignored in {}", self.phase.as_str());
            return false;
        }
        self.clock.cancel();
        self.run.reset(self.clock.now_ms());
        self.set_phase(GamePhase::Menu);
        true
    }

    /// Lane activation from a tap or key press
    pub fn tap(&mut self, lane: u8) -> Option<GameEvent> {
        if self.phase != GamePhase::Playing {
            log::debug!("Tap on lane {} ignored in {}", lane, self.phase.as_str());
            return None;
        }
        if lane >= LANE_COUNT {
            return None;
        }

        let event = sim::resolve_hit(&mut self.run, &self.playfield, lane);
        self.events.push(event.clone());
        Some(event)
    }

    /// Run one tick. Called by the host whenever the tick source fires.
    ///
    /// Returns false for a stale tick that arrived outside `Playing`.
    pub fn on_frame(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            log::debug!("Stale tick ignored in {}", self.phase.as_str());
            return false;
        }

        let now = self.clock.now_ms();
        let outcome = sim::tick(
            &mut self.run,
            &self.playfield,
            self.difficulty,
            &mut self.rng,
            now,
            &mut self.events,
        );

        if outcome.boundary_miss {
            self.game_over();
        } else {
            self.clock.arm();
        }
        true
    }

    /// Stop ticking for good (host teardown)
    pub fn shutdown(&mut self) {
        self.clock.cancel();
    }

    fn begin_run(&mut self) {
        self.clock.cancel();
        self.run.reset(self.clock.now_ms());
        self.last_record = None;
        self.set_phase(GamePhase::Playing);
        self.clock.arm();
    }

    fn game_over(&mut self) {
        self.clock.cancel();
        self.set_phase(GamePhase::GameOver);
        log::info!(
            "Game over: score {} on {} after {} ticks",
            self.run.score,
            self.difficulty.as_str(),
            self.run.ticks
        );

        let timestamp = self.clock.timestamp_ms();
        self.last_record = self.recorder.record(
            &mut self.leaderboard,
            &mut self.rng,
            self.run.score,
            self.difficulty,
            timestamp,
        );
        if let Some(record) = &self.last_record {
            self.events.push(GameEvent::RunRecorded {
                score: record.score,
            });
        }
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        self.phase = to;
        log::info!("Phase {} -> {}", from.as_str(), to.as_str());
        self.events.push(GameEvent::PhaseChanged { from, to });
    }
}

impl<C: TickSource, L: LeaderboardStore> Drop for Session<C, L> {
    fn drop(&mut self) {
        self.clock.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::JsonLeaderboard;
    use crate::persistence::MemoryStore;
    use crate::platform::ManualClock;

    type TestSession = Session<ManualClock, JsonLeaderboard<MemoryStore>>;

    fn session(difficulty: Difficulty) -> TestSession {
        let settings = Settings {
            difficulty,
            ..Default::default()
        };
        let mut s = Session::new(
            ManualClock::new(),
            JsonLeaderboard::new(MemoryStore::new()),
            &settings,
            12345,
        );
        s.set_playfield_height(600.0);
        s
    }

    /// Advance the clock and deliver the tick if one is armed
    fn frame(s: &mut TestSession, dt: f64) -> bool {
        s.clock_mut().advance(dt);
        if s.clock_mut().take_tick() {
            s.on_frame()
        } else {
            false
        }
    }

    #[test]
    fn test_start_arms_clock() {
        let mut s = session(Difficulty::Easy);
        assert_eq!(s.phase(), GamePhase::Menu);
        assert!(!s.clock().is_armed());

        assert!(s.start());
        assert_eq!(s.phase(), GamePhase::Playing);
        assert!(s.clock().is_armed());
        assert!(!s.start());
    }

    #[test]
    fn test_each_tick_rearms() {
        let mut s = session(Difficulty::Easy);
        s.start();
        for _ in 0..5 {
            assert!(frame(&mut s, 16.0));
            assert!(s.clock().is_armed());
        }
        assert_eq!(s.run().ticks, 5);
    }

    #[test]
    fn test_pause_freezes_tiles() {
        let mut s = session(Difficulty::Easy);
        s.start();
        frame(&mut s, 900.0);
        frame(&mut s, 16.0);
        let before = s.run().clone();

        assert!(s.pause());
        assert!(!s.clock().is_armed());
        assert!(!frame(&mut s, 5000.0));
        // A tick that slipped through after the pause is a no-op
        assert!(!s.on_frame());
        assert_eq!(s.run(), &before);
        assert!(s.tap(0).is_none());
    }

    #[test]
    fn test_resume_resets_spawn_baseline() {
        let mut s = session(Difficulty::Easy);
        s.start();
        frame(&mut s, 100.0);
        s.pause();
        s.clock_mut().advance(10_000.0);

        assert!(s.resume());
        assert_eq!(s.run().last_spawn_ms, s.clock().now_ms());
        frame(&mut s, 16.0);
        assert!(s.tiles().is_empty());
    }

    #[test]
    fn test_difficulty_locked_outside_menu() {
        let mut s = session(Difficulty::Easy);
        assert!(s.select_difficulty(Difficulty::Hard));
        s.start();
        assert!(!s.select_difficulty(Difficulty::Medium));
        assert_eq!(s.difficulty(), Difficulty::Hard);

        s.pause();
        assert!(s.exit_to_menu());
        assert_eq!(s.difficulty(), Difficulty::Hard);
    }

    #[test]
    fn test_invalid_transitions_are_noops() {
        let mut s = session(Difficulty::Medium);
        assert!(!s.pause());
        assert!(!s.resume());
        assert!(!s.restart());
        assert!(!s.exit_to_menu());
        assert!(!s.on_frame());
        assert!(s.tap(1).is_none());
        assert_eq!(s.phase(), GamePhase::Menu);
    }

    #[test]
    fn test_out_of_range_lane_ignored() {
        let mut s = session(Difficulty::Medium);
        s.start();
        s.run.combo = 3;
        assert!(s.tap(LANE_COUNT).is_none());
        assert_eq!(s.combo(), 3);
    }

    #[test]
    fn test_game_over_records_score() {
        let mut s = session(Difficulty::Medium);
        s.start();
        s.run.score = 125;
        let mut tile = Tile::new(s.run.next_tile_id(), 0);
        tile.y = 595.0;
        s.run.tiles.push(tile);

        frame(&mut s, 16.0);
        assert_eq!(s.phase(), GamePhase::GameOver);
        assert!(!s.clock().is_armed());

        let board = s.leaderboard().snapshot();
        assert_eq!(board.len(), 1);
        assert_eq!(board.entries[0].score, 125);
        assert_eq!(board.entries[0].difficulty, Difficulty::Medium);
        assert_eq!(board.entries[0].label, "Random Mode");
        assert_eq!(s.last_record().map(|r| r.score), Some(125));
        assert!(s.drain_events().contains(&GameEvent::RunRecorded { score: 125 }));
    }

    #[test]
    fn test_zero_score_game_over_records_nothing() {
        let mut s = session(Difficulty::Medium);
        s.start();
        let mut tile = Tile::new(s.run.next_tile_id(), 0);
        tile.y = 595.0;
        s.run.tiles.push(tile);

        frame(&mut s, 16.0);
        assert_eq!(s.phase(), GamePhase::GameOver);
        assert!(s.leaderboard().snapshot().is_empty());
        assert!(s.last_record().is_none());
    }

    #[test]
    fn test_simultaneous_misses_end_run_once() {
        let mut s = session(Difficulty::Medium);
        s.start();
        s.run.score = 30;
        for lane in [0, 3] {
            let mut tile = Tile::new(s.run.next_tile_id(), lane);
            tile.y = 595.0;
            s.run.tiles.push(tile);
        }
        s.drain_events();

        frame(&mut s, 16.0);
        assert_eq!(s.phase(), GamePhase::GameOver);
        assert!(s.tiles().is_empty());

        let events = s.drain_events();
        let misses = events
            .iter()
            .filter(|e| matches!(e, GameEvent::BoundaryMiss { .. }))
            .count();
        let game_overs = events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    GameEvent::PhaseChanged {
                        to: GamePhase::GameOver,
                        ..
                    }
                )
            })
            .count();
        let recorded = events
            .iter()
            .filter(|e| matches!(e, GameEvent::RunRecorded { .. }))
            .count();
        assert_eq!(misses, 2);
        assert_eq!(game_overs, 1);
        assert_eq!(recorded, 1);
        assert_eq!(s.leaderboard().snapshot().len(), 1);
        assert!(!s.clock().is_armed());
    }

    #[test]
    fn test_restart_from_game_over_resets_run() {
        let mut s = session(Difficulty::Medium);
        s.start();
        s.run.score = 40;
        s.run.combo = 2;
        let mut tile = Tile::new(s.run.next_tile_id(), 1);
        tile.y = 599.0;
        s.run.tiles.push(tile);
        let id = s.run.next_tile_id();
        s.run.tiles.push(Tile::new(id, 2));
        frame(&mut s, 16.0);
        assert_eq!(s.phase(), GamePhase::GameOver);

        assert!(s.restart());
        assert_eq!(s.phase(), GamePhase::Playing);
        assert_eq!(s.score(), 0);
        assert_eq!(s.combo(), 0);
        assert!(s.tiles().is_empty());
        assert!(s.clock().is_armed());
    }

    #[test]
    fn test_restart_from_pause() {
        let mut s = session(Difficulty::Hard);
        s.start();
        frame(&mut s, 400.0);
        s.pause();
        assert!(s.restart());
        assert_eq!(s.phase(), GamePhase::Playing);
        assert!(s.tiles().is_empty());
    }

    #[test]
    fn test_phase_events() {
        let mut s = session(Difficulty::Easy);
        s.start();
        s.pause();
        let events = s.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::PhaseChanged {
                    from: GamePhase::Menu,
                    to: GamePhase::Playing
                },
                GameEvent::PhaseChanged {
                    from: GamePhase::Playing,
                    to: GamePhase::Paused
                },
            ]
        );
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_shutdown_cancels_clock() {
        let mut s = session(Difficulty::Easy);
        s.start();
        s.shutdown();
        assert!(!s.clock().is_armed());
    }
}
