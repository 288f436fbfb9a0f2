//! Run recording
//!
//! Called once when a run ends. Only runs that scored get a leaderboard entry.

use rand::Rng;
use uuid::{Builder, Uuid};

use crate::difficulty::Difficulty;
use crate::highscores::{HighScoreRecord, LeaderboardStore};

/// Builds leaderboard records for finished runs
#[derive(Debug, Clone)]
pub struct RunRecorder {
    label: String,
}

impl RunRecorder {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Append a record for a finished run if it scored anything.
    ///
    /// Store failures are logged and dropped; the game never waits on or retries the
    /// append. Returns the record when one was built.
    pub fn record<L: LeaderboardStore, R: Rng>(
        &self,
        leaderboard: &mut L,
        rng: &mut R,
        score: u64,
        difficulty: Difficulty,
        timestamp: f64,
    ) -> Option<HighScoreRecord> {
        if score == 0 {
            log::info!("Run ended without scoring, nothing recorded");
            return None;
        }

        let record = HighScoreRecord {
            id: random_id(rng),
            label: self.label.clone(),
            score,
            difficulty,
            timestamp,
        };

        if let Err(e) = leaderboard.append(record.clone()) {
            log::warn!("Failed to save score {}: {}", score, e);
        }
        Some(record)
    }
}

/// Version 4 UUID from the supplied RNG
fn random_id<R: Rng>(rng: &mut R) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);
    Builder::from_random_bytes(bytes).into_uuid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::{HighScores, JsonLeaderboard};
    use crate::persistence::{MemoryStore, StoreError};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Leaderboard whose writes always fail
    struct BrokenBoard;

    impl LeaderboardStore for BrokenBoard {
        fn append(&mut self, _record: HighScoreRecord) -> Result<(), StoreError> {
            Err(StoreError::Unavailable)
        }

        fn snapshot(&self) -> HighScores {
            HighScores::new()
        }

        fn clear(&mut self) -> Result<(), StoreError> {
            Err(StoreError::Unavailable)
        }
    }

    #[test]
    fn test_records_scoring_run() {
        let recorder = RunRecorder::new("Random Mode");
        let mut board = JsonLeaderboard::new(MemoryStore::new());
        let mut rng = Pcg32::seed_from_u64(1);

        let record = recorder
            .record(&mut board, &mut rng, 125, Difficulty::Medium, 42.0)
            .unwrap();
        assert_eq!(record.score, 125);
        assert_eq!(record.difficulty, Difficulty::Medium);
        assert_eq!(record.label, "Random Mode");
        assert_eq!(record.id.get_version_num(), 4);
        assert_eq!(board.snapshot().entries, vec![record]);
    }

    #[test]
    fn test_zero_score_not_recorded() {
        let recorder = RunRecorder::new("Random Mode");
        let mut board = JsonLeaderboard::new(MemoryStore::new());
        let mut rng = Pcg32::seed_from_u64(1);

        assert!(recorder.record(&mut board, &mut rng, 0, Difficulty::Easy, 0.0).is_none());
        assert!(board.snapshot().is_empty());
    }

    #[test]
    fn test_failed_append_is_swallowed() {
        let recorder = RunRecorder::new("Random Mode");
        let mut rng = Pcg32::seed_from_u64(1);
        let record = recorder.record(&mut BrokenBoard, &mut rng, 10, Difficulty::Hard, 0.0);
        assert!(record.is_some());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut rng = Pcg32::seed_from_u64(9);
        assert_ne!(random_id(&mut rng), random_id(&mut rng));
    }
}
