//! High score leaderboard
//!
//! Persisted as a single JSON array. The list is append-only from the game's side and
//! may be cleared from outside at any time, so every write starts from a fresh read.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::difficulty::Difficulty;
use crate::persistence::{KeyValueStore, StoreError};

/// Number of entries shown on the leaderboard
pub const LEADERBOARD_SIZE: usize = 10;

/// A single finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub id: Uuid,
    /// Song or mode name
    #[serde(alias = "songName")]
    pub label: String,
    pub score: u64,
    pub difficulty: Difficulty,
    /// Unix timestamp (ms) when the run ended
    #[serde(alias = "date", deserialize_with = "timestamp_ms")]
    pub timestamp: f64,
}

/// Accepts milliseconds or an RFC 3339 string (`2024-05-01T12:00:00.000Z`)
fn timestamp_ms<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stamp {
        Millis(f64),
        Iso(String),
    }

    match Stamp::deserialize(deserializer)? {
        Stamp::Millis(ms) => Ok(ms),
        Stamp::Iso(text) => chrono::DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.timestamp_millis() as f64)
            .map_err(serde::de::Error::custom),
    }
}

/// Snapshot of all recorded runs, in append order
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreRecord>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.score).max()
    }

    /// Best `limit` records, highest score first. Ties keep append order.
    pub fn ranked(&self, limit: usize) -> Vec<&HighScoreRecord> {
        let mut sorted: Vec<&HighScoreRecord> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.score.cmp(&a.score));
        sorted.truncate(limit);
        sorted
    }
}

/// Where finished runs go
pub trait LeaderboardStore {
    /// Append one record to the persisted list
    fn append(&mut self, record: HighScoreRecord) -> Result<(), StoreError>;
    /// Current contents of the list
    fn snapshot(&self) -> HighScores;
    /// Remove every record
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Leaderboard stored as JSON under a single key
#[derive(Debug, Clone)]
pub struct JsonLeaderboard<S> {
    store: S,
}

impl<S: KeyValueStore> JsonLeaderboard<S> {
    pub const STORAGE_KEY: &'static str = "highscores";

    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Fresh read of the stored list. A missing key is an empty list.
    fn load(&self) -> Result<HighScores, StoreError> {
        match self.store.get(Self::STORAGE_KEY)? {
            Some(json) => serde_json::from_str::<HighScores>(&json)
                .map_err(|e| StoreError::Deserialize(e.to_string())),
            None => Ok(HighScores::new()),
        }
    }
}

impl<S: KeyValueStore> LeaderboardStore for JsonLeaderboard<S> {
    fn append(&mut self, record: HighScoreRecord) -> Result<(), StoreError> {
        // Unreadable data stays untouched rather than being overwritten
        let mut scores = self.load()?;
        scores.entries.push(record);
        let json =
            serde_json::to_string(&scores).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.store.set(Self::STORAGE_KEY, &json)?;
        log::info!("High scores saved ({} entries)", scores.len());
        Ok(())
    }

    fn snapshot(&self) -> HighScores {
        self.load().unwrap_or_else(|e| {
            log::warn!("Could not read high scores: {}", e);
            HighScores::new()
        })
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.store.set(Self::STORAGE_KEY, "[]")?;
        log::info!("High scores cleared");
        Ok(())
    }
}
