//! Player preferences
//!
//! Persisted separately from the leaderboard. The menu's difficulty choice lives here
//! so it survives between runs and page loads.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MODE_LABEL, FEEDBACK_DURATION_MS};
use crate::difficulty::Difficulty;
use crate::persistence::{KeyValueStore, StoreError};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Last difficulty picked in the menu
    pub difficulty: Difficulty,
    /// Label stamped on leaderboard records
    pub mode_label: String,
    /// How long hit/miss feedback stays on screen
    pub feedback_duration_ms: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            mode_label: DEFAULT_MODE_LABEL.to_string(),
            feedback_duration_ms: FEEDBACK_DURATION_MS,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "tile_rush_settings";

    /// Load settings, falling back to defaults when missing or unreadable
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read settings: {}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save<S: KeyValueStore>(&self, store: &mut S) -> Result<(), StoreError> {
        let json = serde_json::to_string(self).map_err(|e| StoreError::Serialize(e.to_string()))?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
