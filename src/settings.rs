//! Player settings and preferences
//!
//! Persisted separately from game saves in the key-value store.

use serde::{Deserialize, Serialize};

use crate::persistence::{KEY_PREFIX, KeyValueStore, StorageError, load_json, save_json};
use crate::sim::{GameConfig, Variant};

/// Longest player name sent to the leaderboard
pub const MAX_NAME_LEN: usize = 24;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name shown on leaderboards
    pub player_name: String,
    /// Mode started from the menu
    pub variant: Variant,
    /// Board size override (minimum 3)
    pub grid_size: Option<usize>,
    /// Play the shared board of the day
    pub daily_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: String::new(),
            variant: Variant::Placement,
            grid_size: None,
            daily_mode: false,
        }
    }
}

impl Settings {
    const STORAGE_KEY: &'static str = "settings";

    pub fn storage_key() -> String {
        format!("{KEY_PREFIX}_{}", Self::STORAGE_KEY)
    }

    /// Set the player name, trimmed and cut to [`MAX_NAME_LEN`] characters
    pub fn set_player_name(&mut self, name: &str) {
        self.player_name = name.trim().chars().take(MAX_NAME_LEN).collect();
    }

    /// Game configuration for a new game.
    ///
    /// Daily mode uses `daily_seed` for `date`; otherwise `seed`.
    pub fn game_config(&self, seed: u64, date: &str) -> GameConfig {
        let seed = if self.daily_mode {
            crate::daily_seed(date)
        } else {
            seed
        };
        GameConfig {
            variant: self.variant,
            grid_size: self.grid_size,
            seed,
        }
    }

    /// Load settings, falling back to defaults on a missing or bad entry
    pub fn load(store: &impl KeyValueStore) -> Self {
        match load_json(store, &Self::storage_key()) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring saved settings: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &impl KeyValueStore) -> Result<(), StorageError> {
        save_json(store, &Self::storage_key(), self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
