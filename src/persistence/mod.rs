//! Save/resume and daily records
//!
//! Everything is JSON in a string key-value store: browser `localStorage` on
//! wasm32, an in-memory map natively and in tests.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{GameState, Variant};

/// Prefix shared by every key this crate writes
pub const KEY_PREFIX: &str = "honeyword";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,
    #[error("storage rejected the write: {0}")]
    Write(String),
    #[error("corrupt saved data: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Minimal string key-value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Browser `localStorage`
#[cfg(target_arch = "wasm32")]
pub struct LocalStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    pub fn open() -> Result<Self, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .map(|storage| Self { storage })
            .ok_or(StorageError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|_| StorageError::Unavailable)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write(format!("{e:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Write(format!("{e:?}")))
    }
}

/// Resume slot for a variant
pub fn game_key(variant: Variant) -> String {
    format!("{KEY_PREFIX}_game_{}", variant.as_str())
}

/// Daily record for a `YYYY-MM-DD` date
pub fn daily_key(date: &str) -> String {
    format!("{KEY_PREFIX}_daily_{date}")
}

/// Read and decode a JSON value; a missing key is `Ok(None)`
pub fn load_json<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

pub fn save_json<T: Serialize>(
    store: &impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

/// Save a game to its variant's resume slot
pub fn save_game(store: &impl KeyValueStore, state: &GameState) -> Result<(), StorageError> {
    save_json(store, &game_key(state.config.variant), state)?;
    log::debug!(
        "Saved {} game (round {}, score {})",
        state.config.variant.as_str(),
        state.round,
        state.score
    );
    Ok(())
}

/// Load the resume slot for `variant`.
///
/// A corrupt save is discarded and reported as missing.
pub fn load_game(
    store: &impl KeyValueStore,
    variant: Variant,
) -> Result<Option<GameState>, StorageError> {
    let key = game_key(variant);
    match load_json::<GameState>(store, &key) {
        Ok(state) => Ok(state),
        Err(StorageError::Corrupt(e)) => {
            log::warn!("Discarding corrupt save {key}: {e}");
            store.remove(&key)?;
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

pub fn clear_game(store: &impl KeyValueStore, variant: Variant) -> Result<(), StorageError> {
    store.remove(&game_key(variant))
}

/// Outcome of one day's challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: String,
    pub score: u64,
    pub round: u32,
    pub completed: bool,
}

pub fn load_daily(
    store: &impl KeyValueStore,
    date: &str,
) -> Result<Option<DailyRecord>, StorageError> {
    load_json(store, &daily_key(date))
}

/// Record a daily result. An existing completed record is kept, so a day
/// counts once.
pub fn record_daily(
    store: &impl KeyValueStore,
    record: &DailyRecord,
) -> Result<bool, StorageError> {
    if let Some(existing) = load_daily(store, &record.date)? {
        if existing.completed {
            log::info!("Daily {} already completed", record.date);
            return Ok(false);
        }
    }
    save_json(store, &daily_key(&record.date), record)?;
    Ok(true)
}
