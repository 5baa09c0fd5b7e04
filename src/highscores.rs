//! Local high score table
//!
//! Persisted in the key-value store, keeps the top 10 scores.

use serde::{Deserialize, Serialize};

use crate::persistence::{KEY_PREFIX, KeyValueStore, StorageError, load_json, save_json};
use crate::sim::{GameState, Variant};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A finished game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Round reached
    pub round: u32,
    pub total_words: u32,
    pub longest_word: String,
    pub variant: Variant,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

impl HighScoreEntry {
    pub fn from_state(state: &GameState, timestamp: f64) -> Self {
        Self {
            score: state.score,
            round: state.round,
            total_words: state.total_words,
            longest_word: state.longest_word.clone(),
            variant: state.config.variant,
            timestamp,
        }
    }
}

/// Top scores, best first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    const STORAGE_KEY: &'static str = "highscores";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn storage_key() -> String {
        format!("{KEY_PREFIX}_{}", Self::STORAGE_KEY)
    }

    /// Whether a score would make the table
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Rank (1-based) a score would take, if it qualifies
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert an entry if it qualifies. Returns the rank achieved.
    pub fn add(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }
        // Equal scores keep their earlier place
        let rank = match self.entries.iter().position(|e| entry.score > e.score) {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Best entry for one variant
    pub fn best_for(&self, variant: Variant) -> Option<&HighScoreEntry> {
        self.entries.iter().find(|e| e.variant == variant)
    }

    pub fn load(store: &impl KeyValueStore) -> Self {
        match load_json::<HighScores>(store, &Self::storage_key()) {
            Ok(Some(scores)) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Ignoring saved high scores: {e}");
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &impl KeyValueStore) -> Result<(), StorageError> {
        save_json(store, &Self::storage_key(), self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Describe how long ago `timestamp` was, relative to `now` (both ms)
pub fn format_age(timestamp: f64, now: f64) -> String {
    let mins = ((now - timestamp) / 60_000.0).max(0.0).floor() as u64;
    let hours = mins / 60;
    let days = hours / 24;
    match (days, hours, mins) {
        (0, 0, 0) => "Just now".to_string(),
        (0, 0, 1) => "1 min ago".to_string(),
        (0, 0, m) => format!("{m} mins ago"),
        (0, 1, _) => "1 hour ago".to_string(),
        (0, h, _) => format!("{h} hours ago"),
        (1, _, _) => "Yesterday".to_string(),
        (d, _, _) if d < 7 => format!("{d} days ago"),
        _ => crate::platform::date_string(timestamp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn entry(score: u64) -> HighScoreEntry {
        HighScoreEntry {
            score,
            round: 3,
            total_words: 4,
            longest_word: "HONEY".into(),
            variant: Variant::Placement,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_ranking() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add(entry(50)), Some(1));
        assert_eq!(scores.add(entry(80)), Some(1));
        assert_eq!(scores.add(entry(50)), Some(3));
        assert_eq!(scores.add(entry(0)), None);
        assert_eq!(scores.top_score(), Some(80));
        assert_eq!(scores.potential_rank(60), Some(2));
    }

    #[test]
    fn test_keeps_top_ten() {
        let mut scores = HighScores::new();
        for s in 1..=12 {
            scores.add(entry(s * 10));
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(30));
        assert!(!scores.qualifies(30));
        assert!(scores.qualifies(31));
    }

    #[test]
    fn test_persisted() {
        let store = MemoryStore::new();
        let mut scores = HighScores::new();
        scores.add(entry(42));
        scores.save(&store).unwrap();
        let loaded = HighScores::load(&store);
        assert_eq!(loaded.entries, scores.entries);
        assert!(loaded.best_for(Variant::Flood).is_none());
    }

    #[test]
    fn test_format_age() {
        let now = 10.0 * 86_400_000.0;
        assert_eq!(format_age(now, now), "Just now");
        assert_eq!(format_age(now - 90_000.0, now), "1 min ago");
        assert_eq!(format_age(now - 3.0 * 3_600_000.0, now), "3 hours ago");
        assert_eq!(format_age(now - 86_400_000.0, now), "Yesterday");
        assert_eq!(format_age(0.0, now), "1970-01-01");
    }
}
