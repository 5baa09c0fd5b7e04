//! Honeyword - a hex-grid word puzzle
//!
//! Core modules:
//! - `sim`: Deterministic puzzle core (grid, gravity, flood, words, orbits)
//! - `persistence`: Save/resume and daily records over a key-value store
//! - `settings`: Player preferences
//! - `highscores`: Local top-10 table
//! - `leaderboard`: Remote score submission wire types
//! - `platform`: Browser/native clock

pub mod highscores;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::HighScores;
pub use settings::Settings;
pub use sim::{GameConfig, GamePhase, GameState, Variant};

/// Derive the shared daily-challenge seed from a `YYYY-MM-DD` date.
///
/// FNV-1a over the date bytes, so every player gets the same board on the
/// same day.
pub fn daily_seed(date: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    date.bytes()
        .fold(OFFSET, |hash, b| (hash ^ b as u64).wrapping_mul(PRIME))
}
