//! Deterministic puzzle core
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, stored in the state
//! - Stable iteration order (by cell id)
//! - No rendering, timing or platform dependencies

pub mod autoclear;
pub mod dictionary;
pub mod error;
pub mod flood;
pub mod gravity;
pub mod grid;
pub mod letters;
pub mod orbit;
pub mod piston;
pub mod scoring;
pub mod selection;
pub mod state;
pub mod turn;

pub use autoclear::{FoundWord, find_word};
pub use dictionary::{Dictionary, DictionaryError, WordValidator};
pub use error::ActionError;
pub use flood::{FloodOutcome, FloodPathEntry, flood};
pub use gravity::{GravityMoves, SettleReport, settle};
pub use grid::{Cell, CellId, Grid, Position, RowLayout};
pub use orbit::{OrbitPlan, OrbitSlot, ordered_neighbors, plan_orbit};
pub use piston::{PistonMove, piston_targets};
pub use scoring::{ScoreBreakdown, ScoringRule};
pub use selection::{MIN_WORD_LEN, SelectedTile, Selection};
pub use state::{
    GameConfig, GamePhase, GameState, PhaseTicket, RuleSet, SettleSource, Snapshot, Variant,
    WordRecord, WordScope,
};
pub use turn::ValidationRequest;
