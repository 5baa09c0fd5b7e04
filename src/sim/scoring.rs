//! Word scoring
//!
//! Two scoring designs exist and are selected per variant:
//!
//! | Rule | Formula |
//! |------|---------|
//! | Simple | `floor((len * (1 + round * 0.1) + cleared * 10) * combo) * 2^doubles` |
//! | Additive | `2 * letters * (1 + doubles) + min(4, extra connections)` |
//!
//! `combo` is 1.5 for every word after the first in a round, otherwise 1.

use serde::{Deserialize, Serialize};

use super::grid::{CellId, Grid};

/// Per-round multiplier step for the simple formula
pub const ROUND_BONUS: f64 = 0.1;
/// Points per cleared tile for the simple formula
pub const TILE_CLEAR_POINTS: f64 = 10.0;
/// Multiplier for every word after the first in a round
pub const COMBO_MULTIPLIER: f64 = 1.5;
/// Cap on the additive creativity bonus
pub const MAX_CREATIVITY_BONUS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoringRule {
    /// Length and round weighted, combo multiplier
    Simple,
    /// Flat per letter plus a shape (creativity) bonus
    Additive,
}

/// Everything a formula needs about one cleared word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordScoreInput {
    pub letters: usize,
    pub round: u32,
    pub tiles_cleared: usize,
    /// Not the first word of the round
    pub combo: bool,
    pub extra_connections: u32,
    /// Double-score cells consumed by this word
    pub double_cells: u32,
}

/// Points awarded for a word and where they came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub points: u64,
    pub combo: bool,
    pub creativity_bonus: u32,
    pub double_cells: u32,
}

/// Simple formula, floored to an integer
pub fn simple_score(word_len: usize, round: u32, tiles_cleared: usize, combo: bool) -> u64 {
    let raw = word_len as f64 * (1.0 + round as f64 * ROUND_BONUS)
        + tiles_cleared as f64 * TILE_CLEAR_POINTS;
    let raw = if combo { raw * COMBO_MULTIPLIER } else { raw };
    raw.floor() as u64
}

/// Additive formula
pub fn additive_score(letter_count: usize, extra_connections: u32) -> u64 {
    2 * letter_count as u64 + creativity_bonus(extra_connections) as u64
}

pub fn creativity_bonus(extra_connections: u32) -> u32 {
    extra_connections.min(MAX_CREATIVITY_BONUS)
}

/// Adjacent pairs among the selected cells beyond the `n - 1` links the
/// selection path itself needs
pub fn extra_connections(grid: &Grid, ids: &[CellId]) -> u32 {
    if ids.len() < 2 {
        return 0;
    }
    let mut pairs = 0u32;
    for (i, &a) in ids.iter().enumerate() {
        for &b in &ids[i + 1..] {
            if grid.are_adjacent(a, b) {
                pairs += 1;
            }
        }
    }
    pairs.saturating_sub(ids.len() as u32 - 1)
}

/// Score one word under `rule`
pub fn score_word(rule: ScoringRule, input: &WordScoreInput) -> ScoreBreakdown {
    match rule {
        ScoringRule::Simple => {
            let base = simple_score(input.letters, input.round, input.tiles_cleared, input.combo);
            ScoreBreakdown {
                points: base << input.double_cells.min(8),
                combo: input.combo,
                creativity_bonus: 0,
                double_cells: input.double_cells,
            }
        }
        ScoringRule::Additive => {
            let bonus = creativity_bonus(input.extra_connections);
            let base = 2 * input.letters as u64 * (1 + input.double_cells as u64);
            ScoreBreakdown {
                points: base + bonus as u64,
                combo: false,
                creativity_bonus: bonus,
                double_cells: input.double_cells,
            }
        }
    }
}
