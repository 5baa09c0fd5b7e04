//! Remote leaderboard wire format
//!
//! The end-of-game screen posts a [`ScoreSubmission`] as JSON to
//! [`SUBMIT_ENDPOINT`] and parses the reply with [`parse_response`]. The
//! request itself is made by the host page.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::GameState;

pub const SUBMIT_ENDPOINT: &str = "/api/submit-score";

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("score rejected: {0}")]
    Rejected(String),
    #[error("malformed leaderboard reply: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub player_name: String,
    pub score: u64,
    pub round: u32,
    pub total_words: u32,
    pub longest_word: String,
    /// Seconds played
    pub time_spent: u64,
    /// `YYYY-MM-DD`
    pub date: String,
}

impl ScoreSubmission {
    pub fn from_state(state: &GameState, player_name: &str, time_spent: u64, date: &str) -> Self {
        Self {
            player_name: player_name.to_string(),
            score: state.score,
            round: state.round,
            total_words: state.total_words,
            longest_word: state.longest_word.clone(),
            time_spent,
            date: date.to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String, LeaderboardError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRank {
    pub rank: u32,
    pub total_players: u32,
}

/// Reply body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_personal_best: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_rank: Option<DailyRank>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// An accepted submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accepted {
    pub is_personal_best: bool,
    pub daily_rank: Option<DailyRank>,
}

impl SubmitResponse {
    pub fn into_result(self) -> Result<Accepted, LeaderboardError> {
        if !self.success {
            let reason = self.error.unwrap_or_else(|| "unknown error".to_string());
            return Err(LeaderboardError::Rejected(reason));
        }
        Ok(Accepted {
            is_personal_best: self.is_personal_best.unwrap_or(false),
            daily_rank: self.daily_rank,
        })
    }
}

/// Parse a reply body
pub fn parse_response(body: &str) -> Result<Accepted, LeaderboardError> {
    let response: SubmitResponse = serde_json::from_str(body)?;
    let result = response.into_result();
    if let Err(e) = &result {
        log::warn!("Leaderboard: {e}");
    }
    result
}
