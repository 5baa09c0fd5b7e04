//! Player actions and phase advancement
//!
//! Actions (`select_tile`, `submit_word`, `end_turn`, `orbit`, `piston`,
//! `toggle_lock`, `undo_last_action`) are only accepted in
//! [`GamePhase::Player`] and check everything before mutating. Transient
//! phases are left only through [`GameState::advance_phase`], which the
//! presentation layer calls with the ticket it read when the animation began.

use rand::Rng;

use super::autoclear::find_word;
use super::dictionary::{Dictionary, DictionaryError, WordValidator};
use super::error::ActionError;
use super::flood::flood;
use super::gravity::{is_settled, settle};
use super::grid::CellId;
use super::letters::drop_letters;
use super::orbit::{apply_orbit, plan_orbit};
use super::piston::{apply_piston, mark_targets, plan_piston};
use super::scoring::{ScoreBreakdown, WordScoreInput, extra_connections, score_word};
use super::selection::{MIN_WORD_LEN, SelectOutcome};
use super::state::{
    GamePhase, GameState, MAX_AUTO_CLEAR_CHAIN, PhaseTicket, SettleSource, WordRecord, WordScope,
};

/// A pending dictionary lookup.
///
/// The verdict is applied only if the game and the selection are both
/// unchanged since the request was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRequest {
    pub generation: u32,
    pub seq: u64,
    pub word: String,
}

impl GameState {
    fn ensure_player_phase(&self) -> Result<(), ActionError> {
        match self.phase {
            GamePhase::Player => Ok(()),
            GamePhase::GameOver => Err(ActionError::GameOver),
            phase => Err(ActionError::WrongPhase(phase)),
        }
    }

    /// Click a tile. Returns the lookup to run when the new word is long
    /// enough to validate.
    pub fn select_tile(&mut self, id: CellId) -> Result<Option<ValidationRequest>, ActionError> {
        self.ensure_player_phase()?;
        let outcome = self.selection.select(&self.grid, id)?;
        if let SelectOutcome::Rewound { removed } = outcome {
            log::trace!("Selection rewound by {removed}");
        }
        self.refresh_flags();
        Ok(self.validation_request())
    }

    /// Lookup for the current word, if it needs one
    pub fn validation_request(&self) -> Option<ValidationRequest> {
        self.selection.needs_validation().then(|| ValidationRequest {
            generation: self.generation,
            seq: self.selection.seq(),
            word: self.selection.word().to_string(),
        })
    }

    /// Apply a finished lookup. A validator error counts as "not a word".
    /// Returns false when the verdict was stale and ignored.
    pub fn apply_validation(
        &mut self,
        request: &ValidationRequest,
        verdict: Result<bool, DictionaryError>,
    ) -> bool {
        if request.generation != self.generation {
            return false;
        }
        let valid = verdict.unwrap_or_else(|e| {
            log::warn!("Validation of {} failed: {e}", request.word);
            false
        });
        self.selection.apply_verdict(request.seq, &request.word, valid)
    }

    /// Validate the current word and apply the result
    pub async fn validate_selection<V: WordValidator>(&mut self, validator: &V) -> bool {
        let Some(request) = self.validation_request() else {
            return false;
        };
        let verdict = validator.validate(&request.word).await;
        self.apply_validation(&request, verdict);
        self.selection.is_word_valid()
    }

    /// Validate if needed, then submit
    pub async fn submit_with<V: WordValidator>(
        &mut self,
        validator: &V,
    ) -> Result<ScoreBreakdown, ActionError> {
        self.ensure_player_phase()?;
        if !self.selection.is_word_valid() {
            self.validate_selection(validator).await;
        }
        self.submit_word()
    }

    /// Clear the selected word, score it and start settling
    pub fn submit_word(&mut self) -> Result<ScoreBreakdown, ActionError> {
        self.ensure_player_phase()?;
        let word = self.selection.word().to_string();
        if word.len() < MIN_WORD_LEN {
            return Err(ActionError::WordTooShort {
                len: word.len(),
                min: MIN_WORD_LEN,
            });
        }
        if !self.selection.is_word_valid() {
            return Err(ActionError::WordNotValid(word));
        }
        let used = match self.rules.word_scope {
            WordScope::PerGame => &self.words_played,
            WordScope::PerRound => &self.words_this_round,
        };
        if used.contains(&word) {
            return Err(ActionError::WordAlreadyUsed(word));
        }

        self.push_undo();
        let ids = self.selection.ids();
        let combo = !self.words_this_round.is_empty();
        let breakdown = self.clear_word(&ids, combo);

        self.words_this_round.push(word.clone());
        self.words_played.push(word.clone());
        self.total_words += 1;
        if word.len() > self.longest_word.len() {
            self.longest_word = word.clone();
        }
        self.history.push(WordRecord {
            word: word.clone(),
            round: self.round,
            points: breakdown.points,
            automatic: false,
        });
        log::info!(
            "Word {word} scored {} (round {}, total {})",
            breakdown.points,
            self.round,
            self.score
        );

        self.selection.clear();
        self.refresh_flags();
        self.start_settle(SettleSource::WordSubmit);
        Ok(breakdown)
    }

    /// Score `ids` under the variant's rule and empty those cells
    fn clear_word(&mut self, ids: &[CellId], combo: bool) -> ScoreBreakdown {
        let doubles = ids
            .iter()
            .filter(|&&id| self.grid.cell(id).is_some_and(|c| c.is_double_score))
            .count() as u32;
        let input = WordScoreInput {
            letters: ids.len(),
            round: self.round,
            tiles_cleared: ids.len(),
            combo,
            extra_connections: extra_connections(&self.grid, ids),
            double_cells: doubles,
        };
        let breakdown = score_word(self.rules.scoring, &input);

        for &id in ids {
            if let Some(cell) = self.grid.cell_mut(id) {
                cell.take_letter();
                cell.is_double_score = false;
                cell.is_pre_placed = false;
                cell.placed_this_turn = false;
            }
            self.locked_tiles.remove(&id);
        }
        self.score += breakdown.points;
        self.last_score = Some(breakdown);
        breakdown
    }

    /// Finish the round and drop the next row of letters
    pub fn end_turn(&mut self) -> Result<(), ActionError> {
        self.ensure_player_phase()?;
        self.selection.clear();
        self.round += 1;
        self.words_this_round.clear();
        self.free_orbits_available = (self.free_orbits_available + self.rules.orbits_per_round)
            .min(self.rules.max_orbits);
        self.pistons_available = self.rules.pistons_per_round;
        log::debug!("Round {} begins", self.round);
        self.run_flood();
        Ok(())
    }

    /// Rotate the neighbours of `pivot` by `steps` (positive is clockwise)
    pub fn orbit(
        &mut self,
        pivot: CellId,
        steps: i32,
        anchor: Option<CellId>,
    ) -> Result<(), ActionError> {
        self.ensure_player_phase()?;
        if !self.rules.orbits_enabled() {
            return Err(ActionError::OrbitUnavailable);
        }
        if self.selection.single() != Some(pivot) {
            return Err(ActionError::OrbitNeedsPivot);
        }
        if self.free_orbits_available == 0 {
            return Err(ActionError::OrbitsExhausted);
        }
        let plan = plan_orbit(&self.grid, pivot, steps, anchor, &self.locked_tiles)?;

        self.push_undo();
        apply_orbit(&mut self.grid, &plan);
        self.free_orbits_available -= 1;
        log::debug!(
            "Orbit around {pivot} by {steps}: {} cells, {} left",
            plan.cells.len(),
            self.free_orbits_available
        );
        self.selection.clear();
        self.refresh_flags();
        self.start_settle(SettleSource::Orbit);
        Ok(())
    }

    /// Push the selected tile along its row to `target`
    pub fn piston(&mut self, target: CellId) -> Result<(), ActionError> {
        self.ensure_player_phase()?;
        if !self.rules.pistons_enabled() {
            return Err(ActionError::PistonUnavailable);
        }
        if self.pistons_available == 0 {
            return Err(ActionError::PistonsExhausted);
        }
        let head = self.selection.single().ok_or(ActionError::PistonNeedsHead)?;
        let mv = plan_piston(&self.grid, head, target, &self.locked_tiles)?;

        self.push_undo();
        apply_piston(&mut self.grid, &mv);
        self.pistons_available -= 1;
        log::debug!("Piston {head} -> {target}");
        self.selection.clear();
        self.refresh_flags();
        self.start_settle(SettleSource::Piston);
        Ok(())
    }

    /// Lock or unlock a tile. Returns whether it is now locked.
    pub fn toggle_lock(&mut self, id: CellId) -> Result<bool, ActionError> {
        self.ensure_player_phase()?;
        if !self.rules.locking_enabled() {
            return Err(ActionError::LockingUnavailable);
        }
        let cell = self.grid.cell(id).ok_or(ActionError::UnknownCell(id))?;
        if self.locked_tiles.contains(&id) {
            self.push_undo();
            self.locked_tiles.remove(&id);
            self.refresh_flags();
            if !is_settled(&self.grid, &self.locked_tiles) {
                self.start_settle(SettleSource::Unlock);
            }
            return Ok(false);
        }
        if cell.is_empty() {
            return Err(ActionError::EmptyCell(id));
        }
        if self.locked_tiles.len() >= self.rules.max_locks {
            return Err(ActionError::LockLimit {
                max: self.rules.max_locks,
            });
        }
        self.push_undo();
        self.locked_tiles.insert(id);
        self.refresh_flags();
        Ok(true)
    }

    /// Revert the most recent submit, orbit, piston or lock change.
    /// Floods clear the history.
    pub fn undo_last_action(&mut self) -> Result<(), ActionError> {
        self.ensure_player_phase()?;
        let frame = self.undo_stack.pop().ok_or(ActionError::NothingToUndo)?;
        self.restore(frame);
        self.selection.clear();
        self.gravity_moves.clear();
        self.flood_paths.clear();
        self.last_score = None;
        self.refresh_flags();
        log::debug!("Undo ({} left)", self.undo_stack.len());
        Ok(())
    }

    /// Start over with a fresh random seed drawn from this game
    pub fn reset_game(&mut self) {
        let seed = self.rng.random();
        self.restart(seed);
    }

    /// Start over with `seed`. Tickets and lookups from before are void.
    pub fn restart(&mut self, seed: u64) {
        self.generation = self.generation.wrapping_add(1);
        self.config.seed = seed;
        self.initialize();
    }

    /// Leave the current transient phase.
    ///
    /// Does nothing and returns false when `ticket` is stale or the phase
    /// is not transient, so a repeated timer callback is harmless.
    pub fn advance_phase(&mut self, ticket: PhaseTicket, dict: &Dictionary) -> bool {
        if ticket != self.phase_ticket() {
            log::trace!("Ignoring stale ticket {ticket:?}");
            return false;
        }
        match self.phase {
            GamePhase::Player | GamePhase::GameOver => return false,
            GamePhase::GravitySettle { source } => match source {
                SettleSource::WordSubmit if self.rules.flood_on_submit => self.run_flood(),
                SettleSource::AutoClear => self.scan_auto_clear(dict),
                _ => self.enter_player(),
            },
            GamePhase::Flood => self.scan_auto_clear(dict),
            GamePhase::AutoClearing => self.apply_auto_clear(),
        }
        true
    }

    /// Advance through every transient phase until input is needed again
    pub fn run_to_player(&mut self, dict: &Dictionary) {
        while self.phase.is_transient() {
            let ticket = self.phase_ticket();
            if !self.advance_phase(ticket, dict) {
                break;
            }
        }
    }

    fn start_settle(&mut self, source: SettleSource) {
        let report = settle(&mut self.grid, &self.locked_tiles);
        self.gravity_moves = report.moves;
        self.flood_paths.clear();
        self.set_phase(GamePhase::GravitySettle { source });
    }

    fn run_flood(&mut self) {
        let letters = match self.next_rows.pop_front() {
            Some(row) => row,
            None => {
                let count = self.rules.drop_count(self.round, self.grid.row_len(0));
                drop_letters(&mut self.rng, count, self.round)
            }
        };
        self.refill_preview();

        let outcome = flood(&mut self.grid, &self.locked_tiles, &letters);
        self.gravity_moves = outcome.settle.moves;
        self.flood_paths = outcome.paths;
        self.undo_stack.clear();
        self.refresh_flags();

        if outcome.game_over {
            log::info!(
                "Game over in round {}: score {}, {} words",
                self.round,
                self.score,
                self.total_words
            );
            self.set_phase(GamePhase::GameOver);
        } else {
            self.set_phase(GamePhase::Flood);
        }
    }

    fn scan_auto_clear(&mut self, dict: &Dictionary) {
        let Some(min_len) = self.rules.auto_clear_min_len else {
            self.enter_player();
            return;
        };
        if self.auto_clear_chain >= MAX_AUTO_CLEAR_CHAIN {
            log::warn!("Auto-clear chain capped at {MAX_AUTO_CLEAR_CHAIN}");
            self.enter_player();
            return;
        }
        match find_word(&self.grid, dict, min_len, &self.locked_tiles) {
            Some(found) => {
                log::debug!("Auto-clear found {}", found.word);
                self.auto_clear = Some(found);
                self.auto_clear_chain += 1;
                self.set_phase(GamePhase::AutoClearing);
            }
            None => self.enter_player(),
        }
    }

    fn apply_auto_clear(&mut self) {
        let Some(found) = self.auto_clear.take() else {
            self.enter_player();
            return;
        };
        let breakdown = self.clear_word(&found.cells, false);
        self.history.push(WordRecord {
            word: found.word.clone(),
            round: self.round,
            points: breakdown.points,
            automatic: true,
        });
        log::info!("Auto-cleared {} for {}", found.word, breakdown.points);
        self.start_settle(SettleSource::AutoClear);
    }

    fn enter_player(&mut self) {
        self.auto_clear = None;
        self.auto_clear_chain = 0;
        self.set_phase(GamePhase::Player);
    }

    /// Words cleared by auto-clear this game
    pub fn auto_cleared_words(&self) -> impl Iterator<Item = &str> {
        self.history
            .iter()
            .filter(|r| r.automatic)
            .map(|r| r.word.as_str())
    }

    /// Sync selection and piston highlight flags onto the grid
    fn refresh_flags(&mut self) {
        self.selection.sync_flags(&mut self.grid);
        let head = if self.rules.pistons_enabled() && self.pistons_available > 0 {
            self.selection.single()
        } else {
            None
        };
        mark_targets(&mut self.grid, head, &self.locked_tiles);
    }
}
