//! Game state and rule configuration
//!
//! Everything needed to resume a game lives in [`GameState`], including the
//! RNG, so a saved game continues exactly where it stopped.

use std::collections::{BTreeSet, VecDeque};

use rand::SeedableRng;
use rand::seq::index;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::autoclear::FoundWord;
use super::flood::FloodPathEntry;
use super::gravity::GravityMoves;
use super::grid::{CellId, Grid, RowLayout};
use super::letters::{drop_letters, random_letter};
use super::scoring::{ScoreBreakdown, ScoringRule};
use super::selection::{SelectedTile, Selection};

/// Upcoming drop rows kept in the preview
pub const PREVIEW_ROWS: usize = 3;
/// Undo frames kept per turn
pub const UNDO_DEPTH: usize = 16;
/// Auto-clear links allowed in one chain
pub const MAX_AUTO_CLEAR_CHAIN: u32 = 32;
/// Smallest board accepted as an override
pub const MIN_GRID_SIZE: usize = 3;

/// Game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Variant {
    /// Turn-based: chain words within a turn, letters drop when the turn ends
    #[default]
    Placement,
    /// Survival: every word and every turn drops more letters
    Falling,
    /// Orbits, locks and incidental-word auto-clear
    Flood,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Placement, Variant::Falling, Variant::Flood];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Placement => "placement",
            Variant::Falling => "falling",
            Variant::Flood => "flood",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "placement" | "classic" => Some(Variant::Placement),
            "falling" | "tetris" => Some(Variant::Falling),
            "flood" => Some(Variant::Flood),
            _ => None,
        }
    }
}

/// Where "already played" is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WordScope {
    PerGame,
    PerRound,
}

/// Rules resolved once per game from the variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub grid_size: usize,
    pub layout: RowLayout,
    pub scoring: ScoringRule,
    pub word_scope: WordScope,
    /// Submitting a word also drops letters
    pub flood_on_submit: bool,
    /// Letters per drop in round 1
    pub base_drop: usize,
    /// One extra letter per this many rounds
    pub drop_growth_rounds: Option<u32>,
    /// Bottom rows filled at game start
    pub pre_placed_rows: usize,
    pub double_score_cells: usize,
    pub orbits_per_round: u32,
    pub max_orbits: u32,
    /// 0 disables locking
    pub max_locks: usize,
    pub pistons_per_round: u32,
    /// `None` disables auto-clear
    pub auto_clear_min_len: Option<usize>,
}

impl RuleSet {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Placement => Self {
                grid_size: 5,
                layout: RowLayout::Uniform,
                scoring: ScoringRule::Simple,
                word_scope: WordScope::PerGame,
                flood_on_submit: false,
                base_drop: 3,
                drop_growth_rounds: None,
                pre_placed_rows: 2,
                double_score_cells: 2,
                orbits_per_round: 0,
                max_orbits: 0,
                max_locks: 0,
                pistons_per_round: 0,
                auto_clear_min_len: None,
            },
            Variant::Falling => Self {
                grid_size: 7,
                layout: RowLayout::Alternating,
                scoring: ScoringRule::Simple,
                word_scope: WordScope::PerRound,
                flood_on_submit: true,
                base_drop: 3,
                drop_growth_rounds: Some(3),
                pre_placed_rows: 0,
                double_score_cells: 0,
                orbits_per_round: 0,
                max_orbits: 0,
                max_locks: 0,
                pistons_per_round: 1,
                auto_clear_min_len: None,
            },
            Variant::Flood => Self {
                grid_size: 7,
                layout: RowLayout::Alternating,
                scoring: ScoringRule::Additive,
                word_scope: WordScope::PerGame,
                flood_on_submit: true,
                base_drop: 4,
                drop_growth_rounds: None,
                pre_placed_rows: 0,
                double_score_cells: 0,
                orbits_per_round: 1,
                max_orbits: 3,
                max_locks: 3,
                pistons_per_round: 0,
                auto_clear_min_len: Some(4),
            },
        }
    }

    /// Letters dropped in `round`, never more than the top row holds
    pub fn drop_count(&self, round: u32, top_width: usize) -> usize {
        let growth = self
            .drop_growth_rounds
            .filter(|&every| every > 0)
            .map(|every| (round / every) as usize)
            .unwrap_or(0);
        (self.base_drop + growth).min(top_width)
    }

    pub fn orbits_enabled(&self) -> bool {
        self.orbits_per_round > 0
    }

    pub fn locking_enabled(&self) -> bool {
        self.max_locks > 0
    }

    pub fn pistons_enabled(&self) -> bool {
        self.pistons_per_round > 0
    }
}

/// What triggered a settle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettleSource {
    WordSubmit,
    Orbit,
    Piston,
    AutoClear,
    /// A released lock left its tile over a gap
    Unlock,
}

/// Turn phase. Only `Player` accepts player actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Awaiting selection, submission, orbit or end of turn
    Player,
    /// Letters are falling after a committed change
    GravitySettle { source: SettleSource },
    /// New letters are entering from the top
    Flood,
    /// An incidental word is highlighted and about to clear
    AutoClearing,
    /// Run ended
    GameOver,
}

impl GamePhase {
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GamePhase::GravitySettle { .. } | GamePhase::Flood | GamePhase::AutoClearing
        )
    }
}

/// How a game is set up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub variant: Variant,
    /// Overrides the variant's board size
    pub grid_size: Option<usize>,
    pub seed: u64,
}

impl GameConfig {
    pub fn new(variant: Variant, seed: u64) -> Self {
        Self {
            variant,
            grid_size: None,
            seed,
        }
    }

    pub fn rules(&self) -> RuleSet {
        let mut rules = RuleSet::for_variant(self.variant);
        if let Some(size) = self.grid_size {
            rules.grid_size = size.max(MIN_GRID_SIZE);
        }
        rules
    }
}

/// Identifies one phase of one game instance.
///
/// Timers and animations hand this back to `advance_phase`; anything issued
/// before a restart or a later phase change is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhaseTicket {
    pub generation: u32,
    pub step: u64,
}

/// A cleared word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub word: String,
    pub round: u32,
    pub points: u64,
    /// Cleared by auto-clear rather than the player
    pub automatic: bool,
}

/// State restored by undo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct UndoFrame {
    pub grid: Grid,
    pub score: u64,
    pub words_this_round: Vec<String>,
    pub words_played: Vec<String>,
    pub history_len: usize,
    pub total_words: u32,
    pub longest_word: String,
    pub free_orbits_available: u32,
    pub pistons_available: u32,
    pub locked_tiles: BTreeSet<CellId>,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub config: GameConfig,
    pub rules: RuleSet,
    /// Bumped on every restart
    pub generation: u32,
    pub phase: GamePhase,
    /// Bumped on every phase change
    pub(crate) phase_step: u64,
    pub grid: Grid,
    pub score: u64,
    /// 1-based
    pub round: u32,
    pub selection: Selection,
    pub words_this_round: Vec<String>,
    pub words_played: Vec<String>,
    pub history: Vec<WordRecord>,
    pub total_words: u32,
    pub longest_word: String,
    /// Upcoming drops, front first
    pub next_rows: VecDeque<Vec<char>>,
    pub free_orbits_available: u32,
    pub pistons_available: u32,
    pub locked_tiles: BTreeSet<CellId>,
    /// Last settle, for animation
    pub gravity_moves: GravityMoves,
    /// Last flood, for animation
    pub flood_paths: Vec<FloodPathEntry>,
    /// Word highlighted during `AutoClearing`
    pub auto_clear: Option<FoundWord>,
    pub(crate) auto_clear_chain: u32,
    /// Breakdown of the most recent scored word
    pub last_score: Option<ScoreBreakdown>,
    pub(crate) undo_stack: Vec<UndoFrame>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create and initialize a game
    pub fn new(config: GameConfig) -> Self {
        let rules = config.rules();
        let mut state = Self {
            config,
            grid: Grid::build(rules.grid_size, rules.layout),
            rules,
            generation: 0,
            phase: GamePhase::Player,
            phase_step: 0,
            score: 0,
            round: 1,
            selection: Selection::default(),
            words_this_round: Vec::new(),
            words_played: Vec::new(),
            history: Vec::new(),
            total_words: 0,
            longest_word: String::new(),
            next_rows: VecDeque::with_capacity(PREVIEW_ROWS),
            free_orbits_available: 0,
            pistons_available: 0,
            locked_tiles: BTreeSet::new(),
            gravity_moves: GravityMoves::new(),
            flood_paths: Vec::new(),
            auto_clear: None,
            auto_clear_chain: 0,
            last_score: None,
            undo_stack: Vec::new(),
            rng: Pcg32::seed_from_u64(config.seed),
        };
        state.initialize();
        state
    }

    /// Build a fresh board and reset everything to start-of-game values.
    /// Keeps the generation; use `restart` to invalidate outstanding tickets.
    pub fn initialize(&mut self) {
        self.rules = self.config.rules();
        self.rng = Pcg32::seed_from_u64(self.config.seed);
        self.grid = Grid::build(self.rules.grid_size, self.rules.layout);
        self.score = 0;
        self.round = 1;
        self.selection = Selection::default();
        self.words_this_round.clear();
        self.words_played.clear();
        self.history.clear();
        self.total_words = 0;
        self.longest_word.clear();
        self.free_orbits_available = self.rules.orbits_per_round.min(self.rules.max_orbits);
        self.pistons_available = self.rules.pistons_per_round;
        self.locked_tiles.clear();
        self.gravity_moves.clear();
        self.flood_paths.clear();
        self.auto_clear = None;
        self.auto_clear_chain = 0;
        self.last_score = None;
        self.undo_stack.clear();

        self.seed_pre_placed();
        self.seed_double_score();
        self.next_rows.clear();
        self.refill_preview();

        self.set_phase(GamePhase::Player);
        log::info!(
            "New {} game: seed={} grid={}x{} generation={}",
            self.config.variant.as_str(),
            self.config.seed,
            self.rules.grid_size,
            self.rules.grid_size,
            self.generation
        );
    }

    /// Current phase ticket
    pub fn phase_ticket(&self) -> PhaseTicket {
        PhaseTicket {
            generation: self.generation,
            step: self.phase_step,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub(crate) fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::debug!("Phase {:?} -> {:?}", self.phase, phase);
        }
        self.phase = phase;
        self.phase_step += 1;
    }

    /// Top the preview back up to [`PREVIEW_ROWS`] rows
    pub(crate) fn refill_preview(&mut self) {
        let top_width = self.grid.row_len(0);
        while self.next_rows.len() < PREVIEW_ROWS {
            let round = self.round + self.next_rows.len() as u32;
            let count = self.rules.drop_count(round, top_width);
            let row = drop_letters(&mut self.rng, count, round);
            self.next_rows.push_back(row);
        }
    }

    fn seed_pre_placed(&mut self) {
        let rows = self.grid.rows();
        let first = rows.saturating_sub(self.rules.pre_placed_rows);
        for row in first..rows {
            for id in self.grid.row_ids(row) {
                let letter = random_letter(&mut self.rng);
                if let Some(cell) = self.grid.cell_mut(id) {
                    cell.set_letter(letter);
                    cell.is_pre_placed = true;
                }
            }
        }
    }

    fn seed_double_score(&mut self) {
        let count = self.rules.double_score_cells.min(self.grid.len());
        if count == 0 {
            return;
        }
        for i in index::sample(&mut self.rng, self.grid.len(), count) {
            if let Some(cell) = self.grid.cell_mut(i as CellId) {
                cell.is_double_score = true;
            }
        }
    }

    pub(crate) fn undo_frame(&self) -> UndoFrame {
        UndoFrame {
            grid: self.grid.clone(),
            score: self.score,
            words_this_round: self.words_this_round.clone(),
            words_played: self.words_played.clone(),
            history_len: self.history.len(),
            total_words: self.total_words,
            longest_word: self.longest_word.clone(),
            free_orbits_available: self.free_orbits_available,
            pistons_available: self.pistons_available,
            locked_tiles: self.locked_tiles.clone(),
        }
    }

    pub(crate) fn push_undo(&mut self) {
        let frame = self.undo_frame();
        self.undo_stack.push(frame);
        if self.undo_stack.len() > UNDO_DEPTH {
            self.undo_stack.remove(0);
        }
    }

    pub(crate) fn restore(&mut self, frame: UndoFrame) {
        self.grid = frame.grid;
        self.score = frame.score;
        self.words_this_round = frame.words_this_round;
        self.words_played = frame.words_played;
        self.history.truncate(frame.history_len);
        self.total_words = frame.total_words;
        self.longest_word = frame.longest_word;
        self.free_orbits_available = frame.free_orbits_available;
        self.pistons_available = frame.pistons_available;
        self.locked_tiles = frame.locked_tiles;
    }

    /// Undo frames available
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Read-only view for the presentation layer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            variant: self.config.variant,
            grid: self.grid.clone(),
            phase: self.phase,
            ticket: self.phase_ticket(),
            score: self.score,
            round: self.round,
            selected_tiles: self.selection.tiles().to_vec(),
            current_word: self.selection.word().to_string(),
            is_word_valid: self.selection.is_word_valid(),
            words_this_round: self.words_this_round.clone(),
            total_words: self.total_words,
            longest_word: self.longest_word.clone(),
            free_orbits_available: self.free_orbits_available,
            pistons_available: self.pistons_available,
            locked_tiles: self.locked_tiles.iter().copied().collect(),
            next_rows: self.next_rows.iter().cloned().collect(),
            gravity_moves: self.gravity_moves.clone(),
            flood_paths: self.flood_paths.clone(),
            auto_clear: self.auto_clear.clone(),
            last_score: self.last_score,
            can_undo: !self.undo_stack.is_empty(),
        }
    }
}

/// Everything the presentation layer reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub variant: Variant,
    pub grid: Grid,
    pub phase: GamePhase,
    pub ticket: PhaseTicket,
    pub score: u64,
    pub round: u32,
    pub selected_tiles: Vec<SelectedTile>,
    pub current_word: String,
    pub is_word_valid: bool,
    pub words_this_round: Vec<String>,
    pub total_words: u32,
    pub longest_word: String,
    pub free_orbits_available: u32,
    pub pistons_available: u32,
    pub locked_tiles: Vec<CellId>,
    pub next_rows: Vec<Vec<char>>,
    pub gravity_moves: GravityMoves,
    pub flood_paths: Vec<FloodPathEntry>,
    pub auto_clear: Option<FoundWord>,
    pub last_score: Option<ScoreBreakdown>,
    pub can_undo: bool,
}
