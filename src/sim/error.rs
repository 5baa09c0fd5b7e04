//! Rejections for player actions
//!
//! Every check runs before any mutation, so an `Err` always means the game
//! state is exactly as it was. The messages are meant to be shown to the
//! player as a transient notice.

use thiserror::Error;

use super::grid::CellId;
use super::state::GamePhase;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("not your turn yet ({0:?})")]
    WrongPhase(GamePhase),
    #[error("the game is over")]
    GameOver,
    #[error("no cell with id {0}")]
    UnknownCell(CellId),
    #[error("that cell is empty")]
    EmptyCell(CellId),
    #[error("tiles must touch the previous tile")]
    NotAdjacent { from: CellId, to: CellId },

    #[error("words need at least {min} letters")]
    WordTooShort { len: usize, min: usize },
    #[error("{0} is not in the dictionary")]
    WordNotValid(String),
    #[error("{0} has already been played")]
    WordAlreadyUsed(String),

    #[error("orbits are not available in this mode")]
    OrbitUnavailable,
    #[error("select exactly one tile to orbit around")]
    OrbitNeedsPivot,
    #[error("no orbits left this round")]
    OrbitsExhausted,
    #[error("need at least two movable neighbours to orbit (found {found})")]
    TooFewRotatable { found: usize },
    #[error("that rotation would not change anything")]
    NoOpRotation,

    #[error("locking is not available in this mode")]
    LockingUnavailable,
    #[error("at most {max} tiles can be locked")]
    LockLimit { max: usize },
    #[error("that tile is locked")]
    LockedTile(CellId),

    #[error("pistons are not available in this mode")]
    PistonUnavailable,
    #[error("no piston moves left this round")]
    PistonsExhausted,
    #[error("select exactly one tile to push")]
    PistonNeedsHead,
    #[error("cannot push to that cell")]
    InvalidPistonTarget(CellId),

    #[error("nothing to undo")]
    NothingToUndo,
}
