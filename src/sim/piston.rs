//! Piston: sliding one tile along its row
//!
//! The head tile moves to a target cell in the same row and every tile in
//! between shifts one step back toward the head's old cell. Locked cells
//! stop the slide, so targets never lie beyond a locked tile.

use std::collections::BTreeSet;

use super::error::ActionError;
use super::grid::{CellId, Grid};

/// A validated slide
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PistonMove {
    pub head: CellId,
    pub target: CellId,
    /// Row cells from head to target inclusive
    pub segment: Vec<CellId>,
}

/// Cells the head can be pushed to, left then right
pub fn piston_targets(grid: &Grid, head: CellId, locked: &BTreeSet<CellId>) -> Vec<CellId> {
    let Some(cell) = grid.cell(head) else {
        return Vec::new();
    };
    if cell.is_empty() || locked.contains(&head) {
        return Vec::new();
    }
    let row = cell.position.row;
    let col = cell.position.col;

    let mut targets = Vec::new();
    for c in (0..col).rev() {
        match grid.id_at(row, c) {
            Some(id) if !locked.contains(&id) => targets.push(id),
            _ => break,
        }
    }
    targets.reverse();
    for c in col + 1..grid.row_len(row) {
        match grid.id_at(row, c) {
            Some(id) if !locked.contains(&id) => targets.push(id),
            _ => break,
        }
    }
    targets
}

/// Flag every legal target of `head` for the UI
pub fn mark_targets(grid: &mut Grid, head: Option<CellId>, locked: &BTreeSet<CellId>) {
    let targets = head
        .map(|h| piston_targets(grid, h, locked))
        .unwrap_or_default();
    for cell in grid.cells_mut() {
        cell.is_piston_target = targets.contains(&cell.id);
    }
}

pub fn plan_piston(
    grid: &Grid,
    head: CellId,
    target: CellId,
    locked: &BTreeSet<CellId>,
) -> Result<PistonMove, ActionError> {
    let head_cell = grid.cell(head).ok_or(ActionError::UnknownCell(head))?;
    if head_cell.is_empty() {
        return Err(ActionError::EmptyCell(head));
    }
    if locked.contains(&head) {
        return Err(ActionError::LockedTile(head));
    }
    if !piston_targets(grid, head, locked).contains(&target) {
        return Err(ActionError::InvalidPistonTarget(target));
    }
    let row = head_cell.position.row;
    let from = head_cell.position.col;
    let to = grid
        .cell(target)
        .map(|c| c.position.col)
        .ok_or(ActionError::UnknownCell(target))?;

    let cols: Vec<usize> = if to > from {
        (from..=to).collect()
    } else {
        (to..=from).rev().collect()
    };
    let segment = cols.iter().filter_map(|&c| grid.id_at(row, c)).collect();
    Ok(PistonMove {
        head,
        target,
        segment,
    })
}

/// Slide the letters. Tile flags travel with their letters.
pub fn apply_piston(grid: &mut Grid, mv: &PistonMove) {
    let tiles: Vec<(Option<char>, bool, bool)> = mv
        .segment
        .iter()
        .map(|&id| {
            grid.cell(id)
                .map(|c| (c.letter, c.is_pre_placed, c.placed_this_turn))
                .unwrap_or((None, false, false))
        })
        .collect();
    if tiles.is_empty() {
        return;
    }
    let mut shifted: Vec<_> = tiles[1..].to_vec();
    shifted.push(tiles[0]);

    for (&id, (letter, pre_placed, fresh)) in mv.segment.iter().zip(shifted) {
        if let Some(cell) = grid.cell_mut(id) {
            match letter {
                Some(l) => cell.set_letter(l),
                None => {
                    cell.take_letter();
                }
            }
            cell.is_pre_placed = pre_placed;
            cell.placed_this_turn = fresh;
        }
    }
}
