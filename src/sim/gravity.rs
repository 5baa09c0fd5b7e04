//! Gravity settling
//!
//! Letters fall toward higher row indices through the hex "cells below"
//! relation. Each pass walks rows bottom-up and lets every floating letter
//! drop one row, so a multi-row fall cascades over several passes. Passes
//! repeat until one makes no move or the budget runs out.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::grid::{CellId, Grid};

/// Destination cell -> source cell for every tile that moved
pub type GravityMoves = BTreeMap<CellId, CellId>;

/// Outcome of one settle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettleReport {
    pub moves: GravityMoves,
    /// Every cell each moved tile passed through, keyed by its starting cell
    pub paths: BTreeMap<CellId, Vec<CellId>>,
    /// Passes that moved at least one tile
    pub passes: usize,
    /// False when the pass budget ran out before reaching a fixed point
    pub settled: bool,
}

impl SettleReport {
    pub fn moved(&self) -> bool {
        !self.moves.is_empty()
    }
}

/// Pass budget for a grid
pub fn pass_budget(grid: &Grid) -> usize {
    grid.size().max(1) * 2
}

/// Settle every unlocked letter in place.
///
/// Never fails: if the budget is exhausted the grid is returned as far as it
/// got and the report says `settled: false`.
pub fn settle(grid: &mut Grid, locked: &BTreeSet<CellId>) -> SettleReport {
    let mut report = SettleReport {
        settled: true,
        ..Default::default()
    };
    // current cell -> starting cell of the tile now in it
    let mut origin: HashMap<CellId, CellId> = HashMap::new();

    let budget = pass_budget(grid);
    let mut converged = false;
    for _ in 0..budget {
        if !settle_pass(grid, locked, &mut origin, &mut report.paths) {
            converged = true;
            break;
        }
        report.passes += 1;
    }

    if !converged && !is_settled(grid, locked) {
        log::warn!(
            "Settle budget of {} passes exhausted with floating tiles",
            budget
        );
        report.settled = false;
    }

    for (&start, path) in &report.paths {
        if let Some(&end) = path.last() {
            if end != start {
                report.moves.insert(end, start);
            }
        }
    }
    report
}

/// One bottom-up pass. Returns whether anything moved.
fn settle_pass(
    grid: &mut Grid,
    locked: &BTreeSet<CellId>,
    origin: &mut HashMap<CellId, CellId>,
    paths: &mut BTreeMap<CellId, Vec<CellId>>,
) -> bool {
    let rows = grid.rows();
    if rows < 2 {
        return false;
    }
    let mut moved = false;
    for row in (0..rows - 1).rev() {
        for id in grid.row_ids(row) {
            if locked.contains(&id) || !grid.is_occupied(id) {
                continue;
            }
            let Some(target) = grid
                .cells_below(id)
                .into_iter()
                .find(|&below| !grid.is_occupied(below) && !locked.contains(&below))
            else {
                continue;
            };
            move_tile(grid, id, target);

            let start = origin.remove(&id).unwrap_or(id);
            origin.insert(target, start);
            paths.entry(start).or_insert_with(|| vec![start]).push(target);
            moved = true;
        }
    }
    moved
}

/// Move a letter and the flags that travel with it
pub(crate) fn move_tile(grid: &mut Grid, from: CellId, to: CellId) {
    let Some(src) = grid.cell_mut(from) else {
        return;
    };
    let letter = src.take_letter();
    let pre_placed = std::mem::take(&mut src.is_pre_placed);
    let fresh = std::mem::take(&mut src.placed_this_turn);
    if let (Some(letter), Some(dst)) = (letter, grid.cell_mut(to)) {
        dst.set_letter(letter);
        dst.is_pre_placed = pre_placed;
        dst.placed_this_turn = fresh;
    }
}

/// True when no unlocked letter has an open cell below it
pub fn is_settled(grid: &Grid, locked: &BTreeSet<CellId>) -> bool {
    grid.cells().iter().all(|cell| {
        cell.is_empty()
            || locked.contains(&cell.id)
            || grid
                .cells_below(cell.id)
                .iter()
                .all(|&b| grid.is_occupied(b) || locked.contains(&b))
    })
}
