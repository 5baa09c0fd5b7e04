//! Flood: new letters entering at the top row
//!
//! Letters are spread over the empty top-row cells, the board is settled,
//! and every entered tile gets the exact path it fell along plus a batch
//! (start offset) chosen so that two tiles never sit in the same cell at the
//! same animation step.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::gravity::{SettleReport, settle};
use super::grid::{CellId, Grid};

/// Two visits to one cell closer than this many steps count as a collision
pub const SLOT_BUFFER: u32 = 1;

/// Animation path of one entered tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloodPathEntry {
    /// Entry cell first, resting cell last
    pub path: Vec<CellId>,
    /// Start offset in steps; tiles sharing a batch animate together
    pub batch: u32,
}

impl FloodPathEntry {
    /// Step at which this tile occupies `path[step]`
    pub fn time_at(&self, step: usize) -> u32 {
        self.batch + step as u32
    }
}

/// Result of a flood event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FloodOutcome {
    /// Letters handed in
    pub supplied: usize,
    /// Letters that found an empty top-row slot
    pub placed: usize,
    pub paths: Vec<FloodPathEntry>,
    pub settle: SettleReport,
    /// Top row completely occupied after a flood that supplied letters
    pub game_over: bool,
}

/// Pick which of `available` empty slots receive `letters` tiles.
///
/// Fewer letters than slots are spread evenly left to right; otherwise one
/// per slot from the left.
pub fn entry_slots(available: usize, letters: usize) -> Vec<usize> {
    if letters == 0 || available == 0 {
        return Vec::new();
    }
    if letters >= available {
        return (0..available).collect();
    }
    (0..letters)
        .map(|i| (2 * i + 1) * available / (2 * letters))
        .collect()
}

/// Drop `letters` in at the top and settle the board
pub fn flood(grid: &mut Grid, locked: &BTreeSet<CellId>, letters: &[char]) -> FloodOutcome {
    for cell in grid.cells_mut() {
        cell.placed_this_turn = false;
    }

    let open: Vec<CellId> = grid
        .top_row()
        .into_iter()
        .filter(|&id| !grid.is_occupied(id) && !locked.contains(&id))
        .collect();
    let slots = entry_slots(open.len(), letters.len());

    let mut entries = Vec::with_capacity(slots.len());
    for (&slot, &letter) in slots.iter().zip(letters) {
        let id = open[slot];
        if let Some(cell) = grid.cell_mut(id) {
            cell.set_letter(letter);
            cell.placed_this_turn = true;
            entries.push(id);
        }
    }
    if entries.len() < letters.len() {
        log::debug!(
            "Flood: {} of {} letters placed, top row has no more room",
            entries.len(),
            letters.len()
        );
    }

    let report = settle(grid, locked);

    let paths: Vec<Vec<CellId>> = entries
        .iter()
        .map(|&entry| {
            report
                .paths
                .get(&entry)
                .cloned()
                .unwrap_or_else(|| vec![entry])
        })
        .collect();
    let batches = assign_batches(&paths);

    let game_over = !letters.is_empty() && top_row_full(grid);

    FloodOutcome {
        supplied: letters.len(),
        placed: entries.len(),
        paths: paths
            .into_iter()
            .zip(batches)
            .map(|(path, batch)| FloodPathEntry { path, batch })
            .collect(),
        settle: report,
        game_over,
    }
}

/// Every top-row cell holds a letter
pub fn top_row_full(grid: &Grid) -> bool {
    grid.top_row().iter().all(|&id| grid.is_occupied(id))
}

/// Choose a start offset for each path.
///
/// Shortest (most constrained) paths are scheduled first. Each takes the
/// smallest offset whose cell visits stay more than [`SLOT_BUFFER`] steps
/// away from every visit already reserved, then reserves its own.
pub fn assign_batches(paths: &[Vec<CellId>]) -> Vec<u32> {
    let mut order: Vec<usize> = (0..paths.len()).collect();
    order.sort_by_key(|&i| (paths[i].len(), paths[i].first().copied()));

    let mut reserved: HashMap<CellId, Vec<u32>> = HashMap::new();
    let mut latest = 0u32;
    let mut batches = vec![0u32; paths.len()];

    for i in order {
        let path = &paths[i];
        // Past every reservation nothing can collide
        let limit = latest + SLOT_BUFFER + 1;
        let offset = (0..=limit)
            .find(|&offset| {
                path.iter().enumerate().all(|(step, cell)| {
                    let t = offset + step as u32;
                    reserved
                        .get(cell)
                        .is_none_or(|times| times.iter().all(|&r| r.abs_diff(t) > SLOT_BUFFER))
                })
            })
            .unwrap_or(limit);

        for (step, &cell) in path.iter().enumerate() {
            let t = offset + step as u32;
            reserved.entry(cell).or_default().push(t);
            latest = latest.max(t);
        }
        batches[i] = offset;
    }
    batches
}
