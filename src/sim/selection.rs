//! Tile selection and the word it spells
//!
//! The selection is an ordered path of adjacent, distinct, lettered cells.
//! Clicking a tile already on the path rewinds the path to just before it;
//! there is no other way to deselect.
//!
//! Every change bumps `seq`. A dictionary verdict is only applied when it
//! was requested for the current `seq`, so a slow lookup can never overwrite
//! the validity of a newer word.

use serde::{Deserialize, Serialize};

use super::error::ActionError;
use super::grid::{CellId, Grid};

/// Shortest submittable word
pub const MIN_WORD_LEN: usize = 3;

/// One step of the selection path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedTile {
    pub cell_id: CellId,
    pub letter: char,
    /// 0-based order of selection
    pub position: usize,
}

/// What a click did to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Appended,
    /// Path cut back; `removed` tiles dropped
    Rewound { removed: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    tiles: Vec<SelectedTile>,
    word: String,
    is_word_valid: bool,
    seq: u64,
}

impl Selection {
    pub fn tiles(&self) -> &[SelectedTile] {
        &self.tiles
    }

    pub fn ids(&self) -> Vec<CellId> {
        self.tiles.iter().map(|t| t.cell_id).collect()
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn is_word_valid(&self) -> bool {
        self.is_word_valid
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// The sole selected tile, if exactly one is selected
    pub fn single(&self) -> Option<CellId> {
        match self.tiles.as_slice() {
            [only] => Some(only.cell_id),
            _ => None,
        }
    }

    pub fn contains(&self, id: CellId) -> bool {
        self.tiles.iter().any(|t| t.cell_id == id)
    }

    /// Whether the current word is long enough to ask the dictionary about
    pub fn needs_validation(&self) -> bool {
        self.word.len() >= MIN_WORD_LEN
    }

    /// Click a cell: rewind if it is already on the path, otherwise append
    pub fn select(&mut self, grid: &Grid, id: CellId) -> Result<SelectOutcome, ActionError> {
        if let Some(pos) = self.tiles.iter().position(|t| t.cell_id == id) {
            let removed = self.tiles.len() - pos;
            self.tiles.truncate(pos);
            self.changed();
            return Ok(SelectOutcome::Rewound { removed });
        }

        let cell = grid.cell(id).ok_or(ActionError::UnknownCell(id))?;
        let letter = cell.letter.ok_or(ActionError::EmptyCell(id))?;
        if let Some(last) = self.tiles.last() {
            if !grid.are_adjacent(last.cell_id, id) {
                return Err(ActionError::NotAdjacent {
                    from: last.cell_id,
                    to: id,
                });
            }
        }

        self.tiles.push(SelectedTile {
            cell_id: id,
            letter,
            position: self.tiles.len(),
        });
        self.changed();
        Ok(SelectOutcome::Appended)
    }

    /// Apply a dictionary verdict requested at `seq` for `word`.
    /// Returns false (and changes nothing) when the verdict is stale.
    pub fn apply_verdict(&mut self, seq: u64, word: &str, valid: bool) -> bool {
        if seq != self.seq || word != self.word {
            return false;
        }
        self.is_word_valid = valid && self.needs_validation();
        true
    }

    pub fn clear(&mut self) {
        if !self.tiles.is_empty() {
            self.tiles.clear();
            self.changed();
        }
    }

    /// Mirror the path onto the grid's `is_selected` flags
    pub fn sync_flags(&self, grid: &mut Grid) {
        for cell in grid.cells_mut() {
            cell.is_selected = false;
        }
        for tile in &self.tiles {
            if let Some(cell) = grid.cell_mut(tile.cell_id) {
                cell.is_selected = true;
            }
        }
    }

    fn changed(&mut self) {
        self.word = self.tiles.iter().map(|t| t.letter).collect();
        // Forced false until a verdict for this exact word arrives
        self.is_word_valid = false;
        self.seq += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::RowLayout;
    use proptest::prelude::*;

    fn lettered_grid() -> Grid {
        let mut grid = Grid::build(5, RowLayout::Uniform);
        let ids: Vec<CellId> = grid.cells().iter().map(|c| c.id).collect();
        for id in ids {
            let letter = (b'A' + (id % 26) as u8) as char;
            grid.cell_mut(id).unwrap().set_letter(letter);
        }
        grid
    }

    #[test]
    fn test_select_builds_word() {
        let grid = lettered_grid();
        let mut sel = Selection::default();
        assert_eq!(sel.select(&grid, 0), Ok(SelectOutcome::Appended));
        assert_eq!(sel.select(&grid, 1), Ok(SelectOutcome::Appended));
        assert_eq!(sel.select(&grid, 2), Ok(SelectOutcome::Appended));
        assert_eq!(sel.word(), "ABC");
        assert_eq!(sel.tiles()[2].position, 2);
        assert!(sel.needs_validation());
        assert!(!sel.is_word_valid());
    }

    #[test]
    fn test_rejects_gaps_and_empties() {
        let mut grid = lettered_grid();
        let mut sel = Selection::default();
        sel.select(&grid, 0).unwrap();
        let seq = sel.seq();
        assert_eq!(
            sel.select(&grid, 2),
            Err(ActionError::NotAdjacent { from: 0, to: 2 })
        );
        grid.cell_mut(1).unwrap().take_letter();
        assert_eq!(sel.select(&grid, 1), Err(ActionError::EmptyCell(1)));
        assert_eq!(sel.select(&grid, 999), Err(ActionError::UnknownCell(999)));
        assert_eq!(sel.seq(), seq);
        assert_eq!(sel.word(), "A");
    }

    #[test]
    fn test_reselect_rewinds() {
        let grid = lettered_grid();
        let mut sel = Selection::default();
        for id in [0, 1, 2, 3] {
            sel.select(&grid, id).unwrap();
        }
        assert_eq!(sel.select(&grid, 1), Ok(SelectOutcome::Rewound { removed: 3 }));
        assert_eq!(sel.word(), "A");
        assert_eq!(sel.select(&grid, 0), Ok(SelectOutcome::Rewound { removed: 1 }));
        assert!(sel.is_empty());
    }

    #[test]
    fn test_stale_verdict_ignored() {
        let grid = lettered_grid();
        let mut sel = Selection::default();
        for id in [0, 1, 2] {
            sel.select(&grid, id).unwrap();
        }
        let (old_seq, old_word) = (sel.seq(), sel.word().to_string());
        sel.select(&grid, 3).unwrap();
        assert!(!sel.apply_verdict(old_seq, &old_word, true));
        assert!(!sel.is_word_valid());

        let (seq, word) = (sel.seq(), sel.word().to_string());
        assert!(sel.apply_verdict(seq, &word, true));
        assert!(sel.is_word_valid());
    }

    #[test]
    fn test_short_word_never_valid() {
        let grid = lettered_grid();
        let mut sel = Selection::default();
        sel.select(&grid, 0).unwrap();
        sel.select(&grid, 1).unwrap();
        assert!(sel.apply_verdict(sel.seq(), "AB", true));
        assert!(!sel.is_word_valid());
    }

    proptest! {
        #[test]
        fn prop_path_stays_adjacent_and_distinct(
            clicks in proptest::collection::vec(0u32..25, 1..40),
        ) {
            let grid = lettered_grid();
            let mut sel = Selection::default();
            for id in clicks {
                let _ = sel.select(&grid, id);
                let ids = sel.ids();
                for pair in ids.windows(2) {
                    prop_assert!(grid.are_adjacent(pair[0], pair[1]));
                }
                let mut sorted = ids.clone();
                sorted.sort();
                sorted.dedup();
                prop_assert_eq!(sorted.len(), ids.len());
                prop_assert_eq!(sel.word().len(), ids.len());
            }
        }
    }
}
