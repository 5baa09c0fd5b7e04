//! Finding words already spelled on the board
//!
//! Depth-first search over simple adjacent paths, pruned by dictionary
//! prefixes. Used by the auto-clear phase and by the idle/demo player.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::dictionary::Dictionary;
use super::grid::{CellId, Grid};

/// Longest path the search will follow
pub const MAX_SEARCH_LEN: usize = 8;

/// A word spelled by a path of cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundWord {
    pub word: String,
    pub cells: Vec<CellId>,
}

/// Best word on the board of at least `min_len` letters.
///
/// Longest wins; among equals the first found wins, i.e. lowest starting id
/// then lowest ids along the path. Cells in `excluded` are never used.
pub fn find_word(
    grid: &Grid,
    dict: &Dictionary,
    min_len: usize,
    excluded: &BTreeSet<CellId>,
) -> Option<FoundWord> {
    let mut search = Search {
        grid,
        dict,
        min_len,
        excluded,
        path: Vec::with_capacity(MAX_SEARCH_LEN),
        word: String::with_capacity(MAX_SEARCH_LEN),
        best: None,
    };
    for cell in grid.cells() {
        if cell.letter.is_some() && !excluded.contains(&cell.id) {
            search.visit(cell.id);
        }
        if search.best.as_ref().is_some_and(|b| b.cells.len() == MAX_SEARCH_LEN) {
            break;
        }
    }
    search.best
}

struct Search<'a> {
    grid: &'a Grid,
    dict: &'a Dictionary,
    min_len: usize,
    excluded: &'a BTreeSet<CellId>,
    path: Vec<CellId>,
    word: String,
    best: Option<FoundWord>,
}

impl Search<'_> {
    fn visit(&mut self, id: CellId) {
        let Some(letter) = self.grid.letter(id) else {
            return;
        };
        self.path.push(id);
        self.word.push(letter);

        if self.dict.has_prefix(&self.word) {
            let len = self.word.len();
            if len >= self.min_len
                && self.dict.contains(&self.word)
                && self.best.as_ref().is_none_or(|b| len > b.cells.len())
            {
                self.best = Some(FoundWord {
                    word: self.word.clone(),
                    cells: self.path.clone(),
                });
            }
            if len < MAX_SEARCH_LEN {
                for next in self.grid.neighbors(id) {
                    if !self.path.contains(&next) && !self.excluded.contains(&next) {
                        self.visit(next);
                    }
                }
            }
        }

        self.path.pop();
        self.word.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::RowLayout;

    fn grid_with_row(letters: &str) -> Grid {
        let mut grid = Grid::build(5, RowLayout::Uniform);
        for (col, ch) in letters.chars().enumerate() {
            if ch != '.' {
                let id = grid.id_at(4, col).unwrap();
                grid.cell_mut(id).unwrap().set_letter(ch);
            }
        }
        grid
    }

    #[test]
    fn test_finds_longest_word() {
        let dict = Dictionary::from_word_list("ten\ntone\nnote\n").unwrap();
        let grid = grid_with_row("TONE.");
        let found = find_word(&grid, &dict, 3, &BTreeSet::new()).unwrap();
        assert_eq!(found.word, "TONE");
        assert_eq!(found.cells, grid.row_ids(4)[..4].to_vec());
    }

    #[test]
    fn test_respects_min_len_and_exclusions() {
        let dict = Dictionary::from_word_list("tea\n").unwrap();
        let grid = grid_with_row("TEA..");
        assert!(find_word(&grid, &dict, 4, &BTreeSet::new()).is_none());

        let excluded: BTreeSet<CellId> = [grid.id_at(4, 1).unwrap()].into_iter().collect();
        assert!(find_word(&grid, &dict, 3, &excluded).is_none());
        assert!(find_word(&grid, &dict, 3, &BTreeSet::new()).is_some());
    }

    #[test]
    fn test_follows_hex_adjacency() {
        let dict = Dictionary::from_word_list("cat\n").unwrap();
        let mut grid = Grid::build(5, RowLayout::Uniform);
        // C at (3,1), A at (4,1), T at (4,2): a bent path
        let c = grid.id_at(3, 1).unwrap();
        let a = grid.id_at(4, 1).unwrap();
        let t = grid.id_at(4, 2).unwrap();
        grid.cell_mut(c).unwrap().set_letter('C');
        grid.cell_mut(a).unwrap().set_letter('A');
        grid.cell_mut(t).unwrap().set_letter('T');
        let found = find_word(&grid, &dict, 3, &BTreeSet::new()).unwrap();
        assert_eq!(found.cells, vec![c, a, t]);
    }

    #[test]
    fn test_empty_board_finds_nothing() {
        let dict = Dictionary::bundled().unwrap();
        let grid = Grid::build(4, RowLayout::Alternating);
        assert!(find_word(&grid, &dict, 3, &BTreeSet::new()).is_none());
    }
}
