//! Honeycomb grid model
//!
//! Cells are stored row-major. Odd rows sit half a cell to the right of even
//! rows (odd-row offset), so every interior cell touches six others: two in
//! its own row and two in each neighbouring row.
//!
//! Cell ids are the row-major index and never change once the grid is built.
//! Only letters and flags mutate afterwards.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable identifier of a cell within one game
pub type CellId = u32;

/// Vertical distance between row centers for unit-width hexes
pub const ROW_HEIGHT: f32 = 0.866_025_4; // sqrt(3) / 2

/// Row/column address of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Horizontal coordinate in half-cell units (odd rows shifted by one half)
    #[inline]
    fn doubled_x(&self) -> isize {
        (self.col * 2 + self.row % 2) as isize
    }
}

/// How many cells each row holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RowLayout {
    /// Every row holds `size` cells
    #[default]
    Uniform,
    /// Odd rows hold one cell fewer, nesting between the even rows
    Alternating,
}

/// A single hex slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub id: CellId,
    pub position: Position,
    /// Uppercase letter, `None` when the slot is empty
    pub letter: Option<char>,
    /// Letter present and resting
    pub is_placed: bool,
    /// Seeded at game start
    #[serde(default)]
    pub is_pre_placed: bool,
    /// One-shot score multiplier
    #[serde(default)]
    pub is_double_score: bool,

    // Transient UI flags (set by the core, never read back for decisions)
    #[serde(default)]
    pub is_selected: bool,
    #[serde(default)]
    pub placed_this_turn: bool,
    #[serde(default)]
    pub is_piston_target: bool,
}

impl Cell {
    fn new(id: CellId, position: Position) -> Self {
        Self {
            id,
            position,
            letter: None,
            is_placed: false,
            is_pre_placed: false,
            is_double_score: false,
            is_selected: false,
            placed_this_turn: false,
            is_piston_target: false,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.letter.is_none()
    }

    /// Put a resting letter in this cell
    pub fn set_letter(&mut self, letter: char) {
        self.letter = Some(letter.to_ascii_uppercase());
        self.is_placed = true;
    }

    /// Empty the cell, returning whatever letter it held
    pub fn take_letter(&mut self) -> Option<char> {
        self.is_placed = false;
        self.letter.take()
    }
}

/// Whether two positions are hex neighbours.
///
/// Same row: columns differ by exactly one. Adjacent rows: the half-cell
/// offset puts exactly two cells of the other row within half a cell
/// horizontally. Symmetric and irreflexive.
pub fn adjacent(a: Position, b: Position) -> bool {
    let dx = (a.doubled_x() - b.doubled_x()).abs();
    match a.row.abs_diff(b.row) {
        0 => dx == 2,
        1 => dx == 1,
        _ => false,
    }
}

/// Board-space center of a position (unit cell width, y grows downward)
pub fn center(position: Position) -> Vec2 {
    Vec2::new(
        position.doubled_x() as f32 * 0.5,
        position.row as f32 * ROW_HEIGHT,
    )
}

/// The honeycomb board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    layout: RowLayout,
    cells: Vec<Cell>,
    /// Index of the first cell of each row
    row_starts: Vec<usize>,
}

impl Grid {
    /// Build an empty board with `size` rows.
    ///
    /// Ids are assigned row-major from 0, so the same size and layout always
    /// produce the same ids and positions.
    pub fn build(size: usize, layout: RowLayout) -> Self {
        let mut cells = Vec::new();
        let mut row_starts = Vec::with_capacity(size);
        for row in 0..size {
            row_starts.push(cells.len());
            for col in 0..row_len_for(size, layout, row) {
                let id = cells.len() as CellId;
                cells.push(Cell::new(id, Position::new(row, col)));
            }
        }
        Self {
            size,
            layout,
            cells,
            row_starts,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn layout(&self) -> RowLayout {
        self.layout
    }

    pub fn rows(&self) -> usize {
        self.row_starts.len()
    }

    pub fn row_len(&self, row: usize) -> usize {
        if row >= self.rows() {
            return 0;
        }
        row_len_for(self.size, self.layout, row)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id as usize)
    }

    pub fn cell_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.cells.get_mut(id as usize)
    }

    pub fn letter(&self, id: CellId) -> Option<char> {
        self.cell(id).and_then(|c| c.letter)
    }

    pub fn is_occupied(&self, id: CellId) -> bool {
        self.letter(id).is_some()
    }

    pub fn id_at(&self, row: usize, col: usize) -> Option<CellId> {
        if col >= self.row_len(row) {
            return None;
        }
        Some((self.row_starts[row] + col) as CellId)
    }

    pub fn cell_at(&self, position: Position) -> Option<&Cell> {
        self.id_at(position.row, position.col)
            .and_then(|id| self.cell(id))
    }

    /// Ids of one row, left to right
    pub fn row_ids(&self, row: usize) -> Vec<CellId> {
        (0..self.row_len(row))
            .filter_map(|col| self.id_at(row, col))
            .collect()
    }

    /// Ids of the entry row
    pub fn top_row(&self) -> Vec<CellId> {
        self.row_ids(0)
    }

    pub fn are_adjacent(&self, a: CellId, b: CellId) -> bool {
        match (self.cell(a), self.cell(b)) {
            (Some(a), Some(b)) => adjacent(a.position, b.position),
            _ => false,
        }
    }

    /// Every cell adjacent to `id`, in id order
    pub fn neighbors(&self, id: CellId) -> Vec<CellId> {
        let Some(cell) = self.cell(id) else {
            return Vec::new();
        };
        let pos = cell.position;
        let mut out = Vec::with_capacity(6);
        for row in pos.row.saturating_sub(1)..=pos.row + 1 {
            for col in pos.col.saturating_sub(1)..=pos.col + 1 {
                let other = Position::new(row, col);
                if adjacent(pos, other) {
                    if let Some(other_id) = self.id_at(row, col) {
                        out.push(other_id);
                    }
                }
            }
        }
        out
    }

    /// Neighbours in the next row down, straight-down (same column) first
    pub fn cells_below(&self, id: CellId) -> Vec<CellId> {
        let Some(cell) = self.cell(id) else {
            return Vec::new();
        };
        let pos = cell.position;
        let mut below: Vec<CellId> = self
            .neighbors(id)
            .into_iter()
            .filter(|&n| self.cells[n as usize].position.row == pos.row + 1)
            .collect();
        below.sort_by_key(|&n| {
            let col = self.cells[n as usize].position.col;
            (col != pos.col, col)
        });
        below
    }

    /// Board-space center of a cell
    pub fn center_of(&self, id: CellId) -> Option<Vec2> {
        self.cell(id).map(|c| center(c.position))
    }

    /// Letters spelled by a sequence of cells (empty cells contribute nothing)
    pub fn word_for(&self, ids: &[CellId]) -> String {
        ids.iter().filter_map(|&id| self.letter(id)).collect()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.letter.is_some()).count()
    }

    /// Drop every transient UI flag
    pub fn clear_transient_flags(&mut self) {
        for cell in &mut self.cells {
            cell.is_selected = false;
            cell.is_piston_target = false;
        }
    }
}

fn row_len_for(size: usize, layout: RowLayout, row: usize) -> usize {
    match layout {
        RowLayout::Uniform => size,
        RowLayout::Alternating if row % 2 == 1 => size.saturating_sub(1),
        RowLayout::Alternating => size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_build_ids_are_row_major() {
        let grid = Grid::build(5, RowLayout::Uniform);
        assert_eq!(grid.len(), 25);
        for (i, cell) in grid.cells().iter().enumerate() {
            assert_eq!(cell.id as usize, i);
            assert_eq!(cell.position, Position::new(i / 5, i % 5));
            assert!(cell.is_empty());
        }

        let alt = Grid::build(5, RowLayout::Alternating);
        assert_eq!(alt.len(), 5 + 4 + 5 + 4 + 5);
        assert_eq!(alt.row_len(1), 4);
        assert_eq!(alt.id_at(1, 0), Some(5));
        assert_eq!(alt.id_at(1, 4), None);
    }

    #[test]
    fn test_interior_cell_has_six_neighbors() {
        let grid = Grid::build(5, RowLayout::Uniform);
        let id = grid.id_at(2, 2).unwrap();
        assert_eq!(grid.neighbors(id).len(), 6);

        // Even-row corner: right neighbour and one below
        let corner = grid.id_at(0, 0).unwrap();
        assert_eq!(grid.neighbors(corner), vec![1, 5]);
    }

    #[test]
    fn test_odd_row_neighbors_shift_right() {
        let grid = Grid::build(5, RowLayout::Uniform);
        let odd = grid.id_at(1, 1).unwrap();
        let mut expected = vec![
            grid.id_at(0, 1).unwrap(),
            grid.id_at(0, 2).unwrap(),
            grid.id_at(1, 0).unwrap(),
            grid.id_at(1, 2).unwrap(),
            grid.id_at(2, 1).unwrap(),
            grid.id_at(2, 2).unwrap(),
        ];
        expected.sort();
        assert_eq!(grid.neighbors(odd), expected);
    }

    #[test]
    fn test_cells_below_prefers_straight_down() {
        let grid = Grid::build(5, RowLayout::Uniform);
        let even = grid.id_at(0, 2).unwrap();
        assert_eq!(
            grid.cells_below(even),
            vec![grid.id_at(1, 2).unwrap(), grid.id_at(1, 1).unwrap()]
        );
        let odd = grid.id_at(1, 2).unwrap();
        assert_eq!(
            grid.cells_below(odd),
            vec![grid.id_at(2, 2).unwrap(), grid.id_at(2, 3).unwrap()]
        );
        let bottom = grid.id_at(4, 0).unwrap();
        assert!(grid.cells_below(bottom).is_empty());
    }

    #[test]
    fn test_neighbor_centers_are_unit_distance() {
        let grid = Grid::build(6, RowLayout::Alternating);
        for cell in grid.cells() {
            for n in grid.neighbors(cell.id) {
                let d = grid.center_of(cell.id).unwrap().distance(grid.center_of(n).unwrap());
                assert!((d - 1.0).abs() < 1e-4, "distance {d}");
            }
        }
    }

    #[test]
    fn test_word_for_skips_empty_cells() {
        let mut grid = Grid::build(3, RowLayout::Uniform);
        grid.cell_mut(0).unwrap().set_letter('c');
        grid.cell_mut(1).unwrap().set_letter('A');
        assert_eq!(grid.word_for(&[0, 1, 2]), "CA");
        assert_eq!(grid.occupied_count(), 2);
        assert_eq!(grid.cell_mut(0).unwrap().take_letter(), Some('C'));
        assert!(!grid.cell(0).unwrap().is_placed);
    }

    proptest! {
        #[test]
        fn prop_adjacency_symmetric_and_irreflexive(
            size in 2usize..9,
            alternating in any::<bool>(),
        ) {
            let layout = if alternating { RowLayout::Alternating } else { RowLayout::Uniform };
            let grid = Grid::build(size, layout);
            for a in grid.cells() {
                prop_assert!(!adjacent(a.position, a.position));
                for b in grid.cells() {
                    prop_assert_eq!(
                        adjacent(a.position, b.position),
                        adjacent(b.position, a.position)
                    );
                }
                prop_assert!(grid.neighbors(a.id).len() <= 6);
            }
        }
    }
}
