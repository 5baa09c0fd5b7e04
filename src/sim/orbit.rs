//! Orbit: rotating the letters around a pivot
//!
//! Neighbours are ordered by their real board angle. Each angle is snapped to
//! one of six 60° slots (slot 0 points right, slots increase clockwise on
//! screen since y grows downward). When two neighbours claim one slot the one
//! nearer the slot center keeps it. Edge and corner pivots simply have fewer
//! occupied slots; rotation runs over the present neighbours only.
//!
//! Positive steps rotate clockwise: each neighbour takes the letter of the
//! one counter-clockwise from it.

use std::collections::BTreeSet;
use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use super::error::ActionError;
use super::grid::{CellId, Grid};

/// Canonical hex directions
pub const SLOT_COUNT: usize = 6;

const SLOT_ANGLE: f32 = TAU / SLOT_COUNT as f32;

/// A neighbour and the angular slot it occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbitSlot {
    pub slot: usize,
    pub cell_id: CellId,
}

/// A validated rotation, ready to apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrbitPlan {
    pub pivot: CellId,
    /// Rotating cells, clockwise
    pub cells: Vec<CellId>,
    pub anchor: Option<CellId>,
    pub before: Vec<Option<char>>,
    pub after: Vec<Option<char>>,
    shift: usize,
}

/// Present neighbours of `pivot` in clockwise slot order
pub fn ordered_neighbors(grid: &Grid, pivot: CellId) -> Vec<OrbitSlot> {
    let Some(origin) = grid.center_of(pivot) else {
        return Vec::new();
    };
    let mut best: [Option<(CellId, f32)>; SLOT_COUNT] = [None; SLOT_COUNT];
    for id in grid.neighbors(pivot) {
        let Some(c) = grid.center_of(id) else {
            continue;
        };
        let delta = c - origin;
        let angle = delta.y.atan2(delta.x).rem_euclid(TAU);
        let exact = angle / SLOT_ANGLE;
        let slot = (exact.round() as usize) % SLOT_COUNT;
        let off = (exact - exact.round()).abs();
        match best[slot] {
            Some((_, prev)) if prev <= off => {}
            _ => best[slot] = Some((id, off)),
        }
    }
    best.iter()
        .enumerate()
        .filter_map(|(slot, entry)| entry.map(|(cell_id, _)| OrbitSlot { slot, cell_id }))
        .collect()
}

/// Check a rotation without touching the grid.
///
/// The anchor (if it is a neighbour) and locked neighbours keep their
/// letters; the rest rotate by `steps`.
pub fn plan_orbit(
    grid: &Grid,
    pivot: CellId,
    steps: i32,
    anchor: Option<CellId>,
    locked: &BTreeSet<CellId>,
) -> Result<OrbitPlan, ActionError> {
    if grid.cell(pivot).is_none() {
        return Err(ActionError::UnknownCell(pivot));
    }
    let ring = ordered_neighbors(grid, pivot);
    let anchor = anchor.filter(|a| ring.iter().any(|s| s.cell_id == *a));

    let cells: Vec<CellId> = ring
        .iter()
        .map(|s| s.cell_id)
        .filter(|id| Some(*id) != anchor && !locked.contains(id))
        .collect();
    if cells.len() < 2 {
        return Err(ActionError::TooFewRotatable { found: cells.len() });
    }

    let shift = rotation_shift(steps, cells.len());
    let before: Vec<Option<char>> = cells.iter().map(|&id| grid.letter(id)).collect();
    let after = rotate(&before, shift);
    if after == before {
        return Err(ActionError::NoOpRotation);
    }

    Ok(OrbitPlan {
        pivot,
        cells,
        anchor,
        before,
        after,
        shift,
    })
}

/// Write a planned rotation into the grid. Tile flags travel with letters.
pub fn apply_orbit(grid: &mut Grid, plan: &OrbitPlan) {
    let tiles: Vec<(Option<char>, bool, bool)> = plan
        .cells
        .iter()
        .map(|&id| {
            grid.cell(id)
                .map(|c| (c.letter, c.is_pre_placed, c.placed_this_turn))
                .unwrap_or((None, false, false))
        })
        .collect();
    let rotated = rotate(&tiles, plan.shift);
    for (&id, (letter, pre_placed, fresh)) in plan.cells.iter().zip(rotated) {
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

/// Normalized clockwise shift for `steps` over `len` cells
fn rotation_shift(steps: i32, len: usize) -> usize {
    steps.rem_euclid(len as i32) as usize
}

/// `out[i] = items[i - shift]` (cyclic)
fn rotate<T: Clone>(items: &[T], shift: usize) -> Vec<T> {
    let n = items.len();
    (0..n).map(|i| items[(i + n - shift) % n].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::RowLayout;
    use proptest::prelude::*;

    fn letter_ring(grid: &mut Grid, pivot: CellId, letters: &str) -> Vec<CellId> {
        let ring: Vec<CellId> = ordered_neighbors(grid, pivot)
            .iter()
            .map(|s| s.cell_id)
            .collect();
        for (&id, letter) in ring.iter().zip(letters.chars()) {
            grid.cell_mut(id).unwrap().set_letter(letter);
        }
        ring
    }

    fn letters_of(grid: &Grid, ring: &[CellId]) -> String {
        ring.iter().map(|&id| grid.letter(id).unwrap_or('.')).collect()
    }

    #[test]
    fn test_interior_slots_clockwise() {
        let grid = Grid::build(5, RowLayout::Uniform);
        let pivot = grid.id_at(2, 2).unwrap();
        let ring = ordered_neighbors(&grid, pivot);
        let slots: Vec<usize> = ring.iter().map(|s| s.slot).collect();
        assert_eq!(slots, vec![0, 1, 2, 3, 4, 5]);
        let expect = [
            grid.id_at(2, 3),
            grid.id_at(3, 2), // below-right (even row)
            grid.id_at(3, 1), // below-left
            grid.id_at(2, 1),
            grid.id_at(1, 1), // above-left
            grid.id_at(1, 2), // above-right
        ];
        let ids: Vec<Option<CellId>> = ring.iter().map(|s| Some(s.cell_id)).collect();
        assert_eq!(ids, expect.to_vec());
    }

    #[test]
    fn test_corner_has_fewer_slots() {
        let grid = Grid::build(5, RowLayout::Uniform);
        let pivot = grid.id_at(0, 0).unwrap();
        let ring = ordered_neighbors(&grid, pivot);
        assert_eq!(ring.len(), 2);
        assert_eq!(ring[0].slot, 0);
        assert_eq!(ring[1].slot, 1);
    }

    #[test]
    fn test_rotate_plus_one() {
        let mut grid = Grid::build(5, RowLayout::Uniform);
        let pivot = grid.id_at(2, 2).unwrap();
        grid.cell_mut(pivot).unwrap().set_letter('P');
        let ring = letter_ring(&mut grid, pivot, "ABCDEF");

        let plan = plan_orbit(&grid, pivot, 1, None, &BTreeSet::new()).unwrap();
        apply_orbit(&mut grid, &plan);
        assert_eq!(letters_of(&grid, &ring), "FABCDE");
        assert_eq!(grid.letter(pivot), Some('P'));

        let plan = plan_orbit(&grid, pivot, -2, None, &BTreeSet::new()).unwrap();
        apply_orbit(&mut grid, &plan);
        assert_eq!(letters_of(&grid, &ring), "BCDEFA");
    }

    #[test]
    fn test_anchor_and_locks_hold() {
        let mut grid = Grid::build(5, RowLayout::Uniform);
        let pivot = grid.id_at(2, 2).unwrap();
        let ring = letter_ring(&mut grid, pivot, "ABCDEF");
        let locked: BTreeSet<CellId> = [ring[3]].into_iter().collect();

        let plan = plan_orbit(&grid, pivot, 1, Some(ring[0]), &locked).unwrap();
        assert_eq!(plan.cells.len(), 4);
        apply_orbit(&mut grid, &plan);
        // A (anchor) and D (locked) stay; B C E F rotate clockwise
        assert_eq!(letters_of(&grid, &ring), "AFBDCE");
    }

    #[test]
    fn test_far_anchor_ignored() {
        let mut grid = Grid::build(5, RowLayout::Uniform);
        let pivot = grid.id_at(2, 2).unwrap();
        let ring = letter_ring(&mut grid, pivot, "ABCDEF");
        let far = grid.id_at(4, 4).unwrap();
        grid.cell_mut(far).unwrap().set_letter('Z');

        let plan = plan_orbit(&grid, pivot, 1, Some(far), &BTreeSet::new()).unwrap();
        assert_eq!(plan.anchor, None);
        assert_eq!(plan.cells.len(), 6);
        apply_orbit(&mut grid, &plan);
        assert_eq!(letters_of(&grid, &ring), "FABCDE");
        assert_eq!(grid.letter(far), Some('Z'));
    }

    #[test]
    fn test_rejections() {
        let mut grid = Grid::build(5, RowLayout::Uniform);
        let pivot = grid.id_at(2, 2).unwrap();
        let ring = letter_ring(&mut grid, pivot, "AAAAAA");
        assert_eq!(
            plan_orbit(&grid, pivot, 1, None, &BTreeSet::new()),
            Err(ActionError::NoOpRotation)
        );

        let ring_letters = letter_ring(&mut grid, pivot, "ABCDEF");
        assert_eq!(ring, ring_letters);
        assert_eq!(
            plan_orbit(&grid, pivot, 6, None, &BTreeSet::new()),
            Err(ActionError::NoOpRotation)
        );

        let corner = grid.id_at(0, 0).unwrap();
        let locked: BTreeSet<CellId> = [grid.id_at(0, 1).unwrap()].into_iter().collect();
        assert_eq!(
            plan_orbit(&grid, corner, 1, None, &locked),
            Err(ActionError::TooFewRotatable { found: 1 })
        );
    }

    #[test]
    fn test_empty_neighbours_rotate_as_gaps() {
        let mut grid = Grid::build(5, RowLayout::Uniform);
        let pivot = grid.id_at(2, 2).unwrap();
        let ring = letter_ring(&mut grid, pivot, "AB");
        let plan = plan_orbit(&grid, pivot, 1, None, &BTreeSet::new()).unwrap();
        apply_orbit(&mut grid, &plan);
        assert_eq!(letters_of(&grid, &ring), ".AB...");
    }

    proptest! {
        #[test]
        fn prop_orbit_round_trip(
            row in 0usize..5,
            col in 0usize..5,
            steps in -7i32..8,
            anchor_pick in 0usize..7,
            letters in "[A-Z]{6}",
        ) {
            let mut grid = Grid::build(5, RowLayout::Uniform);
            let pivot = grid.id_at(row, col).unwrap();
            let ring = letter_ring(&mut grid, pivot, &letters);
            let anchor = ring.get(anchor_pick).copied();
            let original = letters_of(&grid, &ring);

            if let Ok(plan) = plan_orbit(&grid, pivot, steps, anchor, &BTreeSet::new()) {
                apply_orbit(&mut grid, &plan);
                let back = plan_orbit(&grid, pivot, -steps, anchor, &BTreeSet::new());
                prop_assert!(back.is_ok());
                apply_orbit(&mut grid, &back.unwrap());
                prop_assert_eq!(letters_of(&grid, &ring), original);
            }
        }
    }
}
