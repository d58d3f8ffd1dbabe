//! Solver orchestrator.
//!
//! Owns the candidate map and step trace, applies the technique pipeline in
//! a fixed order, and supports snapshot/restore for hypothetical reasoning.
//! Two solver instances share the immutable `Puzzle` and `BoardIndex` by
//! reference only; each owns its mutable state exclusively.

mod hypothetical;
mod rooms;
mod sets;
mod singles;
mod types;

use std::collections::{BTreeMap, BTreeSet};

use log::trace;

use crate::board::BoardIndex;
use crate::constraint::apply_static;
use crate::puzzle::{CellKey, Puzzle, PuzzleError};

pub use types::{SolveStep, Technique};

/// Hard cap on `solve` iterations; reaching it is treated like no progress.
const MAX_SOLVE_ITERATIONS: usize = 200;

/// Constraint-propagation solver for one puzzle interaction.
pub struct Solver<'p> {
    puzzle: &'p Puzzle,
    board: &'p BoardIndex,
    /// Candidate cells per suspect, indexed by declared suspect order.
    /// Invariant: a placed suspect's set is the singleton of its cell.
    candidates: Vec<BTreeSet<CellKey>>,
    placed: BTreeMap<usize, CellKey>,
    steps: Vec<SolveStep>,
}

/// Deep copy of the solver's mutable state. Candidate sets are cloned
/// element-wise; a shallow top-level copy would alias the sets.
pub(crate) struct Snapshot {
    candidates: Vec<BTreeSet<CellKey>>,
    placed: BTreeMap<usize, CellKey>,
    step_len: usize,
}

impl<'p> Solver<'p> {
    pub fn new(puzzle: &'p Puzzle, board: &'p BoardIndex) -> Self {
        Solver {
            puzzle,
            board,
            candidates: Vec::new(),
            placed: BTreeMap::new(),
            steps: Vec::new(),
        }
    }

    pub fn puzzle(&self) -> &'p Puzzle {
        self.puzzle
    }

    pub fn board(&self) -> &'p BoardIndex {
        self.board
    }

    /// Clear all state, compute initial candidate sets from the static
    /// filters, apply the host's placements, then propagate to a fixed
    /// point.
    ///
    /// Placements are validated before any propagation: out-of-bounds or
    /// non-occupiable cells and row/column conflicts are precondition
    /// violations, not game states.
    pub fn initialize(
        &mut self,
        placements: &BTreeMap<CellKey, String>,
    ) -> Result<(), PuzzleError> {
        self.placed.clear();
        self.steps.clear();
        let (puzzle, board) = (self.puzzle, self.board);
        self.candidates = puzzle
            .suspects
            .iter()
            .map(|suspect| {
                let mut cells = board.occupiable().clone();
                for constraint in &suspect.constraints {
                    if constraint.is_static() {
                        apply_static(&mut cells, constraint, board);
                    }
                }
                cells
            })
            .collect();

        self.validate_placements(placements)?;

        // Apply every pre-placement before propagating: interleaving would
        // let the cascade place a suspect the host map also names.
        for (idx, suspect) in self.puzzle.suspects.iter().enumerate() {
            if let Some((&key, _)) = placements.iter().find(|(_, id)| **id == suspect.id) {
                self.place_unpropagated(idx, key);
            }
        }
        self.propagate_basic();
        Ok(())
    }

    fn validate_placements(
        &self,
        placements: &BTreeMap<CellKey, String>,
    ) -> Result<(), PuzzleError> {
        for (&key, id) in placements {
            let Some(info) = self.board.cell(key) else {
                return Err(PuzzleError::PlacementOutOfBounds { key });
            };
            if !info.cell_type.is_occupiable() {
                return Err(PuzzleError::PlacementNotOccupiable {
                    key,
                    cell_type: info.cell_type,
                });
            }
            if self.puzzle.suspect_index(id).is_none() {
                return Err(PuzzleError::PlacementUnknownSuspect { id: id.clone() });
            }
        }
        let entries: Vec<(&CellKey, &String)> = placements.iter().collect();
        for (i, (a, id_a)) in entries.iter().enumerate() {
            for (b, id_b) in &entries[i + 1..] {
                if a.row == b.row || a.col == b.col || id_a == id_b {
                    return Err(PuzzleError::PlacementConflict { a: **a, b: **b });
                }
            }
        }
        Ok(())
    }

    // ==================== Core primitives ====================

    /// Place a suspect: record the placement, collapse its candidate set,
    /// exclude the cell plus its whole row and column from every other
    /// unplaced suspect, then propagate naked singles to a fixed point.
    pub fn place(&mut self, idx: usize, key: CellKey) {
        self.place_unpropagated(idx, key);
        self.propagate_basic();
    }

    fn place_unpropagated(&mut self, idx: usize, key: CellKey) {
        debug_assert!(!self.placed.contains_key(&idx));
        self.placed.insert(idx, key);
        self.candidates[idx] = BTreeSet::from([key]);
        for other in 0..self.candidates.len() {
            if other == idx || self.placed.contains_key(&other) {
                continue;
            }
            self.candidates[other]
                .retain(|k| k.row != key.row && k.col != key.col);
        }
    }

    /// Iterated naked-single placement. Every placement performed here is
    /// recorded as a `NakedSingle` step so the trace carries the full
    /// cascade. Returns whether anything was placed.
    pub(crate) fn propagate_basic(&mut self) -> bool {
        let mut progressed = false;
        loop {
            let next = (0..self.candidates.len()).find(|idx| {
                !self.placed.contains_key(idx) && self.candidates[*idx].len() == 1
            });
            let Some(idx) = next else { break };
            let key = *self.candidates[idx].iter().next().expect("len checked");
            let suspect = &self.puzzle.suspects[idx];
            trace!(
                target: "cluegrid::solver",
                "naked single: {} -> {key}",
                suspect.id
            );
            self.steps.push(SolveStep {
                technique: Technique::NakedSingle,
                suspect_id: suspect.id.clone(),
                cell_key: Some(key),
                message: format!("{} can only be at {key}.", suspect.name),
                highlight_cells: vec![key],
                eliminated_cells: Vec::new(),
            });
            self.place_unpropagated(idx, key);
            progressed = true;
        }
        progressed
    }

    /// Push a technique step, run basic propagation behind it, and hand the
    /// step back to the pipeline.
    pub(crate) fn commit(&mut self, step: SolveStep) -> SolveStep {
        trace!(
            target: "cluegrid::solver",
            "{}: {} ({} eliminated)",
            step.technique,
            step.suspect_id,
            step.eliminated_cells.len()
        );
        self.steps.push(step.clone());
        self.propagate_basic();
        step
    }

    // ==================== Public queries ====================

    pub fn is_solved(&self) -> bool {
        self.placed.len() == self.puzzle.suspects.len()
    }

    /// Read-only view of placements, keyed by declared suspect index.
    pub fn placed(&self) -> &BTreeMap<usize, CellKey> {
        &self.placed
    }

    pub fn placed_cell(&self, id: &str) -> Option<CellKey> {
        let idx = self.puzzle.suspect_index(id)?;
        self.placed.get(&idx).copied()
    }

    pub fn get_candidates(&self, id: &str) -> Option<&BTreeSet<CellKey>> {
        let idx = self.puzzle.suspect_index(id)?;
        self.candidates.get(idx)
    }

    /// Unplaced suspects that still have the cell as a candidate.
    pub fn get_cell_candidates(&self, key: CellKey) -> Vec<&str> {
        self.puzzle
            .suspects
            .iter()
            .enumerate()
            .filter(|(idx, _)| {
                !self.placed.contains_key(idx) && self.candidates[*idx].contains(&key)
            })
            .map(|(_, s)| s.id.as_str())
            .collect()
    }

    pub fn steps(&self) -> &[SolveStep] {
        &self.steps
    }

    // ==================== Pipeline ====================

    /// Run `solve_step` until solved or stuck, bounded by a hard iteration
    /// cap. The accumulated trace is the authoritative result either way.
    pub fn solve(&mut self) -> &[SolveStep] {
        for _ in 0..MAX_SOLVE_ITERATIONS {
            if self.is_solved() || self.solve_step().is_none() {
                break;
            }
        }
        &self.steps
    }

    /// Produce one deduction step, or `None` when no technique makes
    /// progress. Techniques are consulted in a fixed order; the first that
    /// changes state wins.
    pub fn solve_step(&mut self) -> Option<SolveStep> {
        if self.is_solved() {
            return None;
        }
        if let Some(step) = singles::naked_single(self) {
            return Some(step);
        }
        if let Some(step) = singles::row_single(self) {
            return Some(step);
        }
        if let Some(step) = singles::column_single(self) {
            return Some(step);
        }
        if let Some(step) = sets::row_claiming(self) {
            return Some(step);
        }
        if let Some(step) = sets::column_claiming(self) {
            return Some(step);
        }
        if let Some(step) = sets::naked_row_set(self) {
            return Some(step);
        }
        if let Some(step) = sets::naked_column_set(self) {
            return Some(step);
        }
        if let Some(step) = rooms::room_constraints(self) {
            return Some(step);
        }
        if let Some(step) = rooms::only_person_on_type(self) {
            return Some(step);
        }
        if let Some(step) = rooms::relative_row(self) {
            return Some(step);
        }
        if let Some(step) = sets::pointing_group(self) {
            return Some(step);
        }
        if let Some(step) = hypothetical::contradiction_elimination(self, 1) {
            return Some(step);
        }
        None
    }

    // ==================== Shared technique helpers ====================

    pub(crate) fn suspect_count(&self) -> usize {
        self.puzzle.suspects.len()
    }

    pub(crate) fn is_unplaced(&self, idx: usize) -> bool {
        !self.placed.contains_key(&idx)
    }

    pub(crate) fn candidates_of(&self, idx: usize) -> &BTreeSet<CellKey> {
        &self.candidates[idx]
    }

    pub(crate) fn remove_candidates(
        &mut self,
        idx: usize,
        doomed: &BTreeSet<CellKey>,
    ) -> Vec<CellKey> {
        let removed: Vec<CellKey> = self.candidates[idx]
            .iter()
            .filter(|k| doomed.contains(k))
            .copied()
            .collect();
        if !removed.is_empty() {
            self.candidates[idx].retain(|k| !doomed.contains(k));
        }
        removed
    }

    /// Keep only the given cells for a suspect, returning what was dropped.
    pub(crate) fn restrict_candidates(
        &mut self,
        idx: usize,
        keep: &BTreeSet<CellKey>,
    ) -> Vec<CellKey> {
        let dropped: Vec<CellKey> = self.candidates[idx]
            .iter()
            .filter(|k| !keep.contains(k))
            .copied()
            .collect();
        if !dropped.is_empty() {
            self.candidates[idx].retain(|k| keep.contains(k));
        }
        dropped
    }

    /// The room a suspect is certainly in: all candidates share it. Works
    /// for placed suspects too (singleton set).
    pub(crate) fn forced_room(&self, idx: usize) -> Option<&'p str> {
        let mut rooms = self.candidates[idx]
            .iter()
            .map(|&k| self.board.room_of(k));
        let first = rooms.next()?;
        rooms.all(|r| r == first).then_some(first)
    }

    /// Whether the row/column pigeonhole arguments apply: every row and
    /// every column must host exactly one suspect.
    pub(crate) fn pigeonhole(&self) -> bool {
        self.puzzle.suspects.len() == self.board.grid_size()
    }

    /// Rows currently used by placed suspects.
    pub(crate) fn placed_rows(&self) -> BTreeSet<usize> {
        self.placed.values().map(|k| k.row).collect()
    }

    pub(crate) fn placed_cols(&self) -> BTreeSet<usize> {
        self.placed.values().map(|k| k.col).collect()
    }

    // ==================== Contradiction test ====================

    /// A state is contradictory iff some unplaced suspect has no candidates
    /// left, or (under pigeonhole) some free row or column can no longer be
    /// reached by any unplaced suspect.
    pub(crate) fn is_contradictory(&self) -> bool {
        for idx in 0..self.candidates.len() {
            if self.is_unplaced(idx) && self.candidates[idx].is_empty() {
                return true;
            }
        }
        if self.pigeonhole() {
            let used_rows = self.placed_rows();
            let used_cols = self.placed_cols();
            for line in 0..self.board.grid_size() {
                if !used_rows.contains(&line) {
                    let reachable = (0..self.candidates.len()).any(|idx| {
                        self.is_unplaced(idx)
                            && self.candidates[idx].iter().any(|k| k.row == line)
                    });
                    if !reachable {
                        return true;
                    }
                }
                if !used_cols.contains(&line) {
                    let reachable = (0..self.candidates.len()).any(|idx| {
                        self.is_unplaced(idx)
                            && self.candidates[idx].iter().any(|k| k.col == line)
                    });
                    if !reachable {
                        return true;
                    }
                }
            }
        }
        false
    }

    // ==================== Snapshot / restore ====================

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            candidates: self.candidates.clone(),
            placed: self.placed.clone(),
            step_len: self.steps.len(),
        }
    }

    pub(crate) fn restore(&mut self, snapshot: Snapshot) {
        self.candidates = snapshot.candidates;
        self.placed = snapshot.placed;
        self.steps.truncate(snapshot.step_len);
    }
}
