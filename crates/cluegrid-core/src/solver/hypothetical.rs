//! Contradiction elimination: depth-limited hypothetical reasoning.
//!
//! Each candidate of a tight suspect is tentatively placed under a
//! snapshot; the pipeline then runs until stuck and the state is tested
//! for contradiction. Contradictory candidates are eliminated for real.
//! The snapshot is restored in all cases, so hypothetical steps never
//! survive into the trace.

use std::collections::BTreeSet;

use log::trace;

use crate::puzzle::CellKey;

use super::types::{SolveStep, Technique};
use super::{rooms, sets, singles, Solver};

/// Per-branch cap on propagation rounds.
const MAX_BRANCH_ROUNDS: usize = 100;

/// `depth` is the remaining recursion budget: at depth > 0 each hypothesis
/// may itself run one nested level of contradiction elimination.
pub(super) fn contradiction_elimination(solver: &mut Solver, depth: usize) -> Option<SolveStep> {
    if solver.is_contradictory() {
        return None;
    }
    let mut order: Vec<usize> = (0..solver.suspect_count())
        .filter(|&i| solver.is_unplaced(i) && solver.candidates_of(i).len() > 1)
        .collect();
    order.sort_by_key(|&i| (solver.candidates_of(i).len(), i));

    for idx in order {
        let cells: Vec<CellKey> = solver.candidates_of(idx).iter().copied().collect();
        let mut doomed: BTreeSet<CellKey> = BTreeSet::new();
        for key in cells {
            let snap = solver.snapshot();
            solver.place(idx, key);
            run_until_stuck(solver, depth);
            let contradictory = solver.is_contradictory();
            solver.restore(snap);
            if contradictory {
                doomed.insert(key);
            }
        }
        if doomed.is_empty() {
            continue;
        }
        let eliminated = solver.remove_candidates(idx, &doomed);
        let suspect = &solver.puzzle().suspects[idx];
        trace!(
            target: "cluegrid::solver",
            "contradiction elimination: {} loses {} cell(s)",
            suspect.id,
            eliminated.len()
        );
        let step = SolveStep {
            technique: Technique::ContradictionElimination,
            suspect_id: suspect.id.clone(),
            cell_key: None,
            message: format!(
                "Testing {}'s remaining cells shows {} of them lead to dead ends.",
                suspect.name,
                eliminated.len()
            ),
            highlight_cells: solver.candidates_of(idx).iter().copied().collect(),
            eliminated_cells: eliminated,
        };
        return Some(solver.commit(step));
    }
    None
}

/// Run the pipeline inside a hypothesis: room constraints first, then the
/// line techniques, bounded by `MAX_BRANCH_ROUNDS`. At depth > 0 one nested
/// contradiction pass is allowed once everything else is exhausted.
fn run_until_stuck(solver: &mut Solver, depth: usize) {
    for _ in 0..MAX_BRANCH_ROUNDS {
        if solver.is_contradictory() || solver.is_solved() {
            return;
        }
        if hypothesis_step(solver, depth).is_none() {
            return;
        }
    }
}

fn hypothesis_step(solver: &mut Solver, depth: usize) -> Option<SolveStep> {
    if let Some(step) = rooms::room_constraints(solver) {
        return Some(step);
    }
    if let Some(step) = singles::naked_single(solver) {
        return Some(step);
    }
    if let Some(step) = singles::row_single(solver) {
        return Some(step);
    }
    if let Some(step) = singles::column_single(solver) {
        return Some(step);
    }
    if let Some(step) = sets::row_claiming(solver) {
        return Some(step);
    }
    if let Some(step) = sets::column_claiming(solver) {
        return Some(step);
    }
    if let Some(step) = sets::naked_row_set(solver) {
        return Some(step);
    }
    if let Some(step) = sets::naked_column_set(solver) {
        return Some(step);
    }
    if let Some(step) = rooms::only_person_on_type(solver) {
        return Some(step);
    }
    if let Some(step) = rooms::relative_row(solver) {
        return Some(step);
    }
    if let Some(step) = sets::pointing_group(solver) {
        return Some(step);
    }
    if depth > 0 {
        if let Some(step) = contradiction_elimination(solver, depth - 1) {
            return Some(step);
        }
    }
    None
}
