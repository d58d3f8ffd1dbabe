//! Single-placement techniques: naked single and row/column singles.

use std::collections::BTreeSet;

use crate::puzzle::CellKey;

use super::types::{SolveStep, Technique};
use super::Solver;

/// Any unplaced suspect with exactly one candidate is placed. Basic
/// propagation normally consumes these, so this entry mostly fires when a
/// caller mutated state out-of-band; it delegates to the same cascade and
/// reports its first placement.
pub(super) fn naked_single(solver: &mut Solver) -> Option<SolveStep> {
    let mark = solver.steps().len();
    if solver.propagate_basic() {
        return solver.steps().get(mark).cloned();
    }
    None
}

pub(super) fn row_single(solver: &mut Solver) -> Option<SolveStep> {
    line_single(solver, Line::Row)
}

pub(super) fn column_single(solver: &mut Solver) -> Option<SolveStep> {
    line_single(solver, Line::Column)
}

#[derive(Clone, Copy)]
enum Line {
    Row,
    Column,
}

impl Line {
    fn of(self, key: CellKey) -> usize {
        match self {
            Line::Row => key.row,
            Line::Column => key.col,
        }
    }

    fn technique(self) -> Technique {
        match self {
            Line::Row => Technique::RowSingle,
            Line::Column => Technique::ColumnSingle,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Line::Row => "row",
            Line::Column => "column",
        }
    }
}

/// Pigeonhole over a free line: if exactly one unplaced suspect can still
/// reach a row (column) nobody occupies, that suspect must be there.
fn line_single(solver: &mut Solver, line: Line) -> Option<SolveStep> {
    if !solver.pigeonhole() {
        return None;
    }
    let used = match line {
        Line::Row => solver.placed_rows(),
        Line::Column => solver.placed_cols(),
    };
    for index in 0..solver.board().grid_size() {
        if used.contains(&index) {
            continue;
        }
        let holders: Vec<usize> = (0..solver.suspect_count())
            .filter(|&i| {
                solver.is_unplaced(i)
                    && solver.candidates_of(i).iter().any(|&k| line.of(k) == index)
            })
            .collect();
        let &[idx] = holders.as_slice() else {
            continue;
        };
        let keep: BTreeSet<CellKey> = solver
            .candidates_of(idx)
            .iter()
            .filter(|&&k| line.of(k) == index)
            .copied()
            .collect();
        let eliminated = solver.restrict_candidates(idx, &keep);
        if eliminated.is_empty() {
            continue;
        }
        let placed_key = if keep.len() == 1 {
            let key = *keep.iter().next().expect("len checked");
            solver.place_unpropagated(idx, key);
            Some(key)
        } else {
            None
        };
        let suspect = &solver.puzzle().suspects[idx];
        let step = SolveStep {
            technique: line.technique(),
            suspect_id: suspect.id.clone(),
            cell_key: placed_key,
            message: format!(
                "{} is the only suspect left for {} {index}.",
                suspect.name,
                line.label()
            ),
            highlight_cells: keep.iter().copied().collect(),
            eliminated_cells: eliminated,
        };
        return Some(solver.commit(step));
    }
    None
}
