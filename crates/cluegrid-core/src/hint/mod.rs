//! Hint engine: reconciles curated scripted hints with solver-discovered
//! deductions to pick the next player-facing hint.
//!
//! Two solver instances are run over the host's placements: a *raw* one
//! (initialisation only) showing what the player can currently see, and a
//! *solved* one showing where the logic ultimately leads. Curated hints are
//! filtered against both; when none applies the raw solver's next step is
//! translated into the same envelope.

mod curated;

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::board::BoardIndex;
use crate::puzzle::{CellKey, Puzzle, PuzzleError};
use crate::solver::{SolveStep, Solver};

pub use curated::filter_by_target;

/// What the host shows the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
    #[serde(default)]
    pub highlight_cells: Vec<CellKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<HintAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintAction {
    Place,
    Eliminate,
}

/// Outcome of driving the solver from a host state. Debug-facing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveReport {
    pub steps: Vec<SolveStep>,
    pub solved: bool,
    pub unplaced: Vec<String>,
}

/// Candidate/placement dump for host tooling.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugState {
    pub cell_candidates: BTreeMap<CellKey, Vec<String>>,
    pub suspect_candidates: BTreeMap<String, Vec<CellKey>>,
    pub placed: BTreeMap<String, CellKey>,
}

/// Produce the next player-facing hint for the given board state.
pub fn get_next_hint(
    puzzle: &Puzzle,
    placements: &BTreeMap<CellKey, String>,
) -> Result<Hint, PuzzleError> {
    let board = BoardIndex::build(puzzle)?;

    let all_placed = puzzle
        .suspects
        .iter()
        .all(|s| placements.values().any(|id| *id == s.id));
    if all_placed {
        return Ok(Hint {
            message: "Every suspect is already placed. Check your board against the clues!"
                .to_string(),
            highlight_cells: Vec::new(),
            suspect: None,
            action: None,
        });
    }

    let mut raw = Solver::new(puzzle, &board);
    raw.initialize(placements)?;
    let mut solved = Solver::new(puzzle, &board);
    solved.initialize(placements)?;
    solved.solve();

    if let Some(hint) = curated::next_curated_hint(puzzle, &board, &raw, &solved, placements) {
        debug!(target: "cluegrid::hint", "curated hint for {:?}", hint.suspect);
        return Ok(hint);
    }

    if let Some(step) = raw.solve_step() {
        debug!(
            target: "cluegrid::hint",
            "solver hint via {} for {}",
            step.technique,
            step.suspect_id
        );
        return Ok(step_to_hint(step));
    }

    // Last resort: point at the tightest suspect and echo their clue.
    Ok(fallback_hint(puzzle, &raw, placements))
}

fn step_to_hint(step: SolveStep) -> Hint {
    let (action, highlight) = match step.cell_key {
        Some(key) => (HintAction::Place, vec![key]),
        None => (HintAction::Eliminate, step.eliminated_cells.clone()),
    };
    Hint {
        message: step.message,
        highlight_cells: highlight,
        suspect: Some(step.suspect_id),
        action: Some(action),
    }
}

/// The player hasn't placed everyone, but the raw solver may have: basic
/// propagation inside `initialize` can run well ahead of the board the
/// player sees. Unplacedness is therefore judged against the host's
/// placements, while tightness uses the raw candidate counts.
fn fallback_hint(puzzle: &Puzzle, raw: &Solver, placements: &BTreeMap<CellKey, String>) -> Hint {
    let tightest = puzzle
        .suspects
        .iter()
        .filter(|s| !placements.values().any(|id| *id == s.id))
        .min_by_key(|s| {
            raw.get_candidates(&s.id)
                .map_or(usize::MAX, |c| c.len())
        });
    match tightest {
        Some(suspect) => {
            let highlight = raw
                .get_candidates(&suspect.id)
                .map(|c| c.iter().copied().collect())
                .unwrap_or_default();
            let message = if suspect.clue.is_empty() {
                format!("Take another look at where {} can still be.", suspect.name)
            } else {
                format!("{}: \"{}\"", suspect.name, suspect.clue)
            };
            Hint {
                message,
                highlight_cells: highlight,
                suspect: Some(suspect.id.clone()),
                action: None,
            }
        }
        None => Hint {
            message: "No hint available.".to_string(),
            highlight_cells: Vec::new(),
            suspect: None,
            action: None,
        },
    }
}

/// Drive the solver to completion from a host state. Debug-only surface.
pub fn solve_from_state(
    puzzle: &Puzzle,
    placements: &BTreeMap<CellKey, String>,
) -> Result<SolveReport, PuzzleError> {
    let board = BoardIndex::build(puzzle)?;
    let mut solver = Solver::new(puzzle, &board);
    solver.initialize(placements)?;
    solver.solve();
    let unplaced = puzzle
        .suspects
        .iter()
        .filter(|s| solver.placed_cell(&s.id).is_none())
        .map(|s| s.id.clone())
        .collect();
    Ok(SolveReport {
        steps: solver.steps().to_vec(),
        solved: solver.is_solved(),
        unplaced,
    })
}

/// Dump the raw candidate state after initialisation, for host tooling.
pub fn get_debug_state(
    puzzle: &Puzzle,
    placements: &BTreeMap<CellKey, String>,
) -> Result<DebugState, PuzzleError> {
    let board = BoardIndex::build(puzzle)?;
    let mut solver = Solver::new(puzzle, &board);
    solver.initialize(placements)?;

    let mut cell_candidates: BTreeMap<CellKey, Vec<String>> = BTreeMap::new();
    for &key in board.occupiable() {
        let holders: Vec<String> = solver
            .get_cell_candidates(key)
            .into_iter()
            .map(str::to_string)
            .collect();
        if !holders.is_empty() {
            cell_candidates.insert(key, holders);
        }
    }
    let mut suspect_candidates = BTreeMap::new();
    let mut placed = BTreeMap::new();
    for suspect in &puzzle.suspects {
        if let Some(cell) = solver.placed_cell(&suspect.id) {
            placed.insert(suspect.id.clone(), cell);
        }
        if let Some(cands) = solver.get_candidates(&suspect.id) {
            suspect_candidates.insert(suspect.id.clone(), cands.iter().copied().collect());
        }
    }
    Ok(DebugState {
        cell_candidates,
        suspect_candidates,
        placed,
    })
}
