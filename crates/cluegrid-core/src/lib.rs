//! Core deduction engine for grid-based whodunit puzzles.
//!
//! A set of named suspects must be placed on a rectangular grid so that
//! every row and column holds at most one suspect and every suspect
//! satisfies its declarative clue constraints (rooms, cell types,
//! adjacency, companions, track order). This crate provides:
//!
//! - the immutable [`Puzzle`] data model and its validation,
//! - the precomputed [`BoardIndex`] lookup tables,
//! - the constraint catalogue with static filters and descriptions,
//! - the [`Solver`]: candidate propagation through human-legible
//!   techniques plus bounded contradiction testing, with a replayable
//!   step trace,
//! - the hint pipeline ([`get_next_hint`]) marrying solver output with
//!   per-puzzle curated hints.
//!
//! Rendering, input handling, undo and persistence are the host's
//! business; the engine is synchronous, single-threaded and owns no
//! global state.

pub mod board;
pub mod constraint;
pub mod hint;
pub mod puzzle;
pub mod solver;

pub use board::{BoardIndex, CellInfo};
pub use hint::{
    filter_by_target, get_debug_state, get_next_hint, solve_from_state, DebugState, Hint,
    HintAction, SolveReport,
};
pub use puzzle::{
    Cell, CellKey, CellType, Constraint, CuratedHint, Gender, HintMessages, HintTarget, Puzzle,
    PuzzleError, RoomInfo, SolutionPos, Suspect, OCCUPIABLE_TYPES,
};
pub use solver::{SolveStep, Solver, Technique};
