//! Curated-hint matcher: walks a puzzle's scripted hint list in order and
//! returns the first entry whose prerequisites hold and whose target still
//! narrows to something useful.

use std::collections::{BTreeMap, BTreeSet};

use crate::board::BoardIndex;
use crate::puzzle::{CellKey, Constraint, CuratedHint, HintTarget, Puzzle};
use crate::solver::Solver;

use super::{Hint, HintAction};

pub(super) fn next_curated_hint(
    puzzle: &Puzzle,
    board: &BoardIndex,
    raw: &Solver,
    solved: &Solver,
    placements: &BTreeMap<CellKey, String>,
) -> Option<Hint> {
    if puzzle.hints.is_empty() {
        return None;
    }
    let mut hints: Vec<&CuratedHint> = puzzle.hints.iter().collect();
    hints.sort_by_key(|h| h.order);

    let placed = |id: &str| placements.values().any(|v| v == id);

    for hint in hints {
        if placed(&hint.suspect) {
            continue;
        }
        if hint.prerequisites.iter().any(|p| !placed(p)) {
            continue;
        }
        let solved_cands = solved.get_candidates(&hint.suspect)?;
        let narrowed = filter_by_target(solved_cands, &hint.target, board);
        if narrowed.is_empty() {
            continue;
        }
        let raw_cands = raw.get_candidates(&hint.suspect)?;
        let raw_narrowed = filter_by_target(raw_cands, &hint.target, board);
        if let Some(cap) = hint.skip_if_more_than {
            if raw_narrowed.len() > cap {
                continue;
            }
        }

        let mut message = if raw_narrowed.len() <= 1 {
            hint.messages.single.clone()
        } else {
            hint.messages.multiple.clone()
        };
        if let Some(template) = &hint.messages.room_blocked {
            if let Some((blocked, available)) =
                single_viable_room(puzzle, board, solved, &hint.suspect)
            {
                message = template
                    .replace("{blockedRooms}", &blocked)
                    .replace("{availableRoom}", &available);
            }
        }

        let action = if narrowed.len() == 1 {
            HintAction::Place
        } else {
            HintAction::Eliminate
        };
        return Some(Hint {
            message,
            highlight_cells: narrowed.into_iter().collect(),
            suspect: Some(hint.suspect.clone()),
            action: Some(action),
        });
    }
    None
}

/// Intersect a candidate set with a curated target specifier.
pub fn filter_by_target(
    candidates: &BTreeSet<CellKey>,
    target: &HintTarget,
    board: &BoardIndex,
) -> BTreeSet<CellKey> {
    match target {
        HintTarget::Room { room } => {
            let keep = board.room_cells(room);
            candidates.iter().filter(|k| keep.contains(k)).copied().collect()
        }
        HintTarget::Rooms { rooms } => candidates
            .iter()
            .filter(|k| rooms.iter().any(|r| board.room_cells(r).contains(k)))
            .copied()
            .collect(),
        HintTarget::CellType { cell_type, room } => {
            let keep = board.type_cells(*cell_type);
            candidates
                .iter()
                .filter(|k| keep.contains(k))
                .filter(|&&k| {
                    room.as_ref()
                        .map_or(true, |r| board.room_cells(r).contains(&k))
                })
                .copied()
                .collect()
        }
        HintTarget::AdjacentTo { cell_type } => {
            let keep = board.cells_beside_type(*cell_type);
            candidates.iter().filter(|k| keep.contains(k)).copied().collect()
        }
        HintTarget::Row { row } => candidates.iter().filter(|k| k.row == *row).copied().collect(),
        HintTarget::Any => candidates.clone(),
    }
}

/// When a suspect carries an `inRooms` constraint and the solved state
/// leaves exactly one of those rooms reachable, report the blocked rooms
/// and the surviving one (display names).
fn single_viable_room(
    puzzle: &Puzzle,
    board: &BoardIndex,
    solved: &Solver,
    suspect_id: &str,
) -> Option<(String, String)> {
    let suspect = puzzle.suspect(suspect_id)?;
    let rooms = suspect.constraints.iter().find_map(|c| match c {
        Constraint::InRooms { rooms } => Some(rooms),
        _ => None,
    })?;
    let cands = solved.get_candidates(suspect_id)?;
    let (viable, blocked): (Vec<&String>, Vec<&String>) = rooms.iter().partition(|room| {
        board
            .room_cells(room)
            .iter()
            .any(|k| cands.contains(k))
    });
    if viable.len() != 1 || blocked.is_empty() {
        return None;
    }
    let blocked_names: Vec<&str> = blocked.iter().map(|r| puzzle.room_name(r)).collect();
    Some((
        blocked_names.join(", "),
        puzzle.room_name(viable[0]).to_string(),
    ))
}
