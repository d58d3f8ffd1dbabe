//! Dynamic constraint evaluators: everything that depends on where other
//! suspects can still be. Consulted in declared suspect order, then declared
//! constraint order; the first evaluator that eliminates anything produces
//! the step.
//!
//! Placed suspects participate as sources (their candidate set is the
//! singleton of their cell) but are never mutated: a placed suspect's set
//! stays a singleton no matter what.

use std::collections::BTreeSet;

use crate::puzzle::{CellKey, Constraint, Gender};

use super::types::{SolveStep, Technique};
use super::Solver;

/// Pipeline stage 5: the room-relationship constraints of §dynamic kinds,
/// excluding `onlyPersonOnCellType` and `relativeRow`, which run as their
/// own later stages.
pub(super) fn room_constraints(solver: &mut Solver) -> Option<SolveStep> {
    for idx in 0..solver.suspect_count() {
        for constraint in &solver.puzzle().suspects[idx].constraints {
            let eliminated = match constraint {
                Constraint::Alone => eval_alone(solver, idx),
                Constraint::AloneWith { suspect } => eval_alone_with(solver, idx, suspect),
                Constraint::AloneWithGender { gender } => {
                    eval_alone_with_gender(solver, idx, *gender)
                }
                Constraint::WithPerson { suspect, room } => {
                    eval_with_person(solver, idx, suspect, room)
                }
                Constraint::InRoomWithPersonOnCellType { gender, cell_type } => {
                    eval_room_with_person_on_type(solver, idx, *gender, *cell_type)
                }
                Constraint::InRoomWithPersonBesideCellType { cell_type } => {
                    eval_room_with_person_beside_type(solver, idx, *cell_type)
                }
                Constraint::Victim => eval_victim(solver, idx),
                Constraint::AheadOf { suspect } => eval_ahead_of(solver, idx, suspect),
                _ => Vec::new(),
            };
            if !eliminated.is_empty() {
                let suspect = &solver.puzzle().suspects[idx];
                let step = SolveStep {
                    technique: Technique::RoomConstraint,
                    suspect_id: suspect.id.clone(),
                    cell_key: None,
                    message: format!(
                        "{} {}.",
                        suspect.name,
                        constraint.describe(solver.puzzle())
                    ),
                    highlight_cells: solver.candidates_of(idx).iter().copied().collect(),
                    eliminated_cells: eliminated,
                };
                return Some(solver.commit(step));
            }
        }
    }
    None
}

/// Rooms already spoken for from this suspect's point of view: rooms holding
/// a placed other suspect, or rooms some other suspect is forced into.
fn veto_rooms<'p>(solver: &Solver<'p>, idx: usize, exclude: &[usize]) -> BTreeSet<&'p str> {
    (0..solver.suspect_count())
        .filter(|&j| j != idx && !exclude.contains(&j))
        .filter_map(|j| solver.forced_room(j))
        .collect()
}

/// `alone`: a room is impossible as soon as anyone else occupies it or is
/// forced into it — either the other survives (not alone) or our row/column
/// would strand them with no candidates (contradiction). Both reject.
fn eval_alone(solver: &mut Solver, idx: usize) -> Vec<CellKey> {
    if !solver.is_unplaced(idx) {
        return Vec::new();
    }
    let veto = veto_rooms(solver, idx, &[]);
    let doomed: BTreeSet<CellKey> = solver
        .candidates_of(idx)
        .iter()
        .filter(|&&k| veto.contains(solver.board().room_of(k)))
        .copied()
        .collect();
    solver.remove_candidates(idx, &doomed)
}

/// `aloneWith(other)`: both restricted to rooms where the partner still has
/// a candidate and no third suspect is forced in.
fn eval_alone_with(solver: &mut Solver, idx: usize, partner_id: &str) -> Vec<CellKey> {
    let Some(partner) = solver.puzzle().suspect_index(partner_id) else {
        return Vec::new();
    };
    let veto = veto_rooms(solver, idx, &[partner]);
    let allowed = |solver: &Solver, me: usize, mate: usize| -> BTreeSet<CellKey> {
        solver
            .candidates_of(me)
            .iter()
            .filter(|&&k| {
                let room = solver.board().room_of(k);
                !veto.contains(room)
                    && solver
                        .candidates_of(mate)
                        .iter()
                        .any(|&m| solver.board().room_of(m) == room)
            })
            .copied()
            .collect()
    };
    let mut eliminated = Vec::new();
    if solver.is_unplaced(idx) {
        let keep = allowed(solver, idx, partner);
        eliminated.extend(solver.restrict_candidates(idx, &keep));
    }
    if solver.is_unplaced(partner) {
        let keep = allowed(solver, partner, idx);
        eliminated.extend(solver.restrict_candidates(partner, &keep));
    }
    eliminated
}

/// `aloneWithGender(g)`: like `aloneWith`, with the partner pool being every
/// other suspect of the gender that does not itself claim to be alone.
fn eval_alone_with_gender(solver: &mut Solver, idx: usize, gender: Gender) -> Vec<CellKey> {
    if !solver.is_unplaced(idx) {
        return Vec::new();
    }
    let pool: Vec<usize> = (0..solver.suspect_count())
        .filter(|&j| {
            j != idx
                && solver.puzzle().suspects[j].gender == Some(gender)
                && !solver.puzzle().suspects[j]
                    .constraints
                    .iter()
                    .any(|c| matches!(c, Constraint::Alone))
        })
        .collect();
    let veto = veto_rooms(solver, idx, &pool);
    let keep: BTreeSet<CellKey> = solver
        .candidates_of(idx)
        .iter()
        .filter(|&&k| {
            let room = solver.board().room_of(k);
            !veto.contains(room)
                && pool.iter().any(|&p| {
                    solver
                        .candidates_of(p)
                        .iter()
                        .any(|&m| solver.board().room_of(m) == room)
                })
        })
        .copied()
        .collect();
    solver.restrict_candidates(idx, &keep)
}

/// `withPerson(other, room)`: both candidate sets intersect the room.
fn eval_with_person(solver: &mut Solver, idx: usize, other_id: &str, room: &str) -> Vec<CellKey> {
    let Some(other) = solver.puzzle().suspect_index(other_id) else {
        return Vec::new();
    };
    let keep = solver.board().room_cells(room);
    let mut eliminated = Vec::new();
    for member in [idx, other] {
        if solver.is_unplaced(member) {
            eliminated.extend(solver.restrict_candidates(member, keep));
        }
    }
    eliminated
}

/// `inRoomWithPersonOnCellType(g, T)`: a candidate room stays alive only if
/// it has an occupiable T-cell some suspect of the gender can still reach.
fn eval_room_with_person_on_type(
    solver: &mut Solver,
    idx: usize,
    gender: Gender,
    cell_type: crate::puzzle::CellType,
) -> Vec<CellKey> {
    if !solver.is_unplaced(idx) {
        return Vec::new();
    }
    let sources: Vec<usize> = (0..solver.suspect_count())
        .filter(|&j| solver.puzzle().suspects[j].gender == Some(gender))
        .collect();
    let live_rooms: BTreeSet<&str> = solver
        .board()
        .type_cells(cell_type)
        .iter()
        .filter(|&&t| solver.board().is_occupiable(t))
        .filter(|&&t| {
            sources
                .iter()
                .any(|&j| solver.candidates_of(j).contains(&t))
        })
        .map(|&t| solver.board().room_of(t))
        .collect();
    let keep: BTreeSet<CellKey> = solver
        .candidates_of(idx)
        .iter()
        .filter(|&&k| live_rooms.contains(solver.board().room_of(k)))
        .copied()
        .collect();
    solver.restrict_candidates(idx, &keep)
}

/// `inRoomWithPersonBesideCellType(T)`: the room must have a beside-T cell
/// reachable by some *other* suspect.
fn eval_room_with_person_beside_type(
    solver: &mut Solver,
    idx: usize,
    cell_type: crate::puzzle::CellType,
) -> Vec<CellKey> {
    if !solver.is_unplaced(idx) {
        return Vec::new();
    }
    let live_rooms: BTreeSet<&str> = solver
        .board()
        .cells_beside_type(cell_type)
        .iter()
        .filter(|&&b| {
            (0..solver.suspect_count())
                .any(|j| j != idx && solver.candidates_of(j).contains(&b))
        })
        .map(|&b| solver.board().room_of(b))
        .collect();
    let keep: BTreeSet<CellKey> = solver
        .candidates_of(idx)
        .iter()
        .filter(|&&k| live_rooms.contains(solver.board().room_of(k)))
        .copied()
        .collect();
    solver.restrict_candidates(idx, &keep)
}

/// `victim`: the room must admit exactly one companion. A candidate room is
/// rejected when no other suspect can reach it (would be alone) or at least
/// two others are forced into it (more than one companion).
fn eval_victim(solver: &mut Solver, idx: usize) -> Vec<CellKey> {
    if !solver.is_unplaced(idx) {
        return Vec::new();
    }
    let rooms: BTreeSet<&str> = solver
        .candidates_of(idx)
        .iter()
        .map(|&k| solver.board().room_of(k))
        .collect();
    let mut doomed: BTreeSet<CellKey> = BTreeSet::new();
    for room in rooms {
        let others = || (0..solver.suspect_count()).filter(|&j| j != idx);
        let available = others()
            .filter(|&j| {
                solver
                    .candidates_of(j)
                    .iter()
                    .any(|&m| solver.board().room_of(m) == room)
            })
            .count();
        let forced = others()
            .filter(|&j| solver.forced_room(j) == Some(room))
            .count();
        if available == 0 || forced >= 2 {
            doomed.extend(
                solver
                    .candidates_of(idx)
                    .iter()
                    .filter(|&&k| solver.board().room_of(k) == room)
                    .copied(),
            );
        }
    }
    solver.remove_candidates(idx, &doomed)
}

/// `aheadOf(other)`: strict greater-than by track position. Own positions at
/// or below the peer's minimum are impossible; peer positions at or above
/// our maximum are impossible. Cells without a track position are ignored.
fn eval_ahead_of(solver: &mut Solver, idx: usize, other_id: &str) -> Vec<CellKey> {
    let Some(peer) = solver.puzzle().suspect_index(other_id) else {
        return Vec::new();
    };
    let track = &solver.puzzle().track_positions;
    let peer_min = solver
        .candidates_of(peer)
        .iter()
        .filter_map(|k| track.get(k))
        .min()
        .copied();
    let my_max = solver
        .candidates_of(idx)
        .iter()
        .filter_map(|k| track.get(k))
        .max()
        .copied();

    let mut eliminated = Vec::new();
    if let Some(peer_min) = peer_min {
        if solver.is_unplaced(idx) {
            let doomed: BTreeSet<CellKey> = solver
                .candidates_of(idx)
                .iter()
                .filter(|k| track.get(k).is_some_and(|&p| p <= peer_min))
                .copied()
                .collect();
            eliminated.extend(solver.remove_candidates(idx, &doomed));
        }
    }
    if let Some(my_max) = my_max {
        if solver.is_unplaced(peer) {
            let doomed: BTreeSet<CellKey> = solver
                .candidates_of(peer)
                .iter()
                .filter(|k| track.get(k).is_some_and(|&p| p >= my_max))
                .copied()
                .collect();
            eliminated.extend(solver.remove_candidates(peer, &doomed));
        }
    }
    eliminated
}

/// Pipeline stage 6: `onlyPersonOnCellType(T)` clears T-cells from every
/// other suspect that is not itself required to stand on T.
pub(super) fn only_person_on_type(solver: &mut Solver) -> Option<SolveStep> {
    for idx in 0..solver.suspect_count() {
        for constraint in &solver.puzzle().suspects[idx].constraints {
            let Constraint::OnlyPersonOnCellType { cell_type } = constraint else {
                continue;
            };
            let doomed = solver.board().type_cells(*cell_type);
            let mut eliminated = Vec::new();
            for other in 0..solver.suspect_count() {
                if other == idx || !solver.is_unplaced(other) {
                    continue;
                }
                let required = solver.puzzle().suspects[other].constraints.iter().any(
                    |c| matches!(c, Constraint::OnCellType { cell_type: t } if t == cell_type),
                );
                if required {
                    continue;
                }
                eliminated.extend(solver.remove_candidates(other, doomed));
            }
            if !eliminated.is_empty() {
                let suspect = &solver.puzzle().suspects[idx];
                let step = SolveStep {
                    technique: Technique::OnlyPersonOnType,
                    suspect_id: suspect.id.clone(),
                    cell_key: None,
                    message: format!(
                        "{} {}.",
                        suspect.name,
                        constraint.describe(solver.puzzle())
                    ),
                    highlight_cells: solver.candidates_of(idx).iter().copied().collect(),
                    eliminated_cells: eliminated,
                };
                return Some(solver.commit(step));
            }
        }
    }
    None
}

/// Pipeline stage 7: `relativeRow(other, offset)` enforced bidirectionally.
/// With the peer placed this collapses to the single target row; otherwise
/// each side keeps only rows compatible with the other's row projection.
pub(super) fn relative_row(solver: &mut Solver) -> Option<SolveStep> {
    for idx in 0..solver.suspect_count() {
        for constraint in &solver.puzzle().suspects[idx].constraints {
            let Constraint::RelativeRow {
                suspect: other_id,
                row_offset,
            } = constraint
            else {
                continue;
            };
            let Some(peer) = solver.puzzle().suspect_index(other_id) else {
                continue;
            };
            let peer_rows: BTreeSet<i64> = solver
                .candidates_of(peer)
                .iter()
                .map(|k| k.row as i64)
                .collect();
            let my_rows: BTreeSet<i64> = solver
                .candidates_of(idx)
                .iter()
                .map(|k| k.row as i64)
                .collect();
            let my_allowed: BTreeSet<i64> = peer_rows.iter().map(|r| r + row_offset).collect();
            let peer_allowed: BTreeSet<i64> = my_rows.iter().map(|r| r - row_offset).collect();

            let mut eliminated = Vec::new();
            if solver.is_unplaced(idx) {
                let keep: BTreeSet<CellKey> = solver
                    .candidates_of(idx)
                    .iter()
                    .filter(|k| my_allowed.contains(&(k.row as i64)))
                    .copied()
                    .collect();
                eliminated.extend(solver.restrict_candidates(idx, &keep));
            }
            if solver.is_unplaced(peer) {
                let keep: BTreeSet<CellKey> = solver
                    .candidates_of(peer)
                    .iter()
                    .filter(|k| peer_allowed.contains(&(k.row as i64)))
                    .copied()
                    .collect();
                eliminated.extend(solver.restrict_candidates(peer, &keep));
            }
            if !eliminated.is_empty() {
                let suspect = &solver.puzzle().suspects[idx];
                let step = SolveStep {
                    technique: Technique::RelativeRow,
                    suspect_id: suspect.id.clone(),
                    cell_key: None,
                    message: format!(
                        "{} {}.",
                        suspect.name,
                        constraint.describe(solver.puzzle())
                    ),
                    highlight_cells: solver.candidates_of(idx).iter().copied().collect(),
                    eliminated_cells: eliminated,
                };
                return Some(solver.commit(step));
            }
        }
    }
    None
}
