//! Constraint catalogue: static/dynamic classification, the static filters
//! applied once at solver initialisation, and human-readable descriptions
//! used in step messages.
//!
//! Static constraints depend only on board geometry; dynamic constraints
//! depend on where other suspects can still be and are re-evaluated during
//! propagation (solver::rooms).

use std::collections::BTreeSet;

use crate::board::BoardIndex;
use crate::puzzle::{CellKey, Constraint, Puzzle};

impl Constraint {
    /// Geometry-only constraints are filtered once at initialisation;
    /// everything else is consulted during propagation.
    pub fn is_static(&self) -> bool {
        matches!(
            self,
            Constraint::InRoom { .. }
                | Constraint::InRooms { .. }
                | Constraint::InRow { .. }
                | Constraint::InColumns { .. }
                | Constraint::OnCellType { .. }
                | Constraint::NotOnCellType { .. }
                | Constraint::Beside { .. }
                | Constraint::NotBeside { .. }
        )
    }

    /// Human-readable rendering for diagnostics and solver messages.
    pub fn describe(&self, puzzle: &Puzzle) -> String {
        match self {
            Constraint::InRoom { room } => {
                format!("is in the {}", puzzle.room_name(room))
            }
            Constraint::InRooms { rooms } => {
                let names: Vec<&str> = rooms.iter().map(|r| puzzle.room_name(r)).collect();
                format!("is in the {}", names.join(" or the "))
            }
            Constraint::InRow { row } => format!("is in row {row}"),
            Constraint::InColumns { cols } => {
                let list: Vec<String> = cols.iter().map(|c| c.to_string()).collect();
                format!("is in column {}", list.join(" or "))
            }
            Constraint::OnCellType { cell_type } => format!("is on a {cell_type} cell"),
            Constraint::NotOnCellType { cell_type } => {
                format!("is not on a {cell_type} cell")
            }
            Constraint::Beside { cell_type } => format!("is beside a {cell_type}"),
            Constraint::NotBeside { cell_type } => format!("is not beside a {cell_type}"),
            Constraint::Alone => "is alone in their room".to_string(),
            Constraint::AloneWith { suspect } => {
                format!("is alone with {}", puzzle.suspect_name(suspect))
            }
            Constraint::AloneWithGender { gender } => {
                format!("is alone with one {gender}")
            }
            Constraint::WithPerson { suspect, room } => format!(
                "is with {} in the {}",
                puzzle.suspect_name(suspect),
                puzzle.room_name(room)
            ),
            Constraint::InRoomWithPersonOnCellType { gender, cell_type } => {
                format!("is in a room where a {gender} is on a {cell_type} cell")
            }
            Constraint::InRoomWithPersonBesideCellType { cell_type } => {
                format!("is in a room where someone else is beside a {cell_type}")
            }
            Constraint::OnlyPersonOnCellType { cell_type } => {
                format!("is the only person on a {cell_type} cell")
            }
            Constraint::RelativeRow {
                suspect,
                row_offset,
            } => {
                let name = puzzle.suspect_name(suspect);
                match row_offset {
                    0 => format!("is in the same row as {name}"),
                    o if *o > 0 => format!("is {o} row(s) below {name}"),
                    o => format!("is {} row(s) above {name}", -o),
                }
            }
            Constraint::AheadOf { suspect } => {
                format!("is ahead of {}", puzzle.suspect_name(suspect))
            }
            Constraint::Victim => "shares their room with exactly one other person".to_string(),
        }
    }
}

/// Apply one static filter to a candidate set. Dynamic constraints are
/// ignored here; `debug_assert` documents the contract.
pub fn apply_static(
    candidates: &mut BTreeSet<CellKey>,
    constraint: &Constraint,
    board: &BoardIndex,
) {
    debug_assert!(constraint.is_static());
    match constraint {
        Constraint::InRoom { room } => {
            let keep = board.room_cells(room);
            candidates.retain(|k| keep.contains(k));
        }
        Constraint::InRooms { rooms } => {
            candidates.retain(|k| rooms.iter().any(|r| board.room_cells(r).contains(k)));
        }
        Constraint::InRow { row } => {
            candidates.retain(|k| k.row == *row);
        }
        Constraint::InColumns { cols } => {
            candidates.retain(|k| cols.contains(&k.col));
        }
        Constraint::OnCellType { cell_type } => {
            let keep = board.type_cells(*cell_type);
            candidates.retain(|k| keep.contains(k));
        }
        Constraint::NotOnCellType { cell_type } => {
            let drop = board.type_cells(*cell_type);
            candidates.retain(|k| !drop.contains(k));
        }
        Constraint::Beside { cell_type } => {
            let keep = board.cells_beside_type(*cell_type);
            candidates.retain(|k| keep.contains(k));
        }
        Constraint::NotBeside { cell_type } => {
            let drop = board.cells_beside_type(*cell_type);
            candidates.retain(|k| !drop.contains(k));
        }
        _ => {}
    }
}
