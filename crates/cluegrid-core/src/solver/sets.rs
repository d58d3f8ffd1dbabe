//! Line-based elimination techniques: claiming, naked line sets, and the
//! pointing-group room/line interaction.

use std::collections::BTreeSet;

use itertools::Itertools;

use crate::puzzle::CellKey;

use super::types::{SolveStep, Technique};
use super::Solver;

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

    fn cross(self, key: CellKey) -> usize {
        match self {
            Line::Row => key.col,
            Line::Column => key.row,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Line::Row => "row",
            Line::Column => "column",
        }
    }
}

pub(super) fn row_claiming(solver: &mut Solver) -> Option<SolveStep> {
    claiming(solver, Line::Row)
}

pub(super) fn column_claiming(solver: &mut Solver) -> Option<SolveStep> {
    claiming(solver, Line::Column)
}

/// If every candidate of a suspect sits in one row (column), no other
/// suspect can use that row (column).
fn claiming(solver: &mut Solver, line: Line) -> Option<SolveStep> {
    for idx in 0..solver.suspect_count() {
        if !solver.is_unplaced(idx) || solver.candidates_of(idx).len() < 2 {
            continue;
        }
        let mut lines = solver.candidates_of(idx).iter().map(|&k| line.of(k));
        let claimed = lines.next().expect("len checked");
        if !lines.all(|l| l == claimed) {
            continue;
        }
        let doomed: BTreeSet<CellKey> = match line {
            Line::Row => solver.board().row_cells(claimed).clone(),
            Line::Column => solver.board().col_cells(claimed).clone(),
        };
        let mut eliminated = Vec::new();
        for other in 0..solver.suspect_count() {
            if other == idx || !solver.is_unplaced(other) {
                continue;
            }
            eliminated.extend(solver.remove_candidates(other, &doomed));
        }
        if eliminated.is_empty() {
            continue;
        }
        let suspect = &solver.puzzle().suspects[idx];
        let step = SolveStep {
            technique: match line {
                Line::Row => Technique::RowClaiming,
                Line::Column => Technique::ColumnClaiming,
            },
            suspect_id: suspect.id.clone(),
            cell_key: None,
            message: format!(
                "{} must be in {} {claimed}, so nobody else can be.",
                suspect.name,
                line.label()
            ),
            highlight_cells: solver.candidates_of(idx).iter().copied().collect(),
            eliminated_cells: eliminated,
        };
        return Some(solver.commit(step));
    }
    None
}

pub(super) fn naked_row_set(solver: &mut Solver) -> Option<SolveStep> {
    naked_line_set(solver, Line::Row)
}

pub(super) fn naked_column_set(solver: &mut Solver) -> Option<SolveStep> {
    naked_line_set(solver, Line::Column)
}

/// A group of k suspects whose combined candidates span exactly k rows
/// (columns) owns those lines: everyone outside the group is eliminated
/// from them. When the group's candidates within one claimed line collapse
/// to a single cross-line, that cross-line is blocked for outsiders too.
///
/// Subsets are searched k ascending, members ordered by lexicographic
/// suspect id; the first subset that eliminates anything wins.
fn naked_line_set(solver: &mut Solver, line: Line) -> Option<SolveStep> {
    if !solver.pigeonhole() {
        return None;
    }
    let unplaced: Vec<usize> = (0..solver.suspect_count())
        .filter(|&i| solver.is_unplaced(i))
        .collect();
    if unplaced.len() < 3 {
        return None;
    }
    let mut order = unplaced.clone();
    order.sort_by(|&a, &b| {
        solver.puzzle().suspects[a]
            .id
            .cmp(&solver.puzzle().suspects[b].id)
    });
    let k_max = (unplaced.len() - 1).min(6);

    for k in 2..=k_max {
        for group in order.iter().copied().combinations(k) {
            let lines: BTreeSet<usize> = group
                .iter()
                .flat_map(|&i| solver.candidates_of(i).iter().map(|&c| line.of(c)))
                .collect();
            if lines.len() != k {
                continue;
            }

            // Cells outsiders lose: everything on the claimed lines, plus
            // any cross-line the group fully pins within a claimed line.
            let mut doomed_cross: BTreeSet<usize> = BTreeSet::new();
            for &claimed in &lines {
                let cross: BTreeSet<usize> = group
                    .iter()
                    .flat_map(|&i| {
                        solver
                            .candidates_of(i)
                            .iter()
                            .filter(|&&c| line.of(c) == claimed)
                            .map(|&c| line.cross(c))
                    })
                    .collect();
                if cross.len() == 1 {
                    doomed_cross.insert(*cross.iter().next().expect("len checked"));
                }
            }

            let mut eliminated = Vec::new();
            for &other in &unplaced {
                if group.contains(&other) {
                    continue;
                }
                let doomed: BTreeSet<CellKey> = solver
                    .candidates_of(other)
                    .iter()
                    .filter(|&&c| {
                        lines.contains(&line.of(c)) || doomed_cross.contains(&line.cross(c))
                    })
                    .copied()
                    .collect();
                eliminated.extend(solver.remove_candidates(other, &doomed));
            }
            if eliminated.is_empty() {
                continue;
            }

            let names: Vec<&str> = group
                .iter()
                .map(|&i| solver.puzzle().suspects[i].name.as_str())
                .collect();
            let highlight: Vec<CellKey> = group
                .iter()
                .flat_map(|&i| solver.candidates_of(i).iter().copied())
                .collect();
            let step = SolveStep {
                technique: match line {
                    Line::Row => Technique::NakedRowSet,
                    Line::Column => Technique::NakedColumnSet,
                },
                suspect_id: solver.puzzle().suspects[group[0]].id.clone(),
                cell_key: None,
                message: format!(
                    "{} occupy {} {}s between them, blocking everyone else.",
                    names.join(", "),
                    lines.len(),
                    line.label()
                ),
                highlight_cells: highlight,
                eliminated_cells: eliminated,
            };
            return Some(solver.commit(step));
        }
    }
    None
}

/// Room/line interaction: when all of a suspect's candidates inside one
/// room share a line, that suspect gives up cells of the same line in
/// every other room.
pub(super) fn pointing_group(solver: &mut Solver) -> Option<SolveStep> {
    for idx in 0..solver.suspect_count() {
        if !solver.is_unplaced(idx) {
            continue;
        }
        let mut by_room: std::collections::BTreeMap<&str, Vec<CellKey>> =
            std::collections::BTreeMap::new();
        for &key in solver.candidates_of(idx) {
            by_room
                .entry(solver.board().room_of(key))
                .or_default()
                .push(key);
        }
        if by_room.len() < 2 {
            continue;
        }
        for line in [Line::Row, Line::Column] {
            for (&room, cells) in &by_room {
                let shared = line.of(cells[0]);
                if !cells.iter().all(|&c| line.of(c) == shared) {
                    continue;
                }
                let doomed: BTreeSet<CellKey> = solver
                    .candidates_of(idx)
                    .iter()
                    .filter(|&&c| line.of(c) == shared && solver.board().room_of(c) != room)
                    .copied()
                    .collect();
                let eliminated = solver.remove_candidates(idx, &doomed);
                if eliminated.is_empty() {
                    continue;
                }
                let suspect = &solver.puzzle().suspects[idx];
                let room_name = solver.puzzle().room_name(room).to_string();
                let step = SolveStep {
                    technique: Technique::PointingGroup,
                    suspect_id: suspect.id.clone(),
                    cell_key: None,
                    message: format!(
                        "In the {room_name}, {} is pinned to {} {shared}, ruling out that {} elsewhere.",
                        suspect.name,
                        line.label(),
                        line.label()
                    ),
                    highlight_cells: cells.clone(),
                    eliminated_cells: eliminated,
                };
                return Some(solver.commit(step));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::board::BoardIndex;
    use crate::puzzle::{Cell, CellType, Constraint, Puzzle, RoomInfo, Suspect};
    use crate::solver::{Solver, Technique};

    fn suspect(id: &str, constraints: Vec<Constraint>) -> Suspect {
        Suspect {
            id: id.into(),
            name: id.to_uppercase(),
            avatar: String::new(),
            color: String::new(),
            gender: None,
            is_victim: false,
            clue: String::new(),
            constraints,
        }
    }

    fn open_puzzle(n: usize, suspects: Vec<Suspect>) -> Puzzle {
        let mut rooms = BTreeMap::new();
        rooms.insert(
            "hall".to_string(),
            RoomInfo {
                name: "Hall".into(),
                color: "#eee".into(),
            },
        );
        let layout = (0..n)
            .map(|_| {
                (0..n)
                    .map(|_| Cell {
                        room: "hall".to_string(),
                        cell_type: CellType::Empty,
                    })
                    .collect()
            })
            .collect();
        Puzzle {
            id: "open".into(),
            name: "Open".into(),
            subtitle: String::new(),
            difficulty: String::new(),
            grid_size: n,
            board_layout: layout,
            rooms,
            suspects,
            solution: BTreeMap::new(),
            hints: Vec::new(),
            track_positions: BTreeMap::new(),
            victim: None,
            murderer: None,
            crime_room: None,
        }
    }

    #[test]
    fn row_claiming_clears_the_row_for_the_claimant() {
        let puzzle = open_puzzle(
            3,
            vec![
                suspect("a", vec![Constraint::InRow { row: 0 }]),
                suspect("b", vec![]),
                suspect("c", vec![]),
            ],
        );
        let board = BoardIndex::build(&puzzle).unwrap();
        let mut solver = Solver::new(&puzzle, &board);
        solver.initialize(&BTreeMap::new()).unwrap();
        let step = solver.solve_step().unwrap();
        assert_eq!(step.technique, Technique::RowClaiming);
        assert_eq!(step.suspect_id, "a");
        for id in ["b", "c"] {
            assert!(solver
                .get_candidates(id)
                .unwrap()
                .iter()
                .all(|k| k.row != 0));
        }
    }

    #[test]
    fn naked_column_set_blocks_outsiders() {
        let two_cols = Constraint::InColumns { cols: vec![0, 1] };
        let puzzle = open_puzzle(
            4,
            vec![
                suspect("a", vec![two_cols.clone()]),
                suspect("b", vec![two_cols]),
                suspect("c", vec![]),
                suspect("d", vec![]),
            ],
        );
        let board = BoardIndex::build(&puzzle).unwrap();
        let mut solver = Solver::new(&puzzle, &board);
        solver.initialize(&BTreeMap::new()).unwrap();
        let step = solver.solve_step().unwrap();
        assert_eq!(step.technique, Technique::NakedColumnSet);
        // a and b own columns 0 and 1 between them.
        for id in ["c", "d"] {
            assert!(solver
                .get_candidates(id)
                .unwrap()
                .iter()
                .all(|k| k.col >= 2));
        }
    }
}
