//! Reference puzzles used by the end-to-end scenarios.

use std::collections::BTreeMap;

use cluegrid_core::{
    Cell, CellType, Constraint, CuratedHint, Gender, HintMessages, HintTarget, Puzzle, RoomInfo,
    SolutionPos, Suspect,
};

pub fn grid(
    n: usize,
    room_of: impl Fn(usize, usize) -> &'static str,
    types: &[(usize, usize, CellType)],
) -> Vec<Vec<Cell>> {
    let mut rows: Vec<Vec<Cell>> = (0..n)
        .map(|r| {
            (0..n)
                .map(|c| Cell {
                    room: room_of(r, c).to_string(),
                    cell_type: CellType::Empty,
                })
                .collect()
        })
        .collect();
    for &(r, c, t) in types {
        rows[r][c].cell_type = t;
    }
    rows
}

pub fn rooms(list: &[(&str, &str, &str)]) -> BTreeMap<String, RoomInfo> {
    list.iter()
        .map(|&(id, name, color)| {
            (
                id.to_string(),
                RoomInfo {
                    name: name.to_string(),
                    color: color.to_string(),
                },
            )
        })
        .collect()
}

pub fn suspect(
    id: &str,
    gender: Option<Gender>,
    clue: &str,
    constraints: Vec<Constraint>,
) -> Suspect {
    let mut name: Vec<char> = id.chars().collect();
    name[0] = name[0].to_ascii_uppercase();
    Suspect {
        id: id.to_string(),
        name: name.into_iter().collect(),
        avatar: format!("{id}.png"),
        color: "#888".to_string(),
        gender,
        is_victim: false,
        clue: clue.to_string(),
        constraints,
    }
}

pub fn solution(entries: &[(&str, usize, usize)]) -> BTreeMap<String, SolutionPos> {
    entries
        .iter()
        .map(|&(id, row, col)| (id.to_string(), SolutionPos { row, col }))
        .collect()
}

/// Car Repair: 6x6, four rooms, six suspects. Solvable by static filters,
/// row/column exclusion and one relative-row deduction.
pub fn car_repair() -> Puzzle {
    let room_of = |r: usize, c: usize| match (r < 3, c < 3) {
        (true, true) => "garage",
        (true, false) => "office",
        (false, true) => "workshop",
        (false, false) => "yard",
    };
    let board_layout = grid(
        6,
        room_of,
        &[
            (0, 1, CellType::Carpet),
            (0, 3, CellType::Tv),
            (1, 1, CellType::Shelf),
            (1, 2, CellType::Box),
            (2, 3, CellType::Table),
            (2, 5, CellType::Chair),
            (4, 0, CellType::Car),
            (4, 5, CellType::Tree),
            (5, 4, CellType::OilSlick),
        ],
    );
    Puzzle {
        id: "car-repair".to_string(),
        name: "Car Repair".to_string(),
        subtitle: "Trouble at the garage".to_string(),
        difficulty: "easy".to_string(),
        grid_size: 6,
        board_layout,
        rooms: rooms(&[
            ("garage", "Garage", "#b0bec5"),
            ("office", "Office", "#ffe082"),
            ("workshop", "Workshop", "#a5d6a7"),
            ("yard", "Yard", "#ffab91"),
        ]),
        suspects: vec![
            suspect(
                "anthony",
                Some(Gender::Male),
                "I slipped on the oil out in the yard.",
                vec![
                    Constraint::InRoom {
                        room: "yard".to_string(),
                    },
                    Constraint::OnCellType {
                        cell_type: CellType::OilSlick,
                    },
                ],
            ),
            suspect(
                "brock",
                Some(Gender::Male),
                "I never left the fourth aisle of the yard.",
                vec![
                    Constraint::InRoom {
                        room: "yard".to_string(),
                    },
                    Constraint::InColumns { cols: vec![3] },
                ],
            ),
            suspect(
                "crystal",
                Some(Gender::Female),
                "I was on the garage carpet the whole time.",
                vec![
                    Constraint::InRoom {
                        room: "garage".to_string(),
                    },
                    Constraint::OnCellType {
                        cell_type: CellType::Carpet,
                    },
                ],
            ),
            suspect(
                "diane",
                Some(Gender::Female),
                "I sat in the office chair doing paperwork.",
                vec![
                    Constraint::InRoom {
                        room: "office".to_string(),
                    },
                    Constraint::OnCellType {
                        cell_type: CellType::Chair,
                    },
                ],
            ),
            suspect(
                "emilio",
                Some(Gender::Male),
                "I was in the workshop, one row below Diane.",
                vec![
                    Constraint::InRoom {
                        room: "workshop".to_string(),
                    },
                    Constraint::RelativeRow {
                        suspect: "diane".to_string(),
                        row_offset: 1,
                    },
                ],
            ),
            suspect(
                "vaughn",
                Some(Gender::Male),
                "Second shelf row of the garage, as always.",
                vec![
                    Constraint::InRoom {
                        room: "garage".to_string(),
                    },
                    Constraint::InRow { row: 1 },
                ],
            ),
        ],
        solution: solution(&[
            ("anthony", 5, 4),
            ("brock", 4, 3),
            ("crystal", 0, 1),
            ("diane", 2, 5),
            ("emilio", 3, 2),
            ("vaughn", 1, 0),
        ]),
        hints: Vec::new(),
        track_positions: BTreeMap::new(),
        victim: Some("crystal".to_string()),
        murderer: Some("brock".to_string()),
        crime_room: Some("garage".to_string()),
    }
}

/// Backyard Garden Easy: 9x9, a chain of pinned suspects that resolves by
/// basic propagation alone. Carissa anchors the cascade; Holden collapses
/// only after her column is taken.
pub fn backyard_garden() -> Puzzle {
    let room_of = |r: usize, _c: usize| match r {
        0..=2 => "lawn",
        3 => "flowerbed",
        4 => "pond",
        5 | 6 => "hedge",
        _ => "patio",
    };
    let mut types = vec![
        (0, 5, CellType::Flowers),
        (0, 8, CellType::Tree),
        (2, 7, CellType::Bush),
        (3, 0, CellType::Flowers),
        (5, 8, CellType::Bush),
        (7, 1, CellType::Shrub),
        (8, 0, CellType::Tree),
    ];
    for c in 0..9 {
        types.push((
            4,
            c,
            if c == 2 || c == 4 {
                CellType::PondWater
            } else {
                CellType::LilyPad
            },
        ));
    }
    let cols = |cs: &[usize]| Constraint::InColumns { cols: cs.to_vec() };
    Puzzle {
        id: "backyard-garden-easy".to_string(),
        name: "Backyard Garden".to_string(),
        subtitle: "A quiet afternoon, until it wasn't".to_string(),
        difficulty: "easy".to_string(),
        grid_size: 9,
        board_layout: grid(9, room_of, &types),
        rooms: rooms(&[
            ("lawn", "Lawn", "#aed581"),
            ("flowerbed", "Flower Bed", "#f48fb1"),
            ("pond", "Pond", "#81d4fa"),
            ("hedge", "Hedge", "#66bb6a"),
            ("patio", "Patio", "#bcaaa4"),
        ]),
        suspects: vec![
            suspect(
                "carissa",
                Some(Gender::Female),
                "I was at the lawn gate, first corner.",
                vec![Constraint::InRow { row: 0 }, cols(&[0])],
            ),
            suspect(
                "holden",
                Some(Gender::Male),
                "Second strip of lawn, near the gate or the birdbath.",
                vec![Constraint::InRow { row: 1 }, cols(&[0, 3])],
            ),
            suspect(
                "petunia",
                Some(Gender::Female),
                "Back of the lawn, by one of the planters.",
                vec![Constraint::InRow { row: 2 }, cols(&[3, 1])],
            ),
            suspect(
                "mason",
                Some(Gender::Male),
                "Knee-deep in the flower bed.",
                vec![Constraint::InRow { row: 3 }, cols(&[1, 4])],
            ),
            suspect(
                "willow",
                Some(Gender::Female),
                "Standing in the pond, obviously.",
                vec![Constraint::OnCellType {
                    cell_type: CellType::PondWater,
                }],
            ),
            suspect(
                "flint",
                Some(Gender::Male),
                "Front side of the hedge.",
                vec![Constraint::InRow { row: 5 }, cols(&[2, 5])],
            ),
            suspect(
                "tansy",
                Some(Gender::Female),
                "Far side of the hedge, towards the shed.",
                vec![Constraint::InRow { row: 6 }, cols(&[5, 7])],
            ),
            suspect(
                "aster",
                Some(Gender::Female),
                "On the patio, by the grill.",
                vec![Constraint::InRow { row: 7 }, cols(&[7, 6])],
            ),
            suspect(
                "bram",
                Some(Gender::Male),
                "Patio corner, feet up.",
                vec![Constraint::InRow { row: 8 }, cols(&[6, 8])],
            ),
        ],
        solution: solution(&[
            ("carissa", 0, 0),
            ("holden", 1, 3),
            ("petunia", 2, 1),
            ("mason", 3, 4),
            ("willow", 4, 2),
            ("flint", 5, 5),
            ("tansy", 6, 7),
            ("aster", 7, 6),
            ("bram", 8, 8),
        ]),
        hints: Vec::new(),
        track_positions: BTreeMap::new(),
        victim: None,
        murderer: None,
        crime_room: None,
    }
}

/// Horse Track Hard: 12x12. Nine pinned riders cascade; the endgame between
/// Misty, Onyx and Piper resists every direct technique and needs
/// contradiction elimination (Onyx is alone in the yard and ahead of Misty
/// on the track ranking).
pub fn horse_track() -> Puzzle {
    let room_of = |r: usize, c: usize| match r {
        0..=2 => "meadow",
        3..=5 => "field",
        6..=8 => "hills",
        9 => "track",
        _ => {
            if c < 5 {
                "stable"
            } else {
                "yard"
            }
        }
    };
    let mut types: Vec<(usize, usize, CellType)> = (0..12).map(|c| (9, c, CellType::Track)).collect();
    types.extend([
        (1, 6, CellType::Tree),
        (4, 9, CellType::Bush),
        (7, 2, CellType::Shrub),
        (10, 5, CellType::Bush),
        (11, 7, CellType::Bush),
        (10, 10, CellType::Tree),
        (10, 0, CellType::Horse),
        (11, 2, CellType::Horse),
    ]);
    let cols = |cs: &[usize]| Constraint::InColumns { cols: cs.to_vec() };
    let row = |r: usize| Constraint::InRow { row: r };
    let pinned_cols: [usize; 9] = [0, 1, 2, 3, 5, 7, 8, 10, 11];
    let pinned_names = [
        "blaze", "copper", "duke", "ember", "flicka", "gunner", "hazel", "indigo", "jasper",
    ];
    let mut suspects: Vec<Suspect> = pinned_names
        .iter()
        .enumerate()
        .map(|(i, &name)| {
            let constraints = if i == 0 {
                vec![row(0), cols(&[pinned_cols[0]])]
            } else {
                vec![row(i), cols(&[pinned_cols[i - 1], pinned_cols[i]])]
            };
            suspect(name, None, "I kept to my own lane.", constraints)
        })
        .collect();
    suspects.push(suspect(
        "misty",
        Some(Gender::Female),
        "I never stepped off the track.",
        vec![Constraint::InRoom {
            room: "track".to_string(),
        }],
    ));
    suspects.push(suspect(
        "onyx",
        Some(Gender::Male),
        "Alone in the yard, and well ahead of Misty.",
        vec![
            Constraint::InRoom {
                room: "yard".to_string(),
            },
            Constraint::Alone,
            Constraint::AheadOf {
                suspect: "misty".to_string(),
            },
        ],
    ));
    suspects.push(suspect(
        "piper",
        Some(Gender::Female),
        "Either the stable or the yard, I forget.",
        vec![Constraint::InRooms {
            rooms: vec!["stable".to_string(), "yard".to_string()],
        }],
    ));

    let mut solution_entries: Vec<(&str, usize, usize)> = pinned_names
        .iter()
        .enumerate()
        .map(|(i, &name)| (name, i, [0, 1, 2, 3, 5, 7, 8, 10, 11][i]))
        .collect();
    solution_entries.push(("misty", 9, 6));
    solution_entries.push(("onyx", 11, 9));
    solution_entries.push(("piper", 10, 4));

    let track_positions: BTreeMap<String, i64> = [
        ("9-4", 2),
        ("9-6", 4),
        ("9-9", 8),
        ("10-6", 6),
        ("10-9", 3),
        ("11-6", 5),
        ("11-9", 9),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    Puzzle {
        id: "horse-track-hard".to_string(),
        name: "Horse Track".to_string(),
        subtitle: "Photo finish".to_string(),
        difficulty: "hard".to_string(),
        grid_size: 12,
        board_layout: grid(12, room_of, &types),
        rooms: rooms(&[
            ("meadow", "Meadow", "#c5e1a5"),
            ("field", "Field", "#dce775"),
            ("hills", "Hills", "#bcaaa4"),
            ("track", "Track", "#ffcc80"),
            ("stable", "Stable", "#a1887f"),
            ("yard", "Yard", "#90caf9"),
        ]),
        suspects,
        solution: solution(&solution_entries),
        hints: Vec::new(),
        track_positions: track_positions
            .into_iter()
            .map(|(k, v)| (k.parse().expect("fixture cell key"), v))
            .collect(),
        victim: None,
        murderer: None,
        crime_room: None,
    }
}

/// Preppers Medium: 6x6 with a curated hint for Carolina that unlocks once
/// Howie is placed.
pub fn preppers() -> Puzzle {
    let room_of = |r: usize, c: usize| match r {
        0 | 1 => "bunker",
        2 | 3 => {
            if c < 3 {
                "kitchen"
            } else {
                "bedroom"
            }
        }
        _ => "storeroom",
    };
    let board_layout = grid(
        6,
        room_of,
        &[
            (0, 4, CellType::Box),
            (2, 2, CellType::Plant),
            (3, 0, CellType::Chair),
            (4, 2, CellType::Shelf),
        ],
    );
    let cols = |cs: &[usize]| Constraint::InColumns { cols: cs.to_vec() };
    Puzzle {
        id: "preppers-medium".to_string(),
        name: "Preppers".to_string(),
        subtitle: "Everything stockpiled but an alibi".to_string(),
        difficulty: "medium".to_string(),
        grid_size: 6,
        board_layout,
        rooms: rooms(&[
            ("bunker", "Bunker", "#b0bec5"),
            ("kitchen", "Kitchen", "#ffe082"),
            ("bedroom", "Bedroom", "#ce93d8"),
            ("storeroom", "Storeroom", "#a5d6a7"),
        ]),
        suspects: vec![
            suspect(
                "carolina",
                Some(Gender::Female),
                "I was resting in the bedroom.",
                vec![Constraint::InRoom {
                    room: "bedroom".to_string(),
                }],
            ),
            suspect(
                "dale",
                Some(Gender::Male),
                "Guarding the bunker door.",
                vec![Constraint::InRow { row: 0 }, cols(&[0])],
            ),
            suspect(
                "howie",
                Some(Gender::Male),
                "Counting cans in the storeroom.",
                vec![Constraint::InRow { row: 5 }, cols(&[1])],
            ),
            suspect(
                "imogen",
                Some(Gender::Female),
                "Bunker bunk, second row.",
                vec![Constraint::InRow { row: 1 }, cols(&[2])],
            ),
            suspect(
                "rufus",
                Some(Gender::Male),
                "Bedroom side, by the wall.",
                vec![Constraint::InRow { row: 3 }, cols(&[3])],
            ),
            suspect(
                "sybil",
                Some(Gender::Female),
                "Bottom shelf corner of the storeroom.",
                vec![Constraint::InRow { row: 4 }, cols(&[5])],
            ),
        ],
        solution: solution(&[
            ("carolina", 2, 4),
            ("dale", 0, 0),
            ("howie", 5, 1),
            ("imogen", 1, 2),
            ("rufus", 3, 3),
            ("sybil", 4, 5),
        ]),
        hints: vec![CuratedHint {
            suspect: "carolina".to_string(),
            order: 1,
            prerequisites: vec!["howie".to_string()],
            target: HintTarget::Room {
                room: "bedroom".to_string(),
            },
            messages: HintMessages {
                single: "Carolina's spot in the bedroom is settled now.".to_string(),
                multiple: "Carolina is somewhere in the bedroom.".to_string(),
                room_blocked: None,
            },
            skip_if_more_than: None,
        }],
        track_positions: BTreeMap::new(),
        victim: None,
        murderer: None,
        crime_room: None,
    }
}
