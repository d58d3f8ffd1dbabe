//! Immutable puzzle data model and construction-time validation.
//!
//! A `Puzzle` is the wire-format input shared with the host: grid layout,
//! rooms, suspects with their structured constraints, the reference
//! solution, and optional curated hints / track rankings. Everything here
//! is plain data; the logic lives in `board`, `constraint` and `solver`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical cell address. Wire form is exactly `"<row>-<col>"` with 0-based
/// decimal integers, e.g. `"5-4"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellKey {
    pub row: usize,
    pub col: usize,
}

impl CellKey {
    pub fn new(row: usize, col: usize) -> Self {
        CellKey { row, col }
    }

    /// Parse the `"row-col"` wire form.
    pub fn parse(raw: &str) -> Result<Self, PuzzleError> {
        let mut parts = raw.splitn(2, '-');
        let (Some(row), Some(col)) = (parts.next(), parts.next()) else {
            return Err(PuzzleError::BadCellKey { raw: raw.into() });
        };
        match (row.parse(), col.parse()) {
            (Ok(row), Ok(col)) => Ok(CellKey { row, col }),
            _ => Err(PuzzleError::BadCellKey { raw: raw.into() }),
        }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

impl FromStr for CellKey {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellKey::parse(s)
    }
}

impl TryFrom<String> for CellKey {
    type Error = PuzzleError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        CellKey::parse(&s)
    }
}

impl From<CellKey> for String {
    fn from(key: CellKey) -> String {
        key.to_string()
    }
}

/// What a grid square is furnished with. Closed set; the wire names are
/// camelCase (`"lilyPad"`, `"finishingLine"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellType {
    Empty,
    Carpet,
    Chair,
    Tv,
    Shelf,
    Table,
    Flowers,
    LilyPad,
    Tree,
    Bush,
    Bed,
    Couch,
    PondWater,
    Horse,
    Plant,
    Track,
    FinishingLine,
    OilSlick,
    Bonsai,
    Cactus,
    Shrub,
    Path,
    Box,
    Car,
}

/// The cell types a suspect may stand on. Fixed across all puzzles.
pub const OCCUPIABLE_TYPES: [CellType; 10] = [
    CellType::Empty,
    CellType::Carpet,
    CellType::Chair,
    CellType::PondWater,
    CellType::Horse,
    CellType::Path,
    CellType::OilSlick,
    CellType::Car,
    CellType::Bed,
    CellType::Track,
];

impl CellType {
    pub fn is_occupiable(self) -> bool {
        OCCUPIABLE_TYPES.contains(&self)
    }

    /// Lowercase human-readable name, used in diagnostics and hint text.
    pub fn label(self) -> &'static str {
        match self {
            CellType::Empty => "empty floor",
            CellType::Carpet => "carpet",
            CellType::Chair => "chair",
            CellType::Tv => "TV",
            CellType::Shelf => "shelf",
            CellType::Table => "table",
            CellType::Flowers => "flowers",
            CellType::LilyPad => "lily pad",
            CellType::Tree => "tree",
            CellType::Bush => "bush",
            CellType::Bed => "bed",
            CellType::Couch => "couch",
            CellType::PondWater => "pond water",
            CellType::Horse => "horse",
            CellType::Plant => "plant",
            CellType::Track => "track",
            CellType::FinishingLine => "finishing line",
            CellType::OilSlick => "oil slick",
            CellType::Bonsai => "bonsai",
            CellType::Cactus => "cactus",
            CellType::Shrub => "shrub",
            CellType::Path => "path",
            CellType::Box => "box",
            CellType::Car => "car",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One square of the board layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub room: String,
    #[serde(rename = "type")]
    pub cell_type: CellType,
}

/// Display metadata for a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInfo {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => f.write_str("man"),
            Gender::Female => f.write_str("woman"),
        }
    }
}

/// A declarative clue constraint. Closed tagged variant; logic dispatches
/// with an exhaustive match. Cross-suspect references carry suspect *ids*,
/// never direct references, so the dependency graph stays acyclic in data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Constraint {
    InRoom { room: String },
    InRooms { rooms: Vec<String> },
    InRow { row: usize },
    InColumns { cols: Vec<usize> },
    OnCellType { cell_type: CellType },
    NotOnCellType { cell_type: CellType },
    /// Orthogonally adjacent to a cell of the type, in that cell's room.
    Beside { cell_type: CellType },
    NotBeside { cell_type: CellType },
    /// The suspect is the only one in their room.
    Alone,
    /// Exactly the two named suspects occupy the room.
    AloneWith { suspect: String },
    /// The room holds this suspect plus exactly one suspect of the gender.
    AloneWithGender { gender: Gender },
    WithPerson { suspect: String, room: String },
    InRoomWithPersonOnCellType { gender: Gender, cell_type: CellType },
    InRoomWithPersonBesideCellType { cell_type: CellType },
    OnlyPersonOnCellType { cell_type: CellType },
    /// My row = other's row + row_offset.
    RelativeRow { suspect: String, row_offset: i64 },
    /// My track position is strictly greater than the other's.
    AheadOf { suspect: String },
    /// Shares the room with exactly one other suspect (the murderer).
    Victim,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suspect {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub is_victim: bool,
    /// Presentational clue text; logic comes only from `constraints`.
    #[serde(default)]
    pub clue: String,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

/// Reference solution entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionPos {
    pub row: usize,
    pub col: usize,
}

impl SolutionPos {
    pub fn key(self) -> CellKey {
        CellKey::new(self.row, self.col)
    }
}

/// Target specifier for a curated hint: which subset of a suspect's
/// candidates the hint points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HintTarget {
    Room {
        room: String,
    },
    Rooms {
        rooms: Vec<String>,
    },
    CellType {
        cell_type: CellType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room: Option<String>,
    },
    AdjacentTo {
        cell_type: CellType,
    },
    Row {
        row: usize,
    },
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintMessages {
    pub single: String,
    pub multiple: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_blocked: Option<String>,
}

/// One entry of a puzzle's scripted hint list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CuratedHint {
    pub suspect: String,
    pub order: i64,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    pub target: HintTarget,
    pub messages: HintMessages,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_if_more_than: Option<usize>,
}

/// The complete puzzle description. Immutable once constructed; the solver
/// and hint engine only ever read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub difficulty: String,
    pub grid_size: usize,
    pub board_layout: Vec<Vec<Cell>>,
    pub rooms: BTreeMap<String, RoomInfo>,
    pub suspects: Vec<Suspect>,
    pub solution: BTreeMap<String, SolutionPos>,
    #[serde(default)]
    pub hints: Vec<CuratedHint>,
    #[serde(default)]
    pub track_positions: BTreeMap<CellKey, i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub victim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub murderer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crime_room: Option<String>,
}

impl Puzzle {
    /// Index of a suspect in the declared list.
    pub fn suspect_index(&self, id: &str) -> Option<usize> {
        self.suspects.iter().position(|s| s.id == id)
    }

    pub fn suspect(&self, id: &str) -> Option<&Suspect> {
        self.suspects.iter().find(|s| s.id == id)
    }

    /// Display name of a room, falling back to the raw id.
    pub fn room_name<'a>(&'a self, room: &'a str) -> &'a str {
        self.rooms.get(room).map_or(room, |r| r.name.as_str())
    }

    /// Display name of a suspect, falling back to the raw id.
    pub fn suspect_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.suspect(id).map_or(id, |s| s.name.as_str())
    }

    /// Cross-validate the whole description. Called by `BoardIndex::build`;
    /// a failure here is a programmer/authoring error, not a game state.
    pub fn validate(&self) -> Result<(), PuzzleError> {
        let n = self.grid_size;
        if self.board_layout.len() != n || self.board_layout.iter().any(|r| r.len() != n) {
            return Err(PuzzleError::BadGrid {
                rows: self.board_layout.len(),
                cols: self.board_layout.first().map_or(0, |r| r.len()),
                expected: n,
            });
        }
        for (row, cells) in self.board_layout.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if !self.rooms.contains_key(&cell.room) {
                    return Err(PuzzleError::UnknownRoom {
                        key: CellKey::new(row, col),
                        room: cell.room.clone(),
                    });
                }
            }
        }
        for (i, suspect) in self.suspects.iter().enumerate() {
            if self.suspects[..i].iter().any(|s| s.id == suspect.id) {
                return Err(PuzzleError::DuplicateSuspect {
                    id: suspect.id.clone(),
                });
            }
            for constraint in &suspect.constraints {
                self.validate_constraint(&suspect.id, constraint)?;
            }
        }
        for (id, pos) in &self.solution {
            if self.suspect_index(id).is_none() {
                return Err(PuzzleError::SolutionUnknownSuspect { id: id.clone() });
            }
            if pos.row >= n || pos.col >= n {
                return Err(PuzzleError::SolutionOutOfBounds {
                    id: id.clone(),
                    row: pos.row,
                    col: pos.col,
                });
            }
        }
        for hint in &self.hints {
            if self.suspect_index(&hint.suspect).is_none() {
                return Err(PuzzleError::HintUnknownSuspect {
                    id: hint.suspect.clone(),
                });
            }
            for prereq in &hint.prerequisites {
                if self.suspect_index(prereq).is_none() {
                    return Err(PuzzleError::HintUnknownSuspect {
                        id: prereq.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_constraint(&self, owner: &str, constraint: &Constraint) -> Result<(), PuzzleError> {
        let check_room = |room: &str| {
            if self.rooms.contains_key(room) {
                Ok(())
            } else {
                Err(PuzzleError::UnknownConstraintRoom {
                    suspect: owner.to_string(),
                    room: room.to_string(),
                })
            }
        };
        let check_suspect = |id: &str| {
            if self.suspect_index(id).is_some() {
                Ok(())
            } else {
                Err(PuzzleError::UnknownSuspect {
                    suspect: owner.to_string(),
                    other: id.to_string(),
                })
            }
        };
        match constraint {
            Constraint::InRoom { room } => check_room(room),
            Constraint::InRooms { rooms } => rooms.iter().try_for_each(|r| check_room(r)),
            Constraint::AloneWith { suspect }
            | Constraint::AheadOf { suspect }
            | Constraint::RelativeRow { suspect, .. } => check_suspect(suspect),
            Constraint::WithPerson { suspect, room } => {
                check_suspect(suspect)?;
                check_room(room)
            }
            _ => Ok(()),
        }
    }
}

/// Construction-time and placement-precondition failures. Distinct from an
/// unsolvable state, which is not an error: the solver just stops making
/// progress and reports `is_solved() == false`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PuzzleError {
    #[error("malformed cell key `{raw}`")]
    BadCellKey { raw: String },
    #[error("board layout is {rows}x{cols}, expected {expected}x{expected}")]
    BadGrid {
        rows: usize,
        cols: usize,
        expected: usize,
    },
    #[error("cell {key} references unknown room `{room}`")]
    UnknownRoom { key: CellKey, room: String },
    #[error("constraint on `{suspect}` references unknown room `{room}`")]
    UnknownConstraintRoom { suspect: String, room: String },
    #[error("constraint on `{suspect}` references unknown suspect `{other}`")]
    UnknownSuspect { suspect: String, other: String },
    #[error("duplicate suspect id `{id}`")]
    DuplicateSuspect { id: String },
    #[error("solution entry for unknown suspect `{id}`")]
    SolutionUnknownSuspect { id: String },
    #[error("solution places `{id}` outside the board at {row}-{col}")]
    SolutionOutOfBounds { id: String, row: usize, col: usize },
    #[error("curated hint references unknown suspect `{id}`")]
    HintUnknownSuspect { id: String },
    #[error("placement at {key} is outside the board")]
    PlacementOutOfBounds { key: CellKey },
    #[error("cell {key} is {cell_type}, which is not occupiable")]
    PlacementNotOccupiable { key: CellKey, cell_type: CellType },
    #[error("placement for unknown suspect `{id}`")]
    PlacementUnknownSuspect { id: String },
    #[error("placements at {a} and {b} conflict on a row or column")]
    PlacementConflict { a: CellKey, b: CellKey },
}
