//! BoardIndex: per-puzzle lookup tables built once from the grid.
//!
//! One builder pass materialises every index the solver needs; all lookups
//! afterwards are O(1) set operations. The index is immutable after build
//! and safe to share by reference between solver instances.

use std::collections::{BTreeMap, BTreeSet};

use crate::puzzle::{CellKey, CellType, Puzzle, PuzzleError};

/// Everything known about one grid square, keyed for O(1) access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellInfo {
    pub row: usize,
    pub col: usize,
    pub room: String,
    pub cell_type: CellType,
}

/// Precomputed board topology. Built once per puzzle via [`BoardIndex::build`].
#[derive(Debug, Clone)]
pub struct BoardIndex {
    grid_size: usize,
    /// Cells a suspect may stand on.
    occupiable: BTreeSet<CellKey>,
    cell_info: BTreeMap<CellKey, CellInfo>,
    /// Room id -> occupiable cells of that room.
    room_cells: BTreeMap<String, BTreeSet<CellKey>>,
    /// Cell type -> every cell of that type, occupiable or not.
    type_cells: BTreeMap<CellType, BTreeSet<CellKey>>,
    /// Occupiable cell -> 4-connected occupiable neighbours in the same room.
    adjacent_same_room: BTreeMap<CellKey, BTreeSet<CellKey>>,
    /// Cell type -> occupiable cells orthogonally adjacent to a cell of that
    /// type *within that cell's room*.
    beside_type: BTreeMap<CellType, BTreeSet<CellKey>>,
    /// Row index -> occupiable cells of that row.
    row_cells: Vec<BTreeSet<CellKey>>,
    /// Column index -> occupiable cells of that column.
    col_cells: Vec<BTreeSet<CellKey>>,
    empty: BTreeSet<CellKey>,
}

impl BoardIndex {
    /// Validate the puzzle and build every index in one pass over the grid.
    pub fn build(puzzle: &Puzzle) -> Result<Self, PuzzleError> {
        puzzle.validate()?;

        let n = puzzle.grid_size;
        let mut occupiable = BTreeSet::new();
        let mut cell_info = BTreeMap::new();
        let mut room_cells: BTreeMap<String, BTreeSet<CellKey>> = BTreeMap::new();
        let mut type_cells: BTreeMap<CellType, BTreeSet<CellKey>> = BTreeMap::new();
        let mut row_cells = vec![BTreeSet::new(); n];
        let mut col_cells = vec![BTreeSet::new(); n];

        for (row, cells) in puzzle.board_layout.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let key = CellKey::new(row, col);
                cell_info.insert(
                    key,
                    CellInfo {
                        row,
                        col,
                        room: cell.room.clone(),
                        cell_type: cell.cell_type,
                    },
                );
                type_cells.entry(cell.cell_type).or_default().insert(key);
                if cell.cell_type.is_occupiable() {
                    occupiable.insert(key);
                    room_cells.entry(cell.room.clone()).or_default().insert(key);
                    row_cells[row].insert(key);
                    col_cells[col].insert(key);
                }
            }
        }

        // Adjacency is strictly 4-connected, same room, occupiable on the
        // neighbour side. beside_type additionally admits non-occupiable
        // anchors: a chair is not standable but cells beside it are.
        let mut adjacent_same_room = BTreeMap::new();
        let mut beside_type: BTreeMap<CellType, BTreeSet<CellKey>> = BTreeMap::new();
        for (&key, info) in &cell_info {
            let neighbours = orthogonal(key, n);
            if info.cell_type.is_occupiable() {
                let adjacent: BTreeSet<CellKey> = neighbours
                    .iter()
                    .filter(|k| occupiable.contains(k) && cell_info[k].room == info.room)
                    .copied()
                    .collect();
                adjacent_same_room.insert(key, adjacent);
            }
            for neighbour in neighbours {
                let n_info = &cell_info[&neighbour];
                if n_info.cell_type.is_occupiable() && n_info.room == info.room {
                    beside_type.entry(info.cell_type).or_default().insert(neighbour);
                }
            }
        }

        Ok(BoardIndex {
            grid_size: n,
            occupiable,
            cell_info,
            room_cells,
            type_cells,
            adjacent_same_room,
            beside_type,
            row_cells,
            col_cells,
            empty: BTreeSet::new(),
        })
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn occupiable(&self) -> &BTreeSet<CellKey> {
        &self.occupiable
    }

    pub fn is_occupiable(&self, key: CellKey) -> bool {
        self.occupiable.contains(&key)
    }

    pub fn cell(&self, key: CellKey) -> Option<&CellInfo> {
        self.cell_info.get(&key)
    }

    /// Room id of a cell; panics on out-of-bounds keys, which validation
    /// has already excluded for every key the solver produces.
    pub fn room_of(&self, key: CellKey) -> &str {
        &self.cell_info[&key].room
    }

    /// Occupiable cells of a room (empty set for unknown room ids).
    pub fn room_cells(&self, room: &str) -> &BTreeSet<CellKey> {
        self.room_cells.get(room).unwrap_or(&self.empty)
    }

    /// Every cell of a type, including non-occupiable ones.
    pub fn type_cells(&self, cell_type: CellType) -> &BTreeSet<CellKey> {
        self.type_cells.get(&cell_type).unwrap_or(&self.empty)
    }

    /// 4-connected occupiable neighbours in the same room.
    pub fn adjacent_same_room(&self, key: CellKey) -> &BTreeSet<CellKey> {
        self.adjacent_same_room.get(&key).unwrap_or(&self.empty)
    }

    /// Occupiable cells beside a cell of the given type, same room as that
    /// cell. Backs the `beside`/`notBeside` filters and the adjacency hint
    /// target.
    pub fn cells_beside_type(&self, cell_type: CellType) -> &BTreeSet<CellKey> {
        self.beside_type.get(&cell_type).unwrap_or(&self.empty)
    }

    pub fn row_cells(&self, row: usize) -> &BTreeSet<CellKey> {
        self.row_cells.get(row).unwrap_or(&self.empty)
    }

    pub fn col_cells(&self, col: usize) -> &BTreeSet<CellKey> {
        self.col_cells.get(col).unwrap_or(&self.empty)
    }

    /// All room ids that have at least one occupiable cell.
    pub fn rooms(&self) -> impl Iterator<Item = &str> {
        self.room_cells.keys().map(String::as_str)
    }
}

fn orthogonal(key: CellKey, n: usize) -> Vec<CellKey> {
    let mut out = Vec::with_capacity(4);
    if key.row > 0 {
        out.push(CellKey::new(key.row - 1, key.col));
    }
    if key.row + 1 < n {
        out.push(CellKey::new(key.row + 1, key.col));
    }
    if key.col > 0 {
        out.push(CellKey::new(key.row, key.col - 1));
    }
    if key.col + 1 < n {
        out.push(CellKey::new(key.row, key.col + 1));
    }
    out
}
