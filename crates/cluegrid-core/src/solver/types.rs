//! Technique identifiers and the solver trace record.

use serde::{Deserialize, Serialize};

use crate::puzzle::CellKey;

/// Deduction technique, ordered roughly by how early the pipeline tries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Technique {
    NakedSingle,
    RowSingle,
    ColumnSingle,
    RowClaiming,
    ColumnClaiming,
    NakedRowSet,
    NakedColumnSet,
    RoomConstraint,
    OnlyPersonOnType,
    RelativeRow,
    PointingGroup,
    ContradictionElimination,
}

impl std::fmt::Display for Technique {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Technique::NakedSingle => "Naked Single",
            Technique::RowSingle => "Row Single",
            Technique::ColumnSingle => "Column Single",
            Technique::RowClaiming => "Row Claiming",
            Technique::ColumnClaiming => "Column Claiming",
            Technique::NakedRowSet => "Naked Row Set",
            Technique::NakedColumnSet => "Naked Column Set",
            Technique::RoomConstraint => "Room Constraint",
            Technique::OnlyPersonOnType => "Only Person On Cell Type",
            Technique::RelativeRow => "Relative Row",
            Technique::PointingGroup => "Pointing Group",
            Technique::ContradictionElimination => "Contradiction Elimination",
        };
        f.write_str(name)
    }
}

/// One unit of the solver trace. A step either places a suspect
/// (`cell_key` set), eliminates candidates (`eliminated_cells` non-empty),
/// or both. The trace is append-only and replayable by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveStep {
    pub technique: Technique,
    pub suspect_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_key: Option<CellKey>,
    pub message: String,
    #[serde(default)]
    pub highlight_cells: Vec<CellKey>,
    #[serde(default)]
    pub eliminated_cells: Vec<CellKey>,
}
