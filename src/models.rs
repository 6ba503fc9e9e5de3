//! Core data structures and types for TCAD file reading.
//!
//! Defines the cutline axis, point identifiers and the statistics
//! reported by the structure and log readers.

use crate::constants::{AXIS_X, AXIS_Y, NODE_ID_OFFSET};
use crate::error::TcadError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Mesh axis a cutline is taken along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// The axis the cutline does not cut along; its values become the sort column
    pub fn perpendicular(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    /// Column name used for this axis in result tables
    pub fn column_name(self) -> &'static str {
        match self {
            Axis::X => AXIS_X,
            Axis::Y => AXIS_Y,
        }
    }
}

impl FromStr for Axis {
    type Err = TcadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            AXIS_X => Ok(Axis::X),
            AXIS_Y => Ok(Axis::Y),
            other => Err(TcadError::InvalidAxis {
                axis: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Identifier of a mesh point, numbered as in the coordinate records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(pub u64);

impl PointId {
    /// Translate a node record id into the coordinate-record numbering.
    ///
    /// Node records count from one below the coordinate records, so node `2`
    /// is point `3`. Returns `None` if the translation overflows.
    pub fn from_node_id(node_id: u64) -> Option<Self> {
        node_id.checked_add(NODE_ID_OFFSET).map(PointId)
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Counters collected while scanning a structure file
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StructureStats {
    pub lines_read: usize,
    pub coordinate_records: usize,
    pub node_records: usize,
    pub labels_applied: usize,
    pub labels_unresolved: usize,
    pub lines_ignored: usize,
    pub header_line: Option<usize>,
}

/// Simulation name and sweep parameters recovered from a log file name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogFileMetadata {
    pub name: String,
    pub parameters: Vec<(String, String)>,
}

/// Statistics for a directory collection run
#[derive(Debug, Default)]
pub struct CollectionStats {
    pub files_read: usize,
    pub files_failed: usize,
    pub files_hidden: usize,
    pub total_rows: usize,
    pub directory: PathBuf,
    pub processing_time_ms: u128,
}
