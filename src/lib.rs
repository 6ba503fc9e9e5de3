//! TCAD Reader Library
//!
//! Readers for the line-tagged text files written by device simulators:
//!
//! - Structure files (`.str`): stream the mesh coordinates, node data and
//!   column labels, then extract a 1-D cutline along x or y as a Polars table
//! - Simulator logs (`.log`): read one log, or every log in a directory
//!   tagged with the sweep parameters encoded in the file names
//! - Write any result table to CSV or Parquet

pub mod cli;
pub mod config;
pub mod constants;
pub mod discovery;
pub mod error;
pub mod labels;
pub mod mesh_index;
pub mod models;
pub mod node_table;
pub mod output;
pub mod record;
pub mod structure;
pub mod victory_log;

pub use config::ReaderConfig;
pub use discovery::collect_logs;
pub use error::{Result, TcadError};
pub use labels::DataKeys;
pub use mesh_index::{MeshIndex, nearest_coordinate};
pub use models::{Axis, CollectionStats, LogFileMetadata, PointId, StructureStats};
pub use node_table::NodeTable;
pub use output::{TableFormat, write_table};
pub use structure::{StructureFile, read_cutline};
pub use victory_log::read_victory_log;
