//! Error handling for TCAD file reading operations.
//!
//! Every fatal condition carries the offending file path so a failed
//! extraction can be diagnosed without re-running it.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TcadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Malformed record in file: {path} line {line} - {reason}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("No data header record found in file: {path}")]
    MissingSchema { path: PathBuf },

    #[error("No data records found in file: {path}")]
    NoData { path: PathBuf },

    #[error("Invalid cutline axis '{axis}': expected 'x' or 'y'")]
    InvalidAxis { axis: String },

    #[error("Invalid cutline position {position}: must be a finite number")]
    InvalidPosition { position: f64 },

    #[error("No mesh coordinates along axis {axis} in file: {path}")]
    NoCoordinates { path: PathBuf, axis: String },

    #[error("Point {point_id} lies on the cutline but has no node data in file: {path}")]
    MissingNodeData { path: PathBuf, point_id: u64 },

    #[error("Column name '{name}' occurs more than once in the table from file: {path}")]
    DuplicateColumn { path: PathBuf, name: String },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("No readable log files found in directory: {path}")]
    NoLogFiles { path: PathBuf },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

pub type Result<T> = std::result::Result<T, TcadError>;
