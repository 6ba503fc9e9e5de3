//! Line classification for the line-tagged TCAD formats.
//!
//! Each line is classified on its own from its first whitespace-delimited
//! token. Structure files use `c`/`s`/`n`/`Q` records and simulator logs use
//! `p`/`Q`/`d`; anything else is reported as [`StructureRecord::Other`] or
//! [`LogRecord::Other`] and skipped by the readers.

use crate::constants::{
    COORDINATE_FIELD_COUNT, LABEL_MIN_FIELD_COUNT, LOG_HEADER_SKIP, TAG_COLUMN_LABEL,
    TAG_COORDINATE, TAG_DATA_HEADER, TAG_LOG_DATA, TAG_LOG_HEADER, TAG_NODE_DATA,
};
use std::fmt;
use std::str::{FromStr, SplitWhitespace};
use thiserror::Error;

/// A relabel instruction: data key `raw_key` should be called `name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLabel {
    pub raw_key: String,
    pub name: String,
}

/// One classified line of a structure file
#[derive(Debug, Clone, PartialEq)]
pub enum StructureRecord {
    Coordinate { id: u64, x: f64, y: f64, z: f64 },
    DataHeader(Vec<String>),
    NodeData { id: u64, values: Vec<f64> },
    ColumnLabel(ColumnLabel),
    Other,
}

/// One classified line of a simulator log
#[derive(Debug, Clone, PartialEq)]
pub enum LogRecord {
    Header(Vec<String>),
    Label(ColumnLabel),
    Data(Vec<f64>),
    Other,
}

/// Record kinds that can fail to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Coordinate,
    DataHeader,
    NodeData,
    ColumnLabel,
    LogHeader,
    LogData,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Coordinate => "coordinate",
            RecordKind::DataHeader => "data header",
            RecordKind::NodeData => "node data",
            RecordKind::ColumnLabel => "column label",
            RecordKind::LogHeader => "log header",
            RecordKind::LogData => "log data",
        };
        f.write_str(name)
    }
}

/// A recognised record whose fields could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} record: {reason}")]
pub struct RecordError {
    pub kind: RecordKind,
    pub reason: String,
}

impl RecordError {
    fn new(kind: RecordKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

/// Classify one line of a structure file
pub fn classify_structure_line(line: &str) -> Result<StructureRecord, RecordError> {
    let mut tokens = line.split_whitespace();
    let Some(tag) = tokens.next() else {
        return Ok(StructureRecord::Other);
    };

    match tag {
        TAG_COORDINATE => parse_coordinate(tokens),
        TAG_DATA_HEADER => {
            let keys = parse_keys(tokens, RecordKind::DataHeader)?;
            Ok(StructureRecord::DataHeader(keys))
        }
        TAG_NODE_DATA => parse_node(tokens),
        TAG_COLUMN_LABEL => parse_label(line).map(StructureRecord::ColumnLabel),
        _ => Ok(StructureRecord::Other),
    }
}

/// Classify one line of a simulator log
pub fn classify_log_line(line: &str) -> Result<LogRecord, RecordError> {
    let mut tokens = line.split_whitespace();
    let Some(tag) = tokens.next() else {
        return Ok(LogRecord::Other);
    };

    match tag {
        TAG_LOG_HEADER => {
            let keys = parse_keys(tokens.skip(LOG_HEADER_SKIP - 1), RecordKind::LogHeader)?;
            Ok(LogRecord::Header(keys))
        }
        TAG_LOG_DATA => {
            let values = tokens
                .map(|token| parse_number::<f64>(token, RecordKind::LogData, "value"))
                .collect::<Result<Vec<_>, _>>()?;
            if values.is_empty() {
                return Err(RecordError::new(RecordKind::LogData, "no values"));
            }
            Ok(LogRecord::Data(values))
        }
        TAG_COLUMN_LABEL => parse_label(line).map(LogRecord::Label),
        _ => Ok(LogRecord::Other),
    }
}

fn parse_coordinate(tokens: SplitWhitespace<'_>) -> Result<StructureRecord, RecordError> {
    let fields: Vec<&str> = tokens.collect();
    if fields.len() != COORDINATE_FIELD_COUNT - 1 {
        return Err(RecordError::new(
            RecordKind::Coordinate,
            format!(
                "expected {} fields after tag, found {}",
                COORDINATE_FIELD_COUNT - 1,
                fields.len()
            ),
        ));
    }

    let id = parse_number::<u64>(fields[0], RecordKind::Coordinate, "point id")?;
    let x = parse_finite(fields[1], RecordKind::Coordinate, "x")?;
    let y = parse_finite(fields[2], RecordKind::Coordinate, "y")?;
    let z = parse_finite(fields[3], RecordKind::Coordinate, "z")?;

    Ok(StructureRecord::Coordinate { id, x, y, z })
}

fn parse_node(mut tokens: SplitWhitespace<'_>) -> Result<StructureRecord, RecordError> {
    let id = tokens
        .next()
        .ok_or_else(|| RecordError::new(RecordKind::NodeData, "missing node id"))?;
    let id = parse_number::<u64>(id, RecordKind::NodeData, "node id")?;

    let values = tokens
        .map(|token| parse_number::<f64>(token, RecordKind::NodeData, "value"))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StructureRecord::NodeData { id, values })
}

fn parse_keys<'a>(
    tokens: impl Iterator<Item = &'a str>,
    kind: RecordKind,
) -> Result<Vec<String>, RecordError> {
    let keys: Vec<String> = tokens.map(str::to_string).collect();
    if keys.is_empty() {
        return Err(RecordError::new(kind, "no data keys"));
    }
    Ok(keys)
}

/// Labels are split with shell quoting so `"Electric Field"` stays one field
fn parse_label(line: &str) -> Result<ColumnLabel, RecordError> {
    let fields = shlex::split(line)
        .ok_or_else(|| RecordError::new(RecordKind::ColumnLabel, "unbalanced quotes"))?;

    if fields.len() < LABEL_MIN_FIELD_COUNT {
        return Err(RecordError::new(
            RecordKind::ColumnLabel,
            format!(
                "expected at least {} fields, found {}",
                LABEL_MIN_FIELD_COUNT,
                fields.len()
            ),
        ));
    }

    Ok(ColumnLabel {
        raw_key: fields[1].clone(),
        name: fields[LABEL_MIN_FIELD_COUNT - 1..].join(" "),
    })
}

fn parse_number<T: FromStr>(token: &str, kind: RecordKind, what: &str) -> Result<T, RecordError> {
    token
        .parse::<T>()
        .map_err(|_| RecordError::new(kind, format!("invalid {} '{}'", what, token)))
}

fn parse_finite(token: &str, kind: RecordKind, what: &str) -> Result<f64, RecordError> {
    let value = parse_number::<f64>(token, kind, what)?;
    if !value.is_finite() {
        return Err(RecordError::new(
            kind,
            format!("non-finite {} '{}'", what, token),
        ));
    }
    Ok(value)
}
