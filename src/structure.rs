//! Structure file (`.str`) reading and cutline extraction.
//!
//! A structure file is streamed once. Coordinate records feed the
//! [`MeshIndex`], the single `s` record fixes the [`DataKeys`], node records
//! fill the [`NodeTable`] and label records rename keys. Records may arrive
//! in any order; node and label records seen before the header are held
//! until it appears.
//!
//! A cutline takes the mesh coordinate nearest the requested position along
//! one axis and returns every point on it as a table row:
//!
//! ```text
//! c 1 0.0 0.0 0.0
//! c 2 0.0 1.0 0.0        s 1 2
//! c 3 1.0 0.0 0.0        n 0 0.1 1e15      ->  cutline(x, 0.1)
//! c 4 1.0 1.0 0.0        n 1 0.2 2e15          Potential   y
//! Q 1 0 Potential        ...                   0.1         0.0
//!                                              0.2         1.0
//! ```
//!
//! Key `2` was never labelled, so it is dropped from the table.

use crate::error::{Result, TcadError};
use crate::labels::{DataKeys, LabelPolicy, LabelResolver, first_duplicate};
use crate::mesh_index::{MeshIndex, nearest_coordinate};
use crate::models::{Axis, PointId, StructureStats};
use crate::node_table::NodeTable;
use crate::record::{RecordKind, StructureRecord, classify_structure_line};

use polars::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Extract a cutline from the structure file at `path`.
///
/// `axis` must be `"x"` or `"y"`; it is checked before the file is opened.
pub fn read_cutline(path: impl AsRef<Path>, axis: &str, position: f64) -> Result<DataFrame> {
    let axis: Axis = axis.parse()?;
    check_position(position)?;

    StructureFile::open(path.as_ref())?.cutline(axis, position)
}

fn check_position(position: f64) -> Result<()> {
    if position.is_finite() {
        Ok(())
    } else {
        Err(TcadError::InvalidPosition { position })
    }
}

/// A fully scanned structure file
#[derive(Debug)]
pub struct StructureFile {
    path: PathBuf,
    index: MeshIndex,
    keys: DataKeys,
    nodes: NodeTable,
    stats: StructureStats,
}

impl StructureFile {
    /// Open and scan a structure file
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(TcadError::Io)?;
        Self::from_reader(BufReader::new(file), path)
    }

    /// Scan structure records from any buffered reader; `source` is used in
    /// error messages
    pub fn from_reader<R: BufRead>(reader: R, source: impl AsRef<Path>) -> Result<Self> {
        let mut builder = StructureBuilder::new(source.as_ref());

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(TcadError::Io)?;
            builder.parse_line(line_num + 1, &line)?;
        }

        builder.build()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mesh_index(&self) -> &MeshIndex {
        &self.index
    }

    pub fn data_keys(&self) -> &DataKeys {
        &self.keys
    }

    pub fn node_table(&self) -> &NodeTable {
        &self.nodes
    }

    pub fn stats(&self) -> &StructureStats {
        &self.stats
    }

    /// Extract the cutline along `axis` nearest to `position`.
    ///
    /// Columns are the relabelled data keys in header order followed by the
    /// perpendicular coordinate; rows are sorted ascending by that coordinate.
    pub fn cutline(&self, axis: Axis, position: f64) -> Result<DataFrame> {
        check_position(position)?;

        let coordinate = nearest_coordinate(&self.index, axis, position).ok_or_else(|| {
            TcadError::NoCoordinates {
                path: self.path.clone(),
                axis: axis.to_string(),
            }
        })?;

        let section = self.index.cross_section(axis, coordinate);
        let mut rows: Vec<(&[f64], f64)> = Vec::with_capacity(section.len());
        for (point, across) in section {
            let values = self.nodes.get(point).ok_or_else(|| TcadError::MissingNodeData {
                path: self.path.clone(),
                point_id: point.0,
            })?;
            rows.push((values, across));
        }

        let perpendicular = axis.perpendicular().column_name();
        let names = self
            .keys
            .retained()
            .map(|(_, name)| name)
            .chain([perpendicular]);
        if let Some(name) = first_duplicate(names) {
            return Err(TcadError::DuplicateColumn {
                path: self.path.clone(),
                name: name.to_string(),
            });
        }

        let mut columns: Vec<Column> = self
            .keys
            .retained()
            .map(|(slot, name)| {
                let values: Vec<f64> = rows.iter().map(|(values, _)| values[slot]).collect();
                Column::new(name.into(), values)
            })
            .collect();
        let across: Vec<f64> = rows.iter().map(|(_, across)| *across).collect();
        columns.push(Column::new(perpendicular.into(), across));

        let table = DataFrame::new(columns)?.sort(
            [perpendicular],
            SortMultipleOptions::default().with_maintain_order(true),
        )?;

        debug!(
            "Cutline {}={} (requested {}) in {}: {} rows, {} columns",
            axis,
            coordinate,
            position,
            self.path.display(),
            table.height(),
            table.width()
        );

        Ok(table)
    }
}

#[derive(Debug)]
struct PendingNode {
    line: usize,
    node_id: u64,
    values: Vec<f64>,
}

/// Accumulates the index, key sequence and node table in one pass
struct StructureBuilder {
    path: PathBuf,
    index: MeshIndex,
    labels: LabelResolver,
    nodes: Option<NodeTable>,
    pending_nodes: Vec<PendingNode>,
    stats: StructureStats,
}

impl StructureBuilder {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            index: MeshIndex::new(),
            labels: LabelResolver::new(path, LabelPolicy::FirstWins),
            nodes: None,
            pending_nodes: Vec::new(),
            stats: StructureStats::default(),
        }
    }

    fn parse_line(&mut self, line_num: usize, line: &str) -> Result<()> {
        self.stats.lines_read = line_num;

        let record = match classify_structure_line(line) {
            Ok(record) => record,
            Err(e) if e.kind == RecordKind::ColumnLabel => {
                warn!(
                    "Skipping {} line {}: {}",
                    self.path.display(),
                    line_num,
                    e
                );
                self.stats.lines_ignored += 1;
                return Ok(());
            }
            Err(e) => return Err(self.malformed(line_num, e.to_string())),
        };

        match record {
            StructureRecord::Coordinate { id, x, y, .. } => {
                self.stats.coordinate_records += 1;
                if !self.index.insert(PointId(id), x, y) {
                    warn!(
                        "Duplicate coordinate record for point {} in {} line {}; keeping the first",
                        id,
                        self.path.display(),
                        line_num
                    );
                }
            }
            StructureRecord::DataHeader(keys) => self.set_header(line_num, keys)?,
            StructureRecord::NodeData { id, values } => {
                self.stats.node_records += 1;
                match self.nodes.as_mut() {
                    Some(table) => insert_node(table, &self.path, line_num, id, values)?,
                    None => self.pending_nodes.push(PendingNode {
                        line: line_num,
                        node_id: id,
                        values,
                    }),
                }
            }
            StructureRecord::ColumnLabel(label) => self.labels.resolve(line_num, label),
            StructureRecord::Other => self.stats.lines_ignored += 1,
        }

        Ok(())
    }

    fn set_header(&mut self, line_num: usize, keys: Vec<String>) -> Result<()> {
        if let Some(first) = self.stats.header_line {
            return Err(self.malformed(
                line_num,
                format!("second data header (first at line {})", first),
            ));
        }
        self.stats.header_line = Some(line_num);

        let mut table = NodeTable::new(keys.len());
        for pending in std::mem::take(&mut self.pending_nodes) {
            insert_node(
                &mut table,
                &self.path,
                pending.line,
                pending.node_id,
                pending.values,
            )?;
        }
        self.nodes = Some(table);
        self.labels.set_keys(DataKeys::new(keys));

        Ok(())
    }

    fn malformed(&self, line: usize, reason: String) -> TcadError {
        TcadError::MalformedRecord {
            path: self.path.clone(),
            line,
            reason,
        }
    }

    fn build(mut self) -> Result<StructureFile> {
        let Some(nodes) = self.nodes.take() else {
            return Err(TcadError::MissingSchema { path: self.path });
        };
        if nodes.is_empty() {
            return Err(TcadError::NoData { path: self.path });
        }

        self.stats.labels_applied = self.labels.applied();
        self.stats.labels_unresolved = self.labels.unresolved();
        let keys = self.labels.into_keys().ok_or_else(|| TcadError::MissingSchema {
            path: self.path.clone(),
        })?;

        debug!(
            "Scanned {}: {} lines, {} points, {} nodes, {} keys ({} labelled, {} unresolved)",
            self.path.display(),
            self.stats.lines_read,
            self.index.len(),
            nodes.len(),
            keys.len(),
            self.stats.labels_applied,
            self.stats.labels_unresolved
        );

        Ok(StructureFile {
            path: self.path,
            index: self.index,
            keys,
            nodes,
            stats: self.stats,
        })
    }
}

fn insert_node(
    table: &mut NodeTable,
    path: &Path,
    line: usize,
    node_id: u64,
    values: Vec<f64>,
) -> Result<()> {
    match table.insert(node_id, values) {
        Ok(None) => Ok(()),
        Ok(Some(_)) => {
            warn!(
                "Duplicate node record {} in {} line {}; keeping the last",
                node_id,
                path.display(),
                line
            );
            Ok(())
        }
        Err(e) => Err(TcadError::MalformedRecord {
            path: path.to_path_buf(),
            line,
            reason: format!("node data record: {}", e),
        }),
    }
}
