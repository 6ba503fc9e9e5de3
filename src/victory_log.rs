//! Simulator log (`.log`) reading.
//!
//! Logs share the line-tagged layout of structure files: a `p` record lists
//! the column keys, `Q` records give them descriptive names and each `d`
//! record is one row of values. A later label for the same key replaces an
//! earlier one. Keys that never receive a label keep their raw token behind
//! the configured prefix (`Column_3`).

use crate::config::ReaderConfig;
use crate::error::{Result, TcadError};
use crate::labels::{DataKeys, LabelPolicy, LabelResolver, first_duplicate};
use crate::record::{LogRecord, RecordKind, classify_log_line};

use polars::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// Read one simulator log into a table of `f64` columns
pub fn read_victory_log(path: &Path, config: &ReaderConfig) -> Result<DataFrame> {
    let file = File::open(path).map_err(TcadError::Io)?;
    read_victory_log_from_reader(BufReader::new(file), path, config)
}

/// Read simulator log records from any buffered reader
pub fn read_victory_log_from_reader<R: BufRead>(
    reader: R,
    source: &Path,
    config: &ReaderConfig,
) -> Result<DataFrame> {
    let mut labels = LabelResolver::new(source, LabelPolicy::LastWins);
    let mut header_line = None;
    let mut rows: Vec<(usize, Vec<f64>)> = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(TcadError::Io)?;
        let line_num = line_num + 1;

        let record = match classify_log_line(&line) {
            Ok(record) => record,
            Err(e) if e.kind == RecordKind::ColumnLabel => {
                warn!("Skipping {} line {}: {}", source.display(), line_num, e);
                continue;
            }
            Err(e) => return Err(malformed(source, line_num, e.to_string())),
        };

        match record {
            LogRecord::Header(keys) => {
                if let Some(first) = header_line {
                    return Err(malformed(
                        source,
                        line_num,
                        format!("second column header (first at line {})", first),
                    ));
                }
                header_line = Some(line_num);
                labels.set_keys(DataKeys::new(keys));
            }
            LogRecord::Label(label) => labels.resolve(line_num, label),
            LogRecord::Data(values) => rows.push((line_num, values)),
            LogRecord::Other => {}
        }
    }

    let keys = labels.into_keys().ok_or_else(|| TcadError::MissingSchema {
        path: source.to_path_buf(),
    })?;
    if rows.is_empty() {
        return Err(TcadError::NoData {
            path: source.to_path_buf(),
        });
    }

    let width = keys.len();
    let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(rows.len()); width];
    for (line_num, values) in &rows {
        if values.len() != width {
            return Err(malformed(
                source,
                *line_num,
                format!(
                    "log data record: expected {} values to match the column header, found {}",
                    width,
                    values.len()
                ),
            ));
        }
        for (column, &value) in columns.iter_mut().zip(values) {
            column.push(value);
        }
    }

    let names = keys.resolved_names(&config.unresolved_prefix);
    if let Some(name) = first_duplicate(names.iter().map(String::as_str)) {
        return Err(TcadError::DuplicateColumn {
            path: source.to_path_buf(),
            name: name.to_string(),
        });
    }
    let columns: Vec<Column> = names
        .iter()
        .zip(columns)
        .map(|(name, values)| Column::new(name.as_str().into(), values))
        .collect();
    let table = DataFrame::new(columns)?;

    debug!(
        "Read {}: {} rows, {} columns",
        source.display(),
        table.height(),
        table.width()
    );

    Ok(table)
}

fn malformed(path: &Path, line: usize, reason: String) -> TcadError {
    TcadError::MalformedRecord {
        path: path.to_path_buf(),
        line,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(content: &str) -> Result<DataFrame> {
        read_victory_log_from_reader(
            Cursor::new(content),
            Path::new("test.log"),
            &ReaderConfig::default(),
        )
    }

    const IV_SWEEP: &str = "\
# simulator banner
p 3 1 2 3
Q 1 V \"Drain Voltage\"
Q 2 A \"Drain Current\"
d 0.0 1e-12 300
d 0.5 2e-6 300
d 1.0 5e-6 300
";

    #[test]
    fn test_read_log_with_labels() {
        let table = read(IV_SWEEP).unwrap();
        let names: Vec<String> = table
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();

        assert_eq!(names, vec!["Drain Voltage", "Drain Current", "Column_3"]);
        assert_eq!(table.height(), 3);

        let current: Vec<f64> = table
            .column("Drain Current")
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(current, vec![1e-12, 2e-6, 5e-6]);
    }

    #[test]
    fn test_custom_unresolved_prefix() {
        let config = ReaderConfig::default().with_unresolved_prefix("raw_");
        let table = read_victory_log_from_reader(
            Cursor::new("p 2 7 8\nd 1 2\n"),
            Path::new("test.log"),
            &config,
        )
        .unwrap();
        assert!(table.column("raw_7").is_ok());
        assert!(table.column("raw_8").is_ok());
    }

    #[test]
    fn test_labels_before_header_apply() {
        let table = read("Q 1 V Gate\np 2 1 2\nd 1 2\n").unwrap();
        assert!(table.column("Gate").is_ok());
        assert!(table.column("Column_2").is_ok());
    }

    #[test]
    fn test_row_width_mismatch() {
        match read("p 2 1 2\nd 1 2\nd 3\n") {
            Err(TcadError::MalformedRecord { line, .. }) => assert_eq!(line, 3),
            other => panic!("Expected MalformedRecord error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_header_and_rows() {
        assert!(matches!(
            read("d 1 2\n"),
            Err(TcadError::MissingSchema { .. })
        ));
        assert!(matches!(read("p 2 1 2\n"), Err(TcadError::NoData { .. })));
    }

    #[test]
    fn test_bad_data_value_is_fatal() {
        assert!(matches!(
            read("p 2 1\nd oops\n"),
            Err(TcadError::MalformedRecord { line: 2, .. })
        ));
    }

    #[test]
    fn test_last_label_for_a_key_wins() {
        let table = read("p 1 1\nQ 1 V Old\nQ 1 V New\nd 1\n").unwrap();
        let names: Vec<String> = table
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["New"]);
    }

    #[test]
    fn test_colliding_column_names() {
        match read("p 3 1 2 3\nQ 1 V Vd\nQ 2 V Vd\nd 1 2 3\n") {
            Err(TcadError::DuplicateColumn { path, name }) => {
                assert_eq!(path, Path::new("test.log"));
                assert_eq!(name, "Vd");
            }
            other => panic!("Expected DuplicateColumn error, got {:?}", other),
        }

        // A label can also collide with an unresolved key's generated name
        assert!(matches!(
            read("p 2 1 2\nQ 1 V Column_2\nd 1 2\n"),
            Err(TcadError::DuplicateColumn { .. })
        ));
    }
}
