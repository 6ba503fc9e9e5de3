//! Table output for extracted cutlines and collected logs.
//!
//! The format is chosen from the output file extension: `.csv` or
//! `.parquet`/`.pq`. Parquet files are written with Snappy compression.

use crate::error::{Result, TcadError};

use polars::prelude::{CsvWriter, DataFrame, ParquetCompression, ParquetWriter, SerWriter};
use std::fs::{self, File};
use std::path::Path;
use tracing::debug;

/// Supported output table formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Parquet,
}

impl TableFormat {
    /// Pick the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(TableFormat::Csv),
            "parquet" | "pq" => Ok(TableFormat::Parquet),
            _ => Err(TcadError::Configuration {
                message: format!(
                    "Unsupported output format for {}: expected a .csv or .parquet file",
                    path.display()
                ),
            }),
        }
    }
}

/// Write `table` to `path`, creating parent directories as needed
pub fn write_table(table: &mut DataFrame, path: &Path) -> Result<TableFormat> {
    let format = TableFormat::from_path(path)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    match format {
        TableFormat::Csv => {
            CsvWriter::new(&mut file).include_header(true).finish(table)?;
        }
        TableFormat::Parquet => {
            ParquetWriter::new(file)
                .with_compression(ParquetCompression::Snappy)
                .finish(table)?;
        }
    }

    debug!(
        "Wrote {} rows x {} columns to {} ({:?})",
        table.height(),
        table.width(),
        path.display(),
        format
    );

    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use tempfile::TempDir;

    fn sample_table() -> DataFrame {
        DataFrame::new(vec![
            Column::new("y".into(), vec![0.0, 1.0]),
            Column::new("Potential".into(), vec![0.25, 0.5]),
        ])
        .unwrap()
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            TableFormat::from_path(Path::new("out.csv")).unwrap(),
            TableFormat::Csv
        );
        assert_eq!(
            TableFormat::from_path(Path::new("out.PARQUET")).unwrap(),
            TableFormat::Parquet
        );
        assert_eq!(
            TableFormat::from_path(Path::new("out.pq")).unwrap(),
            TableFormat::Parquet
        );
        assert!(matches!(
            TableFormat::from_path(Path::new("out.xlsx")),
            Err(TcadError::Configuration { .. })
        ));
        assert!(TableFormat::from_path(Path::new("out")).is_err());
    }

    #[test]
    fn test_write_csv() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("cut.csv");

        let mut table = sample_table();
        assert_eq!(write_table(&mut table, &path).unwrap(), TableFormat::Csv);

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("y,Potential"));
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn test_write_parquet_reads_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cut.parquet");

        let mut table = sample_table();
        write_table(&mut table, &path).unwrap();

        let read_back = ParquetReader::new(File::open(&path).unwrap())
            .finish()
            .unwrap();
        assert!(read_back.equals(&table));
    }
}
