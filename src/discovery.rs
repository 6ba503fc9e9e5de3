//! Log file discovery and collection.
//!
//! Reads every log file directly inside a directory, one after another,
//! tags each table with the simulation name and the sweep parameters
//! encoded in its file name, and stacks them into one table. Columns that
//! only some logs have are filled with nulls.
//!
//! File names follow `<name>_<key><value>_<key><value>...`, e.g.
//! `nmos_Vg1.5_T300.log` gives `name = "nmos"`, `Vg = "1.5"`, `T = "300"`.

use crate::config::ReaderConfig;
use crate::error::{Result, TcadError};
use crate::models::{CollectionStats, LogFileMetadata};
use crate::victory_log::read_victory_log;

use glob::{MatchOptions, Pattern};
use indicatif::{ProgressBar, ProgressStyle};
use polars::functions::concat_df_diagonal;
use polars::prelude::*;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Log files found in a directory
#[derive(Debug, Default)]
pub struct DiscoveredLogs {
    pub files: Vec<PathBuf>,
    pub hidden: usize,
}

/// Find log files directly inside `directory`, sorted by path
pub fn discover_log_files(directory: &Path, config: &ReaderConfig) -> Result<DiscoveredLogs> {
    if !directory.is_dir() {
        return Err(TcadError::DirectoryNotFound {
            path: directory.to_path_buf(),
        });
    }

    let pattern = format!(
        "{}/*.{}",
        Pattern::escape(&directory.to_string_lossy()),
        config.log_extension
    );
    debug!("Searching for log files matching: {}", pattern);

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };
    let paths = glob::glob_with(&pattern, options).map_err(|e| TcadError::Configuration {
        message: format!("Invalid log file pattern '{}': {}", pattern, e),
    })?;

    let mut discovered = DiscoveredLogs::default();
    for entry in paths {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!("Cannot access {}: {}", e.path().display(), e.error());
                continue;
            }
        };

        if !path.is_file() {
            continue;
        }
        if config.skip_hidden && is_hidden(&path) {
            discovered.hidden += 1;
            continue;
        }
        discovered.files.push(path);
    }

    discovered.files.sort();
    Ok(discovered)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// Simulation name and parameters encoded in a log file's stem.
///
/// A parameter key that appears twice keeps its last value.
pub fn file_metadata(path: &Path, pattern: &Regex) -> LogFileMetadata {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = stem.split('_').next().unwrap_or_default().to_string();

    let mut parameters: Vec<(String, String)> = Vec::new();
    for captures in pattern.captures_iter(&stem) {
        let (Some(key), Some(value)) = (captures.get(1), captures.get(2)) else {
            continue;
        };
        let (key, value) = (key.as_str().to_string(), value.as_str().to_string());
        match parameters.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => parameters.push((key, value)),
        }
    }

    LogFileMetadata { name, parameters }
}

/// Add the name and parameter columns to a log table
pub fn tag_with_metadata(
    table: DataFrame,
    metadata: &LogFileMetadata,
    name_column: &str,
) -> Result<DataFrame> {
    let mut columns = vec![lit(metadata.name.clone()).alias(name_column)];
    for (key, value) in &metadata.parameters {
        columns.push(lit(value.clone()).alias(key.as_str()));
    }

    Ok(table.lazy().with_columns(columns).collect()?)
}

/// Read and stack every log file in `directory`.
///
/// Files that fail to parse are skipped with a warning and counted in the
/// returned stats; only a directory with no readable log is an error.
pub fn collect_logs(
    directory: &Path,
    config: &ReaderConfig,
) -> Result<(DataFrame, CollectionStats)> {
    let start_time = Instant::now();
    let pattern = config.metadata_regex()?;
    let discovered = discover_log_files(directory, config)?;

    if discovered.hidden > 0 {
        info!(
            "Skipped {} hidden .{} files in {}",
            discovered.hidden,
            config.log_extension,
            directory.display()
        );
    }

    let pb = if config.show_progress {
        let pb = ProgressBar::new(discovered.files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut stats = CollectionStats {
        files_hidden: discovered.hidden,
        directory: directory.to_path_buf(),
        ..Default::default()
    };
    let mut tables = Vec::with_capacity(discovered.files.len());

    for path in &discovered.files {
        if let Some(file_name) = path.file_name() {
            pb.set_message(format!("Reading: {}", file_name.to_string_lossy()));
        }

        let metadata = file_metadata(path, &pattern);
        let result = read_victory_log(path, config)
            .and_then(|table| tag_with_metadata(table, &metadata, &config.name_column));
        pb.inc(1);

        match result {
            Ok(table) => {
                stats.files_read += 1;
                tables.push(table);
            }
            Err(e) => {
                warn!("Error reading {}: {}", path.display(), e);
                stats.files_failed += 1;
            }
        }
    }
    pb.finish_and_clear();

    if tables.is_empty() {
        return Err(TcadError::NoLogFiles {
            path: directory.to_path_buf(),
        });
    }

    let combined = concat_df_diagonal(&tables)?;
    stats.total_rows = combined.height();
    stats.processing_time_ms = start_time.elapsed().as_millis();

    debug!(
        "Collected {} logs ({} failed) from {}: {} rows",
        stats.files_read,
        stats.files_failed,
        directory.display(),
        stats.total_rows
    );

    Ok((combined, stats))
}
