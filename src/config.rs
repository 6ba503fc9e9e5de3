//! Configuration for the log readers and directory collection.
//!
//! Structure-file parsing has no tunables: its tags and join offset are
//! fixed by the file format and live in [`crate::constants`].

use crate::constants::{
    DEFAULT_LOG_EXTENSION, DEFAULT_METADATA_PATTERN, DEFAULT_NAME_COLUMN,
    DEFAULT_UNRESOLVED_PREFIX,
};
use crate::error::{Result, TcadError};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Global configuration for log reading and collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// File extension matched when collecting a directory (without the dot)
    pub log_extension: String,

    /// Skip files whose name starts with '.'
    pub skip_hidden: bool,

    /// Prefix for log columns that never received a descriptive label
    pub unresolved_prefix: String,

    /// Regex with two capture groups (key, value) applied to each file stem
    pub metadata_pattern: String,

    /// Column that receives the simulation name
    pub name_column: String,

    /// Show a progress bar while collecting a directory
    pub show_progress: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            log_extension: DEFAULT_LOG_EXTENSION.to_string(),
            skip_hidden: true,
            unresolved_prefix: DEFAULT_UNRESOLVED_PREFIX.to_string(),
            metadata_pattern: DEFAULT_METADATA_PATTERN.to_string(),
            name_column: DEFAULT_NAME_COLUMN.to_string(),
            show_progress: false,
        }
    }
}

impl ReaderConfig {
    /// Set the log file extension
    pub fn with_log_extension(mut self, extension: impl Into<String>) -> Self {
        self.log_extension = extension.into();
        self
    }

    /// Include hidden files when collecting
    pub fn with_hidden_files(mut self) -> Self {
        self.skip_hidden = false;
        self
    }

    /// Set the prefix for unlabelled log columns
    pub fn with_unresolved_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.unresolved_prefix = prefix.into();
        self
    }

    /// Set the file-name metadata pattern
    pub fn with_metadata_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.metadata_pattern = pattern.into();
        self
    }

    /// Enable the collection progress bar
    pub fn with_progress(mut self) -> Self {
        self.show_progress = true;
        self
    }

    /// Compile and check the metadata pattern
    pub fn metadata_regex(&self) -> Result<Regex> {
        let regex = Regex::new(&self.metadata_pattern).map_err(|e| TcadError::Configuration {
            message: format!("Invalid metadata pattern '{}': {}", self.metadata_pattern, e),
        })?;

        if regex.captures_len() < 3 {
            return Err(TcadError::Configuration {
                message: format!(
                    "Metadata pattern '{}' needs two capture groups (key, value)",
                    self.metadata_pattern
                ),
            });
        }

        Ok(regex)
    }
}
