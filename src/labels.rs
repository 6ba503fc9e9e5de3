//! Data key sequence and column relabelling.
//!
//! The key sequence comes from the single header record and fixes the width
//! and order of every data row. Structure files rename keys in place by exact
//! match on the current name, so once a raw key has been renamed a second
//! label for the same raw key no longer matches: the first label wins.
//! Simulator logs match on the raw key instead, so the last label wins.

use crate::record::ColumnLabel;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Ordered column keys, renamed in place by label records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataKeys {
    names: Vec<String>,
    raw: Vec<String>,
    labelled: Vec<bool>,
}

impl DataKeys {
    pub fn new(keys: Vec<String>) -> Self {
        let labelled = vec![false; keys.len()];
        Self {
            raw: keys.clone(),
            names: keys,
            labelled,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Current names, in header order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Rename the first key currently equal to `raw_key`.
    ///
    /// Returns `false` when nothing matches; the sequence is left untouched.
    pub fn relabel(&mut self, raw_key: &str, name: &str) -> bool {
        match self.names.iter().position(|current| current == raw_key) {
            Some(position) => {
                self.names[position] = name.to_string();
                self.labelled[position] = true;
                true
            }
            None => false,
        }
    }

    /// Rename the first key whose header token is `raw_key`, replacing any
    /// earlier label.
    pub fn relabel_raw(&mut self, raw_key: &str, name: &str) -> bool {
        match self.raw.iter().position(|raw| raw == raw_key) {
            Some(position) => {
                self.names[position] = name.to_string();
                self.labelled[position] = true;
                true
            }
            None => false,
        }
    }

    /// Keys that survive into a cutline table: anything not purely digits
    pub fn retained(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .filter(|(_, name)| !is_purely_numeric(name))
            .map(|(position, name)| (position, name.as_str()))
    }

    /// Column names for a log table, with unlabelled keys given `prefix`
    pub fn resolved_names(&self, prefix: &str) -> Vec<String> {
        self.names
            .iter()
            .zip(&self.raw)
            .zip(&self.labelled)
            .map(|((name, raw), &labelled)| {
                if labelled {
                    name.clone()
                } else {
                    format!("{}{}", prefix, raw)
                }
            })
            .collect()
    }
}

/// True for a non-empty string of ASCII digits, i.e. a key never relabelled
pub fn is_purely_numeric(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}

/// How a label record picks the key it renames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPolicy {
    /// Match the current name; a renamed key is no longer a target
    FirstWins,
    /// Match the header token; a later label overwrites an earlier one
    LastWins,
}

/// First name that appears twice, in iteration order
pub fn first_duplicate<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    names.into_iter().find(|name| !seen.insert(*name))
}

#[derive(Debug)]
struct PendingLabel {
    line: usize,
    label: ColumnLabel,
}

/// Applies label records to the key sequence regardless of where the header
/// falls in the file. Labels seen before the header are queued and replayed
/// in file order once it arrives.
#[derive(Debug)]
pub struct LabelResolver {
    source: PathBuf,
    policy: LabelPolicy,
    keys: Option<DataKeys>,
    pending: Vec<PendingLabel>,
    applied: usize,
    unresolved: usize,
}

impl LabelResolver {
    pub fn new(source: &Path, policy: LabelPolicy) -> Self {
        Self {
            source: source.to_path_buf(),
            policy,
            keys: None,
            pending: Vec::new(),
            applied: 0,
            unresolved: 0,
        }
    }

    pub fn has_keys(&self) -> bool {
        self.keys.is_some()
    }

    /// Install the key sequence and replay any queued labels
    pub fn set_keys(&mut self, keys: DataKeys) {
        self.keys = Some(keys);
        for pending in std::mem::take(&mut self.pending) {
            self.apply(pending.line, &pending.label);
        }
    }

    /// Apply a label now, or queue it until the header is known
    pub fn resolve(&mut self, line: usize, label: ColumnLabel) {
        if self.keys.is_some() {
            self.apply(line, &label);
        } else {
            self.pending.push(PendingLabel { line, label });
        }
    }

    fn apply(&mut self, line: usize, label: &ColumnLabel) {
        let Some(keys) = self.keys.as_mut() else {
            return;
        };

        let matched = match self.policy {
            LabelPolicy::FirstWins => keys.relabel(&label.raw_key, &label.name),
            LabelPolicy::LastWins => keys.relabel_raw(&label.raw_key, &label.name),
        };
        if matched {
            self.applied += 1;
        } else {
            self.unresolved += 1;
            warn!(
                "Unresolved column label in {} line {}: key '{}' ('{}') matches no data key",
                self.source.display(),
                line,
                label.raw_key,
                label.name
            );
        }
    }

    pub fn keys(&self) -> Option<&DataKeys> {
        self.keys.as_ref()
    }

    pub fn applied(&self) -> usize {
        self.applied
    }

    pub fn unresolved(&self) -> usize {
        self.unresolved
    }

    pub fn into_keys(self) -> Option<DataKeys> {
        self.keys
    }
}
