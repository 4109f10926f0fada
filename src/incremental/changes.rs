// src/incremental/changes.rs

//! Per-file change state for one invocation.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{AssertgenError, Result};

/// Which kind of input a file is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    /// Compile/runtime classpath of the generator.
    Classpath,
    /// User-supplied generator templates.
    Template,
    /// Source or compiled-class files that become candidates.
    Source,
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Partition::Classpath => "classpath",
            Partition::Template => "template",
            Partition::Source => "source",
        };
        f.write_str(s)
    }
}

/// Change of a file relative to the previous invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
    Unchanged,
}

impl ChangeKind {
    pub fn is_change(self) -> bool {
        !matches!(self, ChangeKind::Unchanged)
    }
}

/// One file of the change set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub partition: Partition,
    pub change: ChangeKind,
    /// Partition the file was recorded under last time, when it differs.
    pub moved_from: Option<Partition>,
}

impl CandidateFile {
    pub fn new(path: impl Into<PathBuf>, partition: Partition, change: ChangeKind) -> Self {
        Self {
            path: path.into(),
            partition,
            change,
            moved_from: None,
        }
    }

    /// Partitions this change touches: the current one and, for a move, the
    /// one it left.
    pub fn partitions(&self) -> impl Iterator<Item = Partition> + '_ {
        std::iter::once(self.partition).chain(self.moved_from)
    }
}

/// Recorded in place of a content hash for a source whose generation failed.
///
/// Never equal to a real hash, so the file reads as `Modified` next time.
pub const UNGENERATED_HASH: &str = "";

/// Hash + partition of a file as last seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub partition: Partition,
    pub hash: String,
}

/// Every input file of an invocation with its content hash.
pub type Snapshot = BTreeMap<PathBuf, FileRecord>;

/// All files of the current invocation keyed by path.
///
/// A path belongs to exactly one partition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    files: BTreeMap<PathBuf, CandidateFile>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file's entry.
    ///
    /// Fails with [`AssertgenError::PartitionConflict`] if the path is already
    /// present under another partition.
    pub fn insert(&mut self, file: CandidateFile) -> Result<()> {
        if let Some(existing) = self.files.get(&file.path) {
            if existing.partition != file.partition {
                return Err(AssertgenError::PartitionConflict {
                    path: file.path.clone(),
                    existing: existing.partition.to_string(),
                    requested: file.partition.to_string(),
                });
            }
        }
        self.files.insert(file.path.clone(), file);
        Ok(())
    }

    /// Diff a previous snapshot against the current one.
    ///
    /// With no previous snapshot every current file is `Added`. A file whose
    /// partition changed is `Modified` under its current partition and keeps
    /// the old one in [`CandidateFile::moved_from`].
    pub fn between(previous: Option<&Snapshot>, current: &Snapshot) -> Self {
        let mut files = BTreeMap::new();

        for (path, record) in current {
            let old = previous.and_then(|p| p.get(path));
            let change = match old {
                None => ChangeKind::Added,
                Some(old) if old.hash != record.hash || old.partition != record.partition => {
                    ChangeKind::Modified
                }
                Some(_) => ChangeKind::Unchanged,
            };
            let mut file = CandidateFile::new(path.clone(), record.partition, change);
            file.moved_from = old
                .map(|o| o.partition)
                .filter(|p| *p != record.partition);
            files.insert(path.clone(), file);
        }

        if let Some(previous) = previous {
            for (path, record) in previous {
                if !current.contains_key(path) {
                    files.insert(
                        path.clone(),
                        CandidateFile::new(path.clone(), record.partition, ChangeKind::Removed),
                    );
                }
            }
        }

        Self { files }
    }

    pub fn get(&self, path: &Path) -> Option<&CandidateFile> {
        self.files.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CandidateFile> {
        self.files.values()
    }

    /// Files that were added, modified or removed.
    pub fn changed(&self) -> impl Iterator<Item = &CandidateFile> {
        self.iter().filter(|f| f.change.is_change())
    }

    pub fn in_partition(&self, partition: Partition) -> impl Iterator<Item = &CandidateFile> {
        self.iter().filter(move |f| f.partition == partition)
    }

    pub fn has_changes(&self) -> bool {
        self.changed().next().is_some()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
