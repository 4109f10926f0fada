// src/incremental/classify.rs

//! Decide how much regeneration a change set requires.
//!
//! Precedence:
//! 1. Not incremental-capable (first run, untrusted previous state) -> `Full`.
//! 2. Any classpath or template change -> `Full`; those inputs can change the
//!    generated content of unrelated classes.
//! 3. Any source removal -> `Full`; generated artifacts are not tracked back
//!    to their inputs precisely enough to delete just one.
//! 4. Otherwise `Scoped` over the added/modified source files, or `Skip` when
//!    there are none.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::incremental::changes::{ChangeKind, ChangeSet, Partition};

/// Why a full regeneration is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FullReason {
    NotIncremental,
    ClasspathChanged(PathBuf),
    TemplateChanged(PathBuf),
    SourceRemoved(PathBuf),
}

impl fmt::Display for FullReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FullReason::NotIncremental => write!(f, "no trusted previous state"),
            FullReason::ClasspathChanged(p) => write!(f, "classpath changed: {}", p.display()),
            FullReason::TemplateChanged(p) => write!(f, "template changed: {}", p.display()),
            FullReason::SourceRemoved(p) => write!(f, "source removed: {}", p.display()),
        }
    }
}

/// Result of classification; built fresh per invocation, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegenerationPlan {
    /// Nothing changed.
    Skip,
    /// Regenerate only these source files; leave other outputs alone.
    Scoped(BTreeSet<PathBuf>),
    /// Delete all previous outputs and regenerate everything.
    Full(FullReason),
}

impl RegenerationPlan {
    pub fn is_full(&self) -> bool {
        matches!(self, RegenerationPlan::Full(_))
    }

    /// Whether `path` must be regenerated under this plan.
    pub fn covers(&self, path: &std::path::Path) -> bool {
        match self {
            RegenerationPlan::Skip => false,
            RegenerationPlan::Scoped(files) => files.contains(path),
            RegenerationPlan::Full(_) => true,
        }
    }
}

impl fmt::Display for RegenerationPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegenerationPlan::Skip => write!(f, "skip (up to date)"),
            RegenerationPlan::Scoped(files) => write!(f, "scoped ({} changed file(s))", files.len()),
            RegenerationPlan::Full(reason) => write!(f, "full ({reason})"),
        }
    }
}

/// Classifies a [`ChangeSet`] into a [`RegenerationPlan`].
#[derive(Debug, Clone, Copy)]
pub struct ChangeSetClassifier {
    incremental: bool,
}

impl ChangeSetClassifier {
    /// `incremental` is false on a first run or when previous outputs cannot
    /// be trusted.
    pub fn new(incremental: bool) -> Self {
        Self { incremental }
    }

    pub fn classify(&self, changes: &ChangeSet) -> RegenerationPlan {
        let plan = self.classify_inner(changes);
        info!(plan = %plan, "classified change set");
        plan
    }

    fn classify_inner(&self, changes: &ChangeSet) -> RegenerationPlan {
        if !self.incremental {
            return RegenerationPlan::Full(FullReason::NotIncremental);
        }

        // A file leaving the classpath or the templates changes them too.
        for file in changes.changed() {
            for partition in file.partitions() {
                match partition {
                    Partition::Classpath => {
                        return RegenerationPlan::Full(FullReason::ClasspathChanged(
                            file.path.clone(),
                        ));
                    }
                    Partition::Template => {
                        return RegenerationPlan::Full(FullReason::TemplateChanged(
                            file.path.clone(),
                        ));
                    }
                    Partition::Source => {}
                }
            }
        }

        if let Some(removed) = changes
            .in_partition(Partition::Source)
            .find(|f| f.change == ChangeKind::Removed)
        {
            return RegenerationPlan::Full(FullReason::SourceRemoved(removed.path.clone()));
        }

        let scope: BTreeSet<PathBuf> = changes
            .in_partition(Partition::Source)
            .filter(|f| matches!(f.change, ChangeKind::Added | ChangeKind::Modified))
            .map(|f| f.path.clone())
            .collect();

        if scope.is_empty() {
            return RegenerationPlan::Skip;
        }

        debug!(files = ?scope, "scoped regeneration");
        RegenerationPlan::Scoped(scope)
    }
}
