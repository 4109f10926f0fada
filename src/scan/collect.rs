// src/scan/collect.rs

//! Discover the files that make up one invocation's inputs.
//!
//! Three partitions are collected, in claim order:
//! - classpath entries (files, or every file under a directory),
//! - source files under each source root matching the file globs,
//! - template files referenced by the config.
//!
//! A path claimed by an earlier partition is never listed again.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, warn};

use crate::fs::{walk_files, FileSystem};

/// Compiled file globs for the source partition.
///
/// Globs are matched against paths relative to a source root, with forward
/// slashes (e.g. `"org/example/Hello.java"`).
#[derive(Clone)]
pub struct SourceFileMatcher {
    include_set: GlobSet,
    exclude_set: Option<GlobSet>,
}

impl fmt::Debug for SourceFileMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFileMatcher").finish_non_exhaustive()
    }
}

impl SourceFileMatcher {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        let include_set = build_globset(include).context("building source include globset")?;
        let exclude_set = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(exclude).context("building source exclude globset")?)
        };
        Ok(Self {
            include_set,
            exclude_set,
        })
    }

    pub fn matches(&self, rel_path: &str) -> bool {
        if !self.include_set.is_match(rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude_set {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        true
    }
}

/// Build a GlobSet from simple string patterns.
pub fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// A source-partition file plus the root it was found under.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceFile {
    pub path: PathBuf,
    pub root: PathBuf,
}

/// All files of one invocation, split by partition.
#[derive(Debug, Clone, Default)]
pub struct DiscoveredInputs {
    pub classpath: Vec<PathBuf>,
    pub sources: Vec<SourceFile>,
    pub templates: Vec<PathBuf>,
}

impl DiscoveredInputs {
    pub fn source_root_of(&self, path: &Path) -> Option<&Path> {
        self.sources
            .iter()
            .find(|s| s.path == path)
            .map(|s| s.root.as_path())
    }
}

/// Where to look for inputs; paths are already resolved against the
/// project root.
#[derive(Debug, Clone)]
pub struct DiscoveryRequest<'a> {
    pub source_roots: &'a [PathBuf],
    pub source_matcher: &'a SourceFileMatcher,
    pub classpath_entries: &'a [PathBuf],
    pub template_files: &'a [PathBuf],
}

/// Collect every input file, one partition per path.
pub fn discover_inputs(fs: &dyn FileSystem, request: &DiscoveryRequest<'_>) -> Result<DiscoveredInputs> {
    let mut claimed: BTreeSet<PathBuf> = BTreeSet::new();
    let mut inputs = DiscoveredInputs::default();

    for entry in request.classpath_entries {
        if fs.is_dir(entry) {
            for file in walk_files(fs, entry)? {
                if claimed.insert(file.clone()) {
                    inputs.classpath.push(file);
                }
            }
        } else if fs.is_file(entry) {
            if claimed.insert(entry.clone()) {
                inputs.classpath.push(entry.clone());
            }
        } else {
            debug!(entry = ?entry, "classpath entry does not exist; skipping");
        }
    }

    for root in request.source_roots {
        if !fs.is_dir(root) {
            warn!(root = ?root, "source root does not exist; skipping");
            continue;
        }
        for file in walk_files(fs, root)? {
            let Ok(rel) = file.strip_prefix(root) else {
                continue;
            };
            let rel_str = rel.to_string_lossy().replace('\\', "/");
            if !request.source_matcher.matches(&rel_str) {
                continue;
            }
            if claimed.insert(file.clone()) {
                inputs.sources.push(SourceFile {
                    path: file,
                    root: root.clone(),
                });
            }
        }
    }

    for template in request.template_files {
        if claimed.insert(template.clone()) {
            inputs.templates.push(template.clone());
        }
    }

    debug!(
        classpath = inputs.classpath.len(),
        sources = inputs.sources.len(),
        templates = inputs.templates.len(),
        "discovered inputs"
    );

    Ok(inputs)
}
