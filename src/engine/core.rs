// src/engine/core.rs

//! Synchronous building blocks of an invocation: hashing the inputs,
//! deciding whether previous state can be trusted, and turning source files
//! into filtered candidate classes.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::config::ConfigFile;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::generate::CandidateClass;
use crate::incremental::{
    compute_file_hash, FileRecord, GenerationInputs, GenerationState, Partition,
    RegenerationPlan, Snapshot,
};
use crate::scan::{extract_class_names, ClassName, DiscoveredInputs};

/// Simple-name suffixes of previously generated assertion types.
pub const GENERATED_SUFFIXES: [&str; 2] = ["Assert", "Assertions"];

/// Hash every discovered file into a snapshot.
pub fn snapshot_inputs(fs: &dyn FileSystem, inputs: &DiscoveredInputs) -> Result<Snapshot> {
    let mut snapshot = Snapshot::new();

    let partitions = inputs
        .classpath
        .iter()
        .map(|p| (p, Partition::Classpath))
        .chain(inputs.sources.iter().map(|s| (&s.path, Partition::Source)))
        .chain(inputs.templates.iter().map(|p| (p, Partition::Template)));

    for (path, partition) in partitions {
        let hash = compute_file_hash(fs, path)
            .with_context(|| format!("hashing {partition} input {:?}", path))?;
        snapshot.insert(path.clone(), FileRecord { partition, hash });
    }

    debug!(files = snapshot.len(), "hashed inputs");
    Ok(snapshot)
}

/// Whether previous state allows anything short of a full regeneration.
pub fn is_incremental_capable(
    previous: Option<&GenerationState>,
    current_inputs: &GenerationInputs,
    output_dir_exists: bool,
    force_full: bool,
) -> bool {
    if force_full {
        info!("full regeneration requested");
        return false;
    }
    let Some(previous) = previous else {
        info!("no previous state; first run");
        return false;
    };
    if previous.inputs != *current_inputs {
        info!("generation inputs changed since the previous run");
        return false;
    }
    if !output_dir_exists {
        info!("output directory is missing");
        return false;
    }
    true
}

/// Whether `class` is a previously generated assertion type.
pub fn is_generated_assertion(class: &ClassName) -> bool {
    let simple = class.simple_name();
    GENERATED_SUFFIXES.iter().any(|s| simple.ends_with(s))
}

/// Classes that survived extraction and filtering.
#[derive(Debug, Clone, Default)]
pub struct CandidateSelection {
    /// Sorted by qualified name.
    pub classes: Vec<CandidateClass>,
    /// Generated assertion types dropped from the candidates.
    pub excluded: Vec<ClassName>,
    /// Classes rejected by the class or package filters.
    pub filtered: Vec<ClassName>,
    /// Include patterns (class and package) that matched nothing.
    pub unmatched_includes: Vec<String>,
}

impl CandidateSelection {
    pub fn in_scope(&self) -> impl Iterator<Item = &CandidateClass> {
        self.classes.iter().filter(|c| c.in_scope)
    }

    /// Source files whose classes will be regenerated.
    pub fn in_scope_sources(&self) -> Vec<PathBuf> {
        let sources: BTreeSet<&PathBuf> = self.in_scope().map(|c| &c.source).collect();
        sources.into_iter().cloned().collect()
    }

    pub fn all_sources(&self) -> Vec<PathBuf> {
        let sources: BTreeSet<&PathBuf> = self.classes.iter().map(|c| &c.source).collect();
        sources.into_iter().cloned().collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &ClassName> {
        self.classes.iter().map(|c| &c.name)
    }
}

/// Extract names from every source-partition file and apply the class and
/// package filters.
///
/// Extraction failures (unsupported extensions, unreadable files) are fatal.
pub fn select_candidates(
    fs: &dyn FileSystem,
    config: &ConfigFile,
    inputs: &DiscoveredInputs,
    plan: &RegenerationPlan,
) -> Result<CandidateSelection> {
    let mut extracted: Vec<(ClassName, &Path)> = Vec::new();
    for source in &inputs.sources {
        for name in extract_class_names(fs, &source.path, &source.root)? {
            extracted.push((name, source.path.as_path()));
        }
    }

    let class_filter = config.class_filter();
    let package_filter = config.package_filter();

    let mut unmatched: Vec<String> =
        class_filter.unmatched_includes(extracted.iter().map(|(n, _)| n.qualified()));
    unmatched.extend(package_filter.unmatched_includes(extracted.iter().map(|(n, _)| n.package())));
    for pattern in &unmatched {
        warn!(pattern = %pattern, "include pattern matched no candidate class");
    }

    let mut selection = CandidateSelection {
        unmatched_includes: unmatched,
        ..CandidateSelection::default()
    };

    let mut seen: BTreeMap<String, PathBuf> = BTreeMap::new();
    for (name, source) in extracted {
        if !class_filter.test(&name) || !package_filter.test_name(name.package()) {
            debug!(class = %name, "filtered out");
            selection.filtered.push(name);
            continue;
        }
        if is_generated_assertion(&name) {
            debug!(class = %name, "excluding generated assertion type");
            selection.excluded.push(name);
            continue;
        }
        if let Some(first) = seen.get(name.qualified()) {
            warn!(class = %name, first = ?first, duplicate = ?source, "class declared twice; keeping the first");
            continue;
        }
        seen.insert(name.qualified().to_string(), source.to_path_buf());
        selection.classes.push(CandidateClass {
            in_scope: plan.covers(source),
            name,
            source: source.to_path_buf(),
        });
    }

    selection.classes.sort_by(|a, b| a.name.qualified().cmp(b.name.qualified()));
    selection.excluded.sort();
    selection.filtered.sort();

    info!(
        candidates = selection.classes.len(),
        in_scope = selection.in_scope().count(),
        excluded = selection.excluded.len(),
        filtered = selection.filtered.len(),
        "selected candidate classes"
    );
    Ok(selection)
}
