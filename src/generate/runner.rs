// src/generate/runner.rs

//! Drives the generator over the filtered candidate classes.
//!
//! - Flat mode: one job per class in scope; failures are recorded and the
//!   batch continues.
//! - Hierarchical mode: one job per filtered class, each carrying all
//!   siblings; the first failure aborts the batch.
//! - Entry points run once per configured type, only when at least one class
//!   was in scope and no class failed.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::generate::backend::{AssertionGenerator, GenerationContext, GenerationJob};
use crate::scan::ClassName;
use crate::types::{EntryPointType, GenerationMode};

/// A class that passed the filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateClass {
    pub name: ClassName,
    pub source: PathBuf,
    /// Whether the current plan requires regenerating it.
    pub in_scope: bool,
}

/// What to generate in one invocation.
#[derive(Debug, Clone)]
pub struct GenerationBatch<'a> {
    pub mode: GenerationMode,
    pub classes: &'a [CandidateClass],
    pub entry_points: &'a [EntryPointType],
    pub entry_point_package: Option<&'a str>,
}

/// A failed job.
#[derive(Debug)]
pub struct GenerationFailure {
    /// Qualified class name, or the entry point class name.
    pub subject: String,
    pub source: Option<PathBuf>,
    pub error: anyhow::Error,
}

/// Fate of the entry-point stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPointStage {
    /// No entry point types configured.
    NotRequested,
    /// No class was in scope, so entry points were left as they are.
    NothingInScope,
    /// Class failures prevented the stage.
    Skipped { failed_classes: usize },
    /// Every configured entry point was attempted.
    Completed,
}

impl fmt::Display for EntryPointStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryPointStage::NotRequested => write!(f, "not requested"),
            EntryPointStage::NothingInScope => write!(f, "no class in scope"),
            EntryPointStage::Skipped { failed_classes } => write!(
                f,
                "skipped because {failed_classes} class(es) failed to generate"
            ),
            EntryPointStage::Completed => write!(f, "generated"),
        }
    }
}

/// Everything the batch produced.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Qualified class name -> generated files.
    pub generated: BTreeMap<String, Vec<PathBuf>>,
    pub entry_point_files: BTreeMap<EntryPointType, Vec<PathBuf>>,
    pub class_failures: Vec<GenerationFailure>,
    pub entry_point_failures: Vec<GenerationFailure>,
    /// Hierarchical batch stopped at its first failure.
    pub aborted: bool,
    pub entry_point_stage: EntryPointStage,
}

impl BatchOutcome {
    fn new() -> Self {
        Self {
            generated: BTreeMap::new(),
            entry_point_files: BTreeMap::new(),
            class_failures: Vec::new(),
            entry_point_failures: Vec::new(),
            aborted: false,
            entry_point_stage: EntryPointStage::NotRequested,
        }
    }

    /// The invocation fails only when generation errors kept the requested
    /// entry points from being produced.
    pub fn is_success(&self) -> bool {
        !matches!(self.entry_point_stage, EntryPointStage::Skipped { .. })
            && self.entry_point_failures.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        !self.class_failures.is_empty() || !self.entry_point_failures.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = &GenerationFailure> {
        self.class_failures
            .iter()
            .chain(self.entry_point_failures.iter())
    }

    /// Qualified names of classes whose job failed.
    pub fn failed_classes(&self) -> impl Iterator<Item = &str> {
        self.class_failures.iter().map(|f| f.subject.as_str())
    }

    pub fn generated_file_count(&self) -> usize {
        self.generated.values().map(Vec::len).sum::<usize>()
            + self.entry_point_files.values().map(Vec::len).sum::<usize>()
    }
}

/// Run every job of `batch` against `generator`.
pub async fn run_batch(
    generator: &mut dyn AssertionGenerator,
    ctx: &GenerationContext,
    batch: &GenerationBatch<'_>,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::new();

    match batch.mode {
        GenerationMode::Flat => run_flat(generator, ctx, batch, &mut outcome).await,
        GenerationMode::Hierarchical => run_hierarchical(generator, ctx, batch, &mut outcome).await,
    }

    outcome.entry_point_stage = run_entry_points(generator, ctx, batch, &mut outcome).await;

    info!(
        classes = outcome.generated.len(),
        files = outcome.generated_file_count(),
        failures = outcome.class_failures.len() + outcome.entry_point_failures.len(),
        entry_points = %outcome.entry_point_stage,
        "generation batch finished"
    );
    outcome
}

async fn run_flat(
    generator: &mut dyn AssertionGenerator,
    ctx: &GenerationContext,
    batch: &GenerationBatch<'_>,
    outcome: &mut BatchOutcome,
) {
    for candidate in batch.classes.iter().filter(|c| c.in_scope) {
        let job = GenerationJob::Class {
            class: candidate.name.clone(),
            source: candidate.source.clone(),
        };
        match generator.generate(ctx, job).await {
            Ok(files) => {
                debug!(class = %candidate.name, files = files.len(), "generated assertions");
                outcome
                    .generated
                    .entry(candidate.name.qualified().to_string())
                    .or_default()
                    .extend(files);
            }
            Err(err) => {
                warn!(class = %candidate.name, error = %err, "generation failed; continuing");
                outcome.class_failures.push(GenerationFailure {
                    subject: candidate.name.qualified().to_string(),
                    source: Some(candidate.source.clone()),
                    error: err,
                });
            }
        }
    }
}

async fn run_hierarchical(
    generator: &mut dyn AssertionGenerator,
    ctx: &GenerationContext,
    batch: &GenerationBatch<'_>,
    outcome: &mut BatchOutcome,
) {
    let siblings: Vec<ClassName> = batch.classes.iter().map(|c| c.name.clone()).collect();

    for candidate in batch.classes {
        let job = GenerationJob::Hierarchical {
            class: candidate.name.clone(),
            source: candidate.source.clone(),
            siblings: siblings.clone(),
        };
        match generator.generate(ctx, job).await {
            Ok(files) => {
                debug!(class = %candidate.name, files = files.len(), "generated hierarchical assertions");
                outcome
                    .generated
                    .entry(candidate.name.qualified().to_string())
                    .or_default()
                    .extend(files);
            }
            Err(err) => {
                error!(class = %candidate.name, error = %err, "hierarchical generation failed; aborting batch");
                outcome.class_failures.push(GenerationFailure {
                    subject: candidate.name.qualified().to_string(),
                    source: Some(candidate.source.clone()),
                    error: err,
                });
                outcome.aborted = true;
                return;
            }
        }
    }
}

async fn run_entry_points(
    generator: &mut dyn AssertionGenerator,
    ctx: &GenerationContext,
    batch: &GenerationBatch<'_>,
    outcome: &mut BatchOutcome,
) -> EntryPointStage {
    if batch.entry_points.is_empty() {
        return EntryPointStage::NotRequested;
    }
    if !batch.classes.iter().any(|c| c.in_scope) {
        debug!("no class in scope; leaving entry points alone");
        return EntryPointStage::NothingInScope;
    }
    if !outcome.class_failures.is_empty() {
        warn!(
            failed = outcome.class_failures.len(),
            "skipping entry point generation after class failures"
        );
        return EntryPointStage::Skipped {
            failed_classes: outcome.class_failures.len(),
        };
    }

    let classes: Vec<ClassName> = batch.classes.iter().map(|c| c.name.clone()).collect();
    for kind in batch.entry_points {
        let job = GenerationJob::EntryPoint {
            kind: *kind,
            classes: classes.clone(),
            class_package: batch.entry_point_package.map(str::to_string),
        };
        match generator.generate(ctx, job).await {
            Ok(files) => {
                debug!(entry_point = %kind, files = files.len(), "generated entry point");
                outcome.entry_point_files.entry(*kind).or_default().extend(files);
            }
            Err(err) => {
                error!(entry_point = %kind, error = %err, "entry point generation failed");
                outcome.entry_point_failures.push(GenerationFailure {
                    subject: kind.class_name().to_string(),
                    source: None,
                    error: err,
                });
            }
        }
    }

    EntryPointStage::Completed
}
