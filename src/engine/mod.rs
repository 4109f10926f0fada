// src/engine/mod.rs

//! Orchestration engine for assertgen.
//!
//! One invocation flows through:
//! - input discovery and hashing
//! - change-set classification against the previous state
//! - class-name extraction and filtering
//! - output preparation, generation, reporting
//! - persisting state for the next invocation
//!
//! The synchronous building blocks live in [`core`]; the async shell that
//! drives the generator is implemented in [`runtime`].

pub mod core;
pub mod runtime;

pub use self::core::{CandidateSelection, GENERATED_SUFFIXES};
pub use runtime::Engine;

use crate::generate::BatchOutcome;
use crate::incremental::RegenerationPlan;
use crate::report::GenerationReport;

/// Per-invocation switches from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    /// Ignore previous state and regenerate everything (`--rerun-all`).
    pub force_full: bool,
    /// Stop after classification and filtering (`--dry-run`).
    pub dry_run: bool,
}

/// What one invocation did.
#[derive(Debug)]
pub struct InvocationOutcome {
    pub plan: RegenerationPlan,
    pub report: GenerationReport,
    pub selection: CandidateSelection,
    /// `None` when nothing was generated (skip or dry run).
    pub batch: Option<BatchOutcome>,
    pub success: bool,
}

impl InvocationOutcome {
    fn skipped(report: GenerationReport) -> Self {
        Self {
            plan: RegenerationPlan::Skip,
            report,
            selection: CandidateSelection::default(),
            batch: None,
            success: true,
        }
    }
}
