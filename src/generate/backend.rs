// src/generate/backend.rs

//! Pluggable assertion generator abstraction.
//!
//! The runner talks to an `AssertionGenerator` instead of spawning processes
//! itself. Production code uses [`CommandGenerator`](super::CommandGenerator);
//! tests provide a fake that records jobs and writes files into an in-memory
//! filesystem.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use anyhow::Result;

use crate::scan::ClassName;
use crate::templates::LoadedTemplate;
use crate::types::EntryPointType;

/// One unit of work for the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationJob {
    /// Flat mode: one assertion class for `class`.
    Class { class: ClassName, source: PathBuf },
    /// Hierarchical mode: abstract + concrete assertion classes for `class`,
    /// which may refer to any of `siblings`.
    Hierarchical {
        class: ClassName,
        source: PathBuf,
        siblings: Vec<ClassName>,
    },
    /// One aggregate entry point over every filtered class.
    EntryPoint {
        kind: EntryPointType,
        classes: Vec<ClassName>,
        class_package: Option<String>,
    },
}

impl GenerationJob {
    /// Value of `ASSERTGEN_MODE` for this job.
    pub fn mode(&self) -> &'static str {
        match self {
            GenerationJob::Class { .. } => "class",
            GenerationJob::Hierarchical { .. } => "hierarchical",
            GenerationJob::EntryPoint { .. } => "entry_point",
        }
    }

    /// Class name for per-class jobs.
    pub fn class(&self) -> Option<&ClassName> {
        match self {
            GenerationJob::Class { class, .. } | GenerationJob::Hierarchical { class, .. } => {
                Some(class)
            }
            GenerationJob::EntryPoint { .. } => None,
        }
    }
}

impl fmt::Display for GenerationJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationJob::Class { class, .. } => write!(f, "assertions for {class}"),
            GenerationJob::Hierarchical { class, .. } => {
                write!(f, "hierarchical assertions for {class}")
            }
            GenerationJob::EntryPoint { kind, .. } => {
                write!(f, "{} entry point", kind.class_name())
            }
        }
    }
}

/// Settings shared by every job of one invocation.
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    /// Resolved output directory.
    pub output_dir: PathBuf,
    /// Directory the generator runs in.
    pub working_dir: PathBuf,
    pub templates: Vec<LoadedTemplate>,
}

/// Trait abstracting how assertion sources are produced.
pub trait AssertionGenerator: Send {
    /// Run one job and return the paths of the files it produced.
    fn generate<'a>(
        &'a mut self,
        ctx: &'a GenerationContext,
        job: GenerationJob,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PathBuf>>> + Send + 'a>>;
}
