// src/generate/mod.rs

//! Assertion generation.
//!
//! - `backend`: the [`AssertionGenerator`] seam and the jobs it receives.
//! - `command`: production generator running an external command.
//! - `runner`: flat / hierarchical / entry-point batches and their error
//!   policy.

pub mod backend;
pub mod command;
pub mod runner;

pub use backend::{AssertionGenerator, GenerationContext, GenerationJob};
pub use command::CommandGenerator;
pub use runner::{
    run_batch, BatchOutcome, CandidateClass, EntryPointStage, GenerationBatch, GenerationFailure,
};
