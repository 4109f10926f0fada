// src/incremental/mod.rs

//! Incremental regeneration decisions.
//!
//! This module is responsible for:
//! - Hashing input files and diffing them against the previous invocation.
//! - Classifying the resulting change set as skip / scoped / full.
//! - Applying the plan's side effects to the output directory.
//! - Persisting state for the next invocation.

pub mod changes;
pub mod classify;
pub mod hash;
pub mod outputs;
pub mod state;

pub use changes::{
    CandidateFile, ChangeKind, ChangeSet, FileRecord, Partition, Snapshot, UNGENERATED_HASH,
};
pub use classify::{ChangeSetClassifier, FullReason, RegenerationPlan};
pub use hash::compute_file_hash;
pub use outputs::prepare_output_dir;
pub use state::{
    FileStateStore, GenerationInputs, GenerationState, MemoryStateStore, StateStore,
    STATE_FILE_PATH,
};
