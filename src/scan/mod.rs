// src/scan/mod.rs

//! Candidate discovery and class-name extraction.
//!
//! [`collect`] finds the files of each input partition; [`extract`] maps
//! source-partition files to the fully-qualified names the filters see.

pub mod collect;
pub mod extract;

pub use collect::{
    discover_inputs, DiscoveredInputs, DiscoveryRequest, SourceFile, SourceFileMatcher,
};
pub use extract::{extract_class_names, ArtifactKind, ClassName};
