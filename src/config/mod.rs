// src/config/mod.rs

//! Configuration loading and validation for assertgen.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate it into a [`ConfigFile`] with compiled patterns (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, parse_str, project_root};
pub use model::{
    ClasspathSection, ConfigFile, EntryPointsSection, GeneratorSection, PatternSection,
    RawConfigFile, RawTemplateEntry, SourcesSection,
};
