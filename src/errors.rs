// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssertgenError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unsupported extension '{extension}' for candidate file {path:?}")]
    UnsupportedExtension { path: PathBuf, extension: String },

    #[error("Unknown template identifier: {0}")]
    UnknownTemplate(String),

    #[error("File {path:?} claimed by both the {existing} and {requested} partitions")]
    PartitionConflict {
        path: PathBuf,
        existing: String,
        requested: String,
    },

    #[error("Generator exited with code {code}: {stderr}")]
    GeneratorFailed { code: i32, stderr: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AssertgenError {
    /// Configuration errors abort the invocation before any generation.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            AssertgenError::ConfigError(_)
                | AssertgenError::InvalidPattern { .. }
                | AssertgenError::UnsupportedExtension { .. }
                | AssertgenError::UnknownTemplate(_)
                | AssertgenError::PartitionConflict { .. }
                | AssertgenError::TomlError(_)
        )
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, AssertgenError>;
