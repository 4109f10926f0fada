// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `assertgen`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "assertgen",
    version,
    about = "Regenerate assertion helpers for the classes whose inputs changed.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// The directory containing it is treated as the project root.
    #[arg(long, value_name = "PATH", default_value = "Assertgen.toml")]
    pub config: String,

    /// Ignore previous state and regenerate everything.
    #[arg(long)]
    pub rerun_all: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ASSERTGEN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load config, scan and classify, print the plan, but generate nothing.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
