// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod generate;
pub mod incremental;
pub mod logging;
pub mod patterns;
pub mod report;
pub mod scan;
pub mod templates;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::loader::{load_and_validate, project_root};
use crate::engine::{Engine, EngineOptions, InvocationOutcome};
use crate::fs::{FileSystem, RealFileSystem};
use crate::generate::CommandGenerator;
use crate::incremental::FileStateStore;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and validation
/// - the real filesystem and file-backed state store
/// - the command generator
/// - one engine invocation
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;
    let root = absolute_root(&project_root(&config_path));

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let state = FileStateStore::new(fs.clone(), root.clone());
    let generator = CommandGenerator::new(cfg.generator_cmd());

    let options = EngineOptions {
        force_full: args.rerun_all,
        dry_run: args.dry_run,
    };
    let mut engine =
        Engine::new(cfg, root, fs, Box::new(state), Box::new(generator)).with_options(options);

    let outcome = engine.run().await?;

    if args.dry_run {
        print_dry_run(&outcome);
        return Ok(());
    }

    if !outcome.success {
        match &outcome.batch {
            Some(batch) => bail!(
                "assertion generation failed: {} class failure(s), {} entry point failure(s), entry points {}",
                batch.class_failures.len(),
                batch.entry_point_failures.len(),
                batch.entry_point_stage
            ),
            None => bail!("assertion generation failed"),
        }
    }
    Ok(())
}

/// Anchor a relative project root at the current directory.
///
/// The generator runs with the project root as its working directory, so
/// every path handed to it (output dir, sources) must not depend on where
/// `assertgen` itself was started.
fn absolute_root(root: &Path) -> PathBuf {
    if root.is_absolute() {
        return root.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(root),
        Err(_) => root.to_path_buf(),
    }
}

/// Simple dry-run output: plan and filtered candidates.
fn print_dry_run(outcome: &InvocationOutcome) {
    println!("assertgen dry-run");
    println!("  plan: {}", outcome.plan);
    println!();

    println!("classes ({}):", outcome.selection.classes.len());
    for class in &outcome.selection.classes {
        let marker = if class.in_scope { "*" } else { " " };
        println!("  {marker} {} ({})", class.name, class.source.display());
    }
    if !outcome.selection.excluded.is_empty() {
        println!();
        println!("excluded generated assertion types:");
        for class in &outcome.selection.excluded {
            println!("    {class}");
        }
    }
    if !outcome.selection.unmatched_includes.is_empty() {
        println!();
        println!("include patterns that matched nothing:");
        for pattern in &outcome.selection.unmatched_includes {
            println!("    {pattern}");
        }
    }

    debug!("dry-run complete (no generation)");
}
