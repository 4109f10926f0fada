// src/incremental/outputs.rs

//! Output-directory side effects of a [`RegenerationPlan`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::fs::FileSystem;
use crate::incremental::classify::RegenerationPlan;

/// Prepare `output_dir` before generation.
///
/// - `Full`: remove the whole tree and recreate it empty.
/// - `Scoped`: remove only the files previously generated from
///   `regenerated_sources`, and only those inside `output_dir`.
/// - `Skip`: touch nothing.
///
/// Returns the files that were removed in scoped mode.
pub fn prepare_output_dir(
    fs: &dyn FileSystem,
    output_dir: &Path,
    plan: &RegenerationPlan,
    previous_outputs: &BTreeMap<PathBuf, Vec<PathBuf>>,
    regenerated_sources: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    match plan {
        RegenerationPlan::Skip => Ok(Vec::new()),
        RegenerationPlan::Full(reason) => {
            if fs.is_dir(output_dir) {
                fs.remove_dir_all(output_dir)
                    .with_context(|| format!("clearing output dir {:?}", output_dir))?;
            }
            fs.create_dir_all(output_dir)?;
            info!(dir = ?output_dir, %reason, "cleared output directory for full regeneration");
            Ok(Vec::new())
        }
        RegenerationPlan::Scoped(_) => {
            let mut removed = Vec::new();
            for source in regenerated_sources {
                let Some(files) = previous_outputs.get(source) else {
                    continue;
                };
                for file in files {
                    if !file.starts_with(output_dir) || !fs.is_file(file) {
                        continue;
                    }
                    fs.remove_file(file)?;
                    debug!(source = ?source, file = ?file, "removed stale generated file");
                    removed.push(file.clone());
                }
            }
            Ok(removed)
        }
    }
}
