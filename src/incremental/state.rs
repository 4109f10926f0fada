// src/incremental/state.rs

//! State carried from one invocation to the next.
//!
//! The state is a structured, versioned TOML document: the generation inputs
//! (compared by equality to decide whether incremental work is trustworthy),
//! a hash per input file, and the files generated from each source file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::fs::FileSystem;
use crate::incremental::changes::{FileRecord, Snapshot};
use crate::patterns::FilterState;
use crate::types::EntryPointType;

/// Relative path (from the project root) to the state file.
pub const STATE_FILE_PATH: &str = ".assertgen/state.toml";

/// Bumped whenever the layout of [`GenerationState`] changes.
pub const STATE_VERSION: u32 = 1;

/// Scalar configuration and pattern sets that shape generated content.
///
/// All collections are sorted so two configs that differ only in listing
/// order compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationInputs {
    pub generator_cmd: String,
    pub output_dir: String,
    pub hierarchical: bool,
    pub entry_points: Vec<EntryPointType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point_package: Option<String>,
    pub classes: FilterState,
    pub packages: FilterState,
    /// Identifier -> content hash of inline templates.
    #[serde(default)]
    pub inline_templates: BTreeMap<String, String>,
    /// Identifier -> path of file templates. Contents are tracked per file.
    #[serde(default)]
    pub template_files: BTreeMap<String, String>,
}

/// Everything persisted between invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationState {
    pub version: u32,
    pub inputs: GenerationInputs,
    /// Input path -> partition and content hash.
    #[serde(default)]
    pub files: BTreeMap<String, FileRecord>,
    /// Source file -> files generated from the classes it declares.
    #[serde(default)]
    pub outputs: BTreeMap<String, Vec<String>>,
}

impl GenerationState {
    pub fn new(
        inputs: GenerationInputs,
        snapshot: &Snapshot,
        outputs: &BTreeMap<PathBuf, Vec<PathBuf>>,
    ) -> Self {
        Self {
            version: STATE_VERSION,
            inputs,
            files: snapshot
                .iter()
                .map(|(path, record)| (path_key(path), record.clone()))
                .collect(),
            outputs: outputs
                .iter()
                .map(|(source, files)| (path_key(source), files.iter().map(|f| path_key(f)).collect()))
                .collect(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.files
            .iter()
            .map(|(path, record)| (PathBuf::from(path), record.clone()))
            .collect()
    }

    pub fn outputs(&self) -> BTreeMap<PathBuf, Vec<PathBuf>> {
        self.outputs
            .iter()
            .map(|(source, files)| (PathBuf::from(source), files.iter().map(PathBuf::from).collect()))
            .collect()
    }
}

fn path_key(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Abstract storage for invocation state.
pub trait StateStore: Send + Sync {
    /// Previous state, or `None` when absent or unusable.
    fn load(&self) -> Result<Option<GenerationState>>;
    fn save(&mut self, state: &GenerationState) -> Result<()>;
    /// Forget the previous state so the next run is a full one.
    fn clear(&mut self) -> Result<()>;
}

/// Stores state in `<root>/.assertgen/state.toml`.
#[derive(Debug)]
pub struct FileStateStore {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
}

impl FileStateStore {
    pub fn new(fs: Arc<dyn FileSystem>, root: PathBuf) -> Self {
        Self { fs, root }
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(STATE_FILE_PATH)
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Result<Option<GenerationState>> {
        let path = self.path();
        if !self.fs.is_file(&path) {
            debug!(path = ?path, "no previous state");
            return Ok(None);
        }

        let text = self
            .fs
            .read_to_string(&path)
            .with_context(|| format!("reading state file at {:?}", path))?;

        let state: GenerationState = match toml::from_str(&text) {
            Ok(state) => state,
            Err(err) => {
                warn!(path = ?path, error = %err, "unreadable state file; ignoring it");
                return Ok(None);
            }
        };

        if state.version != STATE_VERSION {
            warn!(
                path = ?path,
                found = state.version,
                expected = STATE_VERSION,
                "state file has another version; ignoring it"
            );
            return Ok(None);
        }

        Ok(Some(state))
    }

    fn save(&mut self, state: &GenerationState) -> Result<()> {
        let path = self.path();
        let text = toml::to_string(state).context("serializing generation state")?;
        self.fs
            .write(&path, text.as_bytes())
            .with_context(|| format!("writing state file at {:?}", path))?;
        info!(
            path = ?path,
            files = state.files.len(),
            sources = state.outputs.len(),
            "stored generation state (file)"
        );
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let path = self.path();
        if self.fs.is_file(&path) {
            self.fs.remove_file(&path)?;
            info!(path = ?path, "cleared generation state (file)");
        }
        Ok(())
    }
}

/// Stores state in memory only.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: Option<GenerationState>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<Option<GenerationState>> {
        Ok(self.state.clone())
    }

    fn save(&mut self, state: &GenerationState) -> Result<()> {
        self.state = Some(state.clone());
        info!(
            files = state.files.len(),
            sources = state.outputs.len(),
            "stored generation state (memory)"
        );
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.state = None;
        Ok(())
    }
}
