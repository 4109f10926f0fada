// src/engine/runtime.rs

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::ConfigFile;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::generate::{
    run_batch, AssertionGenerator, BatchOutcome, GenerationBatch, GenerationContext,
};
use crate::incremental::{
    prepare_output_dir, ChangeSet, ChangeSetClassifier, GenerationState, RegenerationPlan,
    Snapshot, StateStore, UNGENERATED_HASH,
};
use crate::report::GenerationReport;
use crate::scan::{discover_inputs, DiscoveryRequest};
use crate::templates::{load_templates, TemplateOrigin, TemplateSpec};
use crate::types::GenerationMode;

use super::core::{is_incremental_capable, select_candidates, snapshot_inputs, CandidateSelection};
use super::{EngineOptions, InvocationOutcome};

/// Runs one invocation: discover, classify, filter, generate, persist.
///
/// All I/O goes through the injected [`FileSystem`], [`StateStore`] and
/// [`AssertionGenerator`], so an engine can be driven entirely in memory.
pub struct Engine {
    config: ConfigFile,
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
    state: Box<dyn StateStore>,
    generator: Box<dyn AssertionGenerator>,
    options: EngineOptions,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("root", &self.root)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// `root` is the directory relative config paths resolve against.
    pub fn new(
        config: ConfigFile,
        root: impl Into<PathBuf>,
        fs: Arc<dyn FileSystem>,
        state: Box<dyn StateStore>,
        generator: Box<dyn AssertionGenerator>,
    ) -> Self {
        Self {
            config,
            root: root.into(),
            fs,
            state,
            generator,
            options: EngineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options_mut(&mut self) -> &mut EngineOptions {
        &mut self.options
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Resolved output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.resolve(self.config.output_dir())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    fn resolved_templates(&self) -> Vec<TemplateSpec> {
        self.config
            .templates()
            .iter()
            .map(|spec| match &spec.origin {
                TemplateOrigin::File(file) => TemplateSpec {
                    kind: spec.kind,
                    origin: TemplateOrigin::File(self.resolve(file)),
                },
                TemplateOrigin::Inline(_) => spec.clone(),
            })
            .collect()
    }

    /// Run one invocation.
    ///
    /// Configuration and extraction problems are returned as errors before
    /// any output is touched. Generation failures are reported in the
    /// outcome instead.
    pub async fn run(&mut self) -> Result<InvocationOutcome> {
        let output_dir = self.output_dir();
        let mut report = GenerationReport::new(&output_dir);

        if self.config.skip() {
            info!("generation disabled by [generator].skip");
            return Ok(InvocationOutcome::skipped(report));
        }

        let templates = self.resolved_templates();
        let loaded_templates = load_templates(self.fs.as_ref(), &templates)?;
        for template in &loaded_templates {
            report.register_user_template(template.report_line());
        }

        // Discover + hash.
        let source_roots: Vec<PathBuf> =
            self.config.source_roots().iter().map(|r| self.resolve(r)).collect();
        let classpath_entries: Vec<PathBuf> = self
            .config
            .classpath_entries()
            .iter()
            .map(|e| self.resolve(e))
            .collect();
        let template_files: Vec<PathBuf> = templates.iter().filter_map(|t| t.file().cloned()).collect();
        let request = DiscoveryRequest {
            source_roots: &source_roots,
            source_matcher: self.config.source_matcher(),
            classpath_entries: &classpath_entries,
            template_files: &template_files,
        };
        let inputs = discover_inputs(self.fs.as_ref(), &request)?;
        let snapshot = snapshot_inputs(self.fs.as_ref(), &inputs)?;

        // Classify.
        let previous = self.state.load()?;
        let current_inputs = self.config.generation_inputs();
        let incremental = is_incremental_capable(
            previous.as_ref(),
            &current_inputs,
            self.fs.is_dir(&output_dir),
            self.options.force_full,
        );
        let previous_snapshot = previous.as_ref().map(GenerationState::snapshot);
        let changes = ChangeSet::between(previous_snapshot.as_ref(), &snapshot);
        let plan = ChangeSetClassifier::new(incremental).classify(&changes);
        report.set_plan(&plan);

        if plan == RegenerationPlan::Skip {
            info!("inputs unchanged; nothing to regenerate");
            return Ok(InvocationOutcome {
                plan,
                report,
                selection: CandidateSelection::default(),
                batch: None,
                success: true,
            });
        }

        // Filter.
        let selection = select_candidates(self.fs.as_ref(), &self.config, &inputs, &plan)?;
        report.set_input_classes(selection.names());
        for class in &selection.excluded {
            report.add_excluded_class(class);
        }
        for class in &selection.filtered {
            report.add_filtered_class(class);
        }
        report.add_unmatched_includes(selection.unmatched_includes.iter().cloned());

        if self.options.dry_run {
            info!(plan = %plan, "dry run; no output written");
            return Ok(InvocationOutcome {
                plan,
                report,
                selection,
                batch: None,
                success: true,
            });
        }

        // Prepare outputs.
        let mode = self.config.mode();
        let previous_outputs = match (&plan, &previous) {
            (RegenerationPlan::Full(_), _) | (_, None) => BTreeMap::new(),
            (_, Some(state)) => state.outputs(),
        };
        let regenerated_sources = match mode {
            GenerationMode::Flat => selection.in_scope_sources(),
            GenerationMode::Hierarchical => selection.all_sources(),
        };
        prepare_output_dir(
            self.fs.as_ref(),
            &output_dir,
            &plan,
            &previous_outputs,
            &regenerated_sources,
        )?;

        // Generate.
        let ctx = GenerationContext {
            output_dir: output_dir.clone(),
            working_dir: self.root.clone(),
            templates: loaded_templates,
        };
        let batch = GenerationBatch {
            mode,
            classes: &selection.classes,
            entry_points: self.config.entry_points(),
            entry_point_package: self.config.entry_point_package(),
        };
        let outcome = run_batch(self.generator.as_mut(), &ctx, &batch).await;
        report.record_batch(&outcome);
        info!("{}", report.render());

        self.persist_state(
            snapshot,
            previous_outputs,
            &regenerated_sources,
            &selection,
            &outcome,
        )?;

        Ok(InvocationOutcome {
            plan,
            report,
            selection,
            success: outcome.is_success(),
            batch: Some(outcome),
        })
    }

    /// Write state for the next invocation.
    ///
    /// - Aborted hierarchical batches and failed entry points clear the state
    ///   so the next run is full.
    /// - Source files with a failed class keep their entry with
    ///   [`UNGENERATED_HASH`]: the next run sees them as modified, or as
    ///   removed if they were deleted meanwhile.
    fn persist_state(
        &mut self,
        mut snapshot: Snapshot,
        mut outputs: BTreeMap<PathBuf, Vec<PathBuf>>,
        regenerated_sources: &[PathBuf],
        selection: &CandidateSelection,
        outcome: &BatchOutcome,
    ) -> Result<()> {
        if outcome.aborted || !outcome.entry_point_failures.is_empty() {
            warn!("generation incomplete; discarding state so the next run regenerates everything");
            self.state.clear()?;
            return Ok(());
        }

        for source in regenerated_sources {
            outputs.remove(source);
        }
        for candidate in &selection.classes {
            if let Some(files) = outcome.generated.get(candidate.name.qualified()) {
                outputs
                    .entry(candidate.source.clone())
                    .or_default()
                    .extend(files.iter().cloned());
            }
        }

        let failed_sources: BTreeSet<&PathBuf> = outcome
            .class_failures
            .iter()
            .filter_map(|f| f.source.as_ref())
            .collect();
        for source in &failed_sources {
            if let Some(record) = snapshot.get_mut(*source) {
                debug!(source = ?source, "marking failed source for retry");
                record.hash = UNGENERATED_HASH.to_string();
            }
        }

        let state = GenerationState::new(self.config.generation_inputs(), &snapshot, &outputs);
        self.state.save(&state)?;
        Ok(())
    }
}
