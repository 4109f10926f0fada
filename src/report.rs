// src/report.rs

//! Human-readable summary of one invocation.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::generate::{BatchOutcome, EntryPointStage};
use crate::scan::ClassName;
use crate::types::EntryPointType;

const INDENT: &str = "- ";
const SECTION: &str = "--- ";

#[derive(Debug, Clone, PartialEq, Eq)]
struct ReportedFailure {
    subject: String,
    message: String,
    chain: String,
}

/// Accumulates what happened during an invocation and renders it as text.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    output_dir: PathBuf,
    plan: Option<String>,
    input_classes: BTreeSet<String>,
    input_packages: BTreeSet<String>,
    excluded_classes: BTreeSet<String>,
    filtered_classes: BTreeSet<String>,
    user_templates: Vec<String>,
    generated_files: BTreeSet<PathBuf>,
    unmatched_includes: BTreeSet<String>,
    entry_point_files: BTreeMap<EntryPointType, Vec<PathBuf>>,
    failures: Vec<ReportedFailure>,
    notes: Vec<String>,
}

impl GenerationReport {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn set_plan(&mut self, plan: impl ToString) {
        self.plan = Some(plan.to_string());
    }

    /// Register the classes that passed the filters.
    pub fn set_input_classes<'a>(&mut self, classes: impl IntoIterator<Item = &'a ClassName>) {
        for class in classes {
            self.input_classes.insert(class.qualified().to_string());
            if !class.package().is_empty() {
                self.input_packages.insert(class.package().to_string());
            }
        }
    }

    /// A previously generated assertion type found among the inputs.
    pub fn add_excluded_class(&mut self, class: &ClassName) {
        self.excluded_classes.insert(class.qualified().to_string());
    }

    /// A class rejected by the class or package filters.
    pub fn add_filtered_class(&mut self, class: &ClassName) {
        self.filtered_classes.insert(class.qualified().to_string());
    }

    pub fn register_user_template(&mut self, description: impl Into<String>) {
        self.user_templates.push(description.into());
    }

    pub fn add_generated_files(&mut self, files: impl IntoIterator<Item = PathBuf>) {
        self.generated_files.extend(files);
    }

    /// Include patterns that matched no candidate.
    pub fn add_unmatched_includes(&mut self, patterns: impl IntoIterator<Item = String>) {
        self.unmatched_includes.extend(patterns);
    }

    pub fn report_entry_point(&mut self, kind: EntryPointType, files: Vec<PathBuf>) {
        self.entry_point_files.entry(kind).or_default().extend(files);
    }

    pub fn add_failure(&mut self, subject: impl Into<String>, error: &anyhow::Error) {
        self.failures.push(ReportedFailure {
            subject: subject.into(),
            message: format!("{error:#}"),
            chain: format!("{error:?}"),
        });
    }

    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Fold a finished batch into the report.
    pub fn record_batch(&mut self, outcome: &BatchOutcome) {
        for files in outcome.generated.values() {
            self.add_generated_files(files.iter().cloned());
        }
        for (kind, files) in &outcome.entry_point_files {
            self.report_entry_point(*kind, files.clone());
        }
        for failure in outcome.failures() {
            self.add_failure(failure.subject.clone(), &failure.error);
        }
        if outcome.aborted {
            self.add_note("Hierarchical generation stopped at the first failure.");
        }
        if let EntryPointStage::Skipped { .. } = outcome.entry_point_stage {
            self.add_note(format!("Entry points {}.", outcome.entry_point_stage));
        }
    }

    pub fn is_generation_error(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn is_nothing_generated(&self) -> bool {
        self.generated_files.is_empty() && self.entry_point_files.is_empty()
    }

    pub fn generated_files(&self) -> impl Iterator<Item = &Path> {
        self.generated_files.iter().map(PathBuf::as_path)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push('\n');
        out.push_str("=========================================\n");
        out.push_str("Assertions generation report\n");
        out.push_str("=========================================\n");
        self.render_parameters(&mut out);
        out.push('\n');
        let _ = writeln!(out, "{SECTION}Generator results{SECTION}");
        if self.is_generation_error() {
            self.render_error(&mut out);
        } else if self.is_nothing_generated() {
            self.render_nothing_generated(&mut out);
        } else {
            self.render_success(&mut out);
        }
        for note in &self.notes {
            out.push('\n');
            out.push_str(note);
            out.push('\n');
        }
        out
    }

    fn render_parameters(&self, out: &mut String) {
        out.push('\n');
        let _ = writeln!(out, "{SECTION}Generator input parameters{SECTION}");
        if !self.user_templates.is_empty() {
            out.push_str("The following templates will replace the default ones:\n");
            for template in &self.user_templates {
                let _ = writeln!(out, "{INDENT}{template}");
            }
            out.push('\n');
        }
        if let Some(plan) = &self.plan {
            let _ = writeln!(out, "Regeneration plan: {plan}");
            out.push('\n');
        }
        if !self.input_packages.is_empty() {
            out.push_str("Generating assertions for classes in following packages:\n");
            for package in &self.input_packages {
                let _ = writeln!(out, "{INDENT}{package}");
            }
        }
        if !self.input_classes.is_empty() {
            if !self.input_packages.is_empty() {
                out.push('\n');
            }
            out.push_str("Generating assertions for classes:\n");
            for class in &self.input_classes {
                let _ = writeln!(out, "{INDENT}{class}");
            }
        }
        if !self.excluded_classes.is_empty() {
            out.push('\n');
            out.push_str("Input classes excluded from assertions generation:\n");
            for class in &self.excluded_classes {
                let _ = writeln!(out, "{INDENT}{class}");
            }
        }
        if !self.filtered_classes.is_empty() {
            out.push('\n');
            out.push_str("Input classes excluded by class/package filters:\n");
            for class in &self.filtered_classes {
                let _ = writeln!(out, "{INDENT}{class}");
            }
        }
    }

    fn render_success(&self, out: &mut String) {
        out.push('\n');
        out.push_str("Directory where custom assertions files have been generated:\n");
        let _ = writeln!(out, "{INDENT}{}", self.output_dir.display());
        out.push('\n');
        out.push_str("Custom assertions files generated:\n");
        for file in &self.generated_files {
            let _ = writeln!(out, "{INDENT}{}", file.display());
        }
        self.render_unmatched(out);
        for (kind, files) in &self.entry_point_files {
            out.push('\n');
            let _ = writeln!(
                out,
                "{} entry point class has been generated in file:",
                kind.class_name()
            );
            for file in files {
                let _ = writeln!(out, "{INDENT}{}", file.display());
            }
        }
    }

    fn render_unmatched(&self, out: &mut String) {
        if self.unmatched_includes.is_empty() {
            return;
        }
        out.push('\n');
        out.push_str("No custom assertions files generated for the following include patterns as they matched nothing:\n");
        for pattern in &self.unmatched_includes {
            let _ = writeln!(out, "{INDENT}{pattern}");
        }
    }

    fn render_nothing_generated(&self, out: &mut String) {
        out.push('\n');
        out.push_str("No assertions generated as no classes have been found from given classes/packages.\n");
        if !self.input_classes.is_empty() {
            let _ = writeln!(out, "{INDENT}Given classes : {}", join(&self.input_classes));
        }
        if !self.input_packages.is_empty() {
            let _ = writeln!(out, "{INDENT}Given packages : {}", join(&self.input_packages));
        }
        if !self.excluded_classes.is_empty() {
            let _ = writeln!(out, "{INDENT}Excluded classes : {}", join(&self.excluded_classes));
        }
        if !self.filtered_classes.is_empty() {
            let _ = writeln!(out, "{INDENT}Filtered classes : {}", join(&self.filtered_classes));
        }
        self.render_unmatched(out);
    }

    fn render_error(&self, out: &mut String) {
        let Some(first) = self.failures.first() else {
            return;
        };
        out.push('\n');
        let _ = writeln!(out, "Assertions failed with error : {}", first.message);
        if !self.input_classes.is_empty() {
            let _ = writeln!(out, "{INDENT}Given classes were : {}", join(&self.input_classes));
        }
        if !self.input_packages.is_empty() {
            let _ = writeln!(out, "{INDENT}Given packages were : {}", join(&self.input_packages));
        }
        if !self.generated_files.is_empty() {
            out.push('\n');
            out.push_str("Custom assertions files generated before the failure:\n");
            for file in &self.generated_files {
                let _ = writeln!(out, "{INDENT}{}", file.display());
            }
        }
        for failure in &self.failures {
            out.push('\n');
            let _ = writeln!(out, "Full error stack ({}) : {}", failure.subject, failure.chain);
        }
    }
}

fn join(items: &BTreeSet<String>) -> String {
    format!(
        "[{}]",
        items.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    )
}
