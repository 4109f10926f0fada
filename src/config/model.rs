// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::incremental::hash::compute_text_hash;
use crate::incremental::GenerationInputs;
use crate::patterns::{ClassFilter, PackageFilter};
use crate::scan::SourceFileMatcher;
use crate::templates::{TemplateOrigin, TemplateSpec};
use crate::types::{EntryPointType, GenerationMode};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [generator]
/// cmd = "java -jar assertj-generator-cli.jar"
///
/// [sources]
/// roots = ["src/main/java"]
///
/// [classes]
/// include = ["org.example.**"]
/// exclude = ["**.internal.*"]
///
/// [entry_points]
/// types = ["standard", "soft"]
///
/// [templates]
/// assertion_class = { file = "templates/assert.txt" }
/// ```
///
/// Only `[generator].cmd` and `[sources].roots` are mandatory.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    pub generator: GeneratorSection,

    #[serde(default)]
    pub sources: SourcesSection,

    #[serde(default)]
    pub classpath: ClasspathSection,

    /// Class-name include/exclude patterns.
    #[serde(default)]
    pub classes: PatternSection,

    /// Package-name include/exclude patterns.
    #[serde(default)]
    pub packages: PatternSection,

    #[serde(default)]
    pub entry_points: EntryPointsSection,

    /// Template identifier -> where its text lives.
    #[serde(default)]
    pub templates: BTreeMap<String, RawTemplateEntry>,
}

/// `[generator]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorSection {
    /// Shell command that produces assertion sources.
    pub cmd: String,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Generate abstract + concrete assertion classes per type.
    #[serde(default)]
    pub hierarchical: bool,

    /// Do nothing at all when true.
    #[serde(default)]
    pub skip: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("build/generated-src/main-test/java")
}

/// `[sources]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourcesSection {
    #[serde(default)]
    pub roots: Vec<PathBuf>,

    /// File globs, relative to each root.
    #[serde(default = "default_source_include")]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_source_include() -> Vec<String> {
    vec!["**/*.java".to_string()]
}

impl Default for SourcesSection {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            include: default_source_include(),
            exclude: Vec::new(),
        }
    }
}

/// `[classpath]` section: files or directories whose changes force a full run.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ClasspathSection {
    #[serde(default)]
    pub entries: Vec<PathBuf>,
}

/// `[classes]` / `[packages]` sections.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct PatternSection {
    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,
}

/// `[entry_points]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryPointsSection {
    /// Kept as strings so an unknown type is reported as a config error
    /// naming the value rather than a TOML parse error.
    #[serde(default = "default_entry_point_types")]
    pub types: Vec<String>,

    /// Package of the generated entry point classes.
    #[serde(default)]
    pub class_package: Option<String>,
}

fn default_entry_point_types() -> Vec<String> {
    vec![EntryPointType::Standard.as_str().to_string()]
}

impl Default for EntryPointsSection {
    fn default() -> Self {
        Self {
            types: default_entry_point_types(),
            class_package: None,
        }
    }
}

/// One `[templates]` entry; exactly one of the fields must be set.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawTemplateEntry {
    #[serde(default)]
    pub file: Option<PathBuf>,

    #[serde(default)]
    pub content: Option<String>,
}

/// Validated configuration.
///
/// Built from [`RawConfigFile`] via `TryFrom`; every pattern and glob is
/// already compiled, so nothing past this point can fail on configuration.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    generator: GeneratorSection,
    source_roots: Vec<PathBuf>,
    source_matcher: SourceFileMatcher,
    classpath_entries: Vec<PathBuf>,
    class_filter: ClassFilter,
    package_filter: PackageFilter,
    entry_points: Vec<EntryPointType>,
    entry_point_package: Option<String>,
    templates: Vec<TemplateSpec>,
}

impl ConfigFile {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new_unchecked(
        generator: GeneratorSection,
        source_roots: Vec<PathBuf>,
        source_matcher: SourceFileMatcher,
        classpath_entries: Vec<PathBuf>,
        class_filter: ClassFilter,
        package_filter: PackageFilter,
        entry_points: Vec<EntryPointType>,
        entry_point_package: Option<String>,
        templates: Vec<TemplateSpec>,
    ) -> Self {
        Self {
            generator,
            source_roots,
            source_matcher,
            classpath_entries,
            class_filter,
            package_filter,
            entry_points,
            entry_point_package,
            templates,
        }
    }

    pub fn generator_cmd(&self) -> &str {
        &self.generator.cmd
    }

    pub fn output_dir(&self) -> &Path {
        &self.generator.output_dir
    }

    pub fn mode(&self) -> GenerationMode {
        GenerationMode::from_hierarchical(self.generator.hierarchical)
    }

    pub fn skip(&self) -> bool {
        self.generator.skip
    }

    pub fn source_roots(&self) -> &[PathBuf] {
        &self.source_roots
    }

    pub fn source_matcher(&self) -> &SourceFileMatcher {
        &self.source_matcher
    }

    pub fn classpath_entries(&self) -> &[PathBuf] {
        &self.classpath_entries
    }

    pub fn class_filter(&self) -> &ClassFilter {
        &self.class_filter
    }

    pub fn package_filter(&self) -> &PackageFilter {
        &self.package_filter
    }

    /// Sorted, without duplicates.
    pub fn entry_points(&self) -> &[EntryPointType] {
        &self.entry_points
    }

    pub fn entry_point_package(&self) -> Option<&str> {
        self.entry_point_package.as_deref()
    }

    pub fn templates(&self) -> &[TemplateSpec] {
        &self.templates
    }

    /// Template files, in identifier order.
    pub fn template_files(&self) -> Vec<PathBuf> {
        self.templates
            .iter()
            .filter_map(|t| t.file().cloned())
            .collect()
    }

    /// The configuration values that shape generated content.
    ///
    /// File template contents are tracked as inputs of their own; here a file
    /// template contributes only which identifier it backs.
    pub fn generation_inputs(&self) -> GenerationInputs {
        let mut inline_templates = BTreeMap::new();
        let mut template_files = BTreeMap::new();
        for template in &self.templates {
            let id = template.kind.identifier().to_string();
            match &template.origin {
                TemplateOrigin::Inline(text) => {
                    inline_templates.insert(id, compute_text_hash(text));
                }
                TemplateOrigin::File(path) => {
                    template_files.insert(id, path.to_string_lossy().replace('\\', "/"));
                }
            }
        }

        GenerationInputs {
            generator_cmd: self.generator.cmd.clone(),
            output_dir: self.generator.output_dir.to_string_lossy().replace('\\', "/"),
            hierarchical: self.generator.hierarchical,
            entry_points: self.entry_points.clone(),
            entry_point_package: self.entry_point_package.clone(),
            classes: self.class_filter.state(),
            packages: self.package_filter.state(),
            inline_templates,
            template_files,
        }
    }
}
