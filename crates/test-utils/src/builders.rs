#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use assertgen::config::{
    ClasspathSection, ConfigFile, EntryPointsSection, GeneratorSection, PatternSection,
    RawConfigFile, RawTemplateEntry, SourcesSection,
};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from a single `src` source root, the default `**/*.java` glob,
/// output to `out`, and no entry points.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                generator: GeneratorSection {
                    cmd: "fake-generator".to_string(),
                    output_dir: PathBuf::from("out"),
                    hierarchical: false,
                    skip: false,
                },
                sources: SourcesSection {
                    roots: vec![PathBuf::from("src")],
                    ..SourcesSection::default()
                },
                classpath: ClasspathSection::default(),
                classes: PatternSection::default(),
                packages: PatternSection::default(),
                entry_points: EntryPointsSection {
                    types: vec![],
                    class_package: None,
                },
                templates: BTreeMap::new(),
            },
        }
    }

    pub fn cmd(mut self, cmd: &str) -> Self {
        self.config.generator.cmd = cmd.to_string();
        self
    }

    pub fn output_dir(mut self, dir: &str) -> Self {
        self.config.generator.output_dir = PathBuf::from(dir);
        self
    }

    pub fn hierarchical(mut self, val: bool) -> Self {
        self.config.generator.hierarchical = val;
        self
    }

    pub fn skip(mut self, val: bool) -> Self {
        self.config.generator.skip = val;
        self
    }

    /// Replace the source roots with `root`.
    pub fn source_root(mut self, root: &str) -> Self {
        self.config.sources.roots = vec![PathBuf::from(root)];
        self
    }

    pub fn add_source_root(mut self, root: &str) -> Self {
        self.config.sources.roots.push(PathBuf::from(root));
        self
    }

    /// Replace the file include globs.
    pub fn source_include(mut self, glob: &str) -> Self {
        self.config.sources.include = vec![glob.to_string()];
        self
    }

    pub fn source_exclude(mut self, glob: &str) -> Self {
        self.config.sources.exclude.push(glob.to_string());
        self
    }

    pub fn classpath(mut self, entry: &str) -> Self {
        self.config.classpath.entries.push(PathBuf::from(entry));
        self
    }

    pub fn include_class(mut self, pattern: &str) -> Self {
        self.config.classes.include.push(pattern.to_string());
        self
    }

    pub fn exclude_class(mut self, pattern: &str) -> Self {
        self.config.classes.exclude.push(pattern.to_string());
        self
    }

    pub fn include_package(mut self, pattern: &str) -> Self {
        self.config.packages.include.push(pattern.to_string());
        self
    }

    pub fn exclude_package(mut self, pattern: &str) -> Self {
        self.config.packages.exclude.push(pattern.to_string());
        self
    }

    pub fn entry_point(mut self, kind: &str) -> Self {
        self.config.entry_points.types.push(kind.to_string());
        self
    }

    pub fn entry_point_package(mut self, package: &str) -> Self {
        self.config.entry_points.class_package = Some(package.to_string());
        self
    }

    pub fn template_file(mut self, identifier: &str, file: &str) -> Self {
        self.config.templates.insert(
            identifier.to_string(),
            RawTemplateEntry {
                file: Some(PathBuf::from(file)),
                content: None,
            },
        );
        self
    }

    pub fn template_content(mut self, identifier: &str, content: &str) -> Self {
        self.config.templates.insert(
            identifier.to_string(),
            RawTemplateEntry {
                file: None,
                content: Some(content.to_string()),
            },
        );
        self
    }

    /// The raw, unvalidated config.
    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Java source text declaring `class <name>` in `package`.
pub fn java_class(package: &str, name: &str) -> String {
    if package.is_empty() {
        format!("public class {name} {{\n}}\n")
    } else {
        format!("package {package};\n\npublic class {name} {{\n}}\n")
    }
}
