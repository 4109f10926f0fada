// src/config/validate.rs

use std::collections::BTreeSet;

use crate::config::model::{ConfigFile, RawConfigFile, RawTemplateEntry};
use crate::errors::{AssertgenError, Result};
use crate::patterns::{ClassFilter, PackageFilter};
use crate::scan::SourceFileMatcher;
use crate::templates::{TemplateOrigin, TemplateSpec, TemplateType};
use crate::types::EntryPointType;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = AssertgenError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_generator(&raw)?;
        ensure_has_source_roots(&raw)?;

        let source_matcher = SourceFileMatcher::new(&raw.sources.include, &raw.sources.exclude)
            .map_err(|e| AssertgenError::ConfigError(format!("[sources]: {e:#}")))?;
        let class_filter = ClassFilter::from_patterns(&raw.classes.include, &raw.classes.exclude)?;
        let package_filter =
            PackageFilter::from_patterns(&raw.packages.include, &raw.packages.exclude)?;
        let entry_points = parse_entry_points(&raw.entry_points.types)?;
        let entry_point_package = raw
            .entry_points
            .class_package
            .as_ref()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        let templates = parse_templates(&raw)?;

        Ok(ConfigFile::new_unchecked(
            raw.generator,
            raw.sources.roots,
            source_matcher,
            raw.classpath.entries,
            class_filter,
            package_filter,
            entry_points,
            entry_point_package,
            templates,
        ))
    }
}

fn validate_generator(cfg: &RawConfigFile) -> Result<()> {
    if cfg.generator.cmd.trim().is_empty() {
        return Err(AssertgenError::ConfigError(
            "[generator].cmd must not be empty".to_string(),
        ));
    }
    if cfg.generator.output_dir.as_os_str().is_empty() {
        return Err(AssertgenError::ConfigError(
            "[generator].output_dir must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn ensure_has_source_roots(cfg: &RawConfigFile) -> Result<()> {
    if cfg.sources.roots.is_empty() {
        return Err(AssertgenError::ConfigError(
            "[sources].roots must list at least one source root".to_string(),
        ));
    }
    Ok(())
}

fn parse_entry_points(types: &[String]) -> Result<Vec<EntryPointType>> {
    let parsed: BTreeSet<EntryPointType> = types
        .iter()
        .map(|t| {
            t.parse::<EntryPointType>()
                .map_err(|e| AssertgenError::ConfigError(format!("[entry_points].types: {e}")))
        })
        .collect::<Result<_>>()?;
    Ok(parsed.into_iter().collect())
}

fn parse_templates(cfg: &RawConfigFile) -> Result<Vec<TemplateSpec>> {
    let mut specs = Vec::with_capacity(cfg.templates.len());
    for (identifier, entry) in cfg.templates.iter() {
        let kind: TemplateType = identifier.parse()?;
        let origin = template_origin(identifier, entry)?;
        specs.push(TemplateSpec { kind, origin });
    }
    specs.sort_by_key(|s| s.kind);
    Ok(specs)
}

fn template_origin(identifier: &str, entry: &RawTemplateEntry) -> Result<TemplateOrigin> {
    match (&entry.file, &entry.content) {
        (Some(file), None) => Ok(TemplateOrigin::File(file.clone())),
        (None, Some(content)) => Ok(TemplateOrigin::Inline(content.clone())),
        (None, None) => Err(AssertgenError::ConfigError(format!(
            "template '{identifier}' needs either `file` or `content`"
        ))),
        (Some(_), Some(_)) => Err(AssertgenError::ConfigError(format!(
            "template '{identifier}' sets both `file` and `content`; pick one"
        ))),
    }
}
