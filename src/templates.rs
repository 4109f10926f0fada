// src/templates.rs

//! User templates handed to the generator as opaque text payloads.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::debug;

use crate::errors::{AssertgenError, Result};
use crate::fs::FileSystem;

/// Every template slot the generator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemplateType {
    // class level
    AssertionClass,
    HierarchicalConcrete,
    HierarchicalAbstract,
    // method level
    Object,
    BooleanPrimitive,
    BooleanWrapper,
    Array,
    Iterable,
    CharPrimitive,
    Character,
    RealNumberPrimitive,
    RealNumberWrapper,
    WholeNumberPrimitive,
    WholeNumberWrapper,
    // entry points
    Assertions,
    AssertionMethod,
    Soft,
    SoftMethod,
    JunitSoft,
    Bdd,
    BddMethod,
}

impl TemplateType {
    pub const ALL: [TemplateType; 21] = [
        TemplateType::AssertionClass,
        TemplateType::HierarchicalConcrete,
        TemplateType::HierarchicalAbstract,
        TemplateType::Object,
        TemplateType::BooleanPrimitive,
        TemplateType::BooleanWrapper,
        TemplateType::Array,
        TemplateType::Iterable,
        TemplateType::CharPrimitive,
        TemplateType::Character,
        TemplateType::RealNumberPrimitive,
        TemplateType::RealNumberWrapper,
        TemplateType::WholeNumberPrimitive,
        TemplateType::WholeNumberWrapper,
        TemplateType::Assertions,
        TemplateType::AssertionMethod,
        TemplateType::Soft,
        TemplateType::SoftMethod,
        TemplateType::JunitSoft,
        TemplateType::Bdd,
        TemplateType::BddMethod,
    ];

    /// Identifier used as the `[templates]` key.
    pub fn identifier(self) -> &'static str {
        match self {
            TemplateType::AssertionClass => "assertion_class",
            TemplateType::HierarchicalConcrete => "hierarchical_concrete",
            TemplateType::HierarchicalAbstract => "hierarchical_abstract",
            TemplateType::Object => "object",
            TemplateType::BooleanPrimitive => "boolean_primitive",
            TemplateType::BooleanWrapper => "boolean_wrapper",
            TemplateType::Array => "array",
            TemplateType::Iterable => "iterable",
            TemplateType::CharPrimitive => "char_primitive",
            TemplateType::Character => "character",
            TemplateType::RealNumberPrimitive => "real_number_primitive",
            TemplateType::RealNumberWrapper => "real_number_wrapper",
            TemplateType::WholeNumberPrimitive => "whole_number_primitive",
            TemplateType::WholeNumberWrapper => "whole_number_wrapper",
            TemplateType::Assertions => "assertions",
            TemplateType::AssertionMethod => "assertion_method",
            TemplateType::Soft => "soft",
            TemplateType::SoftMethod => "soft_method",
            TemplateType::JunitSoft => "junit_soft",
            TemplateType::Bdd => "bdd",
            TemplateType::BddMethod => "bdd_method",
        }
    }

    /// Human-readable description for the report.
    pub fn description(self) -> &'static str {
        match self {
            TemplateType::AssertionClass => "class assertions",
            TemplateType::HierarchicalConcrete => "hierarchical concrete class assertions",
            TemplateType::HierarchicalAbstract => "hierarchical abstract class assertions",
            TemplateType::Object => "object assertions",
            TemplateType::BooleanPrimitive => "boolean assertions",
            TemplateType::BooleanWrapper => "boolean wrapper assertions",
            TemplateType::Array => "array assertions",
            TemplateType::Iterable => "iterable assertions",
            TemplateType::CharPrimitive => "char assertions",
            TemplateType::Character => "Character assertions",
            TemplateType::RealNumberPrimitive => "real number assertions (float, double)",
            TemplateType::RealNumberWrapper => "real number wrapper assertions (Float, Double)",
            TemplateType::WholeNumberPrimitive => "whole number assertions (int, long, short, byte)",
            TemplateType::WholeNumberWrapper => {
                "whole number has assertions (Integer, Long, Short, Byte)"
            }
            TemplateType::Assertions => "assertions entry point class",
            TemplateType::AssertionMethod => "assertions entry point method",
            TemplateType::Soft => "soft assertions entry point class",
            TemplateType::SoftMethod => "soft assertions entry point method",
            TemplateType::JunitSoft => "junit soft assertions entry point class",
            TemplateType::Bdd => "BDD assertions entry point class",
            TemplateType::BddMethod => "BDD assertions entry point method",
        }
    }

    /// Environment variable carrying this template to the generator command.
    pub fn env_var(self) -> String {
        format!("ASSERTGEN_TEMPLATE_{}", self.identifier().to_uppercase())
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for TemplateType {
    type Err = AssertgenError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        TemplateType::ALL
            .into_iter()
            .find(|t| t.identifier() == wanted)
            .ok_or_else(|| AssertgenError::UnknownTemplate(wanted.to_string()))
    }
}

/// Where a template's text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateOrigin {
    /// Read from this file (resolved against the project root).
    File(PathBuf),
    Inline(String),
}

/// A validated `[templates]` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSpec {
    pub kind: TemplateType,
    pub origin: TemplateOrigin,
}

impl TemplateSpec {
    pub fn file(&self) -> Option<&PathBuf> {
        match &self.origin {
            TemplateOrigin::File(path) => Some(path),
            TemplateOrigin::Inline(_) => None,
        }
    }
}

/// A template with its text loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTemplate {
    pub kind: TemplateType,
    pub content: String,
}

impl LoadedTemplate {
    /// Line registered in the report for user-supplied templates.
    pub fn report_line(&self) -> String {
        format!("'{}' ({})", self.kind.description(), self.kind.identifier())
    }
}

/// Load every template's text.
///
/// An unreadable template file is a configuration error.
pub fn load_templates(fs: &dyn FileSystem, specs: &[TemplateSpec]) -> Result<Vec<LoadedTemplate>> {
    specs
        .iter()
        .map(|spec| {
            let content = match &spec.origin {
                TemplateOrigin::Inline(text) => text.clone(),
                TemplateOrigin::File(path) => fs.read_to_string(path).map_err(|err| {
                    AssertgenError::ConfigError(format!(
                        "template '{}' file {:?} cannot be read: {err}",
                        spec.kind, path
                    ))
                })?,
            };
            debug!(template = %spec.kind, bytes = content.len(), "loaded template");
            Ok(LoadedTemplate {
                kind: spec.kind,
                content,
            })
        })
        .collect()
}
