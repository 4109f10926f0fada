// src/patterns/filter.rs

//! Include/exclude filters over dotted identifiers.
//!
//! An [`IdentifierFilterSet`] holds two sets of [`CompiledPredicate`]s and is
//! generic over an [`IdentifierDomain`], which says what is being filtered
//! (fully-qualified class names, package names) and how patterns compile.
//!
//! Semantics: `test(id) = include(id) && !exclude(id)` where an empty include
//! set includes everything and an empty exclude set excludes nothing. Excludes
//! always win; there is no "more specific pattern" tie-break.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::errors::{AssertgenError, Result};
use crate::patterns::compiler::{self, NameMatcher};
use crate::scan::ClassName;

/// A compiled pattern that remembers its source string.
///
/// Identity (equality, ordering, hashing) is the pattern string alone, so
/// sets of predicates compare equal whenever their patterns do.
#[derive(Clone)]
pub struct CompiledPredicate {
    pattern: String,
    matcher: NameMatcher,
}

impl CompiledPredicate {
    pub fn compile(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: pattern.to_string(),
            matcher: compiler::compile(pattern)?,
        })
    }

    /// Keep `pattern` as the identity but match with `matcher`.
    pub fn with_matcher(pattern: &str, matcher: NameMatcher) -> Self {
        Self {
            pattern: pattern.to_string(),
            matcher,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn test(&self, name: &str) -> bool {
        self.matcher.matches(name)
    }
}

impl fmt::Debug for CompiledPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CompiledPredicate").field(&self.pattern).finish()
    }
}

impl PartialEq for CompiledPredicate {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for CompiledPredicate {}

impl PartialOrd for CompiledPredicate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CompiledPredicate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.pattern.cmp(&other.pattern)
    }
}

impl Hash for CompiledPredicate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pattern.hash(state);
    }
}

/// What a filter is keyed on, plus how its patterns are compiled.
pub trait IdentifierDomain {
    type Identifier: ?Sized;

    /// Used in logs and the report ("class", "package").
    const LABEL: &'static str;

    /// The dotted name the patterns are evaluated against.
    fn name_of(id: &Self::Identifier) -> &str;

    fn compile(pattern: &str) -> Result<CompiledPredicate> {
        CompiledPredicate::compile(pattern)
    }
}

/// Filters keyed on fully-qualified class names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassNames;

impl IdentifierDomain for ClassNames {
    type Identifier = ClassName;
    const LABEL: &'static str = "class";

    fn name_of(id: &ClassName) -> &str {
        id.qualified()
    }

    /// Nested types are named with dots, so a `$` separator in a pattern
    /// is matched as a dot.
    fn compile(pattern: &str) -> Result<CompiledPredicate> {
        let dotted = pattern.replace('$', ".");
        let matcher = compiler::compile(&dotted).map_err(|err| match err {
            AssertgenError::InvalidPattern { source, .. } => AssertgenError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            },
            other => other,
        })?;
        Ok(CompiledPredicate::with_matcher(pattern, matcher))
    }
}

/// Filters keyed on package names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageNames;

impl IdentifierDomain for PackageNames {
    type Identifier = str;
    const LABEL: &'static str = "package";

    fn name_of(id: &str) -> &str {
        id
    }
}

/// Anything that can become a predicate: a raw pattern (compiled on the
/// spot with the domain's strategy) or an already compiled predicate.
pub trait IntoPredicate {
    fn into_predicate<D: IdentifierDomain>(self) -> Result<CompiledPredicate>;
}

impl IntoPredicate for &str {
    fn into_predicate<D: IdentifierDomain>(self) -> Result<CompiledPredicate> {
        D::compile(self)
    }
}

impl IntoPredicate for String {
    fn into_predicate<D: IdentifierDomain>(self) -> Result<CompiledPredicate> {
        D::compile(&self)
    }
}

impl IntoPredicate for &String {
    fn into_predicate<D: IdentifierDomain>(self) -> Result<CompiledPredicate> {
        D::compile(self)
    }
}

impl IntoPredicate for CompiledPredicate {
    fn into_predicate<D: IdentifierDomain>(self) -> Result<CompiledPredicate> {
        Ok(self)
    }
}

/// Version of the [`FilterState`] layout.
pub const FILTER_STATE_VERSION: u32 = 1;

/// Persistable form of a filter: sorted, de-duplicated pattern strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub version: u32,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            version: FILTER_STATE_VERSION,
            includes: Vec::new(),
            excludes: Vec::new(),
        }
    }
}

/// Include/exclude predicate sets for one identifier domain.
pub struct IdentifierFilterSet<D: IdentifierDomain> {
    includes: BTreeSet<CompiledPredicate>,
    excludes: BTreeSet<CompiledPredicate>,
    _domain: PhantomData<fn() -> D>,
}

pub type ClassFilter = IdentifierFilterSet<ClassNames>;
pub type PackageFilter = IdentifierFilterSet<PackageNames>;

impl<D: IdentifierDomain> IdentifierFilterSet<D> {
    pub fn new() -> Self {
        Self {
            includes: BTreeSet::new(),
            excludes: BTreeSet::new(),
            _domain: PhantomData,
        }
    }

    /// Build a filter straight from include/exclude pattern lists.
    pub fn from_patterns<I, E>(includes: I, excludes: E) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: IntoPredicate,
        E: IntoIterator,
        E::Item: IntoPredicate,
    {
        let mut filter = Self::new();
        filter.set_includes(includes)?;
        filter.set_excludes(excludes)?;
        Ok(filter)
    }

    /// Replace the include set.
    pub fn set_includes<I>(&mut self, includes: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: IntoPredicate,
    {
        self.includes = compile_all::<D, _>(includes)?;
        Ok(self)
    }

    /// Replace the exclude set.
    pub fn set_excludes<I>(&mut self, excludes: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: IntoPredicate,
    {
        self.excludes = compile_all::<D, _>(excludes)?;
        Ok(self)
    }

    /// Union `includes` into the include set.
    pub fn include<I>(&mut self, includes: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: IntoPredicate,
    {
        let compiled = compile_all::<D, _>(includes)?;
        self.includes.extend(compiled);
        Ok(self)
    }

    /// Union `excludes` into the exclude set.
    pub fn exclude<I>(&mut self, excludes: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: IntoPredicate,
    {
        let compiled = compile_all::<D, _>(excludes)?;
        self.excludes.extend(compiled);
        Ok(self)
    }

    /// Combined inclusion test for an identifier of this domain.
    pub fn test(&self, id: &D::Identifier) -> bool {
        self.test_name(D::name_of(id))
    }

    /// Same as [`test`](Self::test), on the raw dotted name.
    pub fn test_name(&self, name: &str) -> bool {
        self.is_included(name) && !self.is_excluded(name)
    }

    fn is_included(&self, name: &str) -> bool {
        self.includes.is_empty() || self.includes.iter().any(|p| p.test(name))
    }

    fn is_excluded(&self, name: &str) -> bool {
        !self.excludes.is_empty() && self.excludes.iter().any(|p| p.test(name))
    }

    pub fn include_patterns(&self) -> impl Iterator<Item = &str> {
        self.includes.iter().map(CompiledPredicate::pattern)
    }

    pub fn exclude_patterns(&self) -> impl Iterator<Item = &str> {
        self.excludes.iter().map(CompiledPredicate::pattern)
    }

    /// True when neither set restricts anything.
    pub fn is_unrestricted(&self) -> bool {
        self.includes.is_empty() && self.excludes.is_empty()
    }

    /// Include patterns that match none of `names`.
    pub fn unmatched_includes<'a, I>(&self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: Vec<&str> = names.into_iter().collect();
        self.includes
            .iter()
            .filter(|p| !names.iter().any(|n| p.test(n)))
            .map(|p| p.pattern().to_string())
            .collect()
    }

    /// Persistable state; independent of the order patterns were added in.
    pub fn state(&self) -> FilterState {
        FilterState {
            version: FILTER_STATE_VERSION,
            includes: self.include_patterns().map(str::to_string).collect(),
            excludes: self.exclude_patterns().map(str::to_string).collect(),
        }
    }

    /// Rebuild a filter from its persisted state.
    pub fn from_state(state: &FilterState) -> Result<Self> {
        if state.version != FILTER_STATE_VERSION {
            return Err(AssertgenError::ConfigError(format!(
                "unsupported {} filter state version {} (expected {})",
                D::LABEL,
                state.version,
                FILTER_STATE_VERSION
            )));
        }
        Self::from_patterns(&state.includes, &state.excludes)
    }
}

fn compile_all<D, I>(patterns: I) -> Result<BTreeSet<CompiledPredicate>>
where
    D: IdentifierDomain,
    I: IntoIterator,
    I::Item: IntoPredicate,
{
    patterns
        .into_iter()
        .map(|p| p.into_predicate::<D>())
        .collect()
}

impl<D: IdentifierDomain> Default for IdentifierFilterSet<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: IdentifierDomain> Clone for IdentifierFilterSet<D> {
    fn clone(&self) -> Self {
        Self {
            includes: self.includes.clone(),
            excludes: self.excludes.clone(),
            _domain: PhantomData,
        }
    }
}

impl<D: IdentifierDomain> PartialEq for IdentifierFilterSet<D> {
    fn eq(&self, other: &Self) -> bool {
        self.includes == other.includes && self.excludes == other.excludes
    }
}

impl<D: IdentifierDomain> Eq for IdentifierFilterSet<D> {}

impl<D: IdentifierDomain> fmt::Debug for IdentifierFilterSet<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentifierFilterSet")
            .field("domain", &D::LABEL)
            .field("includes", &self.state().includes)
            .field("excludes", &self.state().excludes)
            .finish()
    }
}
