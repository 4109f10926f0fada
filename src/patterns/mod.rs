// src/patterns/mod.rs

//! Name-pattern filtering over fully-qualified class and package names.
//!
//! - [`compiler`] turns `*` / `**` patterns into anchored matchers.
//! - [`filter`] combines include/exclude predicate sets per identifier domain.

pub mod compiler;
pub mod filter;

pub use compiler::{compile, NameMatcher};
pub use filter::{
    ClassFilter, ClassNames, CompiledPredicate, FilterState, IdentifierDomain,
    IdentifierFilterSet, IntoPredicate, PackageFilter, PackageNames,
};
