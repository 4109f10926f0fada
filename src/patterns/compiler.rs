// src/patterns/compiler.rs

//! Compiles dotted-name patterns into anchored regular expressions.
//!
//! Dialect:
//! - `.` and `$` are literal separators.
//! - `*` matches one non-empty segment of word characters (never a dot).
//! - `**` matches any run of word characters and dots, possibly empty, so
//!   `a.b**` matches `a.b`, `a.bxyz` and `a.b.c.D`.
//!
//! The whole name must match; substrings never do.

use std::fmt;

use regex::Regex;

use crate::errors::{AssertgenError, Result};

// Placeholders must not contain `*`, `.` or `$`.
const MULTI_SEGMENT_MARKER: &str = "\u{0}MULTI\u{0}";
const SINGLE_SEGMENT_MARKER: &str = "\u{0}SINGLE\u{0}";

const MULTI_SEGMENT_REGEX: &str = "[A-Za-z0-9_.]*";
const SINGLE_SEGMENT_REGEX: &str = "[A-Za-z0-9_]+";

/// A compiled name pattern.
#[derive(Clone)]
pub struct NameMatcher {
    regex: Regex,
}

impl NameMatcher {
    /// Returns true if the entire `name` matches.
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// The generated regular expression, for diagnostics.
    pub fn as_regex_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl fmt::Debug for NameMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NameMatcher")
            .field(&self.regex.as_str())
            .finish()
    }
}

/// Translate `pattern` into the regex source it compiles to.
pub fn pattern_to_regex(pattern: &str) -> String {
    let escaped = pattern.replace('.', "\\.").replace('$', "\\$");

    // `**` first, otherwise each half would be taken as a single wildcard.
    let with_markers = escaped
        .replace("**", MULTI_SEGMENT_MARKER)
        .replace('*', SINGLE_SEGMENT_MARKER);

    let body = with_markers
        .replace(MULTI_SEGMENT_MARKER, MULTI_SEGMENT_REGEX)
        .replace(SINGLE_SEGMENT_MARKER, SINGLE_SEGMENT_REGEX);

    format!("^(?:{body})$")
}

/// Compile a single name pattern.
///
/// Fails with [`AssertgenError::InvalidPattern`] naming the pattern when the
/// translated expression is not a valid regex (e.g. unbalanced parentheses).
pub fn compile(pattern: &str) -> Result<NameMatcher> {
    let source = pattern_to_regex(pattern);
    let regex = Regex::new(&source).map_err(|source| AssertgenError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    Ok(NameMatcher { regex })
}
