// src/scan/extract.rs

//! Derive fully-qualified class names from candidate files.
//!
//! Rules, in priority order:
//! 1. Directories yield nothing.
//! 2. Package/module metadata files (`package-info`, `module-info`) yield nothing.
//! 3. `.java` sources: declared package + every top-level type declared.
//! 4. `.class` files: path relative to the owning root, with `/` and `$`
//!    turned into `.`; anonymous/local nested classes (`Outer$1`,
//!    `Outer$1Local`) yield nothing.
//! 5. Any other extension is an error.

use std::fmt;
use std::path::Path;

use crate::errors::{AssertgenError, Result};
use crate::fs::FileSystem;

/// File stems that carry no generatable type.
pub const METADATA_STEMS: [&str; 2] = ["package-info", "module-info"];

pub const SOURCE_EXTENSION: &str = "java";
pub const COMPILED_EXTENSION: &str = "class";

const TYPE_KEYWORDS: [&str; 4] = ["class", "interface", "enum", "record"];

/// A fully-qualified class name split into package and (possibly nested)
/// type name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassName {
    qualified: String,
    package: String,
    type_name: String,
}

impl ClassName {
    /// `package` may be empty (default package); `type_name` may be dotted
    /// for nested types (`Outer.Inner`).
    pub fn new(package: impl Into<String>, type_name: impl Into<String>) -> Self {
        let package = package.into();
        let type_name = type_name.into();
        let qualified = if package.is_empty() {
            type_name.clone()
        } else {
            format!("{package}.{type_name}")
        };
        Self {
            qualified,
            package,
            type_name,
        }
    }

    pub fn qualified(&self) -> &str {
        &self.qualified
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// Type name relative to the package (`Outer.Inner` for nested types).
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Last segment of the type name.
    pub fn simple_name(&self) -> &str {
        self.type_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.type_name)
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified)
    }
}

/// Form of a candidate artifact, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Source,
    Compiled,
}

impl ArtifactKind {
    pub fn for_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        match extension {
            SOURCE_EXTENSION => Ok(ArtifactKind::Source),
            COMPILED_EXTENSION => Ok(ArtifactKind::Compiled),
            other => Err(AssertgenError::UnsupportedExtension {
                path: path.to_path_buf(),
                extension: other.to_string(),
            }),
        }
    }
}

/// Extract the class names a candidate file contributes.
///
/// `source_root` is the root the file was discovered under; compiled files
/// derive their package from their path relative to it.
pub fn extract_class_names(
    fs: &dyn FileSystem,
    path: &Path,
    source_root: &Path,
) -> Result<Vec<ClassName>> {
    if fs.is_dir(path) {
        return Ok(Vec::new());
    }

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    if METADATA_STEMS.contains(&stem) {
        return Ok(Vec::new());
    }

    match ArtifactKind::for_path(path)? {
        ArtifactKind::Source => {
            let text = fs.read_to_string(path)?;
            Ok(names_from_source(&text, stem))
        }
        ArtifactKind::Compiled => {
            let rel = path.strip_prefix(source_root).map_err(|_| {
                AssertgenError::ConfigError(format!(
                    "compiled file {:?} is not under its source root {:?}",
                    path, source_root
                ))
            })?;
            Ok(name_from_compiled(rel).into_iter().collect())
        }
    }
}

/// Names declared by a source file; falls back to `file_stem` when no
/// top-level type declaration is found.
pub fn names_from_source(text: &str, file_stem: &str) -> Vec<ClassName> {
    let cleaned = strip_comments_and_literals(text);
    let tokens = tokenize(&cleaned);
    let (package, mut types) = scan_declarations(&tokens);

    if types.is_empty() {
        types.push(file_stem.to_string());
    }

    types
        .into_iter()
        .map(|t| ClassName::new(package.clone(), t))
        .collect()
}

/// Name of a compiled class file from its root-relative path, or `None` for
/// anonymous and local classes.
pub fn name_from_compiled(rel: &Path) -> Option<ClassName> {
    let stem = rel.file_stem()?.to_str()?;

    let package = rel
        .parent()
        .map(|p| {
            p.components()
                .filter_map(|c| c.as_os_str().to_str())
                .collect::<Vec<_>>()
                .join(".")
        })
        .unwrap_or_default();

    let mut segments = stem.split('$');
    let outer = segments.next().filter(|s| !s.is_empty())?;
    let mut type_name = outer.to_string();
    for nested in segments {
        let synthetic = nested
            .chars()
            .next()
            .is_none_or(|c| c.is_ascii_digit());
        if synthetic {
            return None;
        }
        type_name.push('.');
        type_name.push_str(nested);
    }

    Some(ClassName::new(package, type_name))
}

/// Replace comments and string/char literals with spaces, keeping newlines.
fn strip_comments_and_literals(text: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        LineComment,
        BlockComment,
        Str,
        TextBlock,
        Char,
    }

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut state = State::Code;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match state {
            State::Code => {
                state = match (c, next) {
                    ('/', Some('/')) => State::LineComment,
                    ('/', Some('*')) => State::BlockComment,
                    ('"', Some('"')) if chars.get(i + 2) == Some(&'"') => State::TextBlock,
                    ('"', _) => State::Str,
                    ('\'', _) => State::Char,
                    _ => State::Code,
                };
                match state {
                    State::Code => out.push(c),
                    State::LineComment | State::BlockComment => i += 1,
                    State::TextBlock => i += 2,
                    State::Str | State::Char => {}
                }
                if state != State::Code {
                    // keep tokens on either side of the removed span apart
                    out.push(' ');
                }
            }
            State::LineComment => {
                if c == '\n' {
                    out.push('\n');
                    state = State::Code;
                }
            }
            State::BlockComment => {
                if c == '*' && next == Some('/') {
                    state = State::Code;
                    i += 1;
                } else if c == '\n' {
                    out.push('\n');
                }
            }
            State::Str | State::Char => {
                let close = if state == State::Str { '"' } else { '\'' };
                if c == '\\' {
                    i += 1;
                } else if c == close || c == '\n' {
                    state = State::Code;
                }
            }
            State::TextBlock => {
                if c == '\\' {
                    i += 1;
                } else if c == '"' && next == Some('"') && chars.get(i + 2) == Some(&'"') {
                    state = State::Code;
                    i += 2;
                } else if c == '\n' {
                    out.push('\n');
                }
            }
        }
        i += 1;
    }

    out
}

#[derive(Debug, PartialEq)]
enum Token<'a> {
    Ident(&'a str),
    Punct(char),
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, c) in text.char_indices() {
        let ident_char = c.is_alphanumeric() || c == '_' || c == '$';
        match (start, ident_char) {
            (None, true) => start = Some(idx),
            (Some(s), false) => {
                tokens.push(Token::Ident(&text[s..idx]));
                start = None;
            }
            _ => {}
        }
        if !ident_char && matches!(c, '{' | '}' | ';' | '.' | '@' | '(' | ')' | '<' | '>') {
            tokens.push(Token::Punct(c));
        }
    }
    if let Some(s) = start {
        tokens.push(Token::Ident(&text[s..]));
    }

    tokens
}

/// Walk tokens at brace depth 0 collecting the package and type names.
fn scan_declarations(tokens: &[Token<'_>]) -> (String, Vec<String>) {
    let mut package = String::new();
    let mut types = Vec::new();
    let mut depth: usize = 0;
    let mut i = 0;

    while i < tokens.len() {
        match &tokens[i] {
            Token::Punct('{') => depth += 1,
            Token::Punct('}') => depth = depth.saturating_sub(1),
            Token::Ident(word) if depth == 0 && (*word == "package" || *word == "import") => {
                let mut parts = Vec::new();
                i += 1;
                while i < tokens.len() && tokens[i] != Token::Punct(';') {
                    if let Token::Ident(part) = &tokens[i] {
                        parts.push(*part);
                    }
                    i += 1;
                }
                if *word == "package" && package.is_empty() {
                    package = parts.join(".");
                }
            }
            Token::Ident(word) if depth == 0 && TYPE_KEYWORDS.contains(word) => {
                let after_dot = i > 0 && tokens[i - 1] == Token::Punct('.');
                if let (false, Some(Token::Ident(name))) = (after_dot, tokens.get(i + 1)) {
                    types.push(name.to_string());
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }

    (package, types)
}
