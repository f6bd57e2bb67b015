//! Path decoding for file lifecycle messages.
//!
//! Lifecycle templates capture whatever the compiler prints for a file,
//! which is not always a plain path:
//!
//! - `RegularFileObject[C:\work\src\A.java]`: file-object decorations
//! - `out/production/app:org/example/Main.class`: module-qualified output
//! - backslash separators on Windows
//!
//! [`decode_path`] strips the decoration, turns a module separator into a
//! path separator, normalizes to forward slashes and classifies the result
//! by extension.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::ParserConfig;

static DECORATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+\[(.+)\]$").expect("decoration pattern is valid"));

/// What a decoded path refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A compiler input.
    Source,
    /// A file the compiler generated.
    Artifact,
    Other,
}

/// A canonical forward-slash path and its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPath {
    path: String,
    kind: FileKind,
}

impl DecodedPath {
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// Last path component.
    #[must_use]
    pub fn file_name(&self) -> &str {
        file_name(&self.path)
    }

    #[must_use]
    pub fn into_path(self) -> String {
        self.path
    }
}

/// Decode a captured path fragment and classify it.
#[must_use]
pub fn decode_path(fragment: &str, config: &ParserConfig) -> DecodedPath {
    let path = normalize_path(fragment);
    let kind = classify(&path, config);
    DecodedPath { path, kind }
}

/// Unwrap, de-modularize and forward-slash a path fragment.
#[must_use]
pub fn normalize_path(fragment: &str) -> String {
    let fragment = fragment.trim();
    let unwrapped = DECORATION
        .captures(fragment)
        .and_then(|caps| caps.get(1))
        .map_or(fragment, |m| m.as_str());

    let mut path = unwrapped.to_string();
    if let Some(idx) = module_separator(&path) {
        path.replace_range(idx..=idx, "/");
    }
    path.replace('\\', "/")
}

/// Byte index of the last `:` when it separates a module from a path.
///
/// A colon followed by a path separator is a drive letter (`C:/`, `C:\`)
/// and is left alone.
fn module_separator(path: &str) -> Option<usize> {
    let idx = path.rfind(':')?;
    match path[idx + 1..].chars().next() {
        Some('/' | '\\') | None => None,
        Some(_) => Some(idx),
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn extension(path: &str) -> Option<&str> {
    let name = file_name(path);
    name.rfind('.').map(|idx| &name[idx + 1..])
}

/// Classify a forward-slash path by its extension.
#[must_use]
pub fn classify(path: &str, config: &ParserConfig) -> FileKind {
    match extension(path) {
        Some(ext) if ext.eq_ignore_ascii_case(&config.source_extension) => FileKind::Source,
        Some(ext) if ext.eq_ignore_ascii_case(&config.artifact_extension) => FileKind::Artifact,
        _ => FileKind::Other,
    }
}
