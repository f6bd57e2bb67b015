//! Core domain types for caret.
//!
//! This crate contains the diagnostic and event types shared by the parser,
//! the configuration layer and the command-line front end. No IO, no
//! parsing state.

mod text;
pub use text::display_column;

use std::fmt;

use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

// ============================================================================
// Severity
// ============================================================================

/// Severity of a compiler diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    #[must_use]
    pub fn is_error(self) -> bool {
        self == Self::Error
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Location
// ============================================================================

/// Source position a diagnostic points at.
///
/// The column is stored 0-based; [`Location::column`] and serialization
/// expose it 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    file: String,
    /// Line number as reported by the compiler.
    line: u32,
    /// 0-indexed display column.
    col: u32,
}

impl Location {
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32, col: u32) -> Self {
        Self {
            file: file.into(),
            line,
            col,
        }
    }

    /// Forward-slash path of the reported file.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// 0-indexed column.
    #[must_use]
    pub fn col(&self) -> u32 {
        self.col
    }

    /// 1-indexed column, as presented to users.
    #[must_use]
    pub fn column(&self) -> u32 {
        self.col + 1
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Location", 3)?;
        state.serialize_field("file", &self.file)?;
        state.serialize_field("line", &self.line)?;
        state.serialize_field("column", &self.column())?;
        state.end()
    }
}

// ============================================================================
// Diagnostic
// ============================================================================

/// A complete compiler message: severity, text and optional location.
///
/// Multi-line messages are joined with `'\n'`. Diagnostics are only ever
/// constructed whole; there is no partially-built state visible outside the
/// parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    severity: Severity,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<Location>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            location: None,
        }
    }

    #[must_use]
    pub fn at(severity: Severity, message: impl Into<String>, location: Location) -> Self {
        Self {
            severity,
            message: message.into(),
            location: Some(location),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    #[must_use]
    pub fn file(&self) -> Option<&str> {
        self.location.as_ref().map(Location::file)
    }

    #[must_use]
    pub fn line(&self) -> Option<u32> {
        self.location.as_ref().map(Location::line)
    }

    /// 1-indexed column, if the diagnostic has a location.
    #[must_use]
    pub fn column(&self) -> Option<u32> {
        self.location.as_ref().map(Location::column)
    }
}

/// Formats as `file:line:col: severity: message` (column 1-indexed), or
/// `severity: message` without a location. Continuation lines of the
/// message are indented by two spaces.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{}:{}:{}: ", loc.file, loc.line, loc.column())?;
        }
        write!(f, "{}: ", self.severity)?;
        let mut lines = self.message.split('\n');
        if let Some(first) = lines.next() {
            f.write_str(first)?;
        }
        for line in lines {
            write!(f, "\n  {line}")?;
        }
        Ok(())
    }
}

// ============================================================================
// Compiler events
// ============================================================================

/// One decoded event from a compiler output stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompilerEvent {
    /// A source file started or finished processing.
    FileProcessing { path: String },
    /// The compiler wrote a generated artifact.
    FileGenerated { path: String },
    /// Free-form progress text ("Parsing Main.java").
    Progress { text: String },
    Diagnostic(Diagnostic),
}

impl CompilerEvent {
    #[must_use]
    pub fn as_diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Self::Diagnostic(diag) => Some(diag),
            _ => None,
        }
    }
}
