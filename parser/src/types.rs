//! Public configuration consumed by the parser.

use serde::Deserialize;

/// Default tab width for caret-column computation.
pub const DEFAULT_TAB_WIDTH: u32 = 4;

/// Tunables for one parser instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Columns per tab stop when resolving caret lines. Default: 4.
    pub tab_width: u32,
    /// Extension of compiler inputs (without the dot). Default: "java".
    pub source_extension: String,
    /// Extension of compiler outputs (without the dot). Default: "class".
    pub artifact_extension: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            source_extension: "java".to_string(),
            artifact_extension: "class".to_string(),
        }
    }
}

impl ParserConfig {
    #[must_use]
    pub fn with_tab_width(mut self, tab_width: u32) -> Self {
        self.tab_width = tab_width;
        self
    }

    #[must_use]
    pub fn with_extensions(mut self, source: impl Into<String>, artifact: impl Into<String>) -> Self {
        self.source_extension = source.into();
        self.artifact_extension = artifact.into();
        self
    }
}
