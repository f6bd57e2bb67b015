//! Message template compilation.
//!
//! Compilers describe their messages as templates: literal text with ordinal
//! placeholders (`[parsing started {0}]`). [`compile_template`] turns one into
//! a case-insensitive, whole-line [`Regex`] with one greedy capture group per
//! placeholder.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use thiserror::Error;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\d+\}").expect("placeholder pattern is valid"));

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template {template:?} does not compile to a valid pattern")]
    Pattern {
        template: String,
        #[source]
        source: regex::Error,
    },
}

/// Compile a message template into a whole-line matcher.
///
/// Literal text is escaped; each `{n}` becomes `(.+)`.
pub fn compile_template(template: &str) -> Result<Regex, TemplateError> {
    let mut pattern = String::with_capacity(template.len() + 8);
    pattern.push_str("^(?:");
    let mut last = 0;
    for placeholder in PLACEHOLDER.find_iter(template) {
        pattern.push_str(&regex::escape(&template[last..placeholder.start()]));
        pattern.push_str("(.+)");
        last = placeholder.end();
    }
    pattern.push_str(&regex::escape(&template[last..]));
    pattern.push_str(")$");

    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| TemplateError::Pattern {
            template: template.to_string(),
            source,
        })
}

/// A compiled template: the matcher plus the text it was built from.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    template: String,
    matcher: Regex,
}

impl CompiledRule {
    pub fn new(template: &str) -> Result<Self, TemplateError> {
        Ok(Self {
            template: template.to_string(),
            matcher: compile_template(template)?,
        })
    }

    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[must_use]
    pub fn is_match(&self, line: &str) -> bool {
        self.matcher.is_match(line)
    }

    /// Match `line` and return the first placeholder's capture.
    ///
    /// Returns `None` when the line does not match, `Some(None)` when it
    /// matches a template without placeholders.
    #[must_use]
    pub fn capture<'l>(&self, line: &'l str) -> Option<Option<&'l str>> {
        let caps = self.matcher.captures(line)?;
        Some(caps.get(1).map(|m| m.as_str()))
    }
}
