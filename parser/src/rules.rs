//! Pattern registry: the compiler-declared message grammar.
//!
//! The compiler may announce its own message templates at the start of its
//! output in a bootstrap block:
//!
//! ```text
//! __patterns_start
//! PARSING_STARTED=[parsing started {0}]
//! WROTE=[wrote {0}]
//! WARNING=warning:
//! __patterns_end
//! ```
//!
//! Each block replaces the registered rules wholesale. `WARNING` does not
//! produce a rule; it sets the prefix that demotes a located message to a
//! warning.

use tracing::{debug, warn};

use crate::template::{CompiledRule, TemplateError};

/// First line of a bootstrap block.
pub const PATTERNS_START: &str = "__patterns_start";
/// Last line of a bootstrap block.
pub const PATTERNS_END: &str = "__patterns_end";
/// Separates the category from the template in a bootstrap line.
pub const CATEGORY_DIVIDER: char = '=';
/// Prefix of a warning message until a bootstrap block says otherwise.
pub const DEFAULT_WARNING_PREFIX: &str = "warning:";

/// Which file lifecycle step a rule reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleKind {
    Started,
    Completed,
    Wrote,
}

/// What a matched rule does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    FileLifecycle(LifecycleKind),
    Checking,
    Loading,
    Note,
    Statistics,
    Ignored,
}

/// Category of a bootstrap line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Action(ActionKind),
    /// Sets the warning prefix instead of registering a rule.
    Warning,
}

impl Category {
    /// Parse a bootstrap category name. Unknown names yield `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let action = match name {
            "PARSING_STARTED" => ActionKind::FileLifecycle(LifecycleKind::Started),
            "PARSING_COMPLETED" => ActionKind::FileLifecycle(LifecycleKind::Completed),
            "WROTE" => ActionKind::FileLifecycle(LifecycleKind::Wrote),
            "CHECKING" => ActionKind::Checking,
            "LOADING" => ActionKind::Loading,
            "NOTE" => ActionKind::Note,
            "STATISTICS" => ActionKind::Statistics,
            "IGNORED" => ActionKind::Ignored,
            "WARNING" => return Some(Self::Warning),
            _ => return None,
        };
        Some(Self::Action(action))
    }
}

/// A compiled rule and the action it triggers.
#[derive(Debug, Clone)]
pub struct ParserAction {
    kind: ActionKind,
    rule: CompiledRule,
}

impl ParserAction {
    pub fn new(kind: ActionKind, template: &str) -> Result<Self, TemplateError> {
        Ok(Self {
            kind,
            rule: CompiledRule::new(template)?,
        })
    }

    #[must_use]
    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    #[must_use]
    pub fn rule(&self) -> &CompiledRule {
        &self.rule
    }
}

/// Rules being collected from an open bootstrap block.
///
/// Nothing reaches the registry until [`RuleRegistry::install`] is called,
/// so the swap is atomic.
#[derive(Debug, Default)]
pub struct BootstrapBlock {
    actions: Vec<ParserAction>,
    warning_prefix: Option<String>,
}

impl BootstrapBlock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one `CATEGORY=TEMPLATE` line.
    ///
    /// Lines without a divider, unknown categories and templates that fail
    /// to compile are skipped.
    pub fn add_line(&mut self, line: &str) {
        let Some((name, template)) = line.split_once(CATEGORY_DIVIDER) else {
            debug!(line, "Bootstrap line without category divider; skipping");
            return;
        };
        let Some(category) = Category::parse(name.trim()) else {
            debug!(category = name, "Unknown bootstrap category; skipping");
            return;
        };
        match category {
            Category::Warning => {
                let prefix = literal_prefix(template);
                if prefix.trim().is_empty() {
                    debug!(template, "Empty warning prefix in bootstrap block; keeping previous");
                } else {
                    self.warning_prefix = Some(prefix.to_string());
                }
            }
            Category::Action(kind) => match ParserAction::new(kind, template) {
                Ok(action) => self.actions.push(action),
                Err(e) => warn!("Skipping bootstrap rule {name}: {e}"),
            },
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// The literal text of a template up to its first placeholder.
fn literal_prefix(template: &str) -> &str {
    match template.find("{0}") {
        Some(idx) => &template[..idx],
        None => template,
    }
}

/// Ordered set of active rules plus the current warning prefix.
#[derive(Debug)]
pub struct RuleRegistry {
    actions: Vec<ParserAction>,
    warning_prefix: String,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleRegistry {
    /// Empty registry with the default warning prefix.
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            warning_prefix: DEFAULT_WARNING_PREFIX.to_string(),
        }
    }

    /// Replace every rule with those of `block`.
    ///
    /// The warning prefix changes only if the block declared one.
    pub fn install(&mut self, block: BootstrapBlock) {
        debug!(
            rules = block.actions.len(),
            previous = self.actions.len(),
            "Installing bootstrap rules"
        );
        self.actions = block.actions;
        if let Some(prefix) = block.warning_prefix {
            self.warning_prefix = prefix;
        }
    }

    /// Append a single rule after the existing ones.
    pub fn push(&mut self, action: ParserAction) {
        self.actions.push(action);
    }

    /// First rule in registry order that accepts `line`, with its capture.
    #[must_use]
    pub fn first_match<'l>(&self, line: &'l str) -> Option<(ActionKind, Option<&'l str>)> {
        self.actions
            .iter()
            .find_map(|action| action.rule.capture(line).map(|cap| (action.kind, cap)))
    }

    #[must_use]
    pub fn actions(&self) -> &[ParserAction] {
        &self.actions
    }

    #[must_use]
    pub fn warning_prefix(&self) -> &str {
        &self.warning_prefix
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
