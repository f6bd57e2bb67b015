//! Streaming decoder for compiler output.
//!
//! Feed the lines a compiler prints (through a [`LineSource`]) into a
//! [`DiagnosticParser`] and receive structured events on an [`EventSink`]:
//! located diagnostics, progress text and file lifecycle notifications.
//!
//! The compiler's message grammar is not hard-coded. A wrapper around the
//! compiler prints a bootstrap block bracketed by [`PATTERNS_START`] and
//! [`PATTERNS_END`], one `CATEGORY=template` line per message kind, and the
//! parser compiles those templates into its [`RuleRegistry`].
//!
//! ```
//! use caret_parser::{DiagnosticParser, EventLog, ParserConfig, PushbackLines};
//!
//! let output = "warning: [options] bootstrap class path not set\n1 warning\n";
//! let mut source = PushbackLines::from_reader(output.as_bytes());
//! let mut log = EventLog::new();
//! let mut parser = DiagnosticParser::new(ParserConfig::default());
//! parser.run(&mut source, &mut log);
//! assert_eq!(log.summary().warnings, 1);
//! ```

mod location;
mod parser;
mod probe;
mod rules;
mod sink;
mod source;
mod template;
mod types;

pub use location::{DecodedPath, FileKind, classify, decode_path, normalize_path};
pub use parser::{DiagnosticParser, OUT_OF_MEMORY_MARKER, OUT_OF_MEMORY_MESSAGE, RunStats};
pub use probe::{FileProbe, FsProbe};
pub use rules::{
    ActionKind, BootstrapBlock, CATEGORY_DIVIDER, Category, DEFAULT_WARNING_PREFIX, LifecycleKind,
    PATTERNS_END, PATTERNS_START, ParserAction, RuleRegistry,
};
pub use sink::{EventLog, EventSink, FnSink, Summary};
pub use source::{LineSource, PushbackLines, ReaderLines};
pub use template::{CompiledRule, TemplateError, compile_template};
pub use types::{DEFAULT_TAB_WIDTH, ParserConfig};

pub use caret_types::{CompilerEvent, Diagnostic, Location, Severity};
