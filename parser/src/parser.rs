//! Diagnostic aggregator: turns compiler output lines into events.
//!
//! Each call to [`DiagnosticParser::process_next`] pulls one line and tries,
//! in order:
//!
//! 1. the bootstrap sentinel, which loads a new rule set,
//! 2. the registered rules (first match wins),
//! 3. a literal `error:` / `warning:` / `javac:` / `Caused by:` prefix,
//! 4. `path:line: message`, followed by source excerpt and caret lines,
//! 5. the out-of-memory sentinel,
//! 6. plain pass-through as an info diagnostic.
//!
//! Step 4 may pull more lines: everything up to the caret line, then any
//! indented explanation. The first line that does not belong to the
//! diagnostic is pushed back for the next call.

use caret_types::{Diagnostic, Location, Severity, display_column};
use tracing::{debug, trace};

use crate::location::{FileKind, decode_path};
use crate::probe::{FileProbe, FsProbe};
use crate::rules::{ActionKind, BootstrapBlock, PATTERNS_END, PATTERNS_START, RuleRegistry};
use crate::sink::EventSink;
use crate::source::LineSource;
use crate::types::ParserConfig;

/// A line ending with this text reports a compiler out-of-memory crash.
pub const OUT_OF_MEMORY_MARKER: &str = "java.lang.OutOfMemoryError";

/// Message of the diagnostic emitted for [`OUT_OF_MEMORY_MARKER`].
pub const OUT_OF_MEMORY_MESSAGE: &str =
    "Out of memory. Increase the maximum heap size of the compiler process.";

/// Prefixes (before the first colon) of single-line errors.
const ERROR_PREFIXES: [&str; 3] = ["error", "caused by", "javac"];

const WARNING_LABEL: &str = "warning";

/// Line counts for a complete run over a stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Lines processed as the start of a logical unit.
    pub lines: usize,
    /// Of those, lines whose decoding was abandoned.
    pub unhandled: usize,
}

/// A located diagnostic waiting for its caret line.
struct Continuation {
    file: String,
    line: u32,
    severity: Severity,
    /// Message lines collected so far.
    messages: Vec<String>,
    /// Most recent line; becomes the source excerpt if the caret follows.
    excerpt: Option<String>,
}

impl Continuation {
    fn finish(self, col: u32) -> Diagnostic {
        Diagnostic::at(
            self.severity,
            self.messages.join("\n"),
            Location::new(self.file, self.line, col),
        )
    }
}

/// Per-invocation decoder for one compiler's output.
///
/// Create one per compiler run and drop it afterwards; it carries the rule
/// set announced by that run's bootstrap block.
#[derive(Debug)]
pub struct DiagnosticParser<P = FsProbe> {
    config: ParserConfig,
    registry: RuleRegistry,
    probe: P,
}

impl DiagnosticParser<FsProbe> {
    /// Parser that checks reported paths against the current directory.
    #[must_use]
    pub fn new(config: ParserConfig) -> Self {
        Self::with_probe(config, FsProbe::new())
    }
}

impl<P: FileProbe> DiagnosticParser<P> {
    pub fn with_probe(config: ParserConfig, probe: P) -> Self {
        Self {
            config,
            registry: RuleRegistry::new(),
            probe,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Mutable access for callers that seed rules before the stream starts.
    pub fn registry_mut(&mut self) -> &mut RuleRegistry {
        &mut self.registry
    }

    /// Pull and decode one logical unit.
    ///
    /// Returns `None` at end of stream, otherwise whether the line was
    /// handled. `Some(false)` means a located diagnostic was abandoned
    /// (stream ended, or an out-of-memory line arrived, before its caret).
    pub fn process_next<S, K>(&mut self, source: &mut S, sink: &mut K) -> Option<bool>
    where
        S: LineSource + ?Sized,
        K: EventSink + ?Sized,
    {
        let line = source.pull_line()?;
        Some(self.process_line(line, source, sink))
    }

    /// Decode the whole stream.
    pub fn run<S, K>(&mut self, source: &mut S, sink: &mut K) -> RunStats
    where
        S: LineSource + ?Sized,
        K: EventSink + ?Sized,
    {
        let mut stats = RunStats::default();
        while let Some(handled) = self.process_next(source, sink) {
            stats.lines += 1;
            if !handled {
                stats.unhandled += 1;
            }
        }
        debug!(
            lines = stats.lines,
            unhandled = stats.unhandled,
            "Compiler output consumed"
        );
        stats
    }

    fn process_line<S, K>(&mut self, line: String, source: &mut S, sink: &mut K) -> bool
    where
        S: LineSource + ?Sized,
        K: EventSink + ?Sized,
    {
        if line.trim() == PATTERNS_START {
            self.load_bootstrap(source);
            return true;
        }

        if let Some((kind, capture)) = self.registry.first_match(&line) {
            self.execute(kind, capture, &line, sink);
            return true;
        }

        if let Some(handled) = self.decode_prefixed(&line, source, sink) {
            return handled;
        }

        if line.ends_with(OUT_OF_MEMORY_MARKER) {
            sink.on_diagnostic(Diagnostic::error(OUT_OF_MEMORY_MESSAGE));
            return true;
        }

        sink.on_diagnostic(Diagnostic::info(line));
        true
    }

    fn load_bootstrap<S: LineSource + ?Sized>(&mut self, source: &mut S) {
        let mut block = BootstrapBlock::new();
        loop {
            match source.pull_line() {
                Some(line) if line.trim() == PATTERNS_END => break,
                Some(line) => block.add_line(&line),
                None => {
                    debug!(
                        rules = block.len(),
                        "Stream ended inside bootstrap block; installing what was read"
                    );
                    break;
                }
            }
        }
        self.registry.install(block);
    }

    fn execute<K: EventSink + ?Sized>(
        &self,
        kind: ActionKind,
        capture: Option<&str>,
        line: &str,
        sink: &mut K,
    ) {
        match kind {
            ActionKind::FileLifecycle(step) => {
                let Some(fragment) = capture else {
                    trace!(?step, line, "Lifecycle rule without a path capture");
                    return;
                };
                let decoded = decode_path(fragment, &self.config);
                match decoded.kind() {
                    FileKind::Source => {
                        sink.on_file_processing(decoded.path());
                        sink.on_progress_text(&format!("Parsing {}", decoded.file_name()));
                    }
                    FileKind::Artifact => sink.on_file_generated(decoded.path()),
                    FileKind::Other => {
                        trace!(?step, path = decoded.path(), "Lifecycle path ignored");
                    }
                }
            }
            ActionKind::Checking => {
                sink.on_progress_text(&format!("Checking {}", capture.unwrap_or(line).trim()));
            }
            ActionKind::Loading => sink.on_progress_text("Loading classes"),
            ActionKind::Note => sink.on_diagnostic(Diagnostic::info(capture.unwrap_or(line).trim())),
            ActionKind::Statistics | ActionKind::Ignored => {
                trace!(?kind, line, "Rule matched; no event");
            }
        }
    }

    /// Steps 3 and 4. `None` means neither interpretation applies.
    fn decode_prefixed<S, K>(&self, line: &str, source: &mut S, sink: &mut K) -> Option<bool>
    where
        S: LineSource + ?Sized,
        K: EventSink + ?Sized,
    {
        let first = line.find(':')?;
        // A colon at index 1 is a drive letter; the label ends at the next one.
        let colon1 = if first == 1 {
            first + 1 + line[first + 1..].find(':')?
        } else {
            first
        };

        let head = line[..colon1].trim();
        let rest = &line[colon1 + 1..];
        if ERROR_PREFIXES.iter().any(|p| head.eq_ignore_ascii_case(p)) {
            sink.on_diagnostic(Diagnostic::error(rest.trim()));
            return Some(true);
        }
        if head.eq_ignore_ascii_case(WARNING_LABEL) {
            sink.on_diagnostic(Diagnostic::warning(rest.trim()));
            return Some(true);
        }

        let colon2 = colon1 + 1 + rest.find(':')?;
        let file = head.replace('\\', "/");
        if !self.probe.exists(&file) {
            trace!(%file, "Prefix is not an existing file");
            return None;
        }
        let Ok(line_number) = line[colon1 + 1..colon2].trim().parse::<u32>() else {
            trace!(line, "No line number between colons");
            return None;
        };

        let message = line[colon2 + 1..].trim();
        let (severity, message) = match message.strip_prefix(self.registry.warning_prefix()) {
            Some(stripped) => (Severity::Warning, stripped.trim()),
            None => (Severity::Error, message),
        };

        let pending = Continuation {
            file,
            line: line_number,
            severity,
            messages: vec![message.to_string()],
            excerpt: None,
        };
        Some(self.accumulate(pending, line, source, sink))
    }

    /// Collect lines until the caret, then emit the diagnostic.
    fn accumulate<S, K>(
        &self,
        mut pending: Continuation,
        header: &str,
        source: &mut S,
        sink: &mut K,
    ) -> bool
    where
        S: LineSource + ?Sized,
        K: EventSink + ?Sized,
    {
        loop {
            let Some(next) = source.pull_line() else {
                debug!(
                    file = %pending.file,
                    line = pending.line,
                    "Stream ended before caret line; dropping diagnostic"
                );
                return false;
            };

            if next.ends_with(OUT_OF_MEMORY_MARKER) {
                debug!(
                    file = %pending.file,
                    line = pending.line,
                    "Out-of-memory report interrupted diagnostic; dropping it"
                );
                source.push_back(next);
                return false;
            }

            if next.trim() == "^" {
                let excerpt = pending.excerpt.as_deref().unwrap_or(header);
                let caret = next.chars().position(|c| c == '^').unwrap_or(0);
                let col = display_column(excerpt, caret, self.config.tab_width);
                collect_explanation(&mut pending.messages, source);
                merge_symbol_line(&mut pending.messages);
                trace!(file = %pending.file, line = pending.line, col, "Diagnostic complete");
                sink.on_diagnostic(pending.finish(col));
                return true;
            }

            if let Some(previous) = pending.excerpt.replace(next) {
                pending.messages.push(previous);
            }
        }
    }
}

/// Append indented lines after the caret; push back the first other line.
fn collect_explanation<S: LineSource + ?Sized>(messages: &mut Vec<String>, source: &mut S) {
    while let Some(next) = source.pull_line() {
        if next.starts_with(char::is_whitespace) && !next.ends_with(OUT_OF_MEMORY_MARKER) {
            messages.push(next.trim().to_string());
        } else {
            source.push_back(next);
            break;
        }
    }
}

/// `["cannot resolve symbol", "symbol  : class Foo"]` becomes
/// `["cannot resolve symbol class Foo"]`. Applies to exactly two lines.
fn merge_symbol_line(messages: &mut Vec<String>) {
    if messages.len() != 2 {
        return;
    }
    let Some((label, value)) = messages[1].split_once(':') else {
        return;
    };
    if label.trim() != "symbol" {
        return;
    }
    let value = value.trim().to_string();
    messages.truncate(1);
    messages[0].push(' ');
    messages[0].push_str(&value);
}
