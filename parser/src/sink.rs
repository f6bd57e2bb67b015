//! Event sinks, where decoded events go.

use caret_types::{CompilerEvent, Diagnostic, Severity};

/// Receiver for decoded compiler events.
///
/// Calls are push-style and made in stream order. The parser does no
/// buffering or retry on the sink's behalf.
pub trait EventSink {
    /// A source file started or finished processing.
    fn on_file_processing(&mut self, path: &str);
    /// The compiler wrote an artifact.
    fn on_file_generated(&mut self, path: &str);
    fn on_progress_text(&mut self, text: &str);
    fn on_diagnostic(&mut self, diagnostic: Diagnostic);
}

/// Forwards every event, as a [`CompilerEvent`], to a closure.
pub struct FnSink<F>(pub F);

impl<F: FnMut(CompilerEvent)> EventSink for FnSink<F> {
    fn on_file_processing(&mut self, path: &str) {
        (self.0)(CompilerEvent::FileProcessing {
            path: path.to_string(),
        });
    }

    fn on_file_generated(&mut self, path: &str) {
        (self.0)(CompilerEvent::FileGenerated {
            path: path.to_string(),
        });
    }

    fn on_progress_text(&mut self, text: &str) {
        (self.0)(CompilerEvent::Progress {
            text: text.to_string(),
        });
    }

    fn on_diagnostic(&mut self, diagnostic: Diagnostic) {
        (self.0)(CompilerEvent::Diagnostic(diagnostic));
    }
}

/// Collects events in arrival order.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<CompilerEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an already-built event.
    pub fn record(&mut self, event: CompilerEvent) {
        self.events.push(event);
    }

    #[must_use]
    pub fn events(&self) -> &[CompilerEvent] {
        &self.events
    }

    #[must_use]
    pub fn into_events(self) -> Vec<CompilerEvent> {
        self.events
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.events.iter().filter_map(CompilerEvent::as_diagnostic)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Counts computed from the recorded events.
    #[must_use]
    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for event in &self.events {
            summary.count(event);
        }
        summary
    }
}

impl EventSink for EventLog {
    fn on_file_processing(&mut self, path: &str) {
        self.record(CompilerEvent::FileProcessing {
            path: path.to_string(),
        });
    }

    fn on_file_generated(&mut self, path: &str) {
        self.record(CompilerEvent::FileGenerated {
            path: path.to_string(),
        });
    }

    fn on_progress_text(&mut self, text: &str) {
        self.record(CompilerEvent::Progress {
            text: text.to_string(),
        });
    }

    fn on_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.record(CompilerEvent::Diagnostic(diagnostic));
    }
}

/// Event counts for one compiler run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub files_processed: usize,
    pub files_generated: usize,
}

impl Summary {
    /// Add one event to the counts.
    pub fn count(&mut self, event: &CompilerEvent) {
        match event {
            CompilerEvent::FileProcessing { .. } => self.files_processed += 1,
            CompilerEvent::FileGenerated { .. } => self.files_generated += 1,
            CompilerEvent::Progress { .. } => {}
            CompilerEvent::Diagnostic(diag) => match diag.severity() {
                Severity::Error => self.errors += 1,
                Severity::Warning => self.warnings += 1,
                Severity::Info => self.infos += 1,
            },
        }
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Compact status string like "E:3 W:5".
    #[must_use]
    pub fn status_string(&self) -> String {
        format!("E:{} W:{}", self.errors, self.warnings)
    }
}
