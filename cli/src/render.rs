//! Output rendering for decoded events.

use std::io::{self, Write};

use caret_config::OutputFormat;
use caret_parser::{RunStats, Summary};
use caret_types::CompilerEvent;

/// Writes one line per event in the chosen format.
pub struct Renderer<W> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn render(&mut self, event: &CompilerEvent) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{}", text_line(event)),
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, event)?;
                writeln!(self.out)
            }
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Human-readable form of one event. Diagnostics follow the
/// `path:line:col: severity: message` convention editors understand.
#[must_use]
pub fn text_line(event: &CompilerEvent) -> String {
    match event {
        CompilerEvent::FileProcessing { path } => format!("processing: {path}"),
        CompilerEvent::FileGenerated { path } => format!("generated: {path}"),
        CompilerEvent::Progress { text } => format!("progress: {text}"),
        CompilerEvent::Diagnostic(diag) => diag.to_string(),
    }
}

/// Stderr line printed after a run.
#[must_use]
pub fn summary_line(summary: &Summary, stats: RunStats) -> String {
    let mut line = format!(
        "{} I:{} | {} processed, {} generated",
        summary.status_string(),
        summary.infos,
        summary.files_processed,
        summary.files_generated
    );
    if stats.unhandled > 0 {
        line.push_str(&format!(" | {} incomplete", stats.unhandled));
    }
    line
}
