//! Pull-based line supply with one line of pushback.
//!
//! The parser reads compiler output one line at a time through
//! [`LineSource`]. Decoding a diagnostic sometimes reads one line too far
//! (the first line after an indented explanation); that line is handed back
//! with [`LineSource::push_back`] and returned by the next pull.

use std::io::BufRead;

/// A stream of newline-stripped lines with a single pushback slot.
pub trait LineSource {
    /// Next line, or `None` at end of stream.
    fn pull_line(&mut self) -> Option<String>;

    /// Return `line` so the next [`pull_line`](Self::pull_line) yields it.
    ///
    /// # Panics
    ///
    /// Implementations panic if a pushed-back line is already pending.
    fn push_back(&mut self, line: String);
}

/// [`LineSource`] over any iterator of lines.
#[derive(Debug)]
pub struct PushbackLines<I> {
    lines: I,
    slot: Option<String>,
}

impl<I: Iterator<Item = String>> PushbackLines<I> {
    pub fn new(lines: I) -> Self {
        Self { lines, slot: None }
    }

    /// Whether a pushed-back line is waiting.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.slot.is_some()
    }
}

impl<R: BufRead> PushbackLines<ReaderLines<R>> {
    /// Read lines from a buffered reader (a compiler's stdout or stderr).
    pub fn from_reader(reader: R) -> Self {
        Self::new(ReaderLines::new(reader))
    }
}

impl<I: Iterator<Item = String>> LineSource for PushbackLines<I> {
    fn pull_line(&mut self) -> Option<String> {
        self.slot.take().or_else(|| self.lines.next())
    }

    fn push_back(&mut self, line: String) {
        assert!(
            self.slot.is_none(),
            "pushback slot already holds a line; only one line of lookahead is supported"
        );
        self.slot = Some(line);
    }
}

/// Iterator over the lines of a reader.
///
/// - `\n` and a preceding `\r` are stripped.
/// - Bytes that are not UTF-8 are replaced, so a compiler writing in a
///   legacy encoding cannot stall the stream.
/// - A read error ends the stream (logged).
#[derive(Debug)]
pub struct ReaderLines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> ReaderLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for ReaderLines<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(String::from_utf8_lossy(&self.buf).into_owned())
            }
            Err(e) => {
                tracing::warn!("Compiler output read error, treating as end of stream: {e}");
                None
            }
        }
    }
}
