//! Shared test utilities and fixtures
//!
//! Compiler transcripts and helpers for decoding them in-process or through
//! the `caret` binary.

#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use caret_parser::{
    CompilerEvent, DiagnosticParser, EventLog, FileProbe, ParserConfig, PushbackLines, RunStats,
};

/// Bootstrap block a javac wrapper prints before compiling.
pub const JAVAC_BOOTSTRAP: &str = "\
__patterns_start
PARSING_STARTED=[parsing started {0}]
PARSING_COMPLETED=[parsing completed {0}ms]
WROTE=[wrote {0}]
CHECKING=[checking {0}]
LOADING=[loading {0}]
NOTE=Note: {0}
STATISTICS=[total {0}ms]
IGNORED=[search path for source files: {0}]
WARNING=warning: {0}
__patterns_end
";

/// Verbose javac run over `src/app/Main.java`: one warning, one error.
pub const JAVAC_VERBOSE_RUN: &str = "\
[search path for source files: src]
[parsing started RegularFileObject[src/app/Main.java]]
[parsing completed 12ms]
[loading ZipFileIndexFileObject[/jdk/lib/ct.sym(META-INF/sym/rt.jar/java/lang/Object.class)]]
[checking app.Main]
src/app/Main.java:5: warning: [unchecked] unchecked cast
        List<String> names = (List<String>) raw;
                             ^
  required: List<String>
  found:    Object
src/app/Main.java:9: cannot find symbol
        Helper.run();
        ^
  symbol:   variable Helper
  location: class Main
[wrote RegularFileObject[out/app/Main.class]]
Note: Some input files use unchecked or unsafe operations.
1 error
1 warning
[total 340ms]
";

/// Bootstrap block followed by the verbose run.
pub fn javac_transcript() -> String {
    format!("{JAVAC_BOOTSTRAP}{JAVAC_VERBOSE_RUN}")
}

/// Decode `text` with default settings and the given probe.
pub fn decode<P: FileProbe>(text: &str, probe: P) -> (Vec<CompilerEvent>, RunStats) {
    decode_with(text, ParserConfig::default(), probe)
}

pub fn decode_with<P: FileProbe>(
    text: &str,
    config: ParserConfig,
    probe: P,
) -> (Vec<CompilerEvent>, RunStats) {
    let mut source = PushbackLines::from_reader(text.as_bytes());
    let mut log = EventLog::new();
    let mut parser = DiagnosticParser::with_probe(config, probe);
    let stats = parser.run(&mut source, &mut log);
    (log.into_events(), stats)
}

/// Create `files` (relative paths) under `root` with placeholder content.
pub fn create_files(root: &Path, files: &[&str]) {
    for file in files {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "// source\n").unwrap();
    }
}

/// Captured result of one `caret` invocation.
#[derive(Debug)]
pub struct CaretRun {
    pub stdout: String,
    pub stderr: String,
    pub code: Option<i32>,
}

/// Run the `caret` binary with `stdin` piped in.
///
/// `home` isolates the default config lookup from the developer's machine.
pub fn run_caret(args: &[&str], stdin: &str, home: &Path) -> CaretRun {
    let mut child = Command::new(env!("CARGO_BIN_EXE_caret"))
        .args(args)
        .env("HOME", home)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("caret binary should start");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("write transcript to caret");

    let output = child.wait_with_output().expect("caret should finish");
    CaretRun {
        stdout: String::from_utf8(output.stdout).expect("stdout is UTF-8"),
        stderr: String::from_utf8(output.stderr).expect("stderr is UTF-8"),
        code: output.status.code(),
    }
}
