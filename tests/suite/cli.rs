//! End-to-end runs of the `caret` binary.

use std::fs;

use crate::common::{create_files, javac_transcript, run_caret};

#[test]
fn test_text_output_and_exit_code() {
    let work = tempfile::tempdir().unwrap();
    create_files(work.path(), &["src/app/Main.java"]);
    let home = tempfile::tempdir().unwrap();

    let workdir = work.path().to_str().unwrap();
    let run = run_caret(&["--workdir", workdir], &javac_transcript(), home.path());

    assert_eq!(run.code, Some(1));
    insta::assert_snapshot!(run.stdout.trim_end(), @r"
    processing: src/app/Main.java
    progress: Parsing Main.java
    progress: Loading classes
    progress: Checking app.Main
    src/app/Main.java:5:30: warning: [unchecked] unchecked cast
      required: List<String>
      found:    Object
    src/app/Main.java:9:9: error: cannot find symbol
      symbol:   variable Helper
      location: class Main
    generated: out/app/Main.class
    info: Some input files use unchecked or unsafe operations.
    info: 1 error
    info: 1 warning
    ");
    assert_eq!(
        run.stderr.trim_end(),
        "E:1 W:1 I:3 | 1 processed, 1 generated"
    );
}

#[test]
fn test_json_output() {
    let work = tempfile::tempdir().unwrap();
    create_files(work.path(), &["src/app/Main.java"]);
    let home = tempfile::tempdir().unwrap();

    let workdir = work.path().to_str().unwrap();
    let run = run_caret(
        &["--workdir", workdir, "--format", "json", "--no-summary"],
        &javac_transcript(),
        home.path(),
    );

    assert_eq!(run.code, Some(1));
    assert!(run.stderr.is_empty(), "unexpected stderr: {}", run.stderr);

    let events: Vec<serde_json::Value> = run
        .stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(events.len(), 10);
    assert_eq!(events[0]["kind"], "file_processing");
    assert_eq!(
        events[5],
        serde_json::json!({
            "kind": "diagnostic",
            "severity": "error",
            "message": "cannot find symbol\nsymbol:   variable Helper\nlocation: class Main",
            "location": {"file": "src/app/Main.java", "line": 9, "column": 9}
        })
    );
    assert_eq!(events[6]["path"], "out/app/Main.class");
}

#[test]
fn test_clean_build_exits_zero() {
    let home = tempfile::tempdir().unwrap();
    let run = run_caret(
        &["--no-summary"],
        "warning: [options] bootstrap class path not set\n1 warning\n",
        home.path(),
    );
    assert_eq!(run.code, Some(0));
    insta::assert_snapshot!(run.stdout.trim_end(), @r"
    warning: [options] bootstrap class path not set
    info: 1 warning
    ");
}

#[test]
fn test_reads_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("build.log");
    fs::write(&log, "javac: invalid flag: -foo\n").unwrap();

    let run = run_caret(&[log.to_str().unwrap()], "", dir.path());
    assert_eq!(run.code, Some(1));
    assert_eq!(run.stdout, "error: invalid flag: -foo\n");
    assert!(run.stderr.starts_with("E:1 W:0"));
}

#[test]
fn test_config_file_sets_defaults() {
    let home = tempfile::tempdir().unwrap();
    let config_dir = home.path().join(".caret");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[output]\nformat = \"json\"\nsummary = false\n",
    )
    .unwrap();

    let run = run_caret(&[], "compiling...\n", home.path());
    assert_eq!(run.code, Some(0));
    assert_eq!(
        run.stdout,
        "{\"kind\":\"diagnostic\",\"severity\":\"info\",\"message\":\"compiling...\"}\n"
    );
    assert!(run.stderr.is_empty());

    // Flags win over the file.
    let run = run_caret(&["--format", "text"], "compiling...\n", home.path());
    assert_eq!(run.stdout, "info: compiling...\n");
}

#[test]
fn test_custom_extensions_and_tab_width() {
    let work = tempfile::tempdir().unwrap();
    create_files(work.path(), &["src/A.lang"]);
    let home = tempfile::tempdir().unwrap();

    let transcript = "\
__patterns_start
WROTE=[wrote {0}]
__patterns_end
src/A.lang:4: incompatible types
\tint x = y;
\t    ^
[wrote out/A.bin]
";
    let workdir = work.path().to_str().unwrap();
    let run = run_caret(
        &[
            "--workdir",
            workdir,
            "--source-ext",
            "lang",
            "--artifact-ext",
            "bin",
            "--tab-width",
            "8",
            "--no-summary",
        ],
        transcript,
        home.path(),
    );
    insta::assert_snapshot!(run.stdout.trim_end(), @r"
    src/A.lang:4:13: error: incompatible types
    generated: out/A.bin
    ");
}

#[test]
fn test_malformed_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("broken.toml");
    fs::write(&config, "[output\n").unwrap();

    let run = run_caret(&["--config", config.to_str().unwrap()], "", dir.path());
    assert_eq!(run.code, Some(1));
    assert!(run.stdout.is_empty());
    assert!(run.stderr.contains("broken.toml"), "stderr: {}", run.stderr);
}
