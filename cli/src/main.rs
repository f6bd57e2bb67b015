//! caret CLI - decode compiler output from a file or stdin.
//!
//! ```text
//! javac ... 2>&1 | caret --format json
//! ```
//!
//! Events go to stdout, one per line. Logs and the run summary go to stderr
//! so stdout stays machine-readable. The exit code is 1 when any error
//! diagnostic was decoded.

mod render;

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use caret_config::{CaretConfig, OutputConfig, OutputFormat};
use caret_parser::{DiagnosticParser, FnSink, FsProbe, ParserConfig, PushbackLines, Summary};
use caret_types::CompilerEvent;

use crate::render::{Renderer, summary_line};

#[derive(Debug, Parser)]
#[command(name = "caret")]
#[command(about = "Decode compiler output into diagnostics and progress events")]
struct Cli {
    /// Captured compiler output; stdin when omitted or "-"
    input: Option<PathBuf>,
    /// Config file (default: ~/.caret/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Columns per tab stop when resolving caret lines
    #[arg(long, value_name = "N")]
    tab_width: Option<u32>,
    /// Extension of compiler inputs, e.g. "java"
    #[arg(long, value_name = "EXT")]
    source_ext: Option<String>,
    /// Extension of generated files, e.g. "class"
    #[arg(long, value_name = "EXT")]
    artifact_ext: Option<String>,
    /// Directory the compiler ran in; relative paths resolve against it
    #[arg(long, value_name = "DIR")]
    workdir: Option<PathBuf>,
    /// Output format: text or json
    #[arg(long)]
    format: Option<OutputFormat>,
    /// Do not print the summary line to stderr
    #[arg(long)]
    no_summary: bool,
}

impl Cli {
    /// File settings with command-line overrides applied.
    fn parser_config(&self, config: &CaretConfig) -> ParserConfig {
        let mut parser = config.parser_config();
        if let Some(width) = self.tab_width {
            parser.tab_width = width;
        }
        if let Some(ext) = &self.source_ext {
            parser.source_extension = ext.trim_start_matches('.').to_string();
        }
        if let Some(ext) = &self.artifact_ext {
            parser.artifact_extension = ext.trim_start_matches('.').to_string();
        }
        parser
    }

    fn output_config(&self, config: &CaretConfig) -> OutputConfig {
        let mut output = config.output_config();
        if let Some(format) = self.format {
            output.format = format;
        }
        if self.no_summary {
            output.summary = false;
        }
        output
    }

    fn probe(&self) -> FsProbe {
        match &self.workdir {
            Some(dir) => FsProbe::rooted(dir),
            None => FsProbe::new(),
        }
    }
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal()),
        )
        .with(env_filter)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<CaretConfig> {
    match path {
        Some(path) => CaretConfig::load_from(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(CaretConfig::load()
            .context("loading default config")?
            .unwrap_or_default()),
    }
}

fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file =
                File::open(path).with_context(|| format!("opening {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

fn main() -> Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let parser_config = cli.parser_config(&config);
    let output = cli.output_config(&config);
    tracing::debug!(?parser_config, ?output, "Resolved settings");

    let mut source = PushbackLines::from_reader(open_input(cli.input.as_deref())?);
    let mut parser = DiagnosticParser::with_probe(parser_config, cli.probe());
    let mut renderer = Renderer::new(BufWriter::new(io::stdout().lock()), output.format);

    let mut summary = Summary::default();
    let mut write_error: Option<io::Error> = None;
    let stats = {
        let mut sink = FnSink(|event: CompilerEvent| {
            summary.count(&event);
            if write_error.is_none()
                && let Err(err) = renderer.render(&event)
            {
                write_error = Some(err);
            }
        });
        parser.run(&mut source, &mut sink)
    };

    let flushed = match write_error {
        Some(err) => Err(err),
        None => renderer.flush(),
    };
    match flushed {
        // Downstream closed early (`caret | head`); nothing left to report to.
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {}
        other => other.context("writing events to stdout")?,
    }

    if output.summary {
        eprintln!("{}", summary_line(&summary, stats));
    }

    Ok(if summary.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
