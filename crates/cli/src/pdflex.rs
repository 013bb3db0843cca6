//! pdflex - Print the lexical tokens of PDF files
//!
//! Scans each input to completion and writes one line per token. A scan
//! error ends that file's output, is reported with its line and offset, and
//! the next file is processed. The exit status is non-zero only when a file
//! could not be read.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use memmap2::Mmap;
use pdflex_core::{ScanError, Scanner, Token, TokenKind};
use serde::Serialize;
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Output format for tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// `kind@offset: "value"`, one token per line
    Text,
    /// One JSON object per line
    Json,
}

/// A command line tool for dumping the lexical tokens of PDF files.
#[derive(Parser, Debug)]
#[command(name = "pdflex")]
#[command(author, version, about = "Print the lexical tokens of PDF files", long_about = None)]
struct Args {
    /// One or more paths to PDF files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Print nothing but scan errors
    #[arg(short = 'q', long, action = ArgAction::SetTrue)]
    quiet: bool,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

/// File contents, memory-mapped unless the file is empty.
enum Input {
    Mapped(Mmap),
    Empty,
}

impl Input {
    fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(Input::Empty);
        }
        // The mapping is read-only and lives only for one scan.
        let mmap = unsafe { Mmap::map(&file) }?;
        Ok(Input::Mapped(mmap))
    }

    fn as_bytes(&self) -> &[u8] {
        match self {
            Input::Mapped(mmap) => &mmap[..],
            Input::Empty => &[],
        }
    }
}

/// One output line in JSON format.
#[derive(Serialize)]
struct Record<'a> {
    file: &'a str,
    kind: &'static str,
    ordinal: u8,
    pos: usize,
    value: Cow<'a, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
}

impl<'a> Record<'a> {
    fn token(file: &'a str, token: &Token<'a>) -> Self {
        Self {
            file,
            kind: token.kind.as_str(),
            ordinal: token.kind as u8,
            pos: token.pos,
            value: token.text(),
            line: None,
        }
    }

    fn error(file: &'a str, err: &ScanError, line: usize) -> Self {
        Self {
            file,
            kind: TokenKind::Error.as_str(),
            ordinal: TokenKind::Error as u8,
            pos: err.pos(),
            value: Cow::Owned(err.to_string()),
            line: Some(line),
        }
    }
}

fn write_token<W: Write>(
    out: &mut W,
    format: Format,
    file: &str,
    token: &Token<'_>,
) -> Result<()> {
    match format {
        Format::Text => writeln!(out, "{token}")?,
        Format::Json => {
            serde_json::to_writer(&mut *out, &Record::token(file, token))?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_error<W: Write>(
    out: &mut W,
    format: Format,
    file: &str,
    err: &ScanError,
    line: usize,
) -> Result<()> {
    match format {
        Format::Text => writeln!(out, "{}@{}: {err}", TokenKind::Error, err.pos())?,
        Format::Json => {
            serde_json::to_writer(&mut *out, &Record::error(file, err, line))?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Scan one input, writing its tokens. Returns the error that ended the
/// scan, if any.
fn lex_file<W: Write>(
    out: &mut W,
    args: &Args,
    file: &str,
    data: &[u8],
) -> Result<Option<ScanError>> {
    let mut scanner = Scanner::new(file, data);
    while let Some(item) = scanner.next() {
        match item {
            Ok(token) => {
                if !args.quiet {
                    write_token(out, args.format, file, &token)?;
                }
            }
            Err(err) => {
                let line = scanner.line_number();
                if !args.quiet {
                    write_error(out, args.format, file, &err, line)?;
                }
                eprintln!(
                    "Aborting {} at line {}, pos {}: {}",
                    scanner.name(),
                    line,
                    scanner.pos(),
                    err
                );
                return Ok(Some(err));
            }
        }
    }
    Ok(None)
}

fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Process every input. Returns whether all of them could be read.
fn run(args: &Args) -> Result<bool> {
    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("unable to create {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };

    let mut all_read = true;
    let mut scan_failures = 0usize;
    let multiple = args.files.len() > 1;

    for path in &args.files {
        let name = path.display().to_string();
        let input = match Input::open(path) {
            Ok(input) => input,
            Err(err) => {
                eprintln!("Unable to open {name}: {err:#}");
                all_read = false;
                continue;
            }
        };
        let data = input.as_bytes();
        debug!(file = %name, bytes = data.len(), "scanning");

        if multiple && !args.quiet && args.format == Format::Text {
            writeln!(output, "==> {name} <==")?;
        }
        if lex_file(&mut output, args, &name, data)?.is_some() {
            scan_failures += 1;
        }
    }

    output.flush()?;
    if scan_failures > 0 {
        warn!(
            failed = scan_failures,
            total = args.files.len(),
            "some files did not scan cleanly"
        );
    }
    Ok(all_read)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.debug);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("pdflex: {err:#}");
            ExitCode::FAILURE
        }
    }
}
