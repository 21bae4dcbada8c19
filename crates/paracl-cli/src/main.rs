//! `paracl`: parses a ParaC source file (or standard input) and runs it.
//!
//! The external-collaborator CLI `spec.md` §6 describes: it owns argument
//! parsing, error reporting, and exit status. Everything it does beyond
//! "read text, call into the library, print the result" is ambient — there
//! is no persisted state and no behaviour the library itself doesn't also
//! expose directly for embedding.

use std::{fs, io, path::PathBuf, process::ExitCode};

use clap::Parser;
use paracl::{DEFAULT_MAX_RECURSION_DEPTH, LimitedDepth, StdInput, StdPrint, parse, run_with_guard};
use tracing_subscriber::EnvFilter;

/// A tree-walking interpreter for ParaC.
#[derive(Parser)]
#[command(name = "paracl", version, about)]
struct Cli {
    /// Source file to run. Omitted, or `-`, reads from standard input.
    ///
    /// Only the first path is used if more than one is given (`spec.md` §9
    /// leaves multi-file handling to the CLI; this one runs a single
    /// program per invocation).
    paths: Vec<PathBuf>,

    /// Maximum evaluator recursion depth before aborting with a
    /// `RecursionLimit` error instead of a native stack overflow.
    #[arg(long, default_value_t = DEFAULT_MAX_RECURSION_DEPTH)]
    max_recursion_depth: usize,

    /// Increase log verbosity; repeat for more detail (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    install_tracing(cli.verbose);

    if cli.paths.len() > 1 {
        tracing::warn!(ignored = cli.paths.len() - 1, "extra source path arguments are ignored");
    }

    let source = match read_source(cli.paths.first()) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let program = match parse(&source) {
        Ok(program) => program,
        Err(err) => {
            eprintln!("parse error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut print = StdPrint;
    let mut input = StdInput::new();
    let guard = LimitedDepth::new(cli.max_recursion_depth);
    match run_with_guard(&program, &mut print, &mut input, guard) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("runtime error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn read_source(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path),
        _ => io::read_to_string(io::stdin()),
    }
}

/// Installs the global `tracing` subscriber. Only the binary does this —
/// `paracl` the library only ever emits spans/events, never installs a
/// collector (`SPEC_FULL.md` §12).
fn install_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}
