//! Fanout CLI - affected Go packages from the command line.
//!
//! Reads changed file paths (arguments, or one per line on stdin) and prints
//! every package that transitively imports a package owning one of them.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

/// Fanout: list the Go packages affected by a set of changed files.
#[derive(Parser)]
#[command(name = "fanout")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Root directory; changed file paths are relative to it
    #[arg(short, long, env = "GOPATH")]
    root: Option<PathBuf>,

    /// Source tree directory under the root
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// File names to exclude from scanning (comma-separated, repeatable)
    #[arg(long, value_name = "NAMES")]
    skip: Vec<String>,

    /// Also report the packages owning the changed files
    #[arg(long)]
    include_changed: bool,

    /// YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Changed files; read from stdin when none are given
    files: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = cli::Args {
        config: cli.config,
        overrides: fanout::Overrides {
            root: cli.root,
            source_dir: cli.source_dir,
            skip: fanout::split_skip_list(&cli.skip),
            include_changed: cli.include_changed,
        },
        files: cli.files,
    };

    match cli::affected::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            if let Some(hint) = hint(&e) {
                eprintln!("  {}: {hint}", "hint".cyan());
            }
            ExitCode::FAILURE
        }
    }
}

/// Suggested next step for an error category.
fn hint(error: &fanout::Error) -> Option<&'static str> {
    if error.is_config_error() {
        Some("check --root (or GOPATH), --source-dir and --config")
    } else if error.is_scan_error() {
        Some("exclude generated or unparseable files with --skip")
    } else {
        None
    }
}
