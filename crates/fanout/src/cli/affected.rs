//! `fanout` affected-packages command implementation.

use std::io::{self, BufWriter, Write};

use colored::Colorize;
use fanout::{
    Analysis, ChangedFiles, Config, ConfigFile, Error, GoScanner, PackageId, QueryOptions,
};
use tracing::debug;

use super::Args;

/// Scan the tree, read the changed files and print affected packages.
pub fn run(args: Args) -> Result<(), Error> {
    let file = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let config = Config::resolve(file, args.overrides)?;
    config.validate()?;
    debug!(
        root = %config.root.display(),
        source_dir = %config.source_dir.display(),
        skip = config.skip.len(),
        "Resolved configuration"
    );

    let scanner = GoScanner::from_config(&config);
    debug!(tree = %scanner.tree().display(), "Scanning source tree");
    let analysis = Analysis::scan(&scanner)?;

    let changed = if args.files.is_empty() {
        ChangedFiles::read(io::stdin().lock())
    } else {
        ChangedFiles::from_paths(args.files)
    };
    debug!(
        files = changed.files.len(),
        skipped_lines = changed.skipped_lines,
        "Read changed files"
    );
    if let Some(warning) = read_warning(&changed) {
        // Stdin ending badly still leaves a usable list
        eprintln!("{}: {warning}", "warning".yellow().bold());
    }

    let result = analysis.affected(
        &changed.files,
        QueryOptions {
            include_changed: config.include_changed,
        },
    );
    if !result.unknown_files.is_empty() {
        debug!(
            unknown = result.unknown_files.len(),
            "Some changed files belong to no scanned package"
        );
    }

    write_packages(io::stdout().lock(), &result.sorted()).map_err(Error::Output)
}

/// Warning for a changed-file stream that ended in a read error.
fn read_warning(changed: &ChangedFiles) -> Option<String> {
    let error = changed.read_error.as_ref()?;
    Some(format!(
        "stopped reading changed files after {} paths ({} lines skipped): {error}",
        changed.files.len(),
        changed.skipped_lines
    ))
}

/// One package per line, nothing at all for an empty list.
fn write_packages<W: Write>(out: W, packages: &[&PackageId]) -> io::Result<()> {
    let mut out = BufWriter::new(out);
    for package in packages {
        writeln!(out, "{package}")?;
    }
    out.flush()
}
