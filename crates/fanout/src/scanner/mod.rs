//! Source scanning.
//!
//! A [`SourceScanner`] produces a [`SourceTree`]: per directory, the packages
//! declared there, their files, and their raw imports. The graph builder only
//! sees that output, so tests and other front ends can supply their own.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      GoScanner::scan                      │
//! ├──────────────────────────────────────────────────────────┤
//! │  Phase 1 (Sequential):  directory walk + skip list        │
//! │  Phase 2 (Parallel):    rayon par_iter header parsing     │
//! │                         (one tree-sitter parser/worker)   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The first read or parse failure aborts the scan.

mod go;
mod walk;

pub use go::{GoFileHeader, GoParser};
use walk::{SourceDirectory, discover, slash_relative};

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{DirectoryScan, FileId, PackageId, ScannedPackage, SourceTree};

/// Produces per-directory package and import information for a tree.
pub trait SourceScanner {
    /// Scan the whole tree.
    ///
    /// # Errors
    ///
    /// Any failure is fatal; implementations never return a partial tree.
    fn scan(&self) -> Result<SourceTree>;
}

/// Scanner for a Go source tree laid out as `<root>/<source dir>/<import path>`.
///
/// Package identifiers are directory paths relative to the source tree; file
/// identifiers are relative to the root.
#[derive(Debug, Clone)]
pub struct GoScanner {
    root: PathBuf,
    tree: PathBuf,
    skip: BTreeSet<String>,
}

impl GoScanner {
    /// Create a scanner for `root.join(source_dir)`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, source_dir: &Path, skip: BTreeSet<String>) -> Self {
        let root = root.into();
        let tree = root.join(source_dir);
        Self { root, tree, skip }
    }

    /// Create a scanner from a resolved configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.root, &config.source_dir, config.skip.clone())
    }

    /// Directory the scanner walks.
    #[must_use]
    pub fn tree(&self) -> &Path {
        &self.tree
    }

    fn scan_directory(&self, parser: &mut GoParser, dir: &SourceDirectory) -> Result<DirectoryScan> {
        let import_path = PackageId::new(slash_relative(&dir.path, &self.tree));
        let mut packages: BTreeMap<String, ScannedPackage> = BTreeMap::new();

        for path in &dir.files {
            let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
            let source = std::str::from_utf8(&bytes)
                .map_err(|_| Error::parse(path, "file is not valid UTF-8"))?;
            let header = parser.parse_header(path, source)?;

            let package = packages
                .entry(header.package.clone())
                .or_insert_with(|| ScannedPackage::new(header.package));
            package.files.push(FileId::new(slash_relative(path, &self.root)));
            package.imports.extend(header.imports);
        }

        if !packages.is_empty() {
            debug!(
                import_path = %import_path,
                packages = ?packages.keys().collect::<Vec<_>>(),
                files = dir.files.len(),
                "Scanned directory"
            );
        }

        Ok(DirectoryScan::new(import_path, packages.into_values().collect()))
    }
}

impl SourceScanner for GoScanner {
    fn scan(&self) -> Result<SourceTree> {
        let start = Instant::now();
        let discovery = discover(&self.tree, &self.skip)?;

        // Fail before fanning out if the grammar cannot load at all.
        GoParser::new()?;

        let directories: Vec<DirectoryScan> = discovery
            .directories
            .par_iter()
            .map_init(GoParser::new, |parser, dir| {
                let parser = parser
                    .as_mut()
                    .map_err(|e| Error::Parser(e.to_string()))?;
                self.scan_directory(parser, dir)
            })
            .collect::<Result<_>>()?;

        let tree = SourceTree::new(self.tree.clone(), directories);
        info!(
            tree = %self.tree.display(),
            directories = tree.directories.len(),
            files = tree.file_count(),
            files_skipped = discovery.files_skipped,
            duration_ms = start.elapsed().as_millis(),
            "Scanned source tree"
        );

        Ok(tree)
    }
}
