//! # Fanout: Affected-Package Analysis for Go Source Trees
//!
//! Given a set of changed files, fanout computes which packages depend on
//! them, directly or transitively, so a build or test system can rebuild only
//! what a change can reach.
//!
//! ## Pipeline
//!
//! ```text
//! SourceScanner -> ImportGraph -> Upstreams -> DownstreamIndex -> affected()
//! ```
//!
//! - [`SourceScanner`] walks a tree and extracts package clauses and imports
//!   ([`GoScanner`] does this for Go with tree-sitter)
//! - [`ImportGraph`] maps files to packages and packages to direct imports
//! - [`Upstreams`] holds each package's transitive imports
//! - [`DownstreamIndex`] inverts them into transitive dependents
//! - [`Analysis::affected`] unions the dependents of every changed file's package
//!
//! Everything is recomputed per run; nothing is cached or persisted.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::collections::BTreeSet;
//! use std::path::Path;
//!
//! use fanout::{Analysis, GoScanner, QueryOptions};
//!
//! let scanner = GoScanner::new("/home/me/go", Path::new("src"), BTreeSet::new());
//! let analysis = Analysis::scan(&scanner)?;
//!
//! let affected = analysis.affected(["src/github.com/acme/db/db.go"], QueryOptions::default());
//! for package in affected.sorted() {
//!     println!("{package}");
//! }
//! # Ok::<(), fanout::Error>(())
//! ```

mod config;
mod error;
mod graph;
mod input;
mod query;
mod scanner;
mod types;

pub use config::{Config, ConfigFile, DEFAULT_SOURCE_DIR, Overrides, split_skip_list};
pub use error::{Error, Result};
pub use graph::{Adjacency, DownstreamIndex, ImportGraph, Upstreams, upstream_set};
pub use input::ChangedFiles;
pub use query::{AffectedSet, QueryOptions, affected};
pub use scanner::{GoFileHeader, GoParser, GoScanner, SourceScanner};
pub use types::{DirectoryScan, FileId, PackageId, ScannedPackage, SourceTree};

use tracing::info;

/// A fully resolved dependency graph, ready to answer affected-set queries.
#[derive(Debug, Clone)]
pub struct Analysis {
    graph: ImportGraph,
    upstreams: Upstreams,
    downstreams: DownstreamIndex,
}

impl Analysis {
    /// Scan a tree and resolve its graph.
    ///
    /// # Errors
    ///
    /// Propagates scan failures, and returns [`Error::NoSourceFiles`] if the
    /// scan found nothing.
    pub fn scan<S: SourceScanner + ?Sized>(scanner: &S) -> Result<Self> {
        Self::from_tree(scanner.scan()?)
    }

    /// Resolve the graph for an already scanned tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSourceFiles`] if the tree has no files.
    pub fn from_tree(tree: SourceTree) -> Result<Self> {
        Ok(Self::from_graph(ImportGraph::build(tree)?))
    }

    /// Resolve upstream sets and the downstream index for a built graph.
    #[must_use]
    pub fn from_graph(graph: ImportGraph) -> Self {
        let upstreams = Upstreams::resolve(&graph);
        let downstreams = DownstreamIndex::from_upstreams(&upstreams);

        info!(
            packages = graph.package_count(),
            files = graph.file_count(),
            depended_on = downstreams.len(),
            "Resolved dependency graph"
        );

        Self {
            graph,
            upstreams,
            downstreams,
        }
    }

    /// Packages affected by changes to `changed_files`.
    ///
    /// See [`affected`] for the matching rules.
    pub fn affected<I, S>(&self, changed_files: I, options: QueryOptions) -> AffectedSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        affected(&self.graph, &self.downstreams, changed_files, options)
    }

    /// The import graph.
    #[must_use]
    pub fn graph(&self) -> &ImportGraph {
        &self.graph
    }

    /// Upstream set of every scanned package.
    #[must_use]
    pub fn upstreams(&self) -> &Upstreams {
        &self.upstreams
    }

    /// Transitive dependents of every package.
    #[must_use]
    pub fn downstreams(&self) -> &DownstreamIndex {
        &self.downstreams
    }
}
