//! Package import graph and its derived views.
//!
//! This module turns scanner output into the structures the affected-set
//! query runs on:
//!
//! | Structure | Built by | Meaning |
//! |-----------|----------|---------|
//! | [`ImportGraph`] | [`ImportGraph::build`] | file -> package, package -> direct imports |
//! | [`Upstreams`] | [`Upstreams::resolve`] | package -> everything it transitively imports |
//! | [`DownstreamIndex`] | [`DownstreamIndex::from_upstreams`] | package -> everything that transitively imports it |
//!
//! ## Design
//!
//! - The builder is a pure function over [`SourceTree`]; tests inject synthetic
//!   scans instead of touching the filesystem
//! - Traversal goes through the [`Adjacency`] trait; the BFS never sees how
//!   edges are stored
//! - Import targets outside the scanned tree are nodes without an adjacency entry

mod downstream;
mod resolve;

pub use downstream::DownstreamIndex;
pub use resolve::{Adjacency, Upstreams, upstream_set};

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::types::{FileId, PackageId, SourceTree};

/// Direct import relationships between packages, plus file ownership.
#[derive(Debug, Clone, Default)]
pub struct ImportGraph {
    file_packages: HashMap<FileId, PackageId>,
    imports: HashMap<PackageId, Vec<PackageId>>,
}

impl ImportGraph {
    /// Build the graph from a complete scan of a source tree.
    ///
    /// Every package in a directory shares the directory's import path: their
    /// files all map to it and their imports are merged into one adjacency
    /// entry. A package without imports still gets an (empty) entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSourceFiles`] if the scan found no files at all,
    /// which almost always means the tree root is misconfigured.
    pub fn build(tree: SourceTree) -> Result<Self> {
        let mut graph = Self::default();

        for directory in tree.directories {
            if directory.packages.is_empty() {
                continue;
            }

            let entry = graph
                .imports
                .entry(directory.import_path.clone())
                .or_default();

            for package in directory.packages {
                trace!(
                    import_path = %directory.import_path,
                    package = %package.name,
                    files = package.files.len(),
                    imports = package.imports.len(),
                    "Adding package to import graph"
                );
                entry.extend(package.imports.into_iter().map(PackageId::from));
                for file in package.files {
                    graph
                        .file_packages
                        .insert(file, directory.import_path.clone());
                }
            }
        }

        if graph.file_packages.is_empty() {
            return Err(Error::NoSourceFiles { tree: tree.path });
        }

        debug!(
            packages = graph.imports.len(),
            files = graph.file_packages.len(),
            "Built import graph"
        );

        Ok(graph)
    }

    /// Package owning a file, or `None` if the file was never scanned.
    #[must_use]
    pub fn package_of(&self, file: &str) -> Option<&PackageId> {
        self.file_packages.get(file)
    }

    /// Direct imports of a scanned package, duplicates included.
    ///
    /// Returns `None` for identifiers that were only ever seen as import
    /// targets (external packages).
    #[must_use]
    pub fn imports_of(&self, package: &str) -> Option<&[PackageId]> {
        self.imports.get(package).map(Vec::as_slice)
    }

    /// Iterate over scanned packages.
    pub fn packages(&self) -> impl Iterator<Item = &PackageId> {
        self.imports.keys()
    }

    /// Iterate over `(file, owning package)` pairs.
    pub fn files(&self) -> impl Iterator<Item = (&FileId, &PackageId)> {
        self.file_packages.iter()
    }

    /// Number of scanned packages.
    #[must_use]
    pub fn package_count(&self) -> usize {
        self.imports.len()
    }

    /// Number of scanned files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.file_packages.len()
    }
}

impl Adjacency for ImportGraph {
    type Node = PackageId;

    fn successors(&self, node: &PackageId) -> impl Iterator<Item = PackageId> {
        self.imports.successors(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DirectoryScan, ScannedPackage};
    use petgraph::graphmap::DiGraphMap;

    /// Import edges as a petgraph `DiGraphMap`; duplicates collapse into one edge.
    fn to_digraph(graph: &ImportGraph) -> DiGraphMap<&str, ()> {
        let mut digraph = DiGraphMap::new();
        for (package, imports) in &graph.imports {
            digraph.add_node(package.as_str());
            for target in imports {
                digraph.add_edge(package.as_str(), target.as_str(), ());
            }
        }
        digraph
    }

    fn package(name: &str, files: &[&str], imports: &[&str]) -> ScannedPackage {
        ScannedPackage {
            name: name.to_string(),
            files: files.iter().map(|f| FileId::from(*f)).collect(),
            imports: imports.iter().map(ToString::to_string).collect(),
        }
    }

    fn tree(directories: Vec<DirectoryScan>) -> SourceTree {
        SourceTree::new("/go/src", directories)
    }

    #[test]
    fn build_maps_files_to_directory_import_path() {
        let graph = ImportGraph::build(tree(vec![
            DirectoryScan::new(
                "acme/api",
                vec![package("api", &["src/acme/api/api.go"], &["acme/db", "fmt"])],
            ),
            DirectoryScan::new("acme/db", vec![package("db", &["src/acme/db/db.go"], &[])]),
        ]))
        .expect("build should succeed");

        assert_eq!(
            graph.package_of("src/acme/api/api.go").map(PackageId::as_str),
            Some("acme/api")
        );
        assert_eq!(
            graph.package_of("src/acme/db/db.go").map(PackageId::as_str),
            Some("acme/db")
        );
        assert_eq!(graph.package_count(), 2);
        assert_eq!(graph.file_count(), 2);

        let mut files: Vec<(&str, &str)> = graph
            .files()
            .map(|(file, package)| (file.as_str(), package.as_str()))
            .collect();
        files.sort_unstable();
        let mut packages: Vec<&str> = graph.packages().map(PackageId::as_str).collect();
        packages.sort_unstable();
        assert_eq!(packages, vec!["acme/api", "acme/db"]);
        assert_eq!(
            files,
            vec![
                ("src/acme/api/api.go", "acme/api"),
                ("src/acme/db/db.go", "acme/db")
            ]
        );
    }

    #[test]
    fn package_without_imports_has_empty_entry() {
        let graph = ImportGraph::build(tree(vec![DirectoryScan::new(
            "acme/db",
            vec![package("db", &["src/acme/db/db.go"], &[])],
        )]))
        .expect("build should succeed");

        assert_eq!(graph.imports_of("acme/db"), Some(&[][..]));
    }

    #[test]
    fn external_import_targets_have_no_entry() {
        let graph = ImportGraph::build(tree(vec![DirectoryScan::new(
            "acme/api",
            vec![package("api", &["src/acme/api/api.go"], &["ext/lib"])],
        )]))
        .expect("build should succeed");

        assert_eq!(
            graph.imports_of("acme/api"),
            Some(&[PackageId::from("ext/lib")][..])
        );
        assert_eq!(graph.imports_of("ext/lib"), None);
    }

    #[test]
    fn packages_sharing_a_directory_merge_imports() {
        let graph = ImportGraph::build(tree(vec![DirectoryScan::new(
            "acme/db",
            vec![
                package("db", &["src/acme/db/db.go"], &["database/sql"]),
                package("db_test", &["src/acme/db/db_test.go"], &["acme/testutil"]),
            ],
        )]))
        .expect("build should succeed");

        let imports: Vec<&str> = graph
            .imports_of("acme/db")
            .expect("acme/db should be scanned")
            .iter()
            .map(PackageId::as_str)
            .collect();
        assert_eq!(imports.len(), 2);
        assert!(imports.contains(&"database/sql"));
        assert!(imports.contains(&"acme/testutil"));
        assert_eq!(
            graph.package_of("src/acme/db/db_test.go").map(PackageId::as_str),
            Some("acme/db")
        );
    }

    #[test]
    fn duplicate_imports_are_kept() {
        let graph = ImportGraph::build(tree(vec![DirectoryScan::new(
            "acme/api",
            vec![package(
                "api",
                &["src/acme/api/a.go", "src/acme/api/b.go"],
                &["fmt", "fmt"],
            )],
        )]))
        .expect("build should succeed");

        assert_eq!(graph.imports_of("acme/api").map(<[_]>::len), Some(2));
    }

    #[test]
    fn directories_without_packages_are_ignored() {
        let graph = ImportGraph::build(tree(vec![
            DirectoryScan::new("acme", vec![]),
            DirectoryScan::new("acme/db", vec![package("db", &["src/acme/db/db.go"], &[])]),
        ]))
        .expect("build should succeed");

        assert_eq!(graph.package_count(), 1);
        assert!(graph.imports_of("acme").is_none());
    }

    #[test]
    fn build_fails_when_no_files_found() {
        let result = ImportGraph::build(tree(vec![DirectoryScan::new("acme", vec![])]));

        match result {
            Err(Error::NoSourceFiles { tree }) => {
                assert_eq!(tree, std::path::PathBuf::from("/go/src"));
            }
            other => panic!("expected NoSourceFiles, got {other:?}"),
        }
    }

    #[test]
    fn build_does_not_depend_on_directory_order() {
        let scans = vec![
            DirectoryScan::new("a", vec![package("a", &["src/a/a.go"], &["b"])]),
            DirectoryScan::new("b", vec![package("b", &["src/b/b.go"], &["c"])]),
            DirectoryScan::new("c", vec![package("c", &["src/c/c.go"], &[])]),
        ];
        let mut reversed = scans.clone();
        reversed.reverse();

        let forward = ImportGraph::build(tree(scans)).expect("build should succeed");
        let backward = ImportGraph::build(tree(reversed)).expect("build should succeed");

        for id in ["a", "b", "c"] {
            assert_eq!(forward.imports_of(id), backward.imports_of(id));
        }
        assert_eq!(forward.file_count(), backward.file_count());
    }

    #[test]
    fn digraph_view_collapses_duplicates_and_keeps_leaves() {
        let graph = ImportGraph::build(tree(vec![DirectoryScan::new(
            "acme/api",
            vec![package("api", &["src/acme/api/api.go"], &["fmt", "fmt", "acme/db"])],
        )]))
        .expect("build should succeed");

        let digraph = to_digraph(&graph);

        assert_eq!(digraph.node_count(), 3);
        assert_eq!(digraph.edge_count(), 2);
        assert!(digraph.contains_edge("acme/api", "fmt"));
        assert_eq!(digraph.neighbors("fmt").count(), 0);
    }
}
