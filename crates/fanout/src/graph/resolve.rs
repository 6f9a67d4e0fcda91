//! Transitive closure over import edges.
//!
//! [`upstream_set`] is a breadth-first walk with an explicit worklist and a
//! membership set. A node joins the result the first time an edge reaches
//! it, so each node is queued at most once and the walk terminates on cyclic
//! graphs. The origin is only a member if a cycle leads back to it.

use std::collections::hash_map::HashMap;
use std::collections::{HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};

use rayon::prelude::*;
use tracing::debug;

use super::ImportGraph;
use crate::types::PackageId;

/// Outgoing edges of a directed graph.
///
/// Nodes without outgoing edges, including nodes the graph has never seen,
/// yield an empty iterator.
pub trait Adjacency {
    /// Node type of the graph.
    type Node: Clone + Eq + Hash;

    /// Direct successors of `node`. Duplicates are allowed.
    fn successors(&self, node: &Self::Node) -> impl Iterator<Item = Self::Node>;
}

impl<N, S> Adjacency for HashMap<N, Vec<N>, S>
where
    N: Clone + Eq + Hash,
    S: BuildHasher,
{
    type Node = N;

    fn successors(&self, node: &N) -> impl Iterator<Item = N> {
        self.get(node).into_iter().flatten().cloned()
    }
}

/// Every node reachable from `origin` by following one or more edges.
///
/// `origin` itself is excluded unless a cycle leads back to it.
pub fn upstream_set<G: Adjacency>(graph: &G, origin: &G::Node) -> HashSet<G::Node> {
    let mut members = HashSet::new();
    let mut worklist = VecDeque::from([origin.clone()]);

    while let Some(current) = worklist.pop_front() {
        for next in graph.successors(&current) {
            if members.insert(next.clone()) {
                worklist.push_back(next);
            }
        }
    }

    members
}

/// Upstream set of every scanned package.
#[derive(Debug, Clone, Default)]
pub struct Upstreams {
    sets: HashMap<PackageId, HashSet<PackageId>>,
}

impl Upstreams {
    /// Resolve the upstream set of every package in the graph.
    ///
    /// Each package is resolved independently on the rayon pool.
    #[must_use]
    pub fn resolve(graph: &ImportGraph) -> Self {
        let sets: HashMap<PackageId, HashSet<PackageId>> = graph
            .imports
            .par_iter()
            .map(|(package, _)| (package.clone(), upstream_set(graph, package)))
            .collect();

        debug!(
            packages = sets.len(),
            edges = sets.values().map(HashSet::len).sum::<usize>(),
            "Resolved upstream sets"
        );

        Self { sets }
    }

    /// Upstream set of a scanned package.
    ///
    /// Returns `None` for identifiers that were never scanned.
    #[must_use]
    pub fn get(&self, package: &str) -> Option<&HashSet<PackageId>> {
        self.sets.get(package)
    }

    /// Iterate over `(package, upstream set)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&PackageId, &HashSet<PackageId>)> {
        self.sets.iter()
    }

    /// Number of resolved packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns `true` if no package was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
