//! Reverse view of the upstream sets.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::Upstreams;
use crate::types::PackageId;

/// For each package, every package that transitively imports it.
///
/// `P` is a dependent of `Q` exactly when `Q` is in the upstream set of `P`.
/// Packages nothing depends on have no entry.
#[derive(Debug, Clone, Default)]
pub struct DownstreamIndex {
    dependents: HashMap<PackageId, HashSet<PackageId>>,
}

impl DownstreamIndex {
    /// Invert every `(package, upstream member)` pair.
    #[must_use]
    pub fn from_upstreams(upstreams: &Upstreams) -> Self {
        let mut dependents: HashMap<PackageId, HashSet<PackageId>> = HashMap::new();

        for (package, upstream) in upstreams.iter() {
            for member in upstream {
                dependents
                    .entry(member.clone())
                    .or_default()
                    .insert(package.clone());
            }
        }

        debug!(packages = dependents.len(), "Built downstream index");

        Self { dependents }
    }

    /// Packages that transitively depend on `package`.
    ///
    /// Returns `None` if nothing depends on it.
    #[must_use]
    pub fn dependents_of(&self, package: &str) -> Option<&HashSet<PackageId>> {
        self.dependents.get(package)
    }

    /// Number of packages with at least one dependent.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dependents.len()
    }

    /// Returns `true` if no package has dependents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dependents.is_empty()
    }
}
