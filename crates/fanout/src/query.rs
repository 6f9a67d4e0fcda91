//! Affected-set query: changed files in, dependent packages out.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::graph::{DownstreamIndex, ImportGraph};
use crate::types::PackageId;

/// Options for the affected-set query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Also report the packages owning the changed files.
    ///
    /// Off by default: the result lists only packages that depend on a
    /// changed package. A changed package still shows up when it depends on
    /// another changed package.
    pub include_changed: bool,
}

/// Result of an affected-set query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AffectedSet {
    /// Packages affected by the changes.
    pub packages: HashSet<PackageId>,
    /// Packages owning at least one changed file.
    pub changed_packages: HashSet<PackageId>,
    /// Changed paths no scanned package owns. They contribute nothing.
    pub unknown_files: Vec<String>,
}

impl AffectedSet {
    /// Returns `true` if no package is affected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Number of affected packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether `package` is affected.
    #[must_use]
    pub fn contains(&self, package: &str) -> bool {
        self.packages.contains(package)
    }

    /// Affected packages in lexical order.
    #[must_use]
    pub fn sorted(&self) -> Vec<&PackageId> {
        let mut packages: Vec<&PackageId> = self.packages.iter().collect();
        packages.sort_unstable();
        packages
    }
}

/// Union the dependents of every package owning a changed file.
///
/// Paths are matched exactly against the scanned file identifiers. A path
/// that matches nothing is recorded in [`AffectedSet::unknown_files`] and
/// otherwise ignored.
pub fn affected<I, S>(
    graph: &ImportGraph,
    downstreams: &DownstreamIndex,
    changed_files: I,
    options: QueryOptions,
) -> AffectedSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result = AffectedSet::default();

    for file in changed_files {
        let file = file.as_ref();
        let Some(package) = graph.package_of(file) else {
            debug!(file, "Changed file is not part of any scanned package");
            result.unknown_files.push(file.to_string());
            continue;
        };

        trace!(file, package = %package, "Resolved changed file");
        if !result.changed_packages.insert(package.clone()) {
            continue;
        }

        if let Some(dependents) = downstreams.dependents_of(package.as_str()) {
            result.packages.extend(dependents.iter().cloned());
        }
    }

    if options.include_changed {
        result
            .packages
            .extend(result.changed_packages.iter().cloned());
    }

    debug!(
        affected = result.packages.len(),
        changed_packages = result.changed_packages.len(),
        unknown_files = result.unknown_files.len(),
        "Computed affected set"
    );

    result
}
