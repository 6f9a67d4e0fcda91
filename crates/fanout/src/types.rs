//! Domain types for fanout.
//!
//! - **Identifiers**: `PackageId`, `FileId` (graph nodes and their members)
//! - **Scanner output**: `SourceTree`, `DirectoryScan`, `ScannedPackage` (input to the graph builder)
//!
//! ## Design Decisions
//!
//! | Decision | Choice | Rationale |
//! |----------|--------|-----------|
//! | Identifiers | Newtypes over `String` | Package and file paths cannot be swapped by accident |
//! | Map keys | `Borrow<str>` | Lookups by `&str` without allocating |
//! | Path separator | Always `/` | Identifiers match import paths on every platform |

use std::borrow::Borrow;
use std::fmt;
use std::path::PathBuf;

// ============================================================================
// Strongly-typed identifiers
// ============================================================================

/// A package identifier: the package directory's import path relative to the
/// source tree root (`github.com/acme/db`, or `.` for the root itself).
///
/// Import targets that were never scanned (the standard library, third-party
/// code outside the tree) are also `PackageId`s; they are leaves of the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId(String);

impl PackageId {
    /// Create a package identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// View the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A file identifier: the file's path relative to the configured root, e.g.
/// `src/github.com/acme/db/db.go`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(String);

impl FileId {
    /// Create a file identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// View the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! string_id_impls {
    ($ty:ident) => {
        impl Borrow<str> for $ty {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $ty {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $ty {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id_impls!(PackageId);
string_id_impls!(FileId);

// ============================================================================
// Scanner output
// ============================================================================

/// One Go package clause found in a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedPackage {
    /// Name from the `package` clause (`db`, `db_test`, `main`)
    pub name: String,
    /// Member files
    pub files: Vec<FileId>,
    /// Raw import paths referenced by the member files, duplicates included
    pub imports: Vec<String>,
}

impl ScannedPackage {
    /// Create an empty package with the given clause name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
            imports: Vec::new(),
        }
    }
}

/// Everything the scanner found in a single directory.
///
/// A directory without Go files has no packages. A directory holding an
/// external test package next to the package under test has two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryScan {
    /// Import path of the directory; shared by every package in it
    pub import_path: PackageId,
    /// Packages declared by the directory's files
    pub packages: Vec<ScannedPackage>,
}

impl DirectoryScan {
    /// Create a scan result for a directory.
    #[must_use]
    pub fn new(import_path: impl Into<PackageId>, packages: Vec<ScannedPackage>) -> Self {
        Self {
            import_path: import_path.into(),
            packages,
        }
    }

    /// Number of files across all packages in the directory.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.packages.iter().map(|p| p.files.len()).sum()
    }
}

/// Complete scanner output for one source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTree {
    /// Directory that was scanned
    pub path: PathBuf,
    /// One entry per directory visited, in no particular order
    pub directories: Vec<DirectoryScan>,
}

impl SourceTree {
    /// Create scanner output for a tree.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, directories: Vec<DirectoryScan>) -> Self {
        Self {
            path: path.into(),
            directories,
        }
    }

    /// Number of files across all directories.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.directories.iter().map(DirectoryScan::file_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn package_id_lookup_by_str() {
        let mut map: HashMap<PackageId, usize> = HashMap::new();
        map.insert(PackageId::from("github.com/acme/db"), 1);

        assert_eq!(map.get("github.com/acme/db"), Some(&1));
        assert_eq!(map.get("github.com/acme"), None);
    }

    #[test]
    fn ids_display_as_raw_string() {
        assert_eq!(PackageId::new("acme/db").to_string(), "acme/db");
        assert_eq!(FileId::new("src/acme/db/db.go").to_string(), "src/acme/db/db.go");
    }

    #[test]
    fn directory_file_count_spans_packages() {
        let mut lib = ScannedPackage::new("db");
        lib.files.push(FileId::from("src/db/db.go"));
        lib.files.push(FileId::from("src/db/conn.go"));
        let mut external_test = ScannedPackage::new("db_test");
        external_test.files.push(FileId::from("src/db/db_test.go"));

        let scan = DirectoryScan::new("db", vec![lib, external_test]);

        assert_eq!(scan.file_count(), 3);
        assert_eq!(DirectoryScan::new("empty", vec![]).file_count(), 0);
    }
}
