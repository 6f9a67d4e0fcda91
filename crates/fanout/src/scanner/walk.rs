//! Source tree discovery.
//!
//! Walks the source tree and lists every directory with the Go files it
//! contains. The walk does not follow symlinked directories. Any directory
//! that cannot be read fails the whole walk: a silently skipped directory
//! would drop packages from the graph.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Extension of Go source files.
const GO_EXTENSION: &str = ".go";

/// A directory in the source tree and its Go files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDirectory {
    /// Directory path (the tree root joined with the relative path)
    pub path: PathBuf,
    /// Go files directly inside the directory, sorted
    pub files: Vec<PathBuf>,
}

/// Result of walking a source tree.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Every directory visited, including ones without Go files
    pub directories: Vec<SourceDirectory>,
    /// Go files excluded by the skip list
    pub files_skipped: usize,
}

/// Walk `tree`, collecting Go files not named in `skip`.
///
/// # Errors
///
/// Returns [`Error::Io`] if any directory or directory entry cannot be read.
pub fn discover(tree: &Path, skip: &BTreeSet<String>) -> Result<Discovery> {
    let mut discovery = Discovery::default();
    walk_dir(tree, skip, &mut discovery)?;
    debug!(
        tree = %tree.display(),
        directories = discovery.directories.len(),
        files_skipped = discovery.files_skipped,
        "Discovered source directories"
    );
    Ok(discovery)
}

fn walk_dir(dir: &Path, skip: &BTreeSet<String>, discovery: &mut Discovery) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    let mut files = Vec::new();
    let mut subdirs = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| Error::io(&path, e))?;

        if file_type.is_dir() {
            subdirs.push(path);
            continue;
        }
        if file_type.is_symlink() && !path.is_file() {
            trace!(path = %path.display(), "Not following symlink");
            continue;
        }

        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            trace!(path = %path.display(), "Skipping non UTF-8 file name");
            continue;
        };
        if !name.ends_with(GO_EXTENSION) {
            continue;
        }
        if skip.contains(name) {
            trace!(path = %path.display(), "Skipping file on skip list");
            discovery.files_skipped += 1;
            continue;
        }
        files.push(path);
    }

    files.sort();
    discovery.directories.push(SourceDirectory {
        path: dir.to_path_buf(),
        files,
    });

    subdirs.sort();
    for subdir in subdirs {
        walk_dir(&subdir, skip, discovery)?;
    }

    Ok(())
}

/// Render `path` relative to `base` with `/` separators.
///
/// Returns `.` when `path` is `base` itself. Paths outside `base` are rendered
/// whole.
#[must_use]
pub fn slash_relative(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}
