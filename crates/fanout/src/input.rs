//! Reading the changed-file list.
//!
//! The list is newline-delimited and read to end of stream. Bad lines are
//! skipped; a read failure ends the list but keeps what was read before it.

use std::io::BufRead;

use tracing::warn;

/// Changed files read from a stream.
#[derive(Debug, Default)]
pub struct ChangedFiles {
    /// Paths in input order
    pub files: Vec<String>,
    /// Lines skipped because they were blank or not valid UTF-8
    pub skipped_lines: usize,
    /// Error that stopped reading early, if any
    pub read_error: Option<std::io::Error>,
}

impl ChangedFiles {
    /// Read paths from `reader` until end of stream or the first read error.
    ///
    /// A trailing `\r` is removed from each line.
    pub fn read<R: BufRead>(reader: R) -> Self {
        let mut changed = Self::default();

        for (index, line) in reader.split(b'\n').enumerate() {
            let mut line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!(line = index + 1, error = %e, "Failed to read changed files");
                    changed.read_error = Some(e);
                    break;
                }
            };
            if line.last() == Some(&b'\r') {
                line.pop();
            }

            match String::from_utf8(line) {
                Ok(path) if path.trim().is_empty() => changed.skipped_lines += 1,
                Ok(path) => changed.files.push(path),
                Err(_) => {
                    warn!(line = index + 1, "Skipping changed-file line that is not valid UTF-8");
                    changed.skipped_lines += 1;
                }
            }
        }

        changed
    }

    /// Wrap paths given directly, e.g. as command-line arguments.
    #[must_use]
    pub fn from_paths(paths: Vec<String>) -> Self {
        Self {
            files: paths,
            ..Self::default()
        }
    }
}
