//! Error types for fanout operations.
//!
//! Every variant of [`Error`] is fatal: a run either completes with a full
//! graph or produces no answer at all. A partial graph would under-report the
//! affected packages, so there is no "best effort" mode.
//!
//! Recoverable misses are not errors:
//! - a changed file that no scanned package owns is an `Option::None` lookup,
//!   reported in [`AffectedSet::unknown_files`](crate::AffectedSet::unknown_files)
//! - a read failure on the changed-file stream is carried in
//!   [`ChangedFiles::read_error`](crate::ChangedFiles::read_error) next to the
//!   lines read before it
//!
//! ## Error Categorization
//!
//! - Configuration problems: the run was pointed at the wrong place
//! - Scan problems: the source tree could not be read or parsed

use std::path::PathBuf;
use thiserror::Error;

/// Result type for fanout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for fanout operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),

    /// The scan finished without discovering a single source file
    #[error("no Go source files found under {}; is the root configured correctly?", tree.display())]
    NoSourceFiles {
        /// Source tree that was scanned
        tree: PathBuf,
    },

    /// A directory or file in the source tree could not be read
    #[error("I/O error at {}", path.display())]
    Io {
        /// Path being read when the failure happened
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A source file could not be parsed
    #[error("failed to parse {}: {message}", path.display())]
    Parse {
        /// Path of the malformed file
        path: PathBuf,
        /// What the parser rejected
        message: String,
    },

    /// Tree-sitter parsing infrastructure failed
    #[error("parser error: {0}")]
    Parser(String),

    /// Writing results failed
    #[error("failed to write output")]
    Output(#[source] std::io::Error),
}

impl Error {
    /// Create an I/O error for a path.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a parse error for a file.
    #[must_use]
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if the run was misconfigured (wrong root, bad config file).
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::NoSourceFiles { .. })
    }

    /// Returns `true` if the source tree could not be read or parsed.
    #[must_use]
    pub fn is_scan_error(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Parse { .. } | Self::Parser(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_categorization() {
        assert!(Error::Config("bad".to_string()).is_config_error());
        assert!(
            Error::NoSourceFiles {
                tree: PathBuf::from("/go/src")
            }
            .is_config_error()
        );
        assert!(!Error::Config("bad".to_string()).is_scan_error());

        let io = Error::io("/go/src/db", std::io::Error::other("denied"));
        assert!(io.is_scan_error());
        assert!(Error::parse("db.go", "expected 'package'").is_scan_error());
        assert!(!Error::parse("db.go", "expected 'package'").is_config_error());

        let output = Error::Output(std::io::Error::other("closed"));
        assert!(!output.is_scan_error());
        assert!(!output.is_config_error());
    }

    #[test]
    fn parse_error_display_includes_path_and_message() {
        let error = Error::parse("src/db/db.go", "missing package clause");

        let display = error.to_string();
        assert!(display.contains("src/db/db.go"));
        assert!(display.contains("missing package clause"));
    }

    #[test]
    fn io_error_keeps_source_in_chain() {
        let error = Error::io("/go/src/private", std::io::Error::other("permission denied"));

        assert!(error.to_string().contains("/go/src/private"));
        let source = std::error::Error::source(&error).expect("io error should have a source");
        assert_eq!(source.to_string(), "permission denied");
    }

    #[test]
    fn no_source_files_hints_at_root() {
        let error = Error::NoSourceFiles {
            tree: PathBuf::from("/home/me/go/src"),
        };

        assert!(error.to_string().contains("/home/me/go/src"));
        assert!(error.to_string().contains("root"));
    }
}
