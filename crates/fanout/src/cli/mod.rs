//! CLI command implementations.

use std::path::PathBuf;

use fanout::Overrides;

pub mod affected;

/// Parsed command-line arguments, independent of clap.
pub struct Args {
    /// `--config` file, if given
    pub config: Option<PathBuf>,
    /// Flag values layered over the config file
    pub overrides: Overrides,
    /// Changed files given as arguments
    pub files: Vec<String>,
}
