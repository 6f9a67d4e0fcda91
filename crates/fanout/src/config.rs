//! Configuration management for fanout.
//!
//! Settings come from three layers, highest precedence first:
//!
//! 1. Command-line flags (and `GOPATH` for the root)
//! 2. A YAML configuration file passed with `--config`
//! 3. Built-in defaults
//!
//! ```yaml
//! root: /home/me/go
//! source-dir: src
//! skip:
//!   - zz_generated.go
//! include-changed: false
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default source directory under the root.
pub const DEFAULT_SOURCE_DIR: &str = "src";

/// Configuration file structure. Every key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    /// Root directory; file identifiers are relative to it
    pub root: Option<PathBuf>,

    /// Source tree directory, relative to the root
    pub source_dir: Option<PathBuf>,

    /// File names excluded from scanning
    #[serde(default)]
    pub skip: Vec<String>,

    /// Report the packages owning changed files as affected too
    pub include_changed: Option<bool>,
}

impl ConfigFile {
    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or is not valid YAML
    /// for this structure.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("invalid config file {}: {e}", path.display())))
    }

    /// Parse configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns the YAML error if the text does not describe a `ConfigFile`.
    pub fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }
}

/// Command-line overrides, as parsed by the binary.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--root`, or `GOPATH` when the flag is absent
    pub root: Option<PathBuf>,
    /// `--source-dir`
    pub source_dir: Option<PathBuf>,
    /// `--skip`, already split on commas
    pub skip: Vec<String>,
    /// `--include-changed`
    pub include_changed: bool,
}

/// Resolved configuration for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root directory; file identifiers are relative to it
    pub root: PathBuf,
    /// Source tree directory, relative to the root
    pub source_dir: PathBuf,
    /// File names excluded from scanning
    pub skip: BTreeSet<String>,
    /// Report the packages owning changed files as affected too
    pub include_changed: bool,
}

impl Config {
    /// Create a configuration with defaults for everything but the root.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            skip: BTreeSet::new(),
            include_changed: false,
        }
    }

    /// Merge command-line overrides over an optional configuration file.
    ///
    /// Skip lists from both layers are combined.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if neither layer names a root.
    pub fn resolve(file: ConfigFile, overrides: Overrides) -> Result<Self> {
        let root = overrides.root.or(file.root).ok_or_else(|| {
            Error::Config("no root directory configured; pass --root or set GOPATH".to_string())
        })?;

        let mut config = Self::new(root);
        if let Some(source_dir) = overrides.source_dir.or(file.source_dir) {
            config.source_dir = source_dir;
        }
        config.skip = file
            .skip
            .into_iter()
            .chain(overrides.skip)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        config.include_changed = overrides.include_changed || file.include_changed.unwrap_or(false);

        Ok(config)
    }

    /// Directory the scanner walks: the root joined with the source dir.
    #[must_use]
    pub fn source_tree(&self) -> PathBuf {
        self.root.join(&self.source_dir)
    }

    /// Check that the root and source tree exist and are directories.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the offending path.
    pub fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(Error::Config("root directory is empty".to_string()));
        }
        if self.source_dir.is_absolute() {
            return Err(Error::Config(format!(
                "source dir must be relative to the root: {}",
                self.source_dir.display()
            )));
        }
        for (what, path) in [("root", self.root.clone()), ("source tree", self.source_tree())] {
            if !path.is_dir() {
                return Err(Error::Config(format!(
                    "{what} is not a directory: {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Split comma-separated skip lists, as accepted by `--skip`.
#[must_use]
pub fn split_skip_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect()
}
