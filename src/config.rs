//! Configuration for kvlite
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a Store instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the backing database file (created if missing)
    pub path: PathBuf,

    /// Name of the backing table (created if missing)
    ///
    /// Interpolated into SQL text (identifiers cannot be bound as
    /// parameters), so `open` rejects anything that is not a bare
    /// identifier of the form `[A-Za-z_][A-Za-z0-9_]*`.
    pub table_name: String,

    // -------------------------------------------------------------------------
    // Query Configuration
    // -------------------------------------------------------------------------
    /// Escape LIKE metacharacters (`%`, `_`) in `find` prefixes
    ///
    /// Off by default: a prefix such as `"50%"` then matches more broadly
    /// than a literal prefix would. Turn on for literal prefix semantics.
    pub escape_like_wildcards: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./kvs.db"),
            table_name: "items".to_string(),
            escape_like_wildcards: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the backing database file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the backing table name
    pub fn table_name(mut self, name: impl Into<String>) -> Self {
        self.config.table_name = name.into();
        self
    }

    /// Escape LIKE metacharacters in `find` prefixes
    pub fn escape_like_wildcards(mut self, escape: bool) -> Self {
        self.config.escape_like_wildcards = escape;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
