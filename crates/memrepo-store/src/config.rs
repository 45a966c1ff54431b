use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RepoError, RepoResult};

/// Configuration for a [`MemoryRepository`](crate::MemoryRepository).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Number of entities to preallocate room for.
    pub initial_capacity: usize,
    /// When `true`, a lookup that finds more than one matching entity fails
    /// with [`RepoError::AmbiguousMatch`]. When `false`, the first match in
    /// iteration order wins.
    pub detect_ambiguity: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            detect_ambiguity: true,
        }
    }
}

impl RepositoryConfig {
    /// A configuration that skips the ambiguity check and returns the first
    /// match.
    pub fn lenient() -> Self {
        Self {
            detect_ambiguity: false,
            ..Default::default()
        }
    }

    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> RepoResult<Self> {
        toml::from_str(s).map_err(|e| RepoError::Config(e.to_string()))
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> RepoResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Render this configuration as TOML.
    pub fn to_toml_string(&self) -> RepoResult<String> {
        toml::to_string(self).map_err(|e| RepoError::Config(e.to_string()))
    }
}
