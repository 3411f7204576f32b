//! core::config
//!
//! Repository configuration schema and loading.
//!
//! # Overview
//!
//! One config scope: the repository, at `.stratum/config.toml`. Written
//! once by `init`, read by `Repository::open`. The schema is strict and
//! self-describing; unknown fields are rejected.
//!
//! # Example
//!
//! ```toml
//! format_version = 1
//! default_branch = "master"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::RepoError;
use super::types::BranchName;

/// Current on-disk format version.
pub const FORMAT_VERSION: u32 = 1;

/// Repository configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RepoConfig {
    /// On-disk format version. Bumped when the object or ref layout
    /// changes incompatibly.
    pub format_version: u32,

    /// Branch created and pointed at by HEAD on `init`.
    pub default_branch: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            default_branch: "master".to_string(),
        }
    }
}

impl RepoConfig {
    /// Create a config with a chosen default branch.
    pub fn with_default_branch(branch: &BranchName) -> Self {
        Self {
            default_branch: branch.as_str().to_string(),
            ..Self::default()
        }
    }

    /// Load and validate the config at `path`.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Config` on parse failure or invalid values;
    /// `RepoError::Storage` if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, RepoError> {
        let raw = fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&raw).map_err(|e| RepoError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config to TOML.
    pub fn to_toml(&self) -> Result<String, RepoError> {
        toml::to_string_pretty(self).map_err(|e| RepoError::Config(e.to_string()))
    }

    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Config` if any value is invalid.
    pub fn validate(&self) -> Result<(), RepoError> {
        if self.format_version != FORMAT_VERSION {
            return Err(RepoError::Config(format!(
                "unsupported format version {} (this build supports {})",
                self.format_version, FORMAT_VERSION
            )));
        }
        BranchName::new(&self.default_branch)
            .map_err(|e| RepoError::Config(format!("default_branch: {e}")))?;
        Ok(())
    }
}
