//! Repository configuration file support.
//!
//! This module provides utilities for reading repository configuration from
//! TOML configuration files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::RepositoryError;

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

impl RepositoryConfig {
    /// Parse a configuration file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let raw = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!(
                "cannot read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        toml::from_str(&raw).map_err(|e| {
            RepositoryError::configuration(format!(
                "cannot parse {}: {}",
                path.as_ref().display(),
                e
            ))
        })
    }

    /// Load from the default location.
    ///
    /// Searches `$AGENDA_CONFIG` first, then `repository.toml` in the current
    /// directory.
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        for candidate in Self::default_locations() {
            if candidate.exists() {
                return Self::from_file(candidate);
            }
        }
        Err(RepositoryError::configuration(
            "no repository.toml found in default locations",
        ))
    }

    fn default_locations() -> Vec<PathBuf> {
        let mut locations = Vec::new();
        if let Ok(path) = std::env::var("AGENDA_CONFIG") {
            locations.push(PathBuf::from(path));
        }
        locations.push(PathBuf::from("repository.toml"));
        locations
    }

    /// The configured repository type.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }
}
