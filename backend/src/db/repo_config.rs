//! Repository configuration file support.
//!
//! Reads the `[repository]` section of `portal.toml`:
//!
//! ```toml
//! [repository]
//! type = "fixture"
//! seed_file = "data/portal-seed.json"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::{ErrorContext, RepositoryError};

const CONFIG_SEARCH_PATHS: [&str; 3] = ["portal.toml", "backend/portal.toml", "../portal.toml"];

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
    /// JSON fixture loaded by the `fixture` repository type.
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if successful
    /// * `Err(RepositoryError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration_with_context(
                format!("Failed to read config file: {}", e),
                ErrorContext::new("load_config").with_details(path.display().to_string()),
            )
        })?;

        let config: RepositoryConfig = toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration_with_context(
                format!("Failed to parse config file: {}", e),
                ErrorContext::new("load_config").with_details(path.display().to_string()),
            )
        })?;

        Ok(config)
    }

    /// Path of the first `portal.toml` found below `base`.
    ///
    /// Searches, relative to `base`:
    /// 1. `portal.toml`
    /// 2. `backend/portal.toml`
    /// 3. `../portal.toml`
    pub fn locate_in(base: &Path) -> Option<PathBuf> {
        CONFIG_SEARCH_PATHS
            .iter()
            .map(|candidate| base.join(candidate))
            .find(|path| path.is_file())
    }

    /// Path of the first `portal.toml` found from the working directory.
    pub fn locate() -> Option<PathBuf> {
        Self::locate_in(Path::new(""))
    }

    /// Load repository configuration from the default location.
    ///
    /// Returns the configuration together with the file it was read from, so
    /// relative paths inside it can be resolved against that file's directory.
    pub fn from_default_location() -> Result<(Self, PathBuf), RepositoryError> {
        let path = Self::locate().ok_or_else(|| {
            RepositoryError::configuration_with_context(
                "No portal.toml found in standard locations",
                ErrorContext::new("load_config"),
            )
        })?;
        let config = Self::from_file(&path)?;
        Ok((config, path))
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// Seed file to load, required for the `fixture` type.
    pub fn seed_file(&self) -> Result<Option<&Path>, RepositoryError> {
        let repo_type = self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        match (repo_type, self.repository.seed_file.as_deref()) {
            (RepositoryType::Fixture, None) => Err(RepositoryError::configuration(
                "Fixture repository requires 'repository.seed_file' setting",
            )),
            (RepositoryType::Fixture, Some(path)) => Ok(Some(path)),
            (RepositoryType::Local, _) => Ok(None),
        }
    }
}
