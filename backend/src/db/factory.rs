//! Repository factory for dependency injection.
//!
//! This module provides utilities for creating and configuring repository instances
//! based on runtime configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use super::seed::PortalSeed;

/// Environment variable naming the seed fixture of the `fixture` type.
pub const SEED_FILE_ENV: &str = "PORTAL_SEED_FILE";

/// Default fixture location, relative to the working directory.
pub const DEFAULT_SEED_FILE: &str = "data/portal-seed.json";

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// Empty in-memory repository
    Local,
    /// In-memory repository pre-populated from a JSON seed file
    Fixture,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("local", "fixture").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            "fixture" | "seed" => Ok(Self::Fixture),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variable.
    ///
    /// Reads `REPOSITORY_TYPE`. Defaults to Fixture if `PORTAL_SEED_FILE` is
    /// set, otherwise Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse().unwrap_or(Self::Local);
        }

        if std::env::var(SEED_FILE_ENV).is_ok() {
            Self::Fixture
        } else {
            Self::Local
        }
    }
}

fn seed_file_from_env() -> PathBuf {
    std::env::var(SEED_FILE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SEED_FILE))
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```
/// use integraupt_portal::db::repository::ScheduleRepository;
/// use integraupt_portal::db::{RepositoryFactory, RepositoryType};
///
/// let repo = RepositoryFactory::create(RepositoryType::Local, None).unwrap();
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// assert!(rt.block_on(repo.health_check()).unwrap());
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `seed_file` - Fixture path (required for Fixture)
    pub fn create(
        repo_type: RepositoryType,
        seed_file: Option<&Path>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::Fixture => {
                let path = seed_file.ok_or_else(|| {
                    RepositoryError::configuration("Fixture repository requires a seed file")
                })?;
                let repo = Self::create_fixture(path)?;
                Ok(repo as Arc<dyn FullRepository>)
            }
        }
    }

    /// Create an empty in-memory repository.
    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create an in-memory repository populated from a seed file.
    pub fn create_fixture<P: AsRef<Path>>(path: P) -> RepositoryResult<Arc<LocalRepository>> {
        let seed = PortalSeed::from_file(path.as_ref())?;
        log::info!(
            "Loaded portal seed from {} ({} spaces, {} reservations)",
            path.as_ref().display(),
            seed.spaces.len(),
            seed.reservations.len()
        );
        Ok(Arc::new(LocalRepository::from_seed(seed)))
    }

    /// Create repository from environment configuration.
    ///
    /// Reads `REPOSITORY_TYPE` and `PORTAL_SEED_FILE`. The seed file defaults to
    /// `data/portal-seed.json`.
    pub fn from_env() -> RepositoryResult<Arc<dyn FullRepository>> {
        match RepositoryType::from_env() {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::Fixture => {
                let path = seed_file_from_env();
                Self::create(RepositoryType::Fixture, Some(&path))
            }
        }
    }

    /// Create repository from a TOML configuration file.
    ///
    /// A relative `seed_file` is resolved against the configuration file's directory.
    pub fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        let config_path = config_path.as_ref();
        let config = RepositoryConfig::from_file(config_path)?;
        Self::from_repository_config(&config, config_path.parent())
    }

    /// Create repository from the default configuration file location.
    ///
    /// Searches for `portal.toml` in standard locations; a relative `seed_file`
    /// is resolved against the directory the file was found in.
    pub fn from_default_config() -> RepositoryResult<Arc<dyn FullRepository>> {
        let (config, path) = RepositoryConfig::from_default_location()?;
        Self::from_repository_config(&config, path.parent())
    }

    /// Create repository from a RepositoryConfig instance.
    pub fn from_repository_config(
        config: &RepositoryConfig,
        base_dir: Option<&Path>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        let seed_file = config.seed_file()?.map(|path| match base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        });

        Self::create(repo_type, seed_file.as_deref())
    }
}

/// Builder for configuring repository creation.
///
/// # Example
/// ```
/// use integraupt_portal::db::repository::ScheduleRepository;
/// use integraupt_portal::db::{RepositoryBuilder, RepositoryType};
///
/// let repo = RepositoryBuilder::new()
///     .repository_type(RepositoryType::Local)
///     .build()
///     .unwrap();
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// assert!(rt.block_on(repo.list_spaces()).unwrap().is_empty());
/// ```
pub struct RepositoryBuilder {
    repo_type: RepositoryType,
    seed_file: Option<PathBuf>,
}

impl Default for RepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryBuilder {
    /// Create a new repository builder with default settings.
    pub fn new() -> Self {
        Self {
            repo_type: RepositoryType::Local,
            seed_file: None,
        }
    }

    /// Set the repository type.
    pub fn repository_type(mut self, repo_type: RepositoryType) -> Self {
        self.repo_type = repo_type;
        self
    }

    /// Set the fixture file. Implies the Fixture type.
    pub fn seed_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.repo_type = RepositoryType::Fixture;
        self.seed_file = Some(path.into());
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env(mut self) -> Self {
        self.repo_type = RepositoryType::from_env();
        if self.repo_type == RepositoryType::Fixture {
            self.seed_file = Some(seed_file_from_env());
        }
        self
    }

    /// Load configuration from a TOML file.
    pub fn from_config_file<P: AsRef<Path>>(
        mut self,
        config_path: P,
    ) -> Result<Self, RepositoryError> {
        let repo_config = RepositoryConfig::from_file(config_path)?;

        self.repo_type = repo_config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;
        self.seed_file = repo_config.seed_file()?.map(Path::to_path_buf);

        Ok(self)
    }

    /// Build the repository instance.
    pub fn build(self) -> RepositoryResult<Arc<dyn FullRepository>> {
        RepositoryFactory::create(self.repo_type, self.seed_file.as_deref())
    }
}
