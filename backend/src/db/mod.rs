//! Storage for the services portal.
//!
//! Data access goes through the Repository pattern so the HTTP layer and the
//! service functions never depend on a concrete backend.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP API (axum handlers)                               │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - Form validation and reservation creation             │
//! │  - Status changes with audit records                    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/)                        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  LocalRepository (in-memory, optionally seeded)         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```
//! use integraupt_portal::db::{services, RepositoryFactory};
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let repo = RepositoryFactory::create_local();
//! let grid_blocks = rt.block_on(services::list_block_options(repo.as_ref())).unwrap();
//! assert!(grid_blocks.is_empty());
//! ```

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod seed;
pub mod services;

pub use factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
pub use repository::{
    AuditRepository, CatalogRepository, ErrorContext, FullRepository, RepositoryError,
    RepositoryResult, ReservationRepository, ScheduleRepository,
};
pub use seed::PortalSeed;

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn FullRepository>> = OnceLock::new();

/// Initialize the global repository singleton.
///
/// Uses `portal.toml` when one is found, otherwise the environment. A
/// `portal.toml` that exists but cannot be loaded is an error.
pub fn init_repository() -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    let repo = match RepositoryConfig::locate() {
        Some(path) => RepositoryFactory::from_config_file(&path),
        None => RepositoryFactory::from_env(),
    }
    .map_err(|e| anyhow::Error::msg(e.to_string()))
    .context("Failed to initialize the portal repository")?;

    let _ = REPOSITORY.set(repo);
    Ok(())
}

/// Get a reference to the global repository instance.
pub fn get_repository() -> Result<&'static Arc<dyn FullRepository>> {
    if REPOSITORY.get().is_none() {
        init_repository()?;
    }

    REPOSITORY
        .get()
        .context("Repository not initialized. Call init_repository() first.")
}
