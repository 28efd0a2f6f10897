//! Portal HTTP Server Binary
//!
//! Entry point of the services portal REST API. Initializes the repository,
//! builds the router and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Empty in-memory repository
//! cargo run --bin portal-server
//!
//! # In-memory repository seeded with the demo fixture
//! REPOSITORY_TYPE=fixture PORTAL_SEED_FILE=data/portal-seed.json \
//!   cargo run --bin portal-server
//! ```
//!
//! A `portal.toml` in the working directory, `backend/` or the parent
//! directory takes precedence over the environment.
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `REPOSITORY_TYPE`: `local` or `fixture`
//! - `PORTAL_SEED_FILE`: seed fixture of the `fixture` repository
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use integraupt_portal::db;
use integraupt_portal::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Also installs the `log` bridge used by the library modules
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting services portal HTTP server");

    db::init_repository()?;
    let repository = std::sync::Arc::clone(db::get_repository()?);
    info!("Repository initialized successfully");

    let state = AppState::new(repository);
    let app = create_router(state);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
