//! Twinfetch HTTP API Server
//!
//! Serves the Deathbat twin lookup and a server-rendered page using it:
//! - `GET /twin?token_id=N` returns a Deathbat and its closest twin
//! - `GET /?token_id=N` renders the twin page through the client
//! - Current owners are refreshed from the marketplace when enabled

pub mod config;
pub mod error;
pub mod handlers;
pub mod owner;
pub mod routes;

use anyhow::{bail, Context, Result};
use axum::Router;
use config::ServerConfig;
use handlers::{AppState, FrontendState};
use owner::{OpenSeaOwners, OwnerLookup, StaticOwners};
use std::future::{Future, IntoFuture};
use std::io;
use std::sync::Arc;
use tracing::info;
use twinfetch_core::{Catalog, FetcherConfig};

pub use error::{ApiError, OwnerError};

pub fn create_app(state: AppState) -> Router {
    routes::backend_router(state)
}

pub fn create_frontend(state: FrontendState) -> Router {
    routes::frontend_router(state)
}

impl AppState {
    /// Load the catalog and pick the owner source described by `cfg`
    pub fn from_config(cfg: &ServerConfig, client: reqwest::Client) -> Result<Self> {
        let catalog = Catalog::load(&cfg.catalog_path).context("loading catalog")?;
        let owners: Arc<dyn OwnerLookup> = if cfg.owner_lookup {
            Arc::new(OpenSeaOwners::new(client, cfg.owner_api_base.clone()))
        } else {
            Arc::new(StaticOwners::default())
        };
        Ok(Self {
            catalog: Arc::new(catalog),
            owners,
        })
    }
}

impl FrontendState {
    pub fn from_config(cfg: &ServerConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            fetcher: FetcherConfig {
                endpoint: cfg.twin_endpoint.clone(),
                ..FetcherConfig::default()
            },
        }
    }
}

/// Run backend and frontend until either fails or ctrl-c arrives
pub async fn serve(cfg: ServerConfig) -> Result<()> {
    let client = reqwest::Client::builder()
        .build()
        .context("building http client")?;

    let backend = create_app(AppState::from_config(&cfg, client.clone())?);
    let frontend = create_frontend(FrontendState::from_config(&cfg, client));

    let backend_listener = tokio::net::TcpListener::bind(cfg.backend_addr)
        .await
        .with_context(|| format!("binding {}", cfg.backend_addr))?;
    info!(addr = %cfg.backend_addr, "twin service listening");

    let frontend_listener = tokio::net::TcpListener::bind(cfg.frontend_addr)
        .await
        .with_context(|| format!("binding {}", cfg.frontend_addr))?;
    info!(addr = %cfg.frontend_addr, "frontend listening");

    run_until_shutdown(
        axum::serve(backend_listener, backend).into_future(),
        axum::serve(frontend_listener, frontend).into_future(),
        tokio::signal::ctrl_c(),
    )
    .await
}

/// Drive both servers; only `shutdown` completing ends the run with `Ok`
async fn run_until_shutdown(
    backend: impl Future<Output = io::Result<()>>,
    frontend: impl Future<Output = io::Result<()>>,
    shutdown: impl Future<Output = io::Result<()>>,
) -> Result<()> {
    tokio::select! {
        r = backend => server_exit("twin service", r),
        r = frontend => server_exit("frontend", r),
        r = shutdown => {
            r.context("listening for ctrl-c")?;
            info!("shutdown requested");
            Ok(())
        }
    }
}

fn server_exit(name: &str, result: io::Result<()>) -> Result<()> {
    result.with_context(|| format!("{name} failed"))?;
    bail!("{name} stopped unexpectedly")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::{pending, ready};

    #[tokio::test]
    async fn test_server_error_is_returned() {
        let err = run_until_shutdown(
            ready(Err(io::Error::other("boom"))),
            pending(),
            pending(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "twin service failed");
        assert_eq!(err.root_cause().to_string(), "boom");
    }

    #[tokio::test]
    async fn test_server_exit_without_error_is_unexpected() {
        let err = run_until_shutdown(pending(), ready(Ok(())), pending())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "frontend stopped unexpectedly");
    }

    #[tokio::test]
    async fn test_shutdown_returns_ok() {
        let result = run_until_shutdown(pending(), pending(), ready(Ok(()))).await;
        assert!(result.is_ok());
    }
}
