//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, lookup clients and the Axum server
//! lifecycle.

use crate::application::services::{LocationEnricher, StoreService};
use crate::config::Config;
use crate::infrastructure::lookup::{OpenCageClient, ViaCepClient};
use crate::infrastructure::persistence::PgStoreRepository;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Opens the PostgreSQL pool with the configured limits.
///
/// # Errors
///
/// Returns an error if no connection can be established.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Builds the ViaCEP + OpenCage enrichment pipeline from configuration.
///
/// # Errors
///
/// Returns an error if an HTTP client cannot be built or a base URL is invalid.
pub fn build_enricher(config: &Config) -> Result<LocationEnricher> {
    let addresses = ViaCepClient::with_base_url(&config.viacep_base_url, config.lookup_timeout_secs)
        .context("Failed to build ViaCEP client")?;
    let coordinates = OpenCageClient::with_base_url(
        &config.opencage_api_key,
        &config.opencage_base_url,
        config.lookup_timeout_secs,
    )
    .context("Failed to build OpenCage client")?;

    Ok(LocationEnricher::new(
        Arc::new(addresses),
        Arc::new(coordinates),
    ))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - ViaCEP and OpenCage clients
/// - Axum HTTP server with graceful shutdown on Ctrl-C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - A lookup client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    let enricher = build_enricher(&config)?;
    let repository = Arc::new(PgStoreRepository::new(Arc::new(pool)));
    let store_service =
        StoreService::new(repository, enricher).with_radius(config.search_radius_km);

    let state = AppState::new(store_service);
    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
