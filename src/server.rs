//! HTTP server initialization and runtime setup.
//!
//! Handles storage selection, geo-IP setup, worker spawning, and the Axum
//! server lifecycle.

use crate::application::click_worker::run_click_worker;
use crate::config::{Config, StorageBackend};
use crate::domain::enrichment::GeoLocator;
use crate::infrastructure::geoip::{DisabledLocator, IpApiLocator};
use crate::infrastructure::persistence::Storage;
use crate::routes::app_router;
use crate::state::{AppState, click_recorder};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

const CONNECT_ATTEMPTS: usize = 5;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage (PostgreSQL pool with migrations, or the in-memory store)
/// - Geo-IP locator
/// - Background click worker
/// - Axum HTTP server with graceful shutdown
///
/// On shutdown the click queue is closed and queued clicks are drained
/// before returning.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migrations fail
/// - The geo-IP client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let storage = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = connect_database(&config).await?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to apply database migrations")?;
            tracing::info!("Migrations applied");

            Storage::postgres(pool)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Storage::in_memory()
        }
    };

    let geo_locator = build_geo_locator(&config)?;

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);

    let recorder = click_recorder(&storage, geo_locator.clone());
    let worker = tokio::spawn(run_click_worker(
        click_rx,
        recorder,
        config.click_worker_concurrency,
    ));
    tracing::info!(
        concurrency = config.click_worker_concurrency,
        "Click worker started"
    );

    let state = AppState::new(
        &storage,
        geo_locator,
        click_tx,
        &config.public_base_url,
        &config.frontend_url,
        config.behind_proxy,
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address: {}", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    // The router owns the last click sender; it is dropped when serve returns,
    // which closes the queue and lets the worker drain.
    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped, draining click queue");
    worker.await.context("Click worker panicked")?;

    Ok(())
}

/// Connects to PostgreSQL, retrying with exponential backoff.
async fn connect_database(config: &Config) -> Result<PgPool> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for the postgres backend")?;

    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime));

    let strategy = ExponentialBackoff::from_millis(200)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(CONNECT_ATTEMPTS);

    let pool = Retry::spawn(strategy, || async {
        options.clone().connect(url).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Database connection attempt failed");
        })
    })
    .await
    .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.db_max_connections,
        "Connected to database"
    );

    Ok(pool)
}

fn build_geo_locator(config: &Config) -> Result<Arc<dyn GeoLocator>> {
    if !config.geoip_enabled {
        tracing::info!("Geo-IP lookups disabled");
        return Ok(Arc::new(DisabledLocator));
    }

    let locator = IpApiLocator::new(
        &config.geoip_api_url,
        config.geoip_timeout(),
        config.geoip_cache_ttl(),
    )
    .context("Failed to build geo-IP client")?;

    Ok(Arc::new(locator))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
