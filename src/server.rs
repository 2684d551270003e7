//! HTTP server initialization and runtime setup.
//!
//! Handles status store selection, cache setup, upstream clients, and the
//! Axum server lifecycle.

use crate::application::services::{
    BatchSubmitter, CatalogSettings, SubmitPolicy, UrlCatalogService,
};
use crate::config::{Config, StoreKind};
use crate::domain::repositories::{BusinessConfigRepository, ContentQueue, StatusStore};
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::http::{HttpBusinessConfig, HttpContentQueue};
use crate::infrastructure::persistence::{InMemoryStatusStore, PgStatusStore};
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

/// Opens the PostgreSQL pool with the configured limits and applies migrations.
///
/// # Errors
///
/// Returns an error if no database URL is configured, the connection fails,
/// or a migration cannot be applied.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for the postgres status store")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(pool)
}

/// Builds the catalog service and all of its collaborators from configuration.
///
/// Shared by the HTTP server and the admin CLI.
///
/// # Errors
///
/// Returns an error if the database or the HTTP client cannot be set up.
/// Redis failures fall back to [`NullCache`].
pub async fn build_catalog(config: &Config) -> Result<Arc<UrlCatalogService>> {
    let store: Arc<dyn StatusStore> = match config.status_store {
        StoreKind::Postgres => {
            let pool = connect_database(config).await?;
            Arc::new(PgStatusStore::new(Arc::new(pool)))
        }
        StoreKind::Memory => {
            tracing::warn!("Using in-memory status store; URL sets are lost on restart");
            Arc::new(InMemoryStatusStore::new())
        }
    };

    let cache: Arc<dyn CacheService> = if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url, config.preview_cache_ttl_seconds).await {
            Ok(redis) => {
                tracing::info!("Preview cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        }
    } else {
        tracing::info!("Preview cache disabled (NullCache)");
        Arc::new(NullCache::new())
    };

    let upstream_timeout = Duration::from_secs(config.upstream_timeout_secs);
    let client = reqwest::Client::builder()
        .timeout(upstream_timeout)
        .user_agent(concat!("seo-urlgen/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let business_config: Arc<dyn BusinessConfigRepository> = Arc::new(HttpBusinessConfig::new(
        client.clone(),
        config.config_service_url.clone(),
    ));
    let queue: Arc<dyn ContentQueue> =
        Arc::new(HttpContentQueue::new(client, config.queue_url.clone()));

    let submitter = BatchSubmitter::new(
        queue,
        SubmitPolicy {
            timeout: upstream_timeout,
            max_retries: config.queue_max_retries,
            backoff_base_ms: config.queue_retry_base_ms,
        },
    );

    let settings = CatalogSettings {
        pattern: config.url_pattern.clone(),
        id_scheme: config.id_scheme,
        store_timeout: Duration::from_secs(config.store_timeout_secs),
        preview_ttl: None,
    };

    Ok(Arc::new(UrlCatalogService::new(
        store,
        business_config,
        submitter,
        cache,
        settings,
    )))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Status store (PostgreSQL with migrations, or in-memory)
/// - Redis preview cache (or NullCache fallback)
/// - Configuration service and content queue clients
/// - Axum HTTP server with graceful shutdown on Ctrl+C / SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let catalog_service = build_catalog(&config).await?;
    let state = AppState::new(catalog_service);

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config.listen_addr.parse()?;
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
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
