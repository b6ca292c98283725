//! Catalog gateway - backend-for-frontend for the upstream catalog API.
//!
//! This binary serves the gateway on port 8000 by default.
//!
//! # Architecture
//!
//! - Axum web framework, JSON in and out
//! - Upstream e-commerce API over `reqwest`
//! - `PostgreSQL` for registered shop configurations, or an in-memory
//!   store when no database URL is configured

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use catalog_gateway::config::GatewayConfig;
use catalog_gateway::db::{
    self, ConfigurationStore, InMemoryConfigurationStore, PgConfigurationStore,
};
use catalog_gateway::routes;
use catalog_gateway::state::AppState;
use catalog_gateway::upstream::UpstreamClient;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &GatewayConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Select the configuration store backend.
async fn create_store(
    config: &GatewayConfig,
) -> Result<Arc<dyn ConfigurationStore>, sqlx::Error> {
    let Some(database_url) = &config.database_url else {
        tracing::warn!("No database URL configured; registrations will not survive a restart");
        return Ok(Arc::new(InMemoryConfigurationStore::new()));
    };

    let pool = db::create_pool(database_url).await?;
    tracing::info!("Database pool created");

    // NOTE: Migrations are NOT run automatically on startup.
    // Apply crates/gateway/migrations/ explicitly before deploying.

    Ok(Arc::new(PgConfigurationStore::new(pool)))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment (needed for Sentry init)
    let config = GatewayConfig::from_env()?;

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "catalog_gateway=info,tower_http=debug".into());

    // JSON for structured log collection, text locally
    let json_layer = config
        .log_json
        .then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!config.log_json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if config.tokens.source_tokens.is_empty() {
        tracing::warn!("GATEWAY_SOURCE_TOKENS is empty; source-specific fallbacks will fail");
    }
    if config.tokens.category_tokens.is_empty() {
        tracing::warn!("Category allow-list is empty; caller tokens on category reads will be rejected");
    }

    let store = create_store(&config).await?;
    tracing::info!(backend = store.backend_name(), "Configuration store ready");

    let upstream = Arc::new(UpstreamClient::new(&config.upstream)?);

    let addr = config.socket_addr();
    let state = AppState::new(config, store, upstream);

    let app = routes::app(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    tracing::info!("catalog gateway listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
