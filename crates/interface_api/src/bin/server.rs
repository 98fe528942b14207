//! Claim Normalizer - API Server Binary
//!
//! Starts the HTTP API in front of the normalization pipeline.
//!
//! # Usage
//!
//! ```bash
//! NORMALIZER_DATABASE_URL=postgres://... \
//! NORMALIZER_TEXT_DETECTOR_URL=http://ocr:8000/detect \
//! cargo run --bin claim-normalizer
//! ```
//!
//! # Environment Variables
//!
//! * `NORMALIZER_HOST` / `NORMALIZER_PORT` - Bind address (default: 0.0.0.0:8080)
//! * `NORMALIZER_DATABASE_URL` - PostgreSQL connection string
//! * `NORMALIZER_DB_MAX_CONNECTIONS` - Pool size (default: 10)
//! * `NORMALIZER_LOG_LEVEL` - trace, debug, info, warn, error (default: info; `RUST_LOG` wins)
//! * `NORMALIZER_LOG_FORMAT` - `text` or `json` (default: text)
//! * `NORMALIZER_OBJECT_STORE_ROOT` - Directory of uploaded documents
//! * `NORMALIZER_TEXT_DETECTOR_URL` / `NORMALIZER_TEXT_DETECTOR_API_KEY` - Text detection service
//! * `NORMALIZER_STAGE_TIMEOUT_SECS` / `NORMALIZER_CLEANUP_TIMEOUT_SECS` - Run deadlines (default: 30 / 5)
//! * `NORMALIZER_MAX_BATCH_SIZE` - Largest accepted batch (default: 50)

use anyhow::Context;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use infra_db::{create_pool, run_migrations, DatabaseConfig};
use interface_api::{create_router, ApiConfig, AppState, LogFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("loading configuration")?;
    config.validate()?;

    init_tracing(&config);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting claim normalizer"
    );

    let pool = create_pool(
        DatabaseConfig::new(config.database_url.clone())
            .max_connections(config.db_max_connections)
            .statement_timeout(config.pipeline_config().stage_timeout),
    )
    .await
    .context("connecting to database")?;

    run_migrations(&pool).await.context("running migrations")?;
    tracing::info!("Database ready");

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid bind address {}", config.server_addr()))?;

    let state = AppState::from_config(pool, config).context("wiring adapters")?;
    let app = create_router(state);

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(config: &ApiConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer().with_target(true)).init(),
    }
}

/// Waits for Ctrl+C or SIGTERM
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
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
