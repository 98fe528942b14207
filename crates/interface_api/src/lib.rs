//! HTTP API Layer
//!
//! This crate exposes the claim normalization pipeline over HTTP using Axum.
//!
//! # Routes
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/health` | liveness |
//! | GET | `/health/ready` | adapter health checks |
//! | POST | `/api/v1/normalizations` | normalize one claim |
//! | POST | `/api/v1/normalizations/batch` | normalize several claims concurrently |
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::from_config(pool, config)?;
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod state;

use axum::{
    http::HeaderName,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{health, normalizations};
use crate::middleware::{log_requests, REQUEST_ID_HEADER};

pub use crate::config::{ApiConfig, LogFormat};
pub use crate::error::ApiError;
pub use crate::state::AppState;

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Pipeline, configuration and health probes
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let api_routes = Router::new()
        .route("/normalizations", post(normalizations::normalize_claim))
        .route("/normalizations/batch", post(normalizations::normalize_batch));

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(log_requests))
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
        .with_state(state)
}
