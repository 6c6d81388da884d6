// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! HTTP API module
//!
//! # Endpoints
//! - `GET /` — welcome message
//! - `POST /api/v1/auth/login` — issue a token
//! - `GET /api/v1/auth/me` — current user
//! - `GET /api/v1/logs` — paged log viewer (admin)
//! - `GET /api/v1/health` — health check with request and host metrics
//! - `GET /metrics` — Prometheus metrics

pub mod handlers;
pub mod middleware;
mod shutdown;
mod state;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer};

pub use shutdown::shutdown_signal;
pub use state::AppState;

/// Maximum accepted request body
pub const BODY_LIMIT_BYTES: usize = 10 * 1024;

const SECURITY_HEADERS: [(&str, &str); 5] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-dns-prefetch-control", "off"),
    ("referrer-policy", "no-referrer"),
    ("x-xss-protection", "0"),
];

/// Creates the main Axum router with all endpoints and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/auth/login", post(handlers::login))
        .route("/auth/me", get(handlers::me))
        .route("/logs", get(handlers::get_logs))
        .route("/health", get(handlers::health_check));

    let mut router = Router::new()
        .route("/", get(handlers::welcome))
        .route("/metrics", get(handlers::metrics_handler))
        .nest("/api/v1", api)
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES));

    if !state.config.is_production() {
        router = router.layer(from_fn(middleware::expose_error_details));
    }

    if state.config.monitoring_enabled {
        router = router.layer(from_fn_with_state(
            state.clone(),
            middleware::track_metrics,
        ));
    }

    router = router.layer(from_fn(middleware::log_requests));

    for (name, value) in SECURITY_HEADERS {
        router = router.layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        ));
    }

    router.layer(CorsLayer::permissive()).with_state(state)
}
