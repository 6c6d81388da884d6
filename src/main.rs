// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

use std::net::SocketAddr;
use std::sync::Arc;

use mvp_api::{
    AppState, Config, MetricsCollector, Result, create_router, setup_tracing, shutdown_signal,
};
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<()> {
    let (config, config_warnings) = Config::from_env();

    setup_tracing(&config)?;
    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        return Err(mvp_api::AppError::Config(e));
    }

    tracing::info!(
        "Loaded configuration: env={}, log file {}",
        config.environment.as_str(),
        config.log_path().display()
    );
    if !config.monitoring_enabled {
        tracing::warn!("Request monitoring disabled; /metrics and health counters stay at zero");
    }

    let metrics = MetricsCollector::new();
    let state = Arc::new(AppState::new(config.clone(), metrics));
    tracing::info!(
        "Health checks registered: {}",
        state.health.check_names().join(", ")
    );

    // Graceful shutdown channel
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        let signal = shutdown_signal().await;
        tracing::info!("{} received, shutting down gracefully", signal);
        let _ = shutdown_tx.send(true);
    });

    let app = create_router(state);

    let addr: SocketAddr = config.server_addr.parse().map_err(|e| {
        tracing::error!("Invalid server address: {}", e);
        e
    })?;

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!("Failed to bind address: {}", e);
        e
    })?;

    tracing::info!(
        "MVP API starting in {} mode on {}",
        config.environment.as_str(),
        addr
    );
    tracing::info!("Endpoints:");
    tracing::info!("  - POST /api/v1/auth/login - Issue token");
    tracing::info!("  - GET  /api/v1/auth/me    - Current user");
    tracing::info!("  - GET  /api/v1/logs       - Log viewer (admin)");
    tracing::info!("  - GET  /api/v1/health     - Health check");
    tracing::info!("  - GET  /metrics           - Prometheus metrics");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        let _ = shutdown_rx.changed().await;
        tracing::info!("HTTP server shutting down");
    })
    .await
    .map_err(|e| {
        tracing::error!("Server error: {}", e);
        e
    })?;

    tracing::info!("Process terminated");
    Ok(())
}
