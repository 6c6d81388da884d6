// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! # MVP API
//!
//! Minimal layered HTTP backend: JWT authentication, a log viewer, a health
//! check, and per-endpoint request metrics.
//!
//! ## Main modules
//! - `api`: HTTP router, middleware and handlers
//! - `auth`: token issuing, user lookup and route guards
//! - `config`: configuration management
//! - `error`: error types
//! - `health`: component checks and overall health
//! - `logs`: log file reader
//! - `metrics`: request metrics collector and host readings
//! - `telemetry`: logging setup and redaction
//! - `prelude`: commonly used types and traits

mod api;
mod auth;
mod config;
mod error;
mod health;
mod logs;
mod metrics;
mod telemetry;
pub mod prelude;

// Re-export commonly used types
/// Application configuration
pub use config::{Config, Environment};

/// Application error and result type
pub use error::{AppError, Result};

/// HTTP API router and state
pub use api::{AppState, create_router, shutdown_signal};

/// Tokens and users
pub use auth::{Claims, JwtKeys, Role, User, UserDirectory};

/// Health evaluation
pub use health::{
    ComponentCheck, ComponentHealth, ComponentStatus, HealthEvaluator, HealthReport, HealthStatus,
};

/// Request metrics collector and host readings
pub use metrics::{
    EndpointStats, HostMetrics, MetricsCollector, MetricsSnapshot, ProcSystemInfo, RequestContext,
    StaticSystemInfo, SystemInfo, UNKNOWN,
};

/// Logging setup
pub use telemetry::setup_tracing;
