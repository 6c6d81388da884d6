// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Application state shared across HTTP handlers

use crate::auth::{JwtKeys, UserDirectory};
use crate::config::Config;
use crate::health::HealthEvaluator;
use crate::metrics::MetricsCollector;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub metrics: MetricsCollector,
    pub health: HealthEvaluator,
    pub jwt: JwtKeys,
    pub users: UserDirectory,
}

impl AppState {
    /// Wires the default health checks and token keys around a collector
    pub fn new(config: Config, metrics: MetricsCollector) -> Self {
        let health = HealthEvaluator::new(metrics.clone());
        let jwt = JwtKeys::new(&config.jwt_secret, config.jwt_expires_in);
        Self {
            config,
            metrics,
            health,
            jwt,
            users: UserDirectory::default(),
        }
    }
}
