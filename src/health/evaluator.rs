// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Derives overall service health from component checks

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::checks::{ApiCheck, ComponentCheck, ComponentHealth, DatabaseCheck};
use crate::metrics::{MetricsCollector, MetricsSnapshot};

/// Overall status: healthy only when every component is healthy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

impl HealthStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
        }
    }
}

/// Result of one evaluation. Nothing here outlives the response.
#[derive(Debug, Clone)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub components: BTreeMap<String, ComponentHealth>,
    pub snapshot: MetricsSnapshot,
}

impl HealthReport {
    /// Names of components not reporting healthy
    pub fn unhealthy_components(&self) -> Vec<&str> {
        self.components
            .iter()
            .filter(|(_, health)| !health.status.is_healthy())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Classifies system health from a metrics snapshot
#[derive(Clone)]
pub struct HealthEvaluator {
    metrics: MetricsCollector,
    checks: Vec<Arc<dyn ComponentCheck>>,
}

impl HealthEvaluator {
    /// Evaluator with the default `api` and `database` checks
    pub fn new(metrics: MetricsCollector) -> Self {
        Self::empty(metrics)
            .with_check(Arc::new(ApiCheck))
            .with_check(Arc::new(DatabaseCheck))
    }

    /// Evaluator with no checks; an empty set evaluates healthy
    pub fn empty(metrics: MetricsCollector) -> Self {
        Self {
            metrics,
            checks: Vec::new(),
        }
    }

    /// Adds a check, replacing any existing check with the same name
    #[must_use]
    pub fn with_check(mut self, check: Arc<dyn ComponentCheck>) -> Self {
        self.checks.retain(|existing| existing.name() != check.name());
        self.checks.push(check);
        self
    }

    /// Registered check names, in evaluation order
    pub fn check_names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    pub fn evaluate(&self) -> HealthReport {
        let snapshot = self.metrics.snapshot();

        let components: BTreeMap<String, ComponentHealth> = self
            .checks
            .iter()
            .map(|check| (check.name().to_string(), check.check(&snapshot)))
            .collect();

        let status = if components.values().all(|c| c.status.is_healthy()) {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        };

        let report = HealthReport {
            status,
            timestamp: Utc::now(),
            components,
            snapshot,
        };

        tracing::info!(
            event = "health_status",
            status = status.as_str(),
            requests = report.snapshot.request_count,
            errors = report.snapshot.error_count,
            error_rate = report.snapshot.error_rate,
            avg_response_time = report.snapshot.response_time_avg,
            memory_usage_percent = report.snapshot.system.memory_usage_percent(),
            "Health evaluated"
        );
        if status != HealthStatus::Healthy {
            tracing::warn!(
                event = "system_degraded",
                components = ?report.unhealthy_components(),
                error_rate = report.snapshot.error_rate,
                avg_response_time = report.snapshot.response_time_avg,
                "System degraded"
            );
        }

        report
    }
}
