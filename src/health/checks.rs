// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Component checks feeding the health evaluator

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::metrics::MetricsSnapshot;

/// Status reported by a single component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl ComponentStatus {
    pub fn is_healthy(self) -> bool {
        self == Self::Healthy
    }
}

/// Result of one component check: a status plus free-form detail fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    #[serde(flatten)]
    pub detail: Map<String, Value>,
}

impl ComponentHealth {
    pub fn new(status: ComponentStatus) -> Self {
        Self {
            status,
            detail: Map::new(),
        }
    }

    pub fn healthy() -> Self {
        Self::new(ComponentStatus::Healthy)
    }

    #[must_use]
    pub fn with_detail(mut self, key: &str, value: Value) -> Self {
        self.detail.insert(key.to_string(), value);
        self
    }
}

/// A named probe contributing to overall health.
///
/// Checks must be infallible: a probe that cannot reach its dependency
/// reports `Unhealthy` instead of failing.
pub trait ComponentCheck: Send + Sync {
    fn name(&self) -> &str;

    fn check(&self, snapshot: &MetricsSnapshot) -> ComponentHealth;
}

/// The HTTP layer itself; healthy whenever it can answer
#[derive(Debug, Default)]
pub struct ApiCheck;

impl ComponentCheck for ApiCheck {
    fn name(&self) -> &str {
        "api"
    }

    fn check(&self, snapshot: &MetricsSnapshot) -> ComponentHealth {
        ComponentHealth::healthy().with_detail("uptime", json!(snapshot.uptime_secs))
    }
}

/// Placeholder for a datastore probe.
///
/// There is no datastore behind this service, so this always reports
/// healthy. Replace it through `HealthEvaluator::with_check` once a real
/// dependency exists.
#[derive(Debug, Default)]
pub struct DatabaseCheck;

impl ComponentCheck for DatabaseCheck {
    fn name(&self) -> &str {
        "database"
    }

    fn check(&self, _snapshot: &MetricsSnapshot) -> ComponentHealth {
        ComponentHealth::healthy().with_detail("responseTime", json!("5ms"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MetricsCollector, StaticSystemInfo};
    use std::sync::Arc;

    fn snapshot() -> MetricsSnapshot {
        MetricsCollector::with_system_info(Arc::new(StaticSystemInfo::default())).snapshot()
    }

    #[test]
    fn test_api_check_reports_uptime() {
        let health = ApiCheck.check(&snapshot());
        assert_eq!(health.status, ComponentStatus::Healthy);
        assert!(health.detail.contains_key("uptime"));
    }

    #[test]
    fn test_database_stub_always_healthy() {
        let health = DatabaseCheck.check(&snapshot());
        assert!(health.status.is_healthy());
        assert_eq!(health.detail["responseTime"], "5ms");
    }

    #[test]
    fn test_component_health_serializes_flat() {
        let health =
            ComponentHealth::new(ComponentStatus::Unhealthy).with_detail("reason", json!("timeout"));
        let value = serde_json::to_value(&health).unwrap();
        assert_eq!(value, json!({"status": "unhealthy", "reason": "timeout"}));
    }
}
