use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::api::AppState;
use crate::health::HealthReport;

/// Renders a health report in the public JSON shape
pub fn health_body(report: &HealthReport) -> Value {
    let snapshot = &report.snapshot;
    let system = &snapshot.system;

    json!({
        "status": "success",
        "data": {
            "status": report.status,
            "timestamp": report.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            "components": report.components,
            "metrics": {
                "requests": {
                    "total": snapshot.request_count,
                    "errors": snapshot.error_count,
                    "errorRate": format!("{:.2}%", snapshot.error_rate),
                    "avgResponseTime": format!("{:.2}ms", snapshot.response_time_avg),
                },
                "system": {
                    "memory": {
                        "free": format!("{} MB", system.free_memory_mb()),
                        "total": format!("{} MB", system.total_memory_mb()),
                        "usage": format!("{:.2}%", system.memory_usage_percent()),
                    },
                    "cpu": {
                        "load": system.load_average,
                    },
                },
            },
        },
    })
}

/// GET /api/v1/health
///
/// Always answers 200; the derived status is in `data.status`.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    tracing::info!(event = "health_check_initiated", "Health check requested");
    let report = state.health.evaluate();
    (StatusCode::OK, Json(health_body(&report)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::health::{ComponentCheck, ComponentHealth, ComponentStatus, HealthEvaluator};
    use crate::metrics::{HostMetrics, MetricsCollector, MetricsSnapshot, StaticSystemInfo};

    struct Down;

    impl ComponentCheck for Down {
        fn name(&self) -> &str {
            "cache"
        }

        fn check(&self, _snapshot: &MetricsSnapshot) -> ComponentHealth {
            ComponentHealth::new(ComponentStatus::Unhealthy)
        }
    }

    fn metrics() -> MetricsCollector {
        MetricsCollector::with_system_info(Arc::new(StaticSystemInfo(HostMetrics {
            uptime_secs: 1.0,
            free_memory: 256 * 1024 * 1024,
            total_memory: 1024 * 1024 * 1024,
            load_average: [0.5, 0.25, 0.125],
        })))
    }

    #[test]
    fn test_health_body_formatting() {
        let metrics = metrics();
        for status in [200, 200, 200, 500] {
            let ctx = metrics.on_request_start("GET", "/x");
            metrics.on_request_end(&ctx, status);
        }
        let body = health_body(&HealthEvaluator::new(metrics).evaluate());

        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["status"], "healthy");
        assert_eq!(body["data"]["components"]["database"]["status"], "healthy");
        assert_eq!(body["data"]["components"]["database"]["responseTime"], "5ms");
        assert_eq!(body["data"]["metrics"]["requests"]["total"], 4);
        assert_eq!(body["data"]["metrics"]["requests"]["errors"], 1);
        assert_eq!(body["data"]["metrics"]["requests"]["errorRate"], "25.00%");
        assert!(
            body["data"]["metrics"]["requests"]["avgResponseTime"]
                .as_str()
                .unwrap()
                .ends_with("ms")
        );
        assert_eq!(body["data"]["metrics"]["system"]["memory"]["free"], "256 MB");
        assert_eq!(body["data"]["metrics"]["system"]["memory"]["total"], "1024 MB");
        assert_eq!(body["data"]["metrics"]["system"]["memory"]["usage"], "75.00%");
        assert_eq!(
            body["data"]["metrics"]["system"]["cpu"]["load"],
            json!([0.5, 0.25, 0.125])
        );
    }

    #[test]
    fn test_health_body_zero_requests() {
        let body = health_body(&HealthEvaluator::new(metrics()).evaluate());
        assert_eq!(body["data"]["metrics"]["requests"]["errorRate"], "0.00%");
        assert_eq!(body["data"]["metrics"]["requests"]["avgResponseTime"], "0.00ms");
    }

    #[tokio::test]
    async fn test_health_check_degraded_still_200() {
        let metrics = metrics();
        let mut state = AppState::new(Config::default(), metrics.clone());
        state.health = HealthEvaluator::new(metrics).with_check(Arc::new(Down));

        let response = health_check(State(Arc::new(state))).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
