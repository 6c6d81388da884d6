// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Prometheus registry mirroring the request bookkeeping

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use super::labels::{EndpointLabels, StatusLabels};

/// OpenMetrics families fed by `MetricsCollector`
#[derive(Clone)]
pub(crate) struct PrometheusRegistry {
    registry: Arc<Registry>,
    http_requests: Family<EndpointLabels, Counter>,
    http_request_errors: Family<EndpointLabels, Counter>,
    http_request_duration_ms: Family<EndpointLabels, Counter<f64, AtomicU64>>,
    http_responses: Family<StatusLabels, Counter>,
    process_uptime_seconds: Gauge,
}

impl Default for PrometheusRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PrometheusRegistry {
    pub(crate) fn new() -> Self {
        let mut registry = Registry::default();

        let http_requests = Family::<EndpointLabels, Counter>::default();
        registry.register(
            "http_requests",
            "Requests received per endpoint",
            http_requests.clone(),
        );
        let http_request_errors = Family::<EndpointLabels, Counter>::default();
        registry.register(
            "http_request_errors",
            "Completed requests with status >= 400 per endpoint",
            http_request_errors.clone(),
        );
        let http_request_duration_ms = Family::<EndpointLabels, Counter<f64, AtomicU64>>::default();
        registry.register(
            "http_request_duration_milliseconds",
            "Accumulated request duration per endpoint in milliseconds",
            http_request_duration_ms.clone(),
        );
        let http_responses = Family::<StatusLabels, Counter>::default();
        registry.register(
            "http_responses",
            "Completed responses per status code",
            http_responses.clone(),
        );
        let process_uptime_seconds = Gauge::default();
        registry.register(
            "process_uptime_seconds",
            "Seconds since the service started",
            process_uptime_seconds.clone(),
        );

        Self {
            registry: Arc::new(registry),
            http_requests,
            http_request_errors,
            http_request_duration_ms,
            http_responses,
            process_uptime_seconds,
        }
    }

    pub(crate) fn record_start(&self, labels: &EndpointLabels) {
        self.http_requests.get_or_create(labels).inc();
    }

    pub(crate) fn record_end(&self, labels: &EndpointLabels, status: u16, duration_ms: f64) {
        self.http_request_duration_ms
            .get_or_create(labels)
            .inc_by(duration_ms);
        self.http_responses
            .get_or_create(&StatusLabels::new(status))
            .inc();
        if status >= 400 {
            self.http_request_errors.get_or_create(labels).inc();
        }
    }

    pub(crate) fn encode(&self, uptime_secs: u64) -> Result<String, std::fmt::Error> {
        #[allow(clippy::cast_possible_wrap)]
        self.process_uptime_seconds.set(uptime_secs as i64);
        let mut buffer = String::new();
        encode(&mut buffer, &self.registry)?;
        Ok(buffer)
    }
}
