// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Request metrics aggregation
//!
//! `MetricsCollector` is a cheap, cloneable handle around shared counters.
//! Every request is opened with [`MetricsCollector::on_request_start`] before
//! routing and closed with [`MetricsCollector::on_request_end`] once the final
//! status is known. Closing is idempotent per [`RequestContext`], so duplicate
//! completion signals never double-count.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use super::labels::EndpointLabels;
use super::registry::PrometheusRegistry;
use super::system::{HostMetrics, ProcSystemInfo, SystemInfo};

/// Substitute for an empty method or path
pub const UNKNOWN: &str = "UNKNOWN";

/// Per-endpoint counters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointStats {
    pub count: u64,
    pub response_time_total: f64,
    pub response_time_avg: f64,
    pub errors: u64,
}

/// Mutable aggregate guarded by the collector's mutex
#[derive(Debug, Default)]
struct MetricsState {
    request_count: u64,
    error_count: u64,
    response_time_total: f64,
    response_time_avg: f64,
    status_codes: BTreeMap<u16, u64>,
    endpoints: HashMap<String, EndpointStats>,
}

/// Immutable point-in-time copy of the aggregate plus host readings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub start_time: DateTime<Utc>,
    pub uptime_secs: u64,
    pub request_count: u64,
    pub error_count: u64,
    /// Percentage of requests that ended with status >= 400
    pub error_rate: f64,
    /// Milliseconds
    pub response_time_total: f64,
    /// Milliseconds, 0 before the first request
    pub response_time_avg: f64,
    pub status_codes: BTreeMap<u16, u64>,
    pub endpoints: BTreeMap<String, EndpointStats>,
    pub system: HostMetrics,
}

/// Measurement handle for one in-flight request
#[derive(Debug)]
pub struct RequestContext {
    method: String,
    path: String,
    key: String,
    started: Instant,
    finalized: AtomicBool,
}

impl RequestContext {
    /// The `"METHOD PATH"` key this request is attributed to
    pub fn endpoint_key(&self) -> &str {
        &self.key
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized.load(Ordering::Acquire)
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    fn labels(&self) -> EndpointLabels {
        EndpointLabels {
            method: self.method.clone(),
            path: self.path.clone(),
        }
    }
}

struct Inner {
    started: Instant,
    start_time: DateTime<Utc>,
    state: Mutex<MetricsState>,
    prometheus: PrometheusRegistry,
    system: Arc<dyn SystemInfo>,
}

/// Process-wide request metrics, explicitly owned by whoever builds the router
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Inner>,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MetricsCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsCollector")
            .field("start_time", &self.inner.start_time)
            .finish_non_exhaustive()
    }
}

impl MetricsCollector {
    /// Collector reading host metrics from `/proc`
    pub fn new() -> Self {
        Self::with_system_info(Arc::new(ProcSystemInfo::default()))
    }

    pub fn with_system_info(system: Arc<dyn SystemInfo>) -> Self {
        Self {
            inner: Arc::new(Inner {
                started: Instant::now(),
                start_time: Utc::now(),
                state: Mutex::new(MetricsState::default()),
                prometheus: PrometheusRegistry::new(),
                system,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MetricsState> {
        // Counters stay meaningful even if a holder panicked mid-update
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens the measurement of one request.
    ///
    /// The endpoint key is fixed here, before any handler runs. Paths are
    /// taken verbatim (query string included).
    pub fn on_request_start(&self, method: &str, path: &str) -> RequestContext {
        let method = non_empty_or_unknown(method);
        let path = non_empty_or_unknown(path);
        let key = format!("{method} {path}");

        {
            let mut state = self.lock();
            state.request_count += 1;
            state.endpoints.entry(key.clone()).or_default().count += 1;
        }

        let context = RequestContext {
            method: method.to_string(),
            path: path.to_string(),
            key,
            started: Instant::now(),
            finalized: AtomicBool::new(false),
        };
        self.inner.prometheus.record_start(&context.labels());
        context
    }

    /// Closes the measurement of one request.
    ///
    /// Returns `false` without touching any counter if the context was
    /// already finalized.
    pub fn on_request_end(&self, context: &RequestContext, status_code: u16) -> bool {
        if context
            .finalized
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::trace!("Duplicate completion for {} ignored", context.key);
            return false;
        }

        let duration_ms = context.elapsed_ms();
        let is_error = status_code >= 400;

        {
            let mut state = self.lock();
            state.response_time_total += duration_ms;
            state.response_time_avg = average(state.response_time_total, state.request_count);
            *state.status_codes.entry(status_code).or_insert(0) += 1;
            if is_error {
                state.error_count += 1;
            }

            let endpoint = state.endpoints.entry(context.key.clone()).or_default();
            endpoint.response_time_total += duration_ms;
            endpoint.response_time_avg = average(endpoint.response_time_total, endpoint.count);
            if is_error {
                endpoint.errors += 1;
            }
        }

        self.inner
            .prometheus
            .record_end(&context.labels(), status_code, duration_ms);
        true
    }

    /// Consistent copy of the counters plus current host readings
    pub fn snapshot(&self) -> MetricsSnapshot {
        let mut snapshot = {
            let state = self.lock();

            #[allow(clippy::cast_precision_loss)]
            let error_rate = if state.request_count == 0 {
                0.0
            } else {
                state.error_count as f64 / state.request_count as f64 * 100.0
            };

            MetricsSnapshot {
                start_time: self.inner.start_time,
                uptime_secs: self.uptime_secs(),
                request_count: state.request_count,
                error_count: state.error_count,
                error_rate,
                response_time_total: state.response_time_total,
                response_time_avg: state.response_time_avg,
                status_codes: state.status_codes.clone(),
                endpoints: state
                    .endpoints
                    .iter()
                    .map(|(key, stats)| (key.clone(), stats.clone()))
                    .collect(),
                system: HostMetrics::default(),
            }
        };

        // Host readings may hit the filesystem; keep them outside the lock
        snapshot.system = self.inner.system.read();
        snapshot
    }

    pub fn uptime_secs(&self) -> u64 {
        self.inner.started.elapsed().as_secs()
    }

    /// OpenMetrics text exposition of the request counters
    pub fn encode_prometheus(&self) -> Result<String, std::fmt::Error> {
        self.inner.prometheus.encode(self.uptime_secs())
    }
}

fn non_empty_or_unknown(value: &str) -> &str {
    if value.trim().is_empty() {
        UNKNOWN
    } else {
        value
    }
}

fn average(total: f64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let count = count as f64;
        total / count
    }
}
