// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Request pipeline middleware: metrics, request logging, error details

use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, header::USER_AGENT},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

use super::AppState;
use crate::auth::UserSlot;
use crate::error::ErrorDetail;
use crate::metrics::{MetricsCollector, RequestContext};
use crate::telemetry::sanitize_query;

/// Status recorded when the client goes away before the response is produced
pub const CLIENT_CLOSED_REQUEST: u16 = 499;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Finalizes a request measurement exactly once, even if the handler
/// future is dropped mid-flight.
struct CompletionGuard {
    metrics: MetricsCollector,
    context: RequestContext,
}

impl CompletionGuard {
    fn finish(&self, status: u16) {
        self.metrics.on_request_end(&self.context, status);
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if !self.context.is_finalized() {
            tracing::debug!(
                "Request {} aborted before completion",
                self.context.endpoint_key()
            );
            self.metrics
                .on_request_end(&self.context, CLIENT_CLOSED_REQUEST);
        }
    }
}

/// Records every request in the metrics collector
pub async fn track_metrics(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let path = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().path(), |pq| pq.as_str())
        .to_string();
    let context = state.metrics.on_request_start(req.method().as_str(), &path);
    let guard = CompletionGuard {
        metrics: state.metrics.clone(),
        context,
    };

    let response = next.run(req).await;
    guard.finish(response.status().as_u16());
    response
}

/// Structured request/response logging with a per-request id
pub async fn log_requests(mut req: Request, next: Next) -> Response {
    let request_id = format!("req-{}", uuid::Uuid::new_v4().simple());
    let method = req.method().to_string();
    let url = req.uri().path().to_string();
    let query = sanitize_query(req.uri().query().unwrap_or_default());
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default();

    let slot = UserSlot::default();
    req.extensions_mut().insert(slot.clone());

    let span = tracing::info_span!("request", request_id = %request_id);
    let started = Instant::now();

    let mut response = async {
        tracing::info!(
            event = "request_start",
            %method,
            %url,
            %query,
            %ip,
            user_agent = %user_agent,
            "Request started"
        );
        next.run(req).await
    }
    .instrument(span.clone())
    .await;

    let status = response.status().as_u16();
    let duration = format!("{}ms", started.elapsed().as_millis());
    let user_id = slot.get().unwrap_or("anonymous").to_string();

    span.in_scope(|| {
        if status >= 400 {
            tracing::warn!(event = "request_end", %method, %url, status, %duration, %ip, %user_id, "Request finished");
        } else {
            tracing::info!(event = "request_end", %method, %url, status, %duration, %ip, %user_id, "Request finished");
        }

        if (400..500).contains(&status) {
            tracing::warn!(event = "client_error", %method, %url, status, %ip, %user_id, "Client error");
        } else if status >= 500 {
            tracing::error!(event = "server_error", %method, %url, status, %ip, "Server error");
        }

        if status == 200 && slot.get().is_some() {
            tracing::info!(event = "resource_access", %user_id, resource = %url, %method, "Protected resource accessed");
        }
    });

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Development only: replaces generic 5xx bodies with the real error message
pub async fn expose_error_details(req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    match response.extensions().get::<ErrorDetail>().cloned() {
        Some(ErrorDetail(message)) => (
            response.status(),
            Json(json!({ "status": "error", "message": message })),
        )
            .into_response(),
        None => response,
    }
}
