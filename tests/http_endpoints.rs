// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

use axum::Router;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use mvp_api::{
    AppState, Config, Environment, HostMetrics, MetricsCollector, StaticSystemInfo, create_router,
};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

fn make_config(log_dir: &Path) -> Config {
    Config {
        server_addr: "127.0.0.1:3000".to_string(),
        jwt_secret: "integration-secret".to_string(),
        log_dir: log_dir.to_path_buf(),
        ..Config::default()
    }
}

fn make_state(config: Config) -> Arc<AppState> {
    let metrics = MetricsCollector::with_system_info(Arc::new(StaticSystemInfo(HostMetrics {
        uptime_secs: 60.0,
        free_memory: 512 * 1024 * 1024,
        total_memory: 1024 * 1024 * 1024,
        load_average: [0.1, 0.2, 0.3],
    })));
    Arc::new(AppState::new(config, metrics))
}

async fn send(app: &Router, request: Request<String>) -> (StatusCode, axum::http::HeaderMap, String) {
    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = String::from_utf8(
        resp.into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec(),
    )
    .unwrap();
    (status, headers, body)
}

fn get(uri: &str) -> Request<String> {
    Request::get(uri).body(String::new()).unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<String> {
    Request::get(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(String::new())
        .unwrap()
}

fn login_request(body: &str) -> Request<String> {
    Request::post("/api/v1/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

async fn login_as(app: &Router, email: &str) -> String {
    let (status, _, body) = send(
        app,
        login_request(&format!(r#"{{"email":"{email}","password":"password123"}}"#)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    value["token"].as_str().unwrap().to_string()
}

// --- / and fallback ---

#[tokio::test]
async fn root_returns_welcome() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_router(make_state(make_config(dir.path())));

    let (status, headers, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["status"], "success");
    assert_eq!(value["health"], "/api/v1/health");

    assert!(headers.get("x-request-id").unwrap().to_str().unwrap().starts_with("req-"));
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
}

#[tokio::test]
async fn unknown_route_returns_404_json() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(make_config(dir.path()));
    let app = create_router(state.clone());

    let (status, _, body) = send(&app, get("/unknown?x=1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["status"], "fail");
    assert!(value["message"].as_str().unwrap().contains("/unknown?x=1"));

    let snap = state.metrics.snapshot();
    assert_eq!(snap.endpoints["GET /unknown?x=1"].errors, 1);
    assert_eq!(snap.status_codes[&404], 1);
}

// --- /api/v1/health ---

#[tokio::test]
async fn health_reports_healthy_with_formatted_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_router(make_state(make_config(dir.path())));

    let (status, _, body) = send(&app, get("/api/v1/health")).await;
    assert_eq!(status, StatusCode::OK);

    let health: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["status"], "success");
    assert_eq!(health["data"]["status"], "healthy");
    assert_eq!(health["data"]["components"]["api"]["status"], "healthy");
    assert_eq!(health["data"]["components"]["database"]["status"], "healthy");
    // the health request itself is already counted
    assert_eq!(health["data"]["metrics"]["requests"]["total"], 1);
    assert_eq!(health["data"]["metrics"]["requests"]["errors"], 0);
    assert_eq!(health["data"]["metrics"]["requests"]["errorRate"], "0.00%");
    assert_eq!(health["data"]["metrics"]["system"]["memory"]["usage"], "50.00%");
    assert_eq!(health["data"]["metrics"]["system"]["memory"]["free"], "512 MB");

    let timestamp = health["data"]["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn health_counts_previous_requests() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_router(make_state(make_config(dir.path())));

    send(&app, get("/")).await;
    send(&app, get("/missing")).await;
    send(&app, get("/missing")).await;

    let (_, _, body) = send(&app, get("/api/v1/health")).await;
    let health: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["data"]["metrics"]["requests"]["total"], 4);
    assert_eq!(health["data"]["metrics"]["requests"]["errors"], 2);
    assert_eq!(health["data"]["metrics"]["requests"]["errorRate"], "50.00%");
}

#[tokio::test]
async fn monitoring_disabled_leaves_counters_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        monitoring_enabled: false,
        ..make_config(dir.path())
    };
    let state = make_state(config);
    let app = create_router(state.clone());

    send(&app, get("/")).await;
    assert_eq!(state.metrics.snapshot().request_count, 0);
}

// --- /metrics ---

#[tokio::test]
async fn metrics_returns_openmetrics_text() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_router(make_state(make_config(dir.path())));

    send(&app, get("/")).await;
    let (status, headers, body) = send(&app, get("/metrics")).await;

    assert_eq!(status, StatusCode::OK);
    let ct = headers.get("content-type").unwrap().to_str().unwrap();
    assert!(
        ct.contains("openmetrics-text"),
        "Expected OpenMetrics content-type, got: {ct}"
    );
    assert!(body.contains("http_requests_total{method=\"GET\",path=\"/\"} 1"));
    assert!(body.contains("process_uptime_seconds"));
}

// --- /api/v1/auth ---

#[tokio::test]
async fn login_success_sets_cookie_and_hides_password() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_router(make_state(make_config(dir.path())));

    let (status, headers, body) = send(
        &app,
        login_request(r#"{"email":"user@example.com","password":"password123"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with("jwt="));
    assert!(cookie.contains("HttpOnly"));

    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["status"], "success");
    assert!(!value["token"].as_str().unwrap().is_empty());
    assert_eq!(value["data"]["user"]["id"], "2");
    assert!(value["data"]["user"].get("password").is_none());
    assert!(value["data"]["user"].get("can_login").is_none());
}

#[tokio::test]
async fn login_rejects_bad_input() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_router(make_state(make_config(dir.path())));

    let (status, _, _) = send(&app, login_request(r#"{"email":"user@example.com"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(&app, login_request("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, body) = send(
        &app,
        login_request(r#"{"email":"user@example.com","password":"wrong"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["status"], "fail");

    let (status, _, _) = send(
        &app,
        login_request(r#"{"email":"ghost@example.com","password":"password123"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_requires_token() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_router(make_state(make_config(dir.path())));

    let (status, _, _) = send(&app, get("/api/v1/auth/me")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(&app, get_with_token("/api/v1/auth/me", "garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_accepts_bearer_and_cookie() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_router(make_state(make_config(dir.path())));
    let token = login_as(&app, "admin@example.com").await;

    let (status, _, body) = send(&app, get_with_token("/api/v1/auth/me", &token)).await;
    assert_eq!(status, StatusCode::OK);
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["data"]["user"]["role"], "admin");

    let request = Request::get("/api/v1/auth/me")
        .header(header::COOKIE, format!("jwt={token}"))
        .body(String::new())
        .unwrap();
    let (status, _, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn token_from_other_secret_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_router(make_state(make_config(dir.path())));
    let foreign = mvp_api::JwtKeys::new("another-secret", std::time::Duration::from_secs(60))
        .sign("1")
        .unwrap();

    let (status, _, _) = send(&app, get_with_token("/api/v1/auth/me", &foreign)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// --- /api/v1/logs ---

#[tokio::test]
async fn logs_forbidden_for_regular_user() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_router(make_state(make_config(dir.path())));
    let token = login_as(&app, "user@example.com").await;

    let (status, _, body) = send(&app, get_with_token("/api/v1/logs", &token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["status"], "fail");
}

#[tokio::test]
async fn logs_missing_file_returns_empty() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_router(make_state(make_config(dir.path())));
    let token = login_as(&app, "admin@example.com").await;

    let (status, _, body) = send(&app, get_with_token("/api/v1/logs", &token)).await;
    assert_eq!(status, StatusCode::OK);
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["results"], 0);
    assert_eq!(value["message"], "No log file found");
    assert!(value["data"]["logs"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn logs_filters_and_paginates() {
    let dir = tempfile::tempdir().unwrap();
    let config = make_config(dir.path());
    {
        let mut file = std::fs::File::create(config.log_path()).unwrap();
        for i in 0..5 {
            writeln!(file, r#"{{"level":"INFO","message":"info {i}"}}"#).unwrap();
        }
        writeln!(file, r#"{{"level":"ERROR","message":"boom"}}"#).unwrap();
        writeln!(file, "plain text line").unwrap();
    }
    let app = create_router(make_state(config));
    let token = login_as(&app, "admin@example.com").await;

    let (status, _, body) = send(
        &app,
        get_with_token("/api/v1/logs?level=info&limit=2&page=2", &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["total"], 5);
    assert_eq!(value["results"], 2);
    assert_eq!(value["page"], 2);
    assert_eq!(value["data"]["logs"][0]["message"], "info 2");

    let (_, _, body) = send(&app, get_with_token("/api/v1/logs", &token)).await;
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["total"], 7);
    assert_eq!(value["data"]["logs"][6]["parseError"], true);
}

// --- error details ---

#[tokio::test]
async fn server_error_details_depend_on_environment() {
    for (environment, expected) in [
        (Environment::Development, "IO error"),
        (Environment::Production, "Something went wrong!"),
    ] {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the log file should be makes the read fail
        std::fs::create_dir(dir.path().join("app.log")).unwrap();
        let config = Config {
            environment,
            ..make_config(dir.path())
        };
        let app = create_router(make_state(config));
        let token = login_as(&app, "admin@example.com").await;

        let (status, _, body) = send(&app, get_with_token("/api/v1/logs", &token)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["message"], expected);
    }
}
