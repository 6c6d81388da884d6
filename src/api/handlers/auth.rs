// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::api::AppState;
use crate::auth::{AuthUser, TOKEN_COOKIE, User};
use crate::error::{AppError, Result};
use crate::telemetry::sanitize_email;

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/v1/auth/login
pub async fn login(State(state): State<Arc<AppState>>, body: Bytes) -> Result<impl IntoResponse> {
    let request: LoginRequest = if body.is_empty() {
        LoginRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|_| AppError::BadRequest("Request body must be valid JSON".to_string()))?
    };

    let (Some(email), Some(password)) = (
        request.email.filter(|e| !e.is_empty()),
        request.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::BadRequest(
            "Please provide email and password".to_string(),
        ));
    };

    let masked = sanitize_email(Some(&email));
    let user = match state.users.find_by_email(&email) {
        Some(user) if user.check_password(&password) => user.clone(),
        _ => {
            tracing::info!(event = "auth_attempt", success = false, email = %masked, "Login failed");
            return Err(AppError::Unauthorized(
                "Incorrect email or password".to_string(),
            ));
        }
    };

    tracing::info!(event = "auth_attempt", success = true, email = %masked, "Login succeeded");
    let token = state.jwt.sign(&user.id)?;
    let cookie = session_cookie(&token, &state);

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(json!({
            "status": "success",
            "token": token,
            "data": { "user": user },
        })),
    ))
}

/// GET /api/v1/auth/me
pub async fn me(AuthUser(user): AuthUser) -> Json<serde_json::Value> {
    Json(user_body(&user))
}

fn user_body(user: &User) -> serde_json::Value {
    json!({ "status": "success", "data": { "user": user } })
}

fn session_cookie(token: &str, state: &AppState) -> String {
    let max_age = state.jwt.expires_in().as_secs();
    let mut cookie = format!("{TOKEN_COOKIE}={token}; Path=/; Max-Age={max_age}; HttpOnly; SameSite=Lax");
    if state.config.is_production() {
        cookie.push_str("; Secure");
    }
    cookie
}
