// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

use axum::{Json, http::Uri};
use serde_json::{Value, json};

use crate::error::AppError;

/// GET /
pub async fn welcome() -> Json<Value> {
    Json(json!({
        "status": "success",
        "message": "Welcome to the MVP architecture API",
        "version": env!("CARGO_PKG_VERSION"),
        "documentation": "/api/v1/docs",
        "health": "/api/v1/health",
    }))
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Can't find {uri} on this server!"))
}
