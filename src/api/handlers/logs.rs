// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::api::AppState;
use crate::auth::{AuthUser, Role, require_role};
use crate::error::Result;
use crate::logs::{LogFilter, LogQuery, read_logs};

/// GET /api/v1/logs (admin only)
pub async fn get_logs(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<LogQuery>,
) -> Result<Json<Value>> {
    require_role(&user, &[Role::Admin])?;

    let filter = LogFilter::from(&query);
    let page = read_logs(&state.config.log_path(), &filter).await?;

    tracing::info!(
        event = "logs_access",
        user = %user.id,
        level = %filter.level,
        limit = filter.limit,
        page = filter.page,
        "Logs accessed"
    );

    let body = match page {
        Some(page) => json!({
            "status": "success",
            "results": page.logs.len(),
            "total": page.total,
            "page": page.page,
            "limit": page.limit,
            "data": { "logs": page.logs },
        }),
        None => json!({
            "status": "success",
            "results": 0,
            "data": { "logs": [] },
            "message": "No log file found",
        }),
    };

    Ok(Json(body))
}
