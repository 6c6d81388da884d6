// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Request extractors and guards for authenticated routes

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use std::sync::{Arc, OnceLock};

use super::users::{Role, User};
use crate::api::AppState;
use crate::error::{AppError, Result};

/// Name of the cookie carrying the token
pub const TOKEN_COOKIE: &str = "jwt";

/// Slot filled with the authenticated user id, read back by the request logger
#[derive(Debug, Clone, Default)]
pub struct UserSlot(Arc<OnceLock<String>>);

impl UserSlot {
    pub fn set(&self, user_id: &str) {
        let _ = self.0.set(user_id.to_string());
    }

    pub fn get(&self) -> Option<&str> {
        self.0.get().map(String::as_str)
    }
}

/// The user behind a valid bearer token or `jwt` cookie
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> std::result::Result<Self, Self::Rejection> {
        let token = token_from_parts(parts).ok_or_else(|| {
            AppError::Unauthorized(
                "You are not logged in! Please log in to get access.".to_string(),
            )
        })?;

        let claims = state.jwt.verify(&token).map_err(|e| {
            tracing::warn!(event = "security_invalid_token", "Rejected token: {}", e);
            e
        })?;

        let user = state
            .users
            .find_by_id(&claims.sub)
            .cloned()
            .unwrap_or_else(|| User::anonymous_member(&claims.sub));

        if let Some(slot) = parts.extensions.get::<UserSlot>() {
            slot.set(&user.id);
        }

        Ok(AuthUser(user))
    }
}

/// Bearer header first, then the `jwt` cookie
fn token_from_parts(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .filter(|v| v.starts_with("Bearer"));
    if let Some(header) = bearer {
        return header
            .split(' ')
            .nth(1)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
    }

    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|t| !t.is_empty())
}

/// Rejects users whose role is not listed
pub fn require_role(user: &User, allowed: &[Role]) -> Result<()> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        tracing::warn!(
            event = "security_forbidden",
            user_id = %user.id,
            role = user.role.as_str(),
            "Role not allowed"
        );
        Err(AppError::Forbidden(
            "You do not have permission to perform this action".to_string(),
        ))
    }
}
