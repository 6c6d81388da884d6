// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Error types for the MVP API application

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Message returned for server errors when details must not leak
pub(crate) const GENERIC_SERVER_ERROR: &str = "Something went wrong!";

/// Full message of a server error, attached to the response extensions so
/// development builds can surface it (see `api::middleware::expose_error_details`)
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or network IO error
    #[error("IO error")]
    Io(#[from] std::io::Error),

    /// Address parsing error
    #[error("Address parse error")]
    AddrParse(#[from] std::net::AddrParseError),

    /// Client sent an incomplete or malformed request
    #[error("{0}")]
    BadRequest(String),

    /// Missing or invalid credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed
    #[error("{0}")]
    Forbidden(String),

    /// Resource or route does not exist
    #[error("{0}")]
    NotFound(String),

    /// Unexpected failure inside a handler
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Config(_) | Self::Io(_) | Self::AddrParse(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// `fail` for client errors, `error` for server errors
    pub fn status_label(&self) -> &'static str {
        if self.status_code().is_client_error() {
            "fail"
        } else {
            "error"
        }
    }

    /// Builds the JSON error response.
    ///
    /// With `expose_internal` unset, server error details are replaced by a
    /// generic message and only written to the log.
    pub fn to_response(&self, expose_internal: bool) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            if expose_internal {
                self.to_string()
            } else {
                GENERIC_SERVER_ERROR.to_string()
            }
        } else {
            self.to_string()
        };

        (
            status,
            Json(json!({
                "status": self.status_label(),
                "message": message,
            })),
        )
            .into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = self.to_response(false);
        if self.status_code().is_server_error() {
            response
                .extensions_mut()
                .insert(ErrorDetail(self.to_string()));
        }
        response
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match error.kind() {
            ErrorKind::ExpiredSignature => {
                Self::Unauthorized("Your token has expired. Please log in again.".to_string())
            }
            _ => Self::Unauthorized("Invalid token. Please log in again.".to_string()),
        }
    }
}

/// Convenient alias for Result with application error
pub type Result<T> = std::result::Result<T, AppError>;
