// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Redaction of sensitive values before they reach the logs

/// Replacement for sensitive values
pub const REDACTED: &str = "[REDACTED]";

const SENSITIVE_KEYS: [&str; 4] = ["password", "token", "authorization", "creditcard"];

pub fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS
        .iter()
        .any(|sensitive| key.eq_ignore_ascii_case(sensitive))
}

/// Redacts sensitive values in a raw `a=1&b=2` query string
pub fn sanitize_query(query: &str) -> String {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if is_sensitive_key(key) => format!("{key}={REDACTED}"),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Masks an email for logging: `admin@example.com` -> `adm***@example.com`
pub fn sanitize_email(email: Option<&str>) -> String {
    let Some(email) = email.filter(|e| !e.is_empty()) else {
        return "unknown".to_string();
    };

    let parts: Vec<&str> = email.split('@').collect();
    let [local, domain] = parts.as_slice() else {
        return "invalid-email".to_string();
    };

    let visible: String = local.chars().take(3).collect();
    format!("{visible}***@{domain}")
}
