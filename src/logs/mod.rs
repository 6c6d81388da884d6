// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Log viewer: reads the JSON-lines log file back with filtering and paging

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::Path;

use crate::error::Result;

pub const DEFAULT_LIMIT: usize = 100;

/// Query parameters of `GET /logs`. Numbers are parsed leniently.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogQuery {
    pub level: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
}

/// Normalized filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogFilter {
    pub level: String,
    pub limit: usize,
    pub page: usize,
}

impl From<&LogQuery> for LogFilter {
    fn from(query: &LogQuery) -> Self {
        let parse = |raw: &Option<String>, default: usize| {
            raw.as_deref()
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(default)
                .max(1)
        };

        Self {
            level: query
                .level
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .unwrap_or("all")
                .to_ascii_lowercase(),
            limit: parse(&query.limit, DEFAULT_LIMIT),
            page: parse(&query.page, 1),
        }
    }
}

/// One page of log entries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogPage {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub logs: Vec<Value>,
}

/// Reads and pages the log file. `Ok(None)` when the file does not exist.
pub async fn read_logs(path: &Path, filter: &LogFilter) -> Result<Option<LogPage>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            tracing::error!(
                event = "logs_access_error",
                path = %path.display(),
                "Failed to read log file: {}",
                e
            );
            return Err(e.into());
        }
    };

    Ok(Some(paginate(parse_lines(&content), filter)))
}

/// One JSON object per non-blank line; unparseable lines are kept as raw text
pub fn parse_lines(content: &str) -> Vec<Value> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            serde_json::from_str::<Value>(line)
                .unwrap_or_else(|_| json!({ "raw": line, "parseError": true }))
        })
        .collect()
}

pub fn paginate(entries: Vec<Value>, filter: &LogFilter) -> LogPage {
    let matching: Vec<Value> = if filter.level == "all" {
        entries
    } else {
        entries
            .into_iter()
            .filter(|entry| {
                entry
                    .get("level")
                    .and_then(Value::as_str)
                    .is_some_and(|level| level.eq_ignore_ascii_case(&filter.level))
            })
            .collect()
    };

    let total = matching.len();
    let start = filter.page.saturating_sub(1).saturating_mul(filter.limit);
    let logs = matching
        .into_iter()
        .skip(start)
        .take(filter.limit)
        .collect();

    LogPage {
        total,
        page: filter.page,
        limit: filter.limit,
        logs,
    }
}
