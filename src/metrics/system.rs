// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Host resource readings (memory, load average, uptime)
//!
//! Readings never fail: a missing or unreadable source yields zeros so the
//! health endpoint keeps answering on hosts without `/proc`.

use serde::Serialize;
use std::path::PathBuf;

/// Point-in-time host resource reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostMetrics {
    pub uptime_secs: f64,
    pub free_memory: u64,
    pub total_memory: u64,
    pub load_average: [f64; 3],
}

impl HostMetrics {
    /// Used memory as a percentage of total, 0 when total is unknown
    pub fn memory_usage_percent(&self) -> f64 {
        if self.total_memory == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let free_ratio = self.free_memory as f64 / self.total_memory as f64;
        100.0 - free_ratio * 100.0
    }

    pub fn free_memory_mb(&self) -> u64 {
        bytes_to_mb(self.free_memory)
    }

    pub fn total_memory_mb(&self) -> u64 {
        bytes_to_mb(self.total_memory)
    }
}

fn bytes_to_mb(bytes: u64) -> u64 {
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let mb = (bytes as f64 / 1024.0 / 1024.0).round() as u64;
    mb
}

/// Source of host resource readings
pub trait SystemInfo: Send + Sync {
    fn read(&self) -> HostMetrics;
}

/// Reads host metrics from the Linux `/proc` filesystem
#[derive(Debug, Clone)]
pub struct ProcSystemInfo {
    root: PathBuf,
}

impl Default for ProcSystemInfo {
    fn default() -> Self {
        Self::new("/proc")
    }
}

impl ProcSystemInfo {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read_file(&self, name: &str) -> Option<String> {
        let path = self.root.join(name);
        match std::fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::trace!("Cannot read {}: {}", path.display(), e);
                None
            }
        }
    }
}

impl SystemInfo for ProcSystemInfo {
    fn read(&self) -> HostMetrics {
        let uptime_secs = self
            .read_file("uptime")
            .and_then(|s| parse_uptime(&s))
            .unwrap_or_default();
        let (free_memory, total_memory) = self
            .read_file("meminfo")
            .map(|s| parse_meminfo(&s))
            .unwrap_or_default();
        let load_average = self
            .read_file("loadavg")
            .and_then(|s| parse_loadavg(&s))
            .unwrap_or_default();

        HostMetrics {
            uptime_secs,
            free_memory,
            total_memory,
            load_average,
        }
    }
}

/// Fixed readings, for tests and non-Linux hosts
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSystemInfo(pub HostMetrics);

impl SystemInfo for StaticSystemInfo {
    fn read(&self) -> HostMetrics {
        self.0
    }
}

/// First field of `/proc/uptime`
fn parse_uptime(content: &str) -> Option<f64> {
    content.split_whitespace().next()?.parse().ok()
}

/// Returns `(free, total)` in bytes. Prefers `MemAvailable` over `MemFree`.
fn parse_meminfo(content: &str) -> (u64, u64) {
    let mut total = None;
    let mut available = None;
    let mut free = None;

    for line in content.lines() {
        let mut parts = line.split_whitespace();
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        let Ok(kb) = value.parse::<u64>() else {
            continue;
        };
        let bytes = kb.saturating_mul(1024);
        match key {
            "MemTotal:" => total = Some(bytes),
            "MemAvailable:" => available = Some(bytes),
            "MemFree:" => free = Some(bytes),
            _ => {}
        }
    }

    (available.or(free).unwrap_or(0), total.unwrap_or(0))
}

/// First three fields of `/proc/loadavg`
fn parse_loadavg(content: &str) -> Option<[f64; 3]> {
    let mut fields = content.split_whitespace();
    let one = fields.next()?.parse().ok()?;
    let five = fields.next()?.parse().ok()?;
    let fifteen = fields.next()?.parse().ok()?;
    Some([one, five, fifteen])
}
