// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Request metrics module
//!
//! Contains the request collector, host resource readings, and the
//! Prometheus registry that mirrors the collector's counters.

mod collector;
mod labels;
mod registry;
mod system;


/// Request collector and its snapshot types
pub use collector::{EndpointStats, MetricsCollector, MetricsSnapshot, RequestContext, UNKNOWN};

/// Host resource readings
pub use system::{HostMetrics, ProcSystemInfo, StaticSystemInfo, SystemInfo};
