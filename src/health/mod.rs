// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Health evaluation module
//!
//! Combines a metrics snapshot with a fixed set of component checks
//! (`api`, `database`) into an overall `healthy`/`degraded` status.

mod checks;
mod evaluator;

pub use checks::{ApiCheck, ComponentCheck, ComponentHealth, ComponentStatus, DatabaseCheck};
pub use evaluator::{HealthEvaluator, HealthReport, HealthStatus};
