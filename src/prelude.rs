// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Prelude module for convenient imports
//!
//! ```rust
//! use mvp_api::prelude::*;
//! ```

// Core types
pub use crate::config::{Config, Environment};
pub use crate::error::{AppError, Result};

// HTTP
pub use crate::api::{AppState, create_router};

// Metrics and health
pub use crate::health::{ComponentCheck, ComponentHealth, ComponentStatus, HealthEvaluator};
pub use crate::metrics::{MetricsCollector, MetricsSnapshot, RequestContext, SystemInfo};

// Auth
pub use crate::auth::{JwtKeys, Role, User};
