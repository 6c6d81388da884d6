// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

mod auth;
mod health;
mod logs;
mod metrics;
mod root;

pub use auth::{login, me};
pub use health::{health_body, health_check};
pub use logs::get_logs;
pub use metrics::metrics_handler;
pub use root::{not_found, welcome};
