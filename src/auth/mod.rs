// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Authentication module: token issuing, user lookup and route guards

mod extract;
mod jwt;
mod users;

pub use extract::{AuthUser, TOKEN_COOKIE, UserSlot, require_role};
pub use jwt::{Claims, JwtKeys};
pub use users::{Role, User, UserDirectory};
