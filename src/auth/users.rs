// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! In-memory user directory
//!
//! There is no user store: two fixed accounts and a stubbed password check.

use serde::Serialize;

/// Password accepted for every account
const STUB_PASSWORD: &str = "password123";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// False for identities that exist only through a token
    #[serde(skip_serializing)]
    can_login: bool,
}

impl User {
    fn new(id: &str, name: &str, email: &str, role: Role) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            can_login: true,
        }
    }

    /// Identity for a verified token whose subject is not in the directory
    pub fn anonymous_member(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: String::new(),
            email: String::new(),
            role: Role::User,
            can_login: false,
        }
    }

    pub fn check_password(&self, candidate: &str) -> bool {
        self.can_login && candidate == STUB_PASSWORD
    }
}

/// Fixed set of accounts
#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self {
            users: vec![
                User::new("1", "Admin User", "admin@example.com", Role::Admin),
                User::new("2", "Test User", "user@example.com", Role::User),
            ],
        }
    }
}

impl UserDirectory {
    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email == email)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }
}
