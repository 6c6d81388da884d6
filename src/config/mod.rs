// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Configuration module for the MVP API application
//!
//! Loads and parses configuration from environment variables (and `.env`).

use std::path::PathBuf;
use std::time::Duration;


/// Default configuration values
pub mod defaults {
    pub const SERVER_ADDR: &str = "0.0.0.0:3000";
    pub const APP_ENV: &str = "development";
    pub const JWT_SECRET: &str = "change_me_jwt_secret";
    pub const JWT_EXPIRES_IN: &str = "1h";
    pub const LOG_DIR: &str = "logs";
    pub const LOG_FILE: &str = "app.log";
}

/// Environment variable names used by the application
pub mod env_vars {
    pub const SERVER_ADDR: &str = "SERVER_ADDR";
    pub const APP_ENV: &str = "APP_ENV";
    pub const JWT_SECRET: &str = "JWT_SECRET";
    pub const JWT_EXPIRES_IN: &str = "JWT_EXPIRES_IN";
    pub const LOG_DIR: &str = "LOG_DIR";
    pub const LOG_FILE: &str = "LOG_FILE";
    pub const MONITORING_ENABLED: &str = "MONITORING_ENABLED";
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Unknown values fall back to development
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

/// Application-wide configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub environment: Environment,
    pub jwt_secret: String,
    pub jwt_expires_in: Duration,
    pub log_dir: PathBuf,
    pub log_file: String,
    pub monitoring_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_addr: defaults::SERVER_ADDR.to_string(),
            environment: Environment::Development,
            jwt_secret: defaults::JWT_SECRET.to_string(),
            jwt_expires_in: Duration::from_secs(3600),
            log_dir: PathBuf::from(defaults::LOG_DIR),
            log_file: defaults::LOG_FILE.to_string(),
            monitoring_enabled: true,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Returns the warnings raised while parsing; they are meant to be
    /// logged once the tracing subscriber is installed.
    pub fn from_env() -> (Self, Vec<String>) {
        dotenvy::dotenv().ok();
        Self::from_lookup_with_warnings(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup_with_warnings(lookup).0
    }

    /// Like [`Config::from_lookup`], also returning parse warnings
    pub fn from_lookup_with_warnings<F>(lookup: F) -> (Self, Vec<String>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();

        let server_addr =
            lookup(env_vars::SERVER_ADDR).unwrap_or_else(|| defaults::SERVER_ADDR.to_string());

        let environment = Environment::parse(
            &lookup(env_vars::APP_ENV).unwrap_or_else(|| defaults::APP_ENV.to_string()),
        );

        let jwt_secret =
            lookup(env_vars::JWT_SECRET).unwrap_or_else(|| defaults::JWT_SECRET.to_string());
        if jwt_secret == defaults::JWT_SECRET {
            warnings.push("JWT_SECRET not set, using the built-in development secret".to_string());
        }

        let jwt_expires_in = lookup(env_vars::JWT_EXPIRES_IN)
            .and_then(|raw| {
                let parsed = parse_duration(&raw);
                if parsed.is_none() {
                    warnings.push(format!(
                        "Failed to parse JWT_EXPIRES_IN '{}'. Using {}.",
                        raw,
                        defaults::JWT_EXPIRES_IN
                    ));
                }
                parsed
            })
            .unwrap_or(Duration::from_secs(3600));

        let log_dir = lookup(env_vars::LOG_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(defaults::LOG_DIR));
        let log_file = lookup(env_vars::LOG_FILE).unwrap_or_else(|| defaults::LOG_FILE.to_string());

        let monitoring_enabled = lookup(env_vars::MONITORING_ENABLED)
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0" | "no"))
            .unwrap_or(true);

        let config = Config {
            server_addr,
            environment,
            jwt_secret,
            jwt_expires_in,
            log_dir,
            log_file,
            monitoring_enabled,
        };
        (config, warnings)
    }

    /// Validates the loaded configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.trim().is_empty() {
            return Err("JWT secret cannot be empty".to_string());
        }

        if self.server_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(format!(
                "Invalid server address '{}': expected 'host:port'",
                self.server_addr
            ));
        }

        if self.log_file.trim().is_empty() {
            return Err("Log file name cannot be empty".to_string());
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Full path of the JSON log file
    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join(&self.log_file)
    }
}

/// Parses `30s`, `15m`, `1h`, `7d` or a bare number of seconds
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let (digits, multiplier) = match raw.chars().last()? {
        's' => (&raw[..raw.len() - 1], 1),
        'm' => (&raw[..raw.len() - 1], 60),
        'h' => (&raw[..raw.len() - 1], 3600),
        'd' => (&raw[..raw.len() - 1], 86_400),
        c if c.is_ascii_digit() => (raw, 1),
        _ => return None,
    };

    let value: u64 = digits.trim().parse().ok()?;
    if value == 0 {
        return None;
    }
    value.checked_mul(multiplier).map(Duration::from_secs)
}
