// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Logging setup
//!
//! Events go to size-rotated JSON-lines files in the log directory and,
//! outside production, to a human-readable console layer:
//!
//! | File           | Levels            |
//! |----------------|-------------------|
//! | `LOG_FILE`     | everything        |
//! | `access.log`   | info and above    |
//! | `security.log` | warn and above    |
//! | `error.log`    | error only        |
//!
//! `LOG_FILE` (default `app.log`) is the one read back by `/logs`.

mod redact;

use std::path::PathBuf;
use std::sync::Mutex;

use file_rotate::{ContentLimit, FileRotate, compression::Compression, suffix::AppendCount};
use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt, registry::LookupSpan,
    util::SubscriberInitExt,
};

use crate::config::Config;
use crate::error::{AppError, Result};

pub use redact::{sanitize_email, sanitize_query};

/// A file is rotated once it grows past this size
pub const MAX_LOG_BYTES: usize = 5 * 1024 * 1024;

/// Rotated files kept per log (`app.log.1` .. `app.log.5`)
pub const MAX_LOG_FILES: usize = 5;

pub const ACCESS_LOG: &str = "access.log";
pub const SECURITY_LOG: &str = "security.log";
pub const ERROR_LOG: &str = "error.log";

type RotatingWriter = Mutex<FileRotate<AppendCount>>;

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Installs the global subscriber. Creates the log directory if needed.
pub fn setup_tracing(config: &Config) -> Result<()> {
    // RUST_LOG wins; "info" otherwise
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = (!config.is_production()).then(fmt::layer);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layers(config, MAX_LOG_BYTES)?)
        .with(console_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to install tracing subscriber: {e}")))
}

/// One JSON layer per log file, each with its own level floor
pub(crate) fn file_layers<S>(config: &Config, max_bytes: usize) -> Result<Vec<BoxedLayer<S>>>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    std::fs::create_dir_all(&config.log_dir)?;

    let files = [
        (config.log_path(), LevelFilter::TRACE),
        (config.log_dir.join(ACCESS_LOG), LevelFilter::INFO),
        (config.log_dir.join(SECURITY_LOG), LevelFilter::WARN),
        (config.log_dir.join(ERROR_LOG), LevelFilter::ERROR),
    ];

    Ok(files
        .into_iter()
        .map(|(path, level)| {
            fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_span_list(false)
                .with_ansi(false)
                .with_writer(rotating_writer(path, max_bytes))
                .with_filter(level)
                .boxed()
        })
        .collect())
}

/// Appends to `path`, rotating to `path.1`, `path.2`, ... past `max_bytes`.
/// An event is never split across two files.
fn rotating_writer(path: PathBuf, max_bytes: usize) -> RotatingWriter {
    Mutex::new(FileRotate::new(
        path,
        AppendCount::new(MAX_LOG_FILES),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::None,
        #[cfg(unix)]
        None,
    ))
}
