use std::fs;

use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::basic_logging::{default_directive, init_basic_console_logging};

const LOG_DIR: &str = "storage/logs";

/// Observability can be switched off at runtime with `OBSERVABILITY_ENABLED=false`.
pub fn is_observability_enabled() -> bool {
    std::env::var("OBSERVABILITY_ENABLED")
        .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no" | "off"))
        .unwrap_or(true)
}

/// Console logging plus daily-rotated files under `storage/logs`:
/// `sekolah.log` (errors, plain text) and `sekolah.json` (info, structured).
///
/// Falls back to console-only logging when disabled at runtime or when the
/// log directory cannot be created.
///
/// The rolling appenders write synchronously on the logging thread. The CLI
/// logs a handful of lines per run, so there is no background writer or guard
/// to hold on to.
pub fn init_tracing() {
    if !is_observability_enabled() {
        init_basic_console_logging();
        return;
    }

    if let Err(e) = fs::create_dir_all(LOG_DIR) {
        init_basic_console_logging();
        warn!(error = %e, dir = LOG_DIR, "Cannot create log directory, logging to console only");
        return;
    }

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive("info")));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(console_filter);

    let file_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, "sekolah.log");

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_filter(EnvFilter::new("error"));

    // Structured logs for ingestion by Loki or similar
    let json_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, "sekolah.json");

    let json_layer = fmt::layer()
        .json()
        .with_writer(json_appender)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new("info"));

    let initialized = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(json_layer)
        .try_init()
        .is_ok();

    if initialized {
        info!(dir = LOG_DIR, "Tracing initialized with file logging");
    }
}
