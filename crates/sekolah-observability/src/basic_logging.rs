use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directive: `sekolah*` crates at `level`, HTTP plumbing at warn.
pub(crate) fn default_directive(level: &str) -> String {
    format!(
        "sekolah={level},sekolah_cli={level},sekolah_client={level},sekolah_core={level},reqwest=warn,hyper=warn,hyper_util=warn"
    )
}

/// Initialize console-only logging.
///
/// - **Log Level**: `LOG_LEVEL` environment variable (default: "info"), overridden by `RUST_LOG`
/// - **Format**: compact, with file and line
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_basic_console_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(&log_level)));

    let console_layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter);

    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}
