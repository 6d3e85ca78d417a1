//! Structured logging for Shoreline.
//!
//! Console output carries uptime, module path, and thread name so the
//! background generation workers are distinguishable from the frame loop.
//! Debug builds can additionally write JSON lines to a file.

use std::path::{Path, PathBuf};

use shoreline_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";

/// File name of the JSON log written in debug builds.
pub const LOG_FILE_NAME: &str = "shoreline.log";

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins over `config.debug.log_level`, which wins over the
/// built-in default. When `debug_build` is set and `log_dir` is writable, a
/// JSON file layer is added as well.
///
/// ```no_run
/// use shoreline_config::Config;
/// use shoreline_log::init_logging;
///
/// let config = Config::default();
/// init_logging(None, false, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config)));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    let wants_file = debug_build && config.is_none_or(|c| c.debug.log_to_file);
    if wants_file
        && let Some(log_dir) = log_dir
        && let Some(log_file) = create_log_file(log_dir)
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_names(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// Filter directive used when `RUST_LOG` is unset.
pub fn filter_directive(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.is_empty() => config.debug.log_level.clone(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Create an `EnvFilter` with the default filter string.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

/// Path of the JSON log inside `log_dir`.
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE_NAME)
}

fn create_log_file(log_dir: &Path) -> Option<std::fs::File> {
    std::fs::create_dir_all(log_dir).ok()?;
    std::fs::File::create(log_file_path(log_dir)).ok()
}
