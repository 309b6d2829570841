//! Subscriber setup for the `aktifite` binary.
//!
//! `AKTIFITE_DEBUG_LOG=1` forces debug output; otherwise `RUST_LOG` applies,
//! falling back to `info`. Console output goes to stderr so command output on
//! stdout stays clean. With `log_to_file` set, a daily rolling file under
//! `<root>/logs` receives the same events.

use std::env;

use aktifite_core::{AppConfig, StorageConfig};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

const DEBUG_ENV_VAR: &str = "AKTIFITE_DEBUG_LOG";
const LOG_FILE_PREFIX: &str = "aktifite.log";

fn debug_enabled() -> bool {
    env::var(DEBUG_ENV_VAR)
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false)
}

fn env_filter() -> EnvFilter {
    if debug_enabled() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Installs the global subscriber. Keep the returned guard alive until exit
/// or buffered file output is lost.
pub fn init(storage: &StorageConfig, config: &AppConfig) -> Option<WorkerGuard> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter());

    if !config.log_to_file {
        tracing_subscriber::registry().with(console).init();
        return None;
    }
    if let Err(err) = storage.ensure_dirs() {
        tracing_subscriber::registry().with(console).init();
        tracing::warn!(error = %err, "Log directory unavailable; logging to stderr only");
        return None;
    }

    let appender = tracing_appender::rolling::daily(storage.logs_dir(), LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(env_filter());

    tracing_subscriber::registry().with(console).with(file).init();
    Some(guard)
}
