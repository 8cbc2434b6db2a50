//! Logging infrastructure for the monitor.
//!
//! Structured logging with file output and optional console output:
//! - Writes to the configured log file (cleared on session start)
//! - Optionally mirrors to stdout for interactive runs
//! - Configurable via the RUST_LOG environment variable
//!
//! The log is diagnostics only. Operator-facing responses go to the
//! outgoing ledger, never here.

use std::fs;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard flushes and closes the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize the logging system.
///
/// Creates the log directory if needed, clears the previous session's
/// log file, and sets up file output plus optional stdout output.
///
/// # Arguments
///
/// * `log_path` - Full path of the log file
/// * `stdout_enabled` - Also mirror log lines to stdout
/// * `debug` - Default the filter to `debug` instead of `info` when
///   RUST_LOG is unset
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or the log
/// file cannot be cleared.
pub fn init_logging(
    log_path: &Path,
    stdout_enabled: bool,
    debug: bool,
) -> Result<LoggingGuard, io::Error> {
    let log_dir = log_path.parent().unwrap_or_else(|| Path::new("."));
    let log_file = log_path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "uowmon.log".to_string());

    fs::create_dir_all(log_dir)?;

    // Clear the previous session's log file. Handles both existing and
    // non-existing files.
    fs::write(log_path, "")?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(true);

    let stdout_layer = if stdout_enabled {
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stdout)
                .with_ansi(true)
                .compact(),
        )
    } else {
        None
    };

    let default_filter = if debug { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    #[test]
    fn log_file_setup_creates_directory() {
        // init_logging installs a global subscriber, so only the file
        // operations are exercised here.
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("logs").join("uowmon.log");

        fs::create_dir_all(log_path.parent().unwrap()).unwrap();
        fs::write(&log_path, "").unwrap();

        assert!(log_path.exists());
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
    }
}
