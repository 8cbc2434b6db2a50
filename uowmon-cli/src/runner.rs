//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading and logging initialization so command
//! handlers share one startup path.

use crate::error::CliError;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uowmon::config::ConfigFile;
use uowmon::logging::{init_logging, LoggingGuard};
use uowmon::monitor::Monitor;

/// Runner that manages CLI lifecycle for the long-running monitor.
pub struct CliRunner {
    /// Logging guard - keeps logging active while the runner exists.
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file.
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Config file to load (defaults apply if absent)
    /// * `debug` - When true, enables debug-level logging regardless of RUST_LOG
    pub fn new(config_path: &Path, debug: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load_from(config_path)?;

        // Relative log paths resolve against the queue root.
        let log_path = if config.logging.file.is_absolute() {
            config.logging.file.clone()
        } else {
            config.queues.root.join(&config.logging.file)
        };

        let logging_guard = init_logging(&log_path, config.logging.stdout, debug)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Runs the monitor on a current-thread runtime until `SHUTDOWN`
    /// arrives over the control channel or Ctrl-C is pressed.
    pub fn run_monitor(self) -> Result<(), CliError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)?;

        runtime.block_on(async {
            let mut monitor = Monitor::new(self.config)?;

            let shutdown = CancellationToken::new();
            let signal_token = shutdown.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Ctrl-C received, cancelling monitor");
                    signal_token.cancel();
                }
            });

            monitor.run(shutdown).await?;
            Ok(())
        })
    }
}
