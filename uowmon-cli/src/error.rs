//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent
//! formatting and appropriate exit codes.

use std::fmt;
use std::process;
use uowmon::config::ConfigFileError;
use uowmon::monitor::MonitorError;
use uowmon::queue::QueueError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(ConfigFileError),
    /// Failed to build the async runtime
    Runtime(std::io::Error),
    /// The monitor terminated on a fatal error
    Monitor(MonitorError),
    /// Queue layout could not be read or created
    Queue(QueueError),
    /// A file could not be submitted as a UOW
    Submit { path: String, reason: String },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Monitor(_) | CliError::Queue(_) => {
                eprintln!();
                eprintln!("Check that the queue root exists and is writable, e.g.:");
                eprintln!("  uowmon init");
            }
            CliError::Submit { .. } => {
                eprintln!();
                eprintln!("A UOW file needs a nonblank invocation line after any");
                eprintln!("`timestamp: ...` history lines.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Monitor(e) => write!(f, "Monitor failed: {}", e),
            CliError::Queue(e) => write!(f, "Queue error: {}", e),
            CliError::Submit { path, reason } => {
                write!(f, "Cannot submit '{}': {}", path, reason)
            }
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<MonitorError> for CliError {
    fn from(e: MonitorError) -> Self {
        CliError::Monitor(e)
    }
}

impl From<QueueError> for CliError {
    fn from(e: QueueError) -> Self {
        CliError::Queue(e)
    }
}
