//! Default values and constants for all configuration settings.

use super::settings::*;
use std::path::PathBuf;

/// Default seconds between heartbeats.
pub const DEFAULT_HEARTBEAT_SECONDS: u64 = 10;

/// Default job timeout (30 minutes) when no per-program entry matches.
pub const DEFAULT_JOB_TIMEOUT_SECS: u64 = 30 * 60;

/// Default queue directory names.
pub const DEFAULT_WAIT_DIR: &str = "wait-q";
pub const DEFAULT_PRIORITY_DIR: &str = "priority-q";
pub const DEFAULT_EXECUTING_DIR: &str = "currently-executing";
pub const DEFAULT_DONE_DIR: &str = "done-q";
pub const DEFAULT_ERROR_DIR: &str = "error-q";
pub const DEFAULT_FAIL_DIR: &str = "fail-q";
pub const DEFAULT_TRASH_DIR: &str = "trash";

/// Default control-channel file names, relative to the queue root.
pub const DEFAULT_OUTGOING_FILE: &str = "monitor-says";
pub const DEFAULT_INCOMING_FILE: &str = "monitor-reads";

/// Default log file path, relative to the queue root.
pub const DEFAULT_LOG_FILE: &str = "logs/uowmon.log";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            monitor: MonitorSettings::default(),
            queues: QueueSettings::default(),
            control: ControlSettings::default(),
            timeouts: TimeoutSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            heartbeat_seconds: DEFAULT_HEARTBEAT_SECONDS,
            max_load_average: None,
        }
    }
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            wait: DEFAULT_WAIT_DIR.to_string(),
            priority: DEFAULT_PRIORITY_DIR.to_string(),
            executing: DEFAULT_EXECUTING_DIR.to_string(),
            done: DEFAULT_DONE_DIR.to_string(),
            error: DEFAULT_ERROR_DIR.to_string(),
            fail: DEFAULT_FAIL_DIR.to_string(),
            trash: DEFAULT_TRASH_DIR.to_string(),
        }
    }
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            incoming: PathBuf::from(DEFAULT_INCOMING_FILE),
            outgoing: PathBuf::from(DEFAULT_OUTGOING_FILE),
        }
    }
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            default_secs: DEFAULT_JOB_TIMEOUT_SECS,
            per_program: Vec::new(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_LOG_FILE),
            stdout: true,
        }
    }
}
