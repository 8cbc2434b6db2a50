//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use crate::queue::QueueState;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Complete monitor configuration loaded from the config file.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Heartbeat loop settings.
    pub monitor: MonitorSettings,
    /// Queue root and directory names.
    pub queues: QueueSettings,
    /// Control-channel file paths.
    pub control: ControlSettings,
    /// Per-program job timeouts.
    pub timeouts: TimeoutSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Heartbeat loop configuration.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// Seconds to sleep between heartbeats.
    pub heartbeat_seconds: u64,
    /// Readiness-gate threshold: admit new jobs only while the
    /// one-minute load average stays below this. `None` disables the
    /// check and the monitor is always ready.
    pub max_load_average: Option<f64>,
}

/// Queue directory layout.
///
/// All names are single path components under `root`.
#[derive(Debug, Clone)]
pub struct QueueSettings {
    /// Root directory containing all queue directories.
    pub root: PathBuf,
    /// Principal job queue.
    pub wait: String,
    /// Dedicated queue for high-priority jobs, drained first.
    pub priority: String,
    /// Location of the currently executing UOW (plus a permanent
    /// placeholder file that listers ignore).
    pub executing: String,
    /// Queue for successfully completed UOWs.
    pub done: String,
    /// Queue for UOWs whose job exited with an error.
    pub error: String,
    /// Queue for UOWs whose job did not complete.
    pub fail: String,
    /// Nonqueue container for structurally invalid files.
    pub trash: String,
}

impl QueueSettings {
    /// The configured directory name for a state.
    pub fn dir_name(&self, state: QueueState) -> &str {
        match state {
            QueueState::Waiting => &self.wait,
            QueueState::PriorityWaiting => &self.priority,
            QueueState::Executing => &self.executing,
            QueueState::Done => &self.done,
            QueueState::Error => &self.error,
            QueueState::Failed => &self.fail,
            QueueState::Trashed => &self.trash,
        }
    }

    /// Full path of a state's directory.
    pub fn dir(&self, state: QueueState) -> PathBuf {
        self.root.join(self.dir_name(state))
    }
}

/// Control-channel file paths.
///
/// Relative paths resolve against the queue root. These are message
/// passing files, not logs: the incoming file is consumed destructively,
/// the outgoing file is an append-only ledger.
#[derive(Debug, Clone)]
pub struct ControlSettings {
    /// File external actors append commands to.
    pub incoming: PathBuf,
    /// Ledger the monitor appends responses to.
    pub outgoing: PathBuf,
}

impl ControlSettings {
    /// Resolves the incoming file path against the queue root.
    pub fn incoming_path(&self, root: &Path) -> PathBuf {
        resolve(root, &self.incoming)
    }

    /// Resolves the outgoing ledger path against the queue root.
    pub fn outgoing_path(&self, root: &Path) -> PathBuf {
        resolve(root, &self.outgoing)
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Per-invocation-name job timeouts.
#[derive(Debug, Clone)]
pub struct TimeoutSettings {
    /// Timeout applied when no per-program entry matches.
    pub default_secs: u64,
    /// `(program basename, timeout seconds)` overrides.
    pub per_program: Vec<(String, u64)>,
}

impl TimeoutSettings {
    /// Resolves the timeout for a program basename.
    pub fn timeout_for(&self, program: &str) -> Duration {
        let secs = self
            .per_program
            .iter()
            .find(|(name, _)| name == program)
            .map(|(_, secs)| *secs)
            .unwrap_or(self.default_secs);
        Duration::from_secs(secs)
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingSettings {
    /// Log file path; relative paths resolve against the queue root.
    pub file: PathBuf,
    /// Whether to also log to stdout.
    pub stdout: bool,
}
