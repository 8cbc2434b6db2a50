//! Incoming command file processing.

use super::command::{howto, Command};
use super::ControlError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One consumed command line from the incoming file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingLine {
    /// The trimmed line as the operator wrote it.
    pub raw: String,
    /// The matched command, or `None` for an unrecognized line.
    pub command: Option<Command>,
}

/// The incoming message file: external actors append command lines, the
/// monitor consumes them destructively each heartbeat.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    path: PathBuf,
}

impl IncomingFile {
    /// Creates a handle over the given file path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The incoming file's path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot-reads the file and consumes its command lines.
    ///
    /// Blank lines and lines whose first nonblank character is `#` are
    /// structural: they pass through unchanged. Every other line is
    /// returned for dispatch and the file is rewritten with only the
    /// structural lines retained. Anything appended after the read is
    /// picked up on the next heartbeat.
    ///
    /// A missing file is created pre-populated with the usage guide and
    /// nothing is dispatched that cycle.
    pub fn collect(&self) -> Result<Vec<IncomingLine>, ControlError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Creating incoming message file with usage guide");
            fs::write(&self.path, howto()).map_err(|source| ControlError::WriteIncoming {
                path: self.path.clone(),
                source,
            })?;
            return Ok(Vec::new());
        }

        let content =
            fs::read_to_string(&self.path).map_err(|source| ControlError::ReadIncoming {
                path: self.path.clone(),
                source,
            })?;

        let mut kept = String::new();
        let mut consumed = Vec::new();
        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                kept.push_str(line);
                kept.push('\n');
            } else {
                consumed.push(IncomingLine {
                    raw: trimmed.to_string(),
                    command: Command::parse(trimmed),
                });
            }
        }

        if !consumed.is_empty() {
            self.rewrite_consumed(&content, kept)?;
        }
        Ok(consumed)
    }

    /// Rewrites the file with the structural lines, carrying over any
    /// bytes an external writer appended after the snapshot was taken so
    /// they are dispatched on the next heartbeat instead of dropped.
    fn rewrite_consumed(&self, snapshot: &str, mut kept: String) -> Result<(), ControlError> {
        if let Ok(current) = fs::read_to_string(&self.path) {
            if current.len() > snapshot.len() && current.starts_with(snapshot) {
                kept.push_str(&current[snapshot.len()..]);
            }
        }
        fs::write(&self.path, &kept).map_err(|source| ControlError::WriteIncoming {
            path: self.path.clone(),
            source,
        })
    }
}
