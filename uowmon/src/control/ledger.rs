//! The outgoing message ledger.

use super::ControlError;
use crate::time::epoch_seconds;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only, timestamped response ledger. The monitor is the sole
/// writer and never truncates it.
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    /// Creates a ledger over the given file path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The ledger's file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one entry of the form `\n<epoch-seconds>: <message>\n\n`.
    ///
    /// Creates the file with an initialization entry when absent. The
    /// message may span multiple lines; it is trimmed so every entry has
    /// uniform blank-line separation.
    pub fn emit(&self, message: &str) -> Result<(), ControlError> {
        let initialize = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| ControlError::WriteOutgoing {
                path: self.path.clone(),
                source,
            })?;

        if initialize {
            self.write_entry(&mut file, "Initializing new message file.")?;
        }
        self.write_entry(&mut file, message)
    }

    fn write_entry(&self, file: &mut File, message: &str) -> Result<(), ControlError> {
        write!(file, "\n{}: {}\n\n", epoch_seconds(), message.trim()).map_err(|source| {
            ControlError::WriteOutgoing {
                path: self.path.clone(),
                source,
            }
        })
    }
}
