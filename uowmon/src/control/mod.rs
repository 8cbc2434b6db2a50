//! File-based control channel between operators and the monitor.
//!
//! Incoming: a line-oriented command file that external actors append
//! to; the monitor consumes command lines destructively each heartbeat
//! and preserves blank and `#`-comment lines. Outgoing: an append-only
//! timestamped ledger the monitor alone writes.

mod command;
mod incoming;
mod ledger;

pub use command::{howto, Command};
pub use incoming::{IncomingFile, IncomingLine};
pub use ledger::Ledger;

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Control-channel I/O failures.
///
/// These are environment-level: a control file the monitor cannot read
/// or write makes the whole protocol inoperable, so callers treat them
/// as fatal.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Could not read the incoming message file.
    #[error("failed to read incoming message file '{path}': {source}")]
    ReadIncoming {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Could not rewrite the incoming message file.
    #[error("failed to rewrite incoming message file '{path}': {source}")]
    WriteIncoming {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Could not append to the outgoing ledger.
    #[error("failed to append to outgoing message file '{path}': {source}")]
    WriteOutgoing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
