//! Lifecycle events recorded in a UOW's history.

use std::fmt;

/// An event appended to a UOW's history when its state changes.
///
/// The `Display` rendering is the on-disk event name and is part of the
/// file-format contract; external tooling greps for these strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UowEvent {
    /// Stamped by a producer when the UOW is dropped into a waiting queue.
    Enqueued,
    /// The monitor launched the UOW's job process.
    Launched,
    /// The job exited with status 0.
    Done,
    /// The job exited with a nonzero status code.
    Error(i32),
    /// The job's process could not be started at all.
    LaunchFailed,
    /// The job exceeded its deadline and was terminated.
    Timeout,
    /// The job was terminated by an explicit operator request.
    Killed,
    /// The UOW failed structural validation and was diverted to trash.
    Trashed(String),
}

impl fmt::Display for UowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UowEvent::Enqueued => write!(f, "enqueued"),
            UowEvent::Launched => write!(f, "launched"),
            UowEvent::Done => write!(f, "done"),
            UowEvent::Error(code) => write!(f, "error:{}", code),
            UowEvent::LaunchFailed => write!(f, "error:launch"),
            UowEvent::Timeout => write!(f, "timeout"),
            UowEvent::Killed => write!(f, "killed"),
            UowEvent::Trashed(reason) => write!(f, "trashed:{}", reason),
        }
    }
}
