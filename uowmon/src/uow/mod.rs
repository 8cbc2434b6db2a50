//! Unit-of-work (UOW) record types.
//!
//! A UOW is a plain-text file: zero or more timestamped history lines
//! (newest first), followed by an opaque payload whose first nonblank
//! line is the job invocation. The payload is immutable once created;
//! only the history grows and only the file's directory changes.

mod event;
mod record;

pub use event::UowEvent;
pub use record::{HistoryEntry, MalformedUow, UowId, UowRecord, TIMESTAMP_PREFIX};
