//! Directory-backed queue store.
//!
//! Each lifecycle state maps to one directory under the queue root; a
//! UOW's state is whichever directory holds its file. Atomic rename is
//! the only transition primitive, so external listers never observe a
//! UOW in both directories or in neither.

mod state;
mod store;

pub use state::QueueState;
pub use store::{QueueError, QueueStore, PLACEHOLDER_NAME};
