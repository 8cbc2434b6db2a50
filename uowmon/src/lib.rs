//! UOWMON - a single-node job monitor over directory-backed queues.
//!
//! Units of work (UOWs) are plain-text files that move between queue
//! directories as they progress through their lifecycle. The directory a
//! file sits in *is* its state; an atomic rename is the only transition
//! primitive. The monitor launches one external process per UOW, enforces
//! per-invocation timeouts, and speaks a line-oriented control protocol
//! over a pair of plain-text files.
//!
//! # High-Level API
//!
//! ```ignore
//! use tokio_util::sync::CancellationToken;
//! use uowmon::config::ConfigFile;
//! use uowmon::monitor::Monitor;
//!
//! let config = ConfigFile::load_from(&path)?;
//! let mut monitor = Monitor::new(config)?;
//! monitor.run(CancellationToken::new()).await?;
//! ```

pub mod config;
pub mod control;
pub mod logging;
pub mod monitor;
pub mod queue;
pub mod supervisor;
pub mod time;
pub mod uow;

/// Version of the uowmon library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
