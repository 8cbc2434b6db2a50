//! `uowmon status` - one-shot snapshot of the queues.
//!
//! Reads the queue directories directly; works whether or not a monitor
//! is running. For a running monitor's own view, send `STATUS` over the
//! control channel instead.

use crate::error::CliError;
use std::path::Path;
use uowmon::config::ConfigFile;
use uowmon::queue::{QueueState, QueueStore};

pub fn execute(config_path: &Path) -> Result<(), CliError> {
    let config = ConfigFile::load_from(config_path)?;
    let store = QueueStore::new(&config.queues);

    println!("Queue root: {}", config.queues.root.display());
    for state in QueueState::ALL {
        let ids = store.list(state)?;
        println!("  {:<21} {}", format!("{}:", store.dir_name(state)), ids.len());
        for id in ids {
            println!("    {}", id);
        }
    }
    Ok(())
}
