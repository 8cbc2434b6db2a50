//! `uowmon init` - create the queue layout and a default config file.

use crate::error::CliError;
use std::path::Path;
use uowmon::config::ConfigFile;
use uowmon::queue::{QueueState, QueueStore};

pub fn execute(config_path: &Path) -> Result<(), CliError> {
    ConfigFile::ensure_exists(config_path)?;
    let config = ConfigFile::load_from(config_path)?;

    let store = QueueStore::new(&config.queues);
    store.ensure_layout()?;

    println!("Config file: {}", config_path.display());
    println!("Queue root:  {}", config.queues.root.display());
    for state in QueueState::ALL {
        println!("  {}", store.dir(state).display());
    }
    Ok(())
}
