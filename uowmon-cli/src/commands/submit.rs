//! `uowmon submit` - stamp a file as a UOW and enqueue it.
//!
//! Producer convenience: validates the file, prepends an `enqueued`
//! history event, and writes it into the waiting (or priority) queue
//! under its own filename. The original file is left in place.

use crate::error::CliError;
use std::fs;
use std::path::Path;
use uowmon::config::ConfigFile;
use uowmon::queue::{QueueState, QueueStore};
use uowmon::time::epoch_seconds;
use uowmon::uow::{UowEvent, UowId, UowRecord};

pub fn execute(config_path: &Path, file: &Path, priority: bool) -> Result<(), CliError> {
    let config = ConfigFile::load_from(config_path)?;
    let store = QueueStore::new(&config.queues);
    store.ensure_layout()?;

    let submit_err = |reason: String| CliError::Submit {
        path: file.display().to_string(),
        reason,
    };

    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| submit_err("path has no filename".to_string()))?;
    let content = fs::read_to_string(file).map_err(|e| submit_err(e.to_string()))?;

    let mut record = UowRecord::parse(UowId::new(name), &content);
    record
        .validate()
        .map_err(|e| submit_err(e.to_string()))?;
    record.record_event(&UowEvent::Enqueued, epoch_seconds());

    let state = if priority {
        QueueState::PriorityWaiting
    } else {
        QueueState::Waiting
    };
    store.insert(&record, state)?;

    println!(
        "Enqueued '{}' into {}",
        record.id(),
        store.dir(state).display()
    );
    Ok(())
}
