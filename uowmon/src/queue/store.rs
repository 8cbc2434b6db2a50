//! The queue store: filesystem operations over the queue directories.

use super::state::QueueState;
use crate::config::QueueSettings;
use crate::time::epoch_seconds;
use crate::uow::{UowEvent, UowId, UowRecord};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

/// Name of the permanent placeholder file kept in the executing
/// directory so the directory survives in version control and rsync
/// mirrors. Listers skip it.
pub const PLACEHOLDER_NAME: &str = "README";

/// Errors from queue store operations.
///
/// `MissingSource` and `DestinationExists` are local to one transition
/// attempt; `Io` means the queue layout itself is inaccessible, which
/// callers treat as fatal.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The UOW is not where the caller thought it was.
    #[error("UOW '{id}' not found in {queue} queue")]
    MissingSource { id: UowId, queue: QueueState },

    /// A same-named file already sits at the destination. No silent
    /// overwrite: the caller must disambiguate or abort.
    #[error("{queue} queue already holds a file named '{id}'")]
    DestinationExists { id: UowId, queue: QueueState },

    /// The queue directory or UOW file could not be accessed.
    #[error("failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl QueueError {
    fn io(path: PathBuf, source: io::Error) -> Self {
        QueueError::Io { path, source }
    }
}

/// Manages UOW files across the named state directories.
///
/// Atomic rename is the only state-transition primitive, so no external
/// lister ever observes a UOW as absent from both source and
/// destination, or present in both.
#[derive(Debug, Clone)]
pub struct QueueStore {
    queues: QueueSettings,
}

impl QueueStore {
    /// Creates a store over the configured queue layout.
    pub fn new(queues: &QueueSettings) -> Self {
        Self {
            queues: queues.clone(),
        }
    }

    /// The directory backing a state.
    pub fn dir(&self, state: QueueState) -> PathBuf {
        self.queues.dir(state)
    }

    /// The configured directory name for a state.
    pub fn dir_name(&self, state: QueueState) -> &str {
        self.queues.dir_name(state)
    }

    /// Creates every queue directory and the executing-directory
    /// placeholder. Failure here means the queue root is unusable.
    pub fn ensure_layout(&self) -> Result<(), QueueError> {
        for state in QueueState::ALL {
            let dir = self.dir(state);
            fs::create_dir_all(&dir).map_err(|e| QueueError::io(dir.clone(), e))?;
        }
        let placeholder = self.dir(QueueState::Executing).join(PLACEHOLDER_NAME);
        if !placeholder.exists() {
            fs::write(
                &placeholder,
                "This directory holds the currently executing UOW.\n\
                 This file is a permanent placeholder; do not remove it.\n",
            )
            .map_err(|e| QueueError::io(placeholder.clone(), e))?;
        }
        Ok(())
    }

    /// Lists a queue's UOWs, oldest enqueue time first.
    ///
    /// Ordering comes from each UOW's embedded enqueue timestamp, never
    /// from filesystem modification time, so it stays correct under
    /// concurrent external writes. Unstamped UOWs sort last; ties break
    /// by filename. The executing placeholder, dotfiles, and
    /// subdirectories are skipped.
    pub fn list(&self, state: QueueState) -> Result<Vec<UowId>, QueueError> {
        let dir = self.dir(state);
        let entries = fs::read_dir(&dir).map_err(|e| QueueError::io(dir.clone(), e))?;

        let mut uows: Vec<(Option<u64>, UowId)> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| QueueError::io(dir.clone(), e))?;
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    warn!(queue = %state, name = ?raw, "Skipping non-UTF-8 filename");
                    continue;
                }
            };
            if name == PLACEHOLDER_NAME || name.starts_with('.') {
                continue;
            }
            if entry.path().is_dir() {
                continue;
            }
            let id = UowId::new(name);
            // A file can vanish between read_dir and here if an external
            // actor renames it; treat that as not-listed, not fatal.
            match fs::read_to_string(entry.path()) {
                Ok(content) => {
                    let record = UowRecord::parse(id.clone(), &content);
                    uows.push((record.enqueue_time(), id));
                }
                Err(e) => {
                    debug!(queue = %state, uow = %id, error = %e, "Skipping unreadable entry");
                }
            }
        }

        uows.sort_by(|a, b| match (a.0, b.0) {
            (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.1.cmp(&b.1)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.1.cmp(&b.1),
        });
        Ok(uows.into_iter().map(|(_, id)| id).collect())
    }

    /// Counts a queue's UOWs (placeholder and dotfiles excluded).
    pub fn count(&self, state: QueueState) -> Result<usize, QueueError> {
        let dir = self.dir(state);
        let entries = fs::read_dir(&dir).map_err(|e| QueueError::io(dir.clone(), e))?;
        let mut count = 0;
        for entry in entries {
            let entry = entry.map_err(|e| QueueError::io(dir.clone(), e))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name == PLACEHOLDER_NAME || name.starts_with('.') || entry.path().is_dir() {
                continue;
            }
            count += 1;
        }
        Ok(count)
    }

    /// Reads and parses a UOW from a queue.
    pub fn read(&self, id: &UowId, state: QueueState) -> Result<UowRecord, QueueError> {
        let path = self.dir(state).join(id.as_str());
        let content = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                QueueError::MissingSource {
                    id: id.clone(),
                    queue: state,
                }
            } else {
                QueueError::io(path.clone(), e)
            }
        })?;
        Ok(UowRecord::parse(id.clone(), &content))
    }

    /// Writes a new UOW into a queue. Fails if the name is taken.
    pub fn insert(&self, record: &UowRecord, state: QueueState) -> Result<(), QueueError> {
        let path = self.dir(state).join(record.id().as_str());
        if path.exists() {
            return Err(QueueError::DestinationExists {
                id: record.id().clone(),
                queue: state,
            });
        }
        fs::write(&path, record.render()).map_err(|e| QueueError::io(path.clone(), e))
    }

    /// Prepends a timestamped history event to a UOW in place.
    ///
    /// The rewrite goes through a dotted temp file in the same directory
    /// plus a rename, so concurrent readers see old or new content but
    /// never a partial file. The payload is carried over untouched.
    pub fn append_history(
        &self,
        id: &UowId,
        state: QueueState,
        event: &UowEvent,
    ) -> Result<(), QueueError> {
        let mut record = self.read(id, state)?;
        record.record_event(event, epoch_seconds());

        let dir = self.dir(state);
        let tmp = dir.join(format!(".{}.tmp", id.as_str()));
        let path = dir.join(id.as_str());
        fs::write(&tmp, record.render()).map_err(|e| QueueError::io(tmp.clone(), e))?;
        fs::rename(&tmp, &path).map_err(|e| QueueError::io(path.clone(), e))
    }

    /// Atomically moves a UOW between queues.
    pub fn transfer(
        &self,
        id: &UowId,
        from: QueueState,
        to: QueueState,
    ) -> Result<(), QueueError> {
        let src = self.dir(from).join(id.as_str());
        let dst = self.dir(to).join(id.as_str());

        if !src.exists() {
            return Err(QueueError::MissingSource {
                id: id.clone(),
                queue: from,
            });
        }
        if dst.exists() {
            return Err(QueueError::DestinationExists {
                id: id.clone(),
                queue: to,
            });
        }
        fs::rename(&src, &dst).map_err(|e| QueueError::io(src.clone(), e))
    }

    /// Records `event` in the UOW's history, then moves it `from` -> `to`.
    ///
    /// This is the only transition primitive the monitor uses. The event
    /// is appended first so the file that lands in the destination
    /// already carries it. Submission filenames recur, so when the
    /// destination already holds a same-named file the UOW is renamed
    /// with a timestamp suffix and moved under that name instead of
    /// being stranded at the source. Returns the id the UOW landed
    /// under.
    pub fn transition(
        &self,
        id: &UowId,
        from: QueueState,
        to: QueueState,
        event: &UowEvent,
    ) -> Result<UowId, QueueError> {
        self.append_history(id, from, event)?;
        match self.transfer(id, from, to) {
            Ok(()) => {
                debug!(uow = %id, from = %from, to = %to, event = %event, "Transitioned UOW");
                Ok(id.clone())
            }
            Err(QueueError::DestinationExists { .. }) => {
                let unique = self.unique_name(id, from, to);
                let src = self.dir(from).join(id.as_str());
                let renamed = self.dir(from).join(unique.as_str());
                fs::rename(&src, &renamed).map_err(|e| QueueError::io(src.clone(), e))?;
                self.transfer(&unique, from, to)?;
                warn!(
                    uow = %id,
                    renamed = %unique,
                    from = %from,
                    to = %to,
                    "Destination name taken; moved UOW under a suffixed name"
                );
                Ok(unique)
            }
            Err(e) => Err(e),
        }
    }

    /// Picks a timestamp-suffixed variant of `id` absent from both the
    /// source and destination directories.
    fn unique_name(&self, id: &UowId, from: QueueState, to: QueueState) -> UowId {
        let stamp = epoch_seconds();
        let mut n = 0u32;
        loop {
            let candidate = if n == 0 {
                format!("{}.{}", id, stamp)
            } else {
                format!("{}.{}-{}", id, stamp, n)
            };
            if !self.dir(to).join(&candidate).exists()
                && !self.dir(from).join(&candidate).exists()
            {
                return UowId::new(candidate);
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueueSettings;
    use tempfile::TempDir;

    fn store() -> (TempDir, QueueStore) {
        let dir = tempfile::tempdir().unwrap();
        let queues = QueueSettings {
            root: dir.path().to_path_buf(),
            ..QueueSettings::default()
        };
        let store = QueueStore::new(&queues);
        store.ensure_layout().unwrap();
        (dir, store)
    }

    fn put(store: &QueueStore, state: QueueState, name: &str, content: &str) {
        fs::write(store.dir(state).join(name), content).unwrap();
    }

    #[test]
    fn ensure_layout_creates_dirs_and_placeholder() {
        let (_dir, store) = store();
        for state in QueueState::ALL {
            assert!(store.dir(state).is_dir());
        }
        assert!(store
            .dir(QueueState::Executing)
            .join(PLACEHOLDER_NAME)
            .is_file());
    }

    #[test]
    fn list_orders_by_embedded_enqueue_time() {
        let (_dir, store) = store();
        put(&store, QueueState::Waiting, "a", "timestamp: 100 enqueued\nsleep 1\n");
        put(&store, QueueState::Waiting, "b", "timestamp: 50 enqueued\nsleep 1\n");
        put(&store, QueueState::Waiting, "unstamped", "sleep 1\n");

        let ids = store.list(QueueState::Waiting).unwrap();
        let names: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        assert_eq!(names, ["b", "a", "unstamped"]);
    }

    #[test]
    fn list_skips_placeholder_and_dotfiles() {
        let (_dir, store) = store();
        put(&store, QueueState::Executing, ".partial.tmp", "x\n");
        assert!(store.list(QueueState::Executing).unwrap().is_empty());
        assert_eq!(store.count(QueueState::Executing).unwrap(), 0);
    }

    #[test]
    fn transfer_moves_atomically() {
        let (_dir, store) = store();
        put(&store, QueueState::Waiting, "a", "sleep 1\n");
        let id = UowId::from("a");

        store
            .transfer(&id, QueueState::Waiting, QueueState::Executing)
            .unwrap();
        assert!(!store.dir(QueueState::Waiting).join("a").exists());
        assert!(store.dir(QueueState::Executing).join("a").exists());
    }

    #[test]
    fn transfer_missing_source_fails() {
        let (_dir, store) = store();
        let err = store
            .transfer(&UowId::from("ghost"), QueueState::Waiting, QueueState::Done)
            .unwrap_err();
        assert!(matches!(err, QueueError::MissingSource { .. }));
    }

    #[test]
    fn transfer_refuses_destination_collision() {
        let (_dir, store) = store();
        put(&store, QueueState::Waiting, "a", "old\n");
        put(&store, QueueState::Done, "a", "new\n");

        let err = store
            .transfer(&UowId::from("a"), QueueState::Waiting, QueueState::Done)
            .unwrap_err();
        assert!(matches!(err, QueueError::DestinationExists { .. }));
        // Neither file was disturbed.
        assert_eq!(
            fs::read_to_string(store.dir(QueueState::Waiting).join("a")).unwrap(),
            "old\n"
        );
        assert_eq!(
            fs::read_to_string(store.dir(QueueState::Done).join("a")).unwrap(),
            "new\n"
        );
    }

    #[test]
    fn append_history_prepends_and_keeps_payload() {
        let (_dir, store) = store();
        put(&store, QueueState::Waiting, "a", "timestamp: 100 enqueued\nsleep 1\npayload tail\n");
        let id = UowId::from("a");

        store
            .append_history(&id, QueueState::Waiting, &UowEvent::Launched)
            .unwrap();

        let record = store.read(&id, QueueState::Waiting).unwrap();
        assert_eq!(record.history()[0].event, "launched");
        assert_eq!(record.history()[1].event, "enqueued");
        assert_eq!(record.payload(), &["sleep 1".to_string(), "payload tail".to_string()]);
        // No temp file left behind.
        assert!(!store.dir(QueueState::Waiting).join(".a.tmp").exists());
    }

    #[test]
    fn transition_appends_event_then_moves() {
        let (_dir, store) = store();
        put(&store, QueueState::Executing, "a", "timestamp: 10 launched\ntrue\n");
        let id = UowId::from("a");

        store
            .transition(&id, QueueState::Executing, QueueState::Done, &UowEvent::Done)
            .unwrap();

        let record = store.read(&id, QueueState::Done).unwrap();
        assert_eq!(record.history()[0].event, "done");
        assert_eq!(record.history()[1].event, "launched");
    }

    #[test]
    fn transition_renames_on_destination_collision() {
        let (_dir, store) = store();
        put(&store, QueueState::Executing, "dup", "timestamp: 10 launched\ntrue\n");
        put(&store, QueueState::Done, "dup", "timestamp: 5 done\ntrue\n");

        let landed = store
            .transition(
                &UowId::from("dup"),
                QueueState::Executing,
                QueueState::Done,
                &UowEvent::Done,
            )
            .unwrap();

        assert!(landed.as_str().starts_with("dup."));
        assert_eq!(store.count(QueueState::Executing).unwrap(), 0);
        assert_eq!(store.count(QueueState::Done).unwrap(), 2);
        let record = store.read(&landed, QueueState::Done).unwrap();
        assert_eq!(record.history()[0].event, "done");
        // The resting occupant was not disturbed.
        assert_eq!(
            fs::read_to_string(store.dir(QueueState::Done).join("dup")).unwrap(),
            "timestamp: 5 done\ntrue\n"
        );
    }

    #[test]
    fn read_missing_uow_fails() {
        let (_dir, store) = store();
        let err = store
            .read(&UowId::from("ghost"), QueueState::Waiting)
            .unwrap_err();
        assert!(matches!(err, QueueError::MissingSource { .. }));
    }

    #[test]
    fn insert_refuses_existing_name() {
        let (_dir, store) = store();
        let record = UowRecord::parse(UowId::from("a"), "sleep 1\n");
        store.insert(&record, QueueState::Waiting).unwrap();
        let err = store.insert(&record, QueueState::Waiting).unwrap_err();
        assert!(matches!(err, QueueError::DestinationExists { .. }));
    }
}
