//! The UOW record: identity, history, and payload.

use super::event::UowEvent;
use std::fmt;
use thiserror::Error;

/// Prefix marking a history line in a UOW file.
pub const TIMESTAMP_PREFIX: &str = "timestamp: ";

/// A UOW's identity: its filename within whatever queue directory
/// currently holds it.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct UowId(String);

impl UowId {
    /// Creates an id from a filename.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The filename as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UowId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Structural validation failures for a UOW.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedUow {
    /// The payload has no nonblank line to use as a job invocation.
    #[error("no invocation line in payload")]
    NoInvocation,
}

impl MalformedUow {
    /// Short machine-readable reason, used in `trashed:<reason>` events.
    pub fn reason(&self) -> &'static str {
        match self {
            MalformedUow::NoInvocation => "no-invocation",
        }
    }
}

/// One parsed history line: `timestamp: <epoch-seconds> <event>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Seconds since the Unix epoch when the event was recorded.
    pub timestamp: u64,
    /// The event name, e.g. `launched` or `error:1`.
    pub event: String,
}

impl HistoryEntry {
    /// Parses a single line as a history entry.
    ///
    /// Returns `None` when the line is not a valid history line, which
    /// is how the history/payload boundary is detected: the history is
    /// the maximal parseable prefix of the file. Fractional timestamps
    /// (written by older producers) are accepted and truncated.
    pub fn parse(line: &str) -> Option<Self> {
        let rest = line.strip_prefix(TIMESTAMP_PREFIX)?;
        let mut parts = rest.split_whitespace();
        let raw = parts.next()?;
        let seconds = raw.parse::<f64>().ok()?;
        if !seconds.is_finite() || seconds < 0.0 {
            return None;
        }
        let event = parts.collect::<Vec<_>>().join(" ");
        if event.is_empty() {
            return None;
        }
        Some(Self {
            timestamp: seconds as u64,
            event,
        })
    }

    /// Renders the entry back to its on-disk line form.
    pub fn render(&self) -> String {
        format!("{}{} {}", TIMESTAMP_PREFIX, self.timestamp, self.event)
    }
}

/// An in-memory UOW: parsed history plus the untouched payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UowRecord {
    id: UowId,
    /// History entries, newest first (file order).
    history: Vec<HistoryEntry>,
    /// Payload lines, verbatim. The first nonblank line is the invocation.
    payload: Vec<String>,
}

impl UowRecord {
    /// Parses file content into a record.
    ///
    /// The history is the maximal prefix of lines that parse as history
    /// entries; everything after the first line that doesn't is payload,
    /// preserved byte for byte.
    pub fn parse(id: UowId, content: &str) -> Self {
        let mut history = Vec::new();
        let mut payload = Vec::new();
        let mut in_payload = false;

        for line in content.lines() {
            if !in_payload {
                if let Some(entry) = HistoryEntry::parse(line) {
                    history.push(entry);
                    continue;
                }
                in_payload = true;
            }
            payload.push(line.to_string());
        }

        Self {
            id,
            history,
            payload,
        }
    }

    /// The UOW's identity (its filename).
    pub fn id(&self) -> &UowId {
        &self.id
    }

    /// History entries, newest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Payload lines, verbatim.
    pub fn payload(&self) -> &[String] {
        &self.payload
    }

    /// The job invocation: the first nonblank payload line, trimmed.
    pub fn invocation(&self) -> Option<&str> {
        self.payload
            .iter()
            .map(|line| line.trim())
            .find(|line| !line.is_empty())
    }

    /// When the UOW was enqueued: the oldest recorded timestamp.
    ///
    /// Queue ordering uses this, never filesystem mtime, so it stays
    /// correct under concurrent external writes. `None` means the
    /// producer never stamped the file; such UOWs sort last.
    pub fn enqueue_time(&self) -> Option<u64> {
        self.history.last().map(|entry| entry.timestamp)
    }

    /// Checks the structural contract: an invocation must be extractable.
    pub fn validate(&self) -> Result<(), MalformedUow> {
        match self.invocation() {
            Some(_) => Ok(()),
            None => Err(MalformedUow::NoInvocation),
        }
    }

    /// Prepends a history entry for `event` at `timestamp`.
    ///
    /// The payload is never touched; history only ever grows.
    pub fn record_event(&mut self, event: &UowEvent, timestamp: u64) {
        self.history.insert(
            0,
            HistoryEntry {
                timestamp,
                event: event.to_string(),
            },
        );
    }

    /// Renders the record back to file content.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.history {
            out.push_str(&entry.render());
            out.push('\n');
        }
        for line in &self.payload {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(content: &str) -> UowRecord {
        UowRecord::parse(UowId::from("job-1"), content)
    }

    #[test]
    fn parse_history_then_payload() {
        let r = record("timestamp: 200 launched\ntimestamp: 100 enqueued\nrsync -a src dst\nextra payload\n");
        assert_eq!(r.history().len(), 2);
        assert_eq!(r.history()[0].event, "launched");
        assert_eq!(r.history()[1].event, "enqueued");
        assert_eq!(r.invocation(), Some("rsync -a src dst"));
        assert_eq!(r.payload().len(), 2);
    }

    #[test]
    fn payload_only_file_has_empty_history() {
        let r = record("ansible-playbook deploy.yml\n");
        assert!(r.history().is_empty());
        assert_eq!(r.invocation(), Some("ansible-playbook deploy.yml"));
        assert_eq!(r.enqueue_time(), None);
    }

    #[test]
    fn history_stops_at_first_unparseable_line() {
        // Second "timestamp" line is bogus, so it belongs to the payload.
        let r = record("timestamp: 100 enqueued\ntimestamp: soon maybe\necho hi\n");
        assert_eq!(r.history().len(), 1);
        assert_eq!(r.payload()[0], "timestamp: soon maybe");
        // The invocation is the first nonblank payload line, even if it
        // resembles a corrupted history entry.
        assert_eq!(r.invocation(), Some("timestamp: soon maybe"));
    }

    #[test]
    fn fractional_timestamps_are_truncated() {
        let entry = HistoryEntry::parse("timestamp: 1755900000.25 enqueued");
        assert_eq!(
            entry,
            Some(HistoryEntry {
                timestamp: 1_755_900_000,
                event: "enqueued".to_string()
            })
        );
    }

    #[test]
    fn history_line_requires_event_name() {
        assert_eq!(HistoryEntry::parse("timestamp: 100"), None);
        assert_eq!(HistoryEntry::parse("timestamp: 100 "), None);
        assert_eq!(HistoryEntry::parse("timestamp:100 launched"), None);
    }

    #[test]
    fn enqueue_time_is_oldest_entry() {
        let r = record("timestamp: 300 launched\ntimestamp: 150 enqueued\nsleep 1\n");
        assert_eq!(r.enqueue_time(), Some(150));
    }

    #[test]
    fn invocation_skips_blank_payload_lines() {
        let r = record("timestamp: 100 enqueued\n\n  \n  make test\n");
        assert_eq!(r.invocation(), Some("make test"));
    }

    #[test]
    fn validate_rejects_missing_invocation() {
        let r = record("timestamp: 100 enqueued\n\n");
        assert_eq!(r.validate(), Err(MalformedUow::NoInvocation));
        assert_eq!(MalformedUow::NoInvocation.reason(), "no-invocation");
        assert!(record("").validate().is_err());
    }

    #[test]
    fn record_event_prepends_and_preserves_payload() {
        let mut r = record("timestamp: 100 enqueued\nsleep 1\n");
        r.record_event(&UowEvent::Launched, 200);
        assert_eq!(r.history()[0].event, "launched");
        assert_eq!(r.history()[0].timestamp, 200);
        assert_eq!(r.history()[1].event, "enqueued");
        assert_eq!(r.payload(), &["sleep 1".to_string()]);
    }

    #[test]
    fn render_round_trips() {
        let content = "timestamp: 200 launched\ntimestamp: 100 enqueued\nsleep 1\ntrailing data\n";
        let r = record(content);
        assert_eq!(r.render(), content);
        assert_eq!(UowRecord::parse(UowId::from("job-1"), &r.render()), r);
    }
}
