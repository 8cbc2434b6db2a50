//! UOW lifecycle states.

use std::fmt;

/// A UOW's lifecycle state, denoted by the queue directory holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueState {
    /// Awaiting admission in the principal queue.
    Waiting,
    /// Awaiting admission in the high-priority queue, drained first.
    PriorityWaiting,
    /// Currently bound to the single supervised job process.
    Executing,
    /// Terminal: job exited 0.
    Done,
    /// Terminal: job exited nonzero, or could not be launched.
    Error,
    /// Terminal: job timed out or was killed.
    Failed,
    /// Terminal: content failed structural validation; never executed.
    Trashed,
}

impl QueueState {
    /// All states, in the order used for status reporting.
    pub const ALL: [QueueState; 7] = [
        QueueState::Waiting,
        QueueState::PriorityWaiting,
        QueueState::Executing,
        QueueState::Done,
        QueueState::Error,
        QueueState::Failed,
        QueueState::Trashed,
    ];

    /// Whether a UOW in this state will never move again.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            QueueState::Done | QueueState::Error | QueueState::Failed | QueueState::Trashed
        )
    }
}

impl fmt::Display for QueueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QueueState::Waiting => "waiting",
            QueueState::PriorityWaiting => "priority-waiting",
            QueueState::Executing => "executing",
            QueueState::Done => "done",
            QueueState::Error => "error",
            QueueState::Failed => "failed",
            QueueState::Trashed => "trashed",
        };
        write!(f, "{}", label)
    }
}
