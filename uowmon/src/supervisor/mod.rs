//! Job supervisor: launches the external process for the executing UOW
//! and observes it via non-blocking polling, enforcing a per-invocation
//! timeout.
//!
//! At most one job is ever active. Timeout and kill handling escalate
//! over consecutive polls: SIGTERM on the poll that detects the
//! condition, SIGKILL on the next poll if the process is still alive,
//! and a terminal [`PollOutcome::Concluded`] once the process is reaped.

mod invocation;

pub use invocation::Invocation;

use crate::config::TimeoutSettings;
use crate::uow::{UowId, UowRecord};
use std::io;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::process::{Child, Command};
use tracing::{info, warn};

/// Errors starting a job process.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// A job is already executing; the slot holds at most one.
    #[error("a job is already executing")]
    Busy,

    /// The UOW has no invocation line to execute.
    #[error("UOW has no invocation line")]
    NoInvocation,

    /// The process could not be spawned.
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// How the active job ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The job exited on its own with this status code (-1 when it was
    /// ended by a signal the supervisor did not send).
    Exited(i32),
    /// The job exceeded its deadline and was terminated.
    TimedOut,
    /// The job was terminated by an explicit kill request.
    Killed,
}

/// Result of one non-blocking poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// No job is active.
    Idle,
    /// The job is still running (possibly mid-escalation).
    Running,
    /// The job finished; the slot is now free.
    Concluded { uow: UowId, verdict: Verdict },
}

/// Signal-escalation progress for the active job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escalation {
    None,
    TermSent,
    KillSent,
}

/// The single active job: an `Executing` UOW bound to a process handle.
struct ActiveJob {
    uow_id: UowId,
    program: String,
    child: Child,
    started: Instant,
    timeout: Duration,
    escalation: Escalation,
    kill_requested: bool,
}

/// Launches and supervises the single externally running job process.
pub struct JobSupervisor {
    timeouts: TimeoutSettings,
    active: Option<ActiveJob>,
}

impl JobSupervisor {
    /// Creates a supervisor with the given timeout table.
    pub fn new(timeouts: TimeoutSettings) -> Self {
        Self {
            timeouts,
            active: None,
        }
    }

    /// Whether the executing slot is free.
    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// The active UOW's id and elapsed runtime, if any.
    pub fn current(&self) -> Option<(&UowId, Duration)> {
        self.active
            .as_ref()
            .map(|job| (&job.uow_id, job.started.elapsed()))
    }

    /// Launches the UOW's job process without blocking.
    ///
    /// Records the start instant and the timeout resolved from the
    /// invocation's program basename. The caller moves the UOW into the
    /// executing directory only after this succeeds, so a spawn failure
    /// never occupies `Executing`.
    pub fn launch(&mut self, uow: &UowRecord) -> Result<(), LaunchError> {
        if self.active.is_some() {
            return Err(LaunchError::Busy);
        }
        let line = uow.invocation().ok_or(LaunchError::NoInvocation)?;
        let invocation = Invocation::parse(line).ok_or(LaunchError::NoInvocation)?;
        let timeout = self.timeouts.timeout_for(invocation.timeout_key());

        // No kill-on-drop: a SHUTDOWN stops future scheduling only, and
        // an in-flight job keeps running unless explicitly killed.
        let child = Command::new(&invocation.program)
            .args(&invocation.args)
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        info!(
            uow = %uow.id(),
            program = %invocation.program,
            timeout_secs = timeout.as_secs(),
            pid = child.id(),
            "Job launched"
        );

        self.active = Some(ActiveJob {
            uow_id: uow.id().clone(),
            program: invocation.program,
            child,
            started: Instant::now(),
            timeout,
            escalation: Escalation::None,
            kill_requested: false,
        });
        Ok(())
    }

    /// Flags the active job for termination. Returns the target UOW id,
    /// or `None` when no job is executing.
    ///
    /// Termination itself happens through the escalation in [`poll`];
    /// the verdict will be [`Verdict::Killed`] unless the process exits
    /// on its own before any signal is sent.
    ///
    /// [`poll`]: JobSupervisor::poll
    pub fn request_kill(&mut self) -> Option<UowId> {
        let job = self.active.as_mut()?;
        job.kill_requested = true;
        warn!(uow = %job.uow_id, "Kill requested for active job");
        Some(job.uow_id.clone())
    }

    /// Kills and discards the active job without producing a verdict.
    ///
    /// Used when the UOW could not be moved into the executing directory
    /// after a successful spawn: the transition is aborted and the
    /// process must not keep running unsupervised.
    pub fn abort(&mut self) {
        if let Some(mut job) = self.active.take() {
            let _ = job.child.start_kill();
            warn!(uow = %job.uow_id, program = %job.program, "Aborted active job");
        }
    }

    /// Polls the active job once. Never blocks.
    pub fn poll(&mut self) -> PollOutcome {
        let (uow, verdict) = match self.active.as_mut() {
            None => return PollOutcome::Idle,
            Some(job) => match job.child.try_wait() {
                Err(e) => {
                    warn!(uow = %job.uow_id, error = %e, "Failed to poll job process");
                    return PollOutcome::Running;
                }
                Ok(None) => {
                    escalate_if_due(job);
                    return PollOutcome::Running;
                }
                Ok(Some(status)) => {
                    let verdict = if job.escalation != Escalation::None {
                        if job.kill_requested {
                            Verdict::Killed
                        } else {
                            Verdict::TimedOut
                        }
                    } else {
                        Verdict::Exited(status.code().unwrap_or(-1))
                    };
                    (job.uow_id.clone(), verdict)
                }
            },
        };

        self.active = None;
        info!(uow = %uow, verdict = ?verdict, "Job concluded");
        PollOutcome::Concluded { uow, verdict }
    }
}

/// Advances signal escalation when the job is overdue or flagged for
/// kill: SIGTERM first, SIGKILL one poll later if still alive.
fn escalate_if_due(job: &mut ActiveJob) {
    let overdue = job.started.elapsed() >= job.timeout;
    if !overdue && !job.kill_requested {
        return;
    }

    match job.escalation {
        Escalation::None => {
            warn!(
                uow = %job.uow_id,
                program = %job.program,
                elapsed_secs = job.started.elapsed().as_secs(),
                timeout_secs = job.timeout.as_secs(),
                kill_requested = job.kill_requested,
                "Sending SIGTERM to job"
            );
            send_sigterm(&job.child);
            job.escalation = Escalation::TermSent;
        }
        Escalation::TermSent => {
            warn!(uow = %job.uow_id, "Job survived SIGTERM, sending SIGKILL");
            let _ = job.child.start_kill();
            job.escalation = Escalation::KillSent;
        }
        Escalation::KillSent => {
            // Nothing left to send; waiting for the kernel to reap.
        }
    }
}

fn send_sigterm(child: &Child) {
    if let Some(pid) = child.id() {
        // SAFETY: plain syscall on a pid we spawned; no pointers involved.
        unsafe {
            libc::kill(pid as libc::pid_t, libc::SIGTERM);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeoutSettings;
    use crate::uow::UowRecord;
    use std::time::Duration;

    fn uow(name: &str, invocation: &str) -> UowRecord {
        UowRecord::parse(name.into(), &format!("timestamp: 100 enqueued\n{}\n", invocation))
    }

    fn supervisor(default_secs: u64) -> JobSupervisor {
        JobSupervisor::new(TimeoutSettings {
            default_secs,
            per_program: Vec::new(),
        })
    }

    async fn poll_until_concluded(sup: &mut JobSupervisor) -> (UowId, Verdict) {
        for _ in 0..200 {
            match sup.poll() {
                PollOutcome::Concluded { uow, verdict } => return (uow, verdict),
                _ => tokio::time::sleep(Duration::from_millis(20)).await,
            }
        }
        panic!("job never concluded");
    }

    #[tokio::test]
    async fn successful_job_exits_zero() {
        let mut sup = supervisor(60);
        sup.launch(&uow("ok", "true")).unwrap();
        assert!(!sup.is_idle());

        let (id, verdict) = poll_until_concluded(&mut sup).await;
        assert_eq!(id.as_str(), "ok");
        assert_eq!(verdict, Verdict::Exited(0));
        assert!(sup.is_idle());
    }

    #[tokio::test]
    async fn failing_job_reports_exit_code() {
        let mut sup = supervisor(60);
        sup.launch(&uow("bad", "false")).unwrap();

        let (_, verdict) = poll_until_concluded(&mut sup).await;
        assert_eq!(verdict, Verdict::Exited(1));
    }

    #[tokio::test]
    async fn overdue_job_is_escalated_to_timeout() {
        // Timeout of zero: overdue on the very first poll.
        let mut sup = supervisor(0);
        sup.launch(&uow("slow", "sleep 30")).unwrap();

        let (id, verdict) = poll_until_concluded(&mut sup).await;
        assert_eq!(id.as_str(), "slow");
        assert_eq!(verdict, Verdict::TimedOut);
        assert!(sup.is_idle());
    }

    #[tokio::test]
    async fn kill_request_yields_killed_verdict() {
        let mut sup = supervisor(600);
        sup.launch(&uow("victim", "sleep 30")).unwrap();
        assert_eq!(sup.request_kill().unwrap().as_str(), "victim");

        let (_, verdict) = poll_until_concluded(&mut sup).await;
        assert_eq!(verdict, Verdict::Killed);
    }

    #[tokio::test]
    async fn launch_while_busy_is_rejected() {
        let mut sup = supervisor(600);
        sup.launch(&uow("first", "sleep 30")).unwrap();
        let err = sup.launch(&uow("second", "true")).unwrap_err();
        assert!(matches!(err, LaunchError::Busy));
        sup.abort();
        assert!(sup.is_idle());
    }

    #[tokio::test]
    async fn spawn_failure_leaves_slot_free() {
        let mut sup = supervisor(600);
        let err = sup
            .launch(&uow("ghost", "/nonexistent/program/xyzzy"))
            .unwrap_err();
        assert!(matches!(err, LaunchError::Spawn { .. }));
        assert!(sup.is_idle());
        assert_eq!(sup.poll(), PollOutcome::Idle);
    }

    #[test]
    fn kill_request_on_idle_supervisor_is_noop() {
        let mut sup = supervisor(600);
        assert!(sup.request_kill().is_none());
    }
}
