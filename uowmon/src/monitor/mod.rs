//! The heartbeat monitor.
//!
//! Ties the queue store, job supervisor, and control channel together in
//! a fixed-interval polling loop. One heartbeat runs three strictly
//! ordered steps: process incoming commands, poll the supervised job,
//! admit the next eligible UOW. All mutation happens on this one logical
//! thread; the only concurrency is the supervised process itself and
//! external actors touching the queue directories and control files.
//!
//! Per-UOW and per-command failures are resolved within the step that
//! produced them and never stop the loop. Only environment-level
//! failures (queue root inaccessible, control files unwritable)
//! propagate out as [`MonitorError`].

mod gate;

pub use gate::{AlwaysReady, LoadAverageGate, ReadinessGate};

use crate::config::ConfigFile;
use crate::control::{Command, ControlError, IncomingFile, Ledger};
use crate::queue::{QueueError, QueueState, QueueStore};
use crate::supervisor::{JobSupervisor, PollOutcome, Verdict};
use crate::uow::UowEvent;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Environment-level failures that terminate the monitor.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Control-channel file inaccessible.
    #[error(transparent)]
    Control(#[from] ControlError),

    /// Queue layout inaccessible.
    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Whether the heartbeat loop should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatOutcome {
    /// Keep polling.
    Continue,
    /// A `SHUTDOWN` command was processed; stop the loop.
    Shutdown,
}

/// The single-threaded job monitor.
pub struct Monitor {
    config: ConfigFile,
    store: QueueStore,
    supervisor: JobSupervisor,
    incoming: IncomingFile,
    ledger: Ledger,
    gate: Box<dyn ReadinessGate>,
}

impl Monitor {
    /// Builds a monitor from configuration, creating the queue layout.
    ///
    /// The readiness gate comes from `[monitor] max_load_average` when
    /// set, otherwise [`AlwaysReady`]; use [`with_gate`] to plug in a
    /// custom predicate.
    ///
    /// [`with_gate`]: Monitor::with_gate
    pub fn new(config: ConfigFile) -> Result<Self, MonitorError> {
        let store = QueueStore::new(&config.queues);
        store.ensure_layout()?;

        let root = &config.queues.root;
        let incoming = IncomingFile::new(config.control.incoming_path(root));
        let ledger = Ledger::new(config.control.outgoing_path(root));
        let supervisor = JobSupervisor::new(config.timeouts.clone());
        let gate: Box<dyn ReadinessGate> = match config.monitor.max_load_average {
            Some(max_load) => Box::new(LoadAverageGate::new(max_load)),
            None => Box::new(AlwaysReady),
        };

        Ok(Self {
            config,
            store,
            supervisor,
            incoming,
            ledger,
            gate,
        })
    }

    /// Replaces the readiness gate.
    pub fn with_gate(mut self, gate: Box<dyn ReadinessGate>) -> Self {
        self.gate = gate;
        self
    }

    /// The queue store backing this monitor.
    pub fn store(&self) -> &QueueStore {
        &self.store
    }

    /// Runs the heartbeat loop until `SHUTDOWN` is received or the
    /// cancellation token fires.
    ///
    /// On a fatal error one final diagnostic is appended to the ledger
    /// before the error is returned.
    pub async fn run(&mut self, shutdown: CancellationToken) -> Result<(), MonitorError> {
        let result = self.run_loop(&shutdown).await;
        if let Err(e) = &result {
            error!(error = %e, "Monitor terminating on fatal error");
            let _ = self
                .ledger
                .emit(&format!("Monitor terminating on fatal error: {}", e));
        }
        result
    }

    async fn run_loop(&mut self, shutdown: &CancellationToken) -> Result<(), MonitorError> {
        self.ledger.emit("Monitor starting up.")?;
        self.ledger.emit(&self.config.render())?;
        info!(
            root = %self.config.queues.root.display(),
            heartbeat_seconds = self.config.monitor.heartbeat_seconds,
            "Monitor started"
        );

        let interval = Duration::from_secs(self.config.monitor.heartbeat_seconds);
        loop {
            if shutdown.is_cancelled() {
                info!("Monitor cancelled");
                break;
            }
            if self.run_once()? == HeartbeatOutcome::Shutdown {
                info!("Shutdown requested via control channel");
                break;
            }
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Monitor cancelled");
                    break;
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
        Ok(())
    }

    /// Performs one heartbeat: commands, then job poll, then admission.
    pub fn run_once(&mut self) -> Result<HeartbeatOutcome, MonitorError> {
        if self.process_commands()? {
            return Ok(HeartbeatOutcome::Shutdown);
        }
        self.reap_finished();
        self.admit_next()?;
        Ok(HeartbeatOutcome::Continue)
    }

    /// Step 1: consume and dispatch pending incoming commands.
    ///
    /// Returns true when a `SHUTDOWN` was processed. Every command line
    /// produces exactly two ledger entries: the `Received ...` entry and
    /// either the action's own result message or a completion notice.
    fn process_commands(&mut self) -> Result<bool, MonitorError> {
        let mut shutdown = false;
        for line in self.incoming.collect()? {
            match line.command {
                None => {
                    warn!(line = %line.raw, "Unrecognized incoming message");
                    self.ledger.emit(&format!(
                        "Received invalid incoming message \"{}\".",
                        elide(&line.raw)
                    ))?;
                }
                Some(command) => {
                    info!(command = command.name(), "Received control command");
                    self.ledger
                        .emit(&format!("Received {} request.", command.name()))?;
                    let response = self.perform(command, &mut shutdown)?;
                    self.ledger.emit(&response)?;
                }
            }
        }
        Ok(shutdown)
    }

    /// Executes one command's action, returning its response message.
    fn perform(&mut self, command: Command, shutdown: &mut bool) -> Result<String, MonitorError> {
        match command {
            Command::Shutdown => {
                *shutdown = true;
                Ok("Monitor is shutting down...".to_string())
            }
            Command::Status => Ok(self.status_summary()?),
            Command::Config => Ok(self.config.render()),
            Command::KillJob => Ok(match self.supervisor.request_kill() {
                Some(id) => format!("Terminating job for UOW '{}'.", id),
                None => "No job is executing; nothing to kill.".to_string(),
            }),
            Command::Help => Ok(crate::control::howto()),
        }
    }

    /// Step 2: poll the supervised job and move its UOW on conclusion.
    fn reap_finished(&mut self) {
        match self.supervisor.poll() {
            PollOutcome::Idle | PollOutcome::Running => {}
            PollOutcome::Concluded { uow, verdict } => {
                let (dest, event) = match verdict {
                    Verdict::Exited(0) => (QueueState::Done, UowEvent::Done),
                    Verdict::Exited(code) => (QueueState::Error, UowEvent::Error(code)),
                    Verdict::TimedOut => (QueueState::Failed, UowEvent::Timeout),
                    Verdict::Killed => (QueueState::Failed, UowEvent::Killed),
                };
                if let Err(e) =
                    self.store
                        .transition(&uow, QueueState::Executing, dest, &event)
                {
                    error!(uow = %uow, error = %e, "Failed to move concluded UOW");
                }
            }
        }
    }

    /// Step 3: admit the next eligible UOW when the slot is free.
    ///
    /// Drains the priority queue before the wait queue, oldest enqueue
    /// time first. Malformed UOWs encountered on the way are diverted to
    /// trash without occupying the slot. At most one launch attempt per
    /// heartbeat; a spawn failure routes that UOW straight to the error
    /// queue and leaves the slot free for the next heartbeat.
    fn admit_next(&mut self) -> Result<(), MonitorError> {
        if !self.supervisor.is_idle() {
            return Ok(());
        }
        // The executing directory can still hold a UOW when a concluded
        // move failed or an external actor dropped a file in; never
        // double-occupy it.
        if !self.store.list(QueueState::Executing)?.is_empty() {
            warn!("Executing directory is occupied; admission deferred");
            return Ok(());
        }
        if !self.gate.is_ready() {
            debug!("Readiness gate closed; admission deferred");
            return Ok(());
        }

        for state in [QueueState::PriorityWaiting, QueueState::Waiting] {
            for id in self.store.list(state)? {
                let record = match self.store.read(&id, state) {
                    Ok(record) => record,
                    Err(e) => {
                        warn!(uow = %id, error = %e, "Failed to read waiting UOW");
                        continue;
                    }
                };

                if let Err(reason) = record.validate() {
                    warn!(uow = %id, reason = %reason, "Malformed UOW diverted to trash");
                    let event = UowEvent::Trashed(reason.reason().to_string());
                    if let Err(e) = self.store.transition(&id, state, QueueState::Trashed, &event)
                    {
                        error!(uow = %id, error = %e, "Failed to trash malformed UOW");
                    }
                    continue;
                }

                match self.supervisor.launch(&record) {
                    Ok(()) => {
                        if let Err(e) = self.store.transition(
                            &id,
                            state,
                            QueueState::Executing,
                            &UowEvent::Launched,
                        ) {
                            error!(
                                uow = %id,
                                error = %e,
                                "Failed to move launched UOW into executing; aborting job"
                            );
                            self.supervisor.abort();
                        }
                    }
                    Err(e) => {
                        warn!(uow = %id, error = %e, "Failed to launch job");
                        if let Err(e) = self.store.transition(
                            &id,
                            state,
                            QueueState::Error,
                            &UowEvent::LaunchFailed,
                        ) {
                            error!(uow = %id, error = %e, "Failed to move unlaunchable UOW");
                        }
                    }
                }
                return Ok(());
            }
        }
        Ok(())
    }

    /// Renders the `STATUS` summary: current occupant plus queue counts.
    fn status_summary(&self) -> Result<String, MonitorError> {
        let mut out = String::from("Monitor status:\n");
        match self.supervisor.current() {
            Some((id, elapsed)) => {
                out.push_str(&format!(
                    "  executing: {} ({}s elapsed)\n",
                    id,
                    elapsed.as_secs()
                ));
            }
            None => out.push_str("  executing: none\n"),
        }
        for state in QueueState::ALL {
            let count = self.store.count(state)?;
            out.push_str(&format!(
                "  {:<21} {}\n",
                format!("{}:", self.store.dir_name(state)),
                count
            ));
        }
        Ok(out)
    }
}

/// Truncates long unrecognized lines for the error response.
fn elide(line: &str) -> String {
    if line.chars().count() > 10 {
        let head: String = line.chars().take(10).collect();
        format!("{}...", head)
    } else {
        line.to_string()
    }
}
