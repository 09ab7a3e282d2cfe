//! Bounded polling sessions for asynchronous backend jobs.
//!
//! A session re-fetches state on a fixed interval until its target reports
//! completion, the timeout ceiling elapses, or the owner stops it. Each job
//! class (batch crawl, contract analysis) has one [`JobFlag`] so at most one
//! session per class runs at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sris_core::AppConfig;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::DashboardError;

/// Default time between ticks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default ceiling on one session.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_POLL_TIMEOUT,
        }
    }
}

impl From<&AppConfig> for PollConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            interval: config.poll_interval(),
            timeout: config.poll_timeout(),
        }
    }
}

/// Lifecycle of the most recent session of one job class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Active,
    Completed,
    TimedOut,
    Cancelled,
}

/// How a session ended, with the number of ticks it ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed { ticks: u32 },
    TimedOut { ticks: u32 },
    Cancelled { ticks: u32 },
}

impl SessionOutcome {
    #[must_use]
    pub fn state(self) -> SessionState {
        match self {
            Self::Completed { .. } => SessionState::Completed,
            Self::TimedOut { .. } => SessionState::TimedOut,
            Self::Cancelled { .. } => SessionState::Cancelled,
        }
    }

    #[must_use]
    pub fn ticks(self) -> u32 {
        match self {
            Self::Completed { ticks } | Self::TimedOut { ticks } | Self::Cancelled { ticks } => {
                ticks
            }
        }
    }
}

/// What a session polls.
#[async_trait]
pub trait PollTarget: Send + Sync + 'static {
    /// Short label used in log events.
    fn name(&self) -> &'static str;

    /// Re-fetches state and returns `true` once the job is finished. A failed
    /// fetch should be logged and reported as not finished.
    async fn tick(&self) -> bool;

    /// Records the terminal state. Runs before the job flag is released.
    async fn on_finish(&self, outcome: SessionOutcome);

    /// The single refresh issued after a timeout.
    async fn on_timeout(&self);
}

/// One-per-job-class "session running" flag.
#[derive(Debug, Clone, Default)]
pub struct JobFlag(Arc<AtomicBool>);

impl JobFlag {
    /// Takes the flag, or returns `None` if a session already holds it.
    #[must_use]
    pub fn try_acquire(&self) -> Option<FlagGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlagGuard(Arc::clone(&self.0)))
    }

    #[must_use]
    pub fn is_held(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Releases its [`JobFlag`] on drop, including when the session task is
/// aborted.
#[derive(Debug)]
pub struct FlagGuard(Arc<AtomicBool>);

impl Drop for FlagGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owner's handle on a running session.
#[derive(Debug)]
pub struct PollHandle {
    cancel: CancellationToken,
    join: JoinHandle<SessionOutcome>,
}

impl PollHandle {
    /// Ends the session, dropping any tick in flight. No final refresh is issued.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// A token that stops the session when cancelled, for callers that hand
    /// the handle itself to [`PollHandle::wait`].
    #[must_use]
    pub fn stop_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Waits for the session to end.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::SessionJoin`] if the session task panicked
    /// or was aborted.
    pub async fn wait(self) -> Result<SessionOutcome, DashboardError> {
        Ok(self.join.await?)
    }
}

/// Spawns a session for `target` that holds `guard` until it ends.
#[must_use]
pub fn spawn_session<T: PollTarget>(
    target: T,
    config: PollConfig,
    guard: FlagGuard,
) -> PollHandle {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let join = tokio::spawn(async move {
        let outcome = run_session(&target, config, &token).await;
        target.on_finish(outcome).await;
        drop(guard);
        if matches!(outcome, SessionOutcome::TimedOut { .. }) {
            target.on_timeout().await;
        }
        outcome
    });
    PollHandle { cancel, join }
}

/// Drives the tick loop. The first tick is due one interval after the start;
/// when a tick and the deadline fall due together the deadline wins. A tick
/// still in flight at the deadline or on stop is dropped.
pub async fn run_session<T: PollTarget + ?Sized>(
    target: &T,
    config: PollConfig,
    cancel: &CancellationToken,
) -> SessionOutcome {
    let start = Instant::now();
    let deadline = start + config.timeout;
    let mut interval = tokio::time::interval_at(start + config.interval, config.interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let timeout = tokio::time::sleep_until(deadline);
    tokio::pin!(timeout);

    tracing::info!(
        session = target.name(),
        interval_secs = config.interval.as_secs(),
        timeout_secs = config.timeout.as_secs(),
        "polling session started"
    );

    let mut ticks: u32 = 0;
    let outcome = loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break SessionOutcome::Cancelled { ticks },
            () = &mut timeout => break SessionOutcome::TimedOut { ticks },
            _ = interval.tick() => {
                ticks += 1;
                let done = tokio::select! {
                    biased;
                    () = cancel.cancelled() => break SessionOutcome::Cancelled { ticks },
                    () = &mut timeout => break SessionOutcome::TimedOut { ticks },
                    done = target.tick() => done,
                };
                tracing::debug!(session = target.name(), tick = ticks, done, "poll tick");
                if done {
                    break SessionOutcome::Completed { ticks };
                }
            }
        }
    };

    match outcome {
        SessionOutcome::Completed { .. } => {
            tracing::info!(session = target.name(), ticks, "polling session completed");
        }
        SessionOutcome::TimedOut { .. } => {
            tracing::warn!(session = target.name(), ticks, "polling session timed out");
        }
        SessionOutcome::Cancelled { .. } => {
            tracing::info!(session = target.name(), ticks, "polling session stopped");
        }
    }
    outcome
}
