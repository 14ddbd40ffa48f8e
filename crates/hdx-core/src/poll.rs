//! Waiting for a patient query to complete.
//!
//! After `$query` is submitted the server processes it asynchronously. The
//! only way to observe completion is to issue `GET Patient/{id}/$query`
//! until it answers 200. [`wait_for_query`] does this with a fixed sleep
//! between checks and a wall-clock bound.
//!
//! The bound is checked at the top of each cycle only, so in the worst case
//! the caller waits `max_wait` plus one `interval` (plus request time).
//! A `max_wait` of zero times out before the first request.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::error::QueryTimeoutError;
use crate::fhir::{QueryManifest, QueryStatus};
use crate::traits::FhirConnection;
use crate::types::RecordId;
use crate::Result;

/// Sleep between status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Total time to wait for a query before giving up.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(900);

/// Timing of the query poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Fixed sleep between checks. Not exponential.
    pub interval: Duration,
    /// Deadline measured from the start of polling.
    pub max_wait: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}

impl PollConfig {
    /// Default interval with the given deadline.
    pub fn with_max_wait(max_wait: Duration) -> Self {
        Self {
            max_wait,
            ..Self::default()
        }
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Upper bound on status checks: `ceil(max_wait / interval) + 1`.
    ///
    /// `None` when the interval is zero.
    pub fn max_attempts(&self) -> Option<u64> {
        let interval = self.interval.as_nanos();
        if interval == 0 {
            return None;
        }
        let cycles = self.max_wait.as_nanos().div_ceil(interval);
        Some(u64::try_from(cycles).unwrap_or(u64::MAX).saturating_add(1))
    }
}

/// State of a [`Poller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Waiting,
    Ready,
    TimedOut,
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollState::Waiting)
    }
}

/// The poller's state machine, separate from any I/O.
///
/// Starts `Waiting`. A 200 moves it to `Ready`; reaching the deadline at a
/// cycle boundary moves it to `TimedOut`. Both are terminal.
#[derive(Debug)]
pub struct Poller {
    config: PollConfig,
    started: Instant,
    attempts: u32,
    last_status: Option<u16>,
    state: PollState,
}

impl Poller {
    /// Start the clock.
    pub fn start(config: PollConfig) -> Self {
        Self {
            config,
            started: Instant::now(),
            attempts: 0,
            last_status: None,
            state: PollState::Waiting,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Status checks recorded so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Top-of-cycle deadline check. Returns true once timed out.
    pub fn deadline_passed(&mut self) -> bool {
        if self.state == PollState::Waiting && self.elapsed() >= self.config.max_wait {
            self.state = PollState::TimedOut;
        }
        self.state == PollState::TimedOut
    }

    /// Record the result of one status check.
    pub fn observe(&mut self, status: &QueryStatus) -> PollState {
        if self.state.is_terminal() {
            return self.state;
        }

        self.attempts = self.attempts.saturating_add(1);
        match status {
            QueryStatus::Ready(_) => {
                self.last_status = Some(200);
                self.state = PollState::Ready;
            }
            QueryStatus::Pending { status } => self.last_status = Some(*status),
        }
        self.state
    }

    /// Describe the timeout with the context gathered so far.
    pub fn timeout_error(&self) -> QueryTimeoutError {
        QueryTimeoutError {
            waited: self.elapsed(),
            attempts: self.attempts,
            last_status: self.last_status,
        }
    }
}

/// A completed query.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    /// Status checks issued, including the successful one.
    pub attempts: u32,
    /// Time from the first check to completion.
    pub elapsed: Duration,
    /// Parsed body of the ready response, if it had one.
    pub manifest: Option<QueryManifest>,
}

/// Poll the patient's `$query` status until it answers 200 or the deadline
/// passes.
///
/// # Errors
///
/// Returns [`Error::QueryTimeout`](crate::Error::QueryTimeout) when the
/// deadline passes, or the connection's error if a status check fails at
/// the transport level.
#[instrument(skip(conn, config), fields(patient = %patient))]
pub async fn wait_for_query<C>(
    conn: &C,
    patient: &RecordId,
    config: PollConfig,
) -> Result<QueryOutcome>
where
    C: FhirConnection + ?Sized,
{
    let mut poller = Poller::start(config);
    debug!(
        interval_secs = config.interval.as_secs(),
        max_wait_secs = config.max_wait.as_secs(),
        "Waiting for query"
    );

    loop {
        if poller.deadline_passed() {
            let err = poller.timeout_error();
            warn!(
                attempts = err.attempts,
                waited_secs = err.waited.as_secs(),
                "Query timed out"
            );
            return Err(err.into());
        }

        let status = conn.query_status(patient).await?;

        if poller.observe(&status) == PollState::Ready {
            info!(attempts = poller.attempts(), "Query complete");
            return Ok(QueryOutcome {
                attempts: poller.attempts(),
                elapsed: poller.elapsed(),
                manifest: status.into_manifest(),
            });
        }

        if let QueryStatus::Pending { status } = status {
            info!(status, attempt = poller.attempts(), "Waiting for query");
        }

        tokio::time::sleep(config.interval).await;
    }
}
