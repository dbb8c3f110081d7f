//! # Progress events emitted while a run is orchestrated.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Step events**: what the host-facing step reports (start banner, parameters, result)
//! - **Orchestration events**: start attempts, retries, status ticks, deadline
//! - **Subscriber events**: failures of the logging fan-out itself
//!
//! The [`Event`] struct carries additional metadata such as timestamps, run handle,
//! attempts, delays and reasons. [`Event::message`] renders the human-readable line.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use perfrun::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::StartRetryScheduled)
//!     .with_attempt(1)
//!     .with_delay(Duration::from_secs(10))
//!     .with_reason("connection error: reset");
//!
//! assert_eq!(ev.kind, EventKind::StartRetryScheduled);
//! assert_eq!(
//!     ev.message(),
//!     "Start attempt 1 failed: connection error: reset; retrying in 10s"
//! );
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::error::fmt_duration;
use crate::remote::{RunHandle, RunStatus};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Banner logged when a step starts.
pub const START_BANNER: &str = "Start Performance Center test";

/// Notice logged when a failure is tolerated because the fail flag is off.
pub const CONTINUE_NOTICE: &str =
    "Fail If Task Fail flag is set to false -> continue build regardless of the error";

/// Classification of progress events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Step events ===
    /// The host step started.
    ///
    /// Sets:
    /// - `at`, `seq`
    StepStarted,

    /// One configuration parameter, logged before orchestration.
    ///
    /// Sets:
    /// - `reason`: `"<Name>: <value>"`
    ParameterLogged,

    /// The orchestration produced its outcome.
    ///
    /// Sets:
    /// - `outcome`: outcome label
    /// - `reason`: outcome description including its cause
    OutcomeReached,

    /// A non-success outcome is tolerated; the host job continues.
    ContinuingAfterFailure,

    // === Orchestration events ===
    /// A start call is about to be made.
    ///
    /// Sets:
    /// - `attempt`: start attempt number (1-based)
    StartRequested,

    /// A start call failed transiently; a retry is scheduled.
    ///
    /// Sets:
    /// - `attempt`: failed attempt number (1-based)
    /// - `delay`: wait before the next start call
    /// - `reason`: client error message
    StartRetryScheduled,

    /// The remote run started; polling begins.
    ///
    /// Sets:
    /// - `run`: run handle
    /// - `delay`: polling interval
    /// - `timeout`: overall deadline, from now
    RunStarted,

    /// A status query succeeded.
    ///
    /// Sets:
    /// - `run`: run handle
    /// - `attempt`: poll tick number (1-based)
    /// - `status`: reported status
    StatusPolled,

    /// A status query failed transiently; the same query will be retried.
    ///
    /// Sets:
    /// - `run`: run handle
    /// - `attempt`: failed query number within this tick (1-based)
    /// - `delay`: wait before the retry
    /// - `reason`: client error message
    QueryRetryScheduled,

    /// The deadline passed before the run reached a terminal status.
    ///
    /// Sets:
    /// - `run`: run handle
    DeadlineExceeded,

    /// Cancellation was observed at a suspension point.
    CancelObserved,

    // === Subscriber events ===
    /// A subscriber panicked while handling an event.
    ///
    /// Sets:
    /// - `subscriber`: subscriber name
    /// - `reason`: panic message
    SubscriberPanicked,
}

/// Progress event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Remote run, once started.
    pub run: Option<RunHandle>,
    /// Attempt or tick number (starting from 1).
    pub attempt: Option<u32>,
    /// Retry delay or polling interval.
    pub delay: Option<Duration>,
    /// Overall timeout.
    pub timeout: Option<Duration>,
    /// Reported run status.
    pub status: Option<RunStatus>,
    /// Stable outcome label.
    pub outcome: Option<&'static str>,
    /// Human-readable reason (errors, parameter lines, outcome causes).
    pub reason: Option<Arc<str>>,
    /// Name of the subscriber, for subscriber events.
    pub subscriber: Option<&'static str>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            run: None,
            attempt: None,
            delay: None,
            timeout: None,
            status: None,
            outcome: None,
            reason: None,
            subscriber: None,
        }
    }

    /// Attaches the run handle.
    #[inline]
    pub fn with_run(mut self, run: &RunHandle) -> Self {
        self.run = Some(run.clone());
        self
    }

    /// Attaches an attempt or tick number.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a delay.
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay = Some(d);
        self
    }

    /// Attaches the overall timeout.
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        self.timeout = Some(d);
        self
    }

    /// Attaches a run status.
    #[inline]
    pub fn with_status(mut self, status: RunStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches an outcome label.
    #[inline]
    pub fn with_outcome(mut self, label: &'static str) -> Self {
        self.outcome = Some(label);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        let mut ev = Event::new(EventKind::SubscriberPanicked).with_reason(info);
        ev.subscriber = Some(subscriber);
        ev
    }

    /// Returns `true` for events describing a problem (retries, failures, deadline).
    pub fn is_warning(&self) -> bool {
        match self.kind {
            EventKind::StartRetryScheduled
            | EventKind::QueryRetryScheduled
            | EventKind::DeadlineExceeded
            | EventKind::CancelObserved
            | EventKind::ContinuingAfterFailure
            | EventKind::SubscriberPanicked => true,
            EventKind::OutcomeReached => self.outcome != Some("success"),
            _ => false,
        }
    }

    /// Renders the human-readable log line for this event.
    pub fn message(&self) -> String {
        let run = self.run.as_ref().map(RunHandle::as_str).unwrap_or("?");
        let reason = self.reason.as_deref().unwrap_or("unknown");
        let attempt = self.attempt.unwrap_or(0);
        let delay = self.delay.map(fmt_duration).unwrap_or_else(|| "?".into());
        let timeout = self.timeout.map(fmt_duration).unwrap_or_else(|| "?".into());

        match self.kind {
            EventKind::StepStarted => START_BANNER.to_string(),
            EventKind::ParameterLogged => reason.to_string(),
            EventKind::OutcomeReached => format!("Result: {reason}"),
            EventKind::ContinuingAfterFailure => CONTINUE_NOTICE.to_string(),
            EventKind::StartRequested => format!("Starting run (attempt {attempt})"),
            EventKind::StartRetryScheduled => {
                format!("Start attempt {attempt} failed: {reason}; retrying in {delay}")
            }
            EventKind::RunStarted => {
                format!("Run {run} started; polling every {delay}, deadline in {timeout}")
            }
            EventKind::StatusPolled => {
                let status = self
                    .status
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "?".into());
                format!("Run {run} status: {status}")
            }
            EventKind::QueryRetryScheduled => format!(
                "Status query {attempt} for run {run} failed: {reason}; retrying in {delay}"
            ),
            EventKind::DeadlineExceeded => {
                format!("Run {run} did not finish before its deadline")
            }
            EventKind::CancelObserved => "Cancellation requested; stopping".to_string(),
            EventKind::SubscriberPanicked => format!(
                "subscriber {} panicked: {reason}",
                self.subscriber.unwrap_or("unknown")
            ),
        }
    }
}
