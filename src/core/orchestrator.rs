//! # Orchestrator: start a remote run, then poll it to one outcome.
//!
//! ## Architecture
//! ```text
//! RunConfig ──► Orchestrator::execute()
//!
//! start phase (own Attempt):
//! loop {
//!   ├─► cancelled?             → OrchestrationError(Cancelled)
//!   ├─► publish StartRequested
//!   ├─► client.start(cfg)  (cancellable)
//!   │     ├─ Ok(handle)        → leave loop
//!   │     └─ Err(e)
//!   │          ├─ permanent / budget spent → OrchestrationError(StartFailed)
//!   │          └─ transient   → publish StartRetryScheduled, sleep(delay) (cancellable)
//! }
//! deadline = now + timeout
//! publish RunStarted
//! PollLoop::begin(handle, polling_interval, deadline)   (own Attempt)
//!   ├─ Finished(Passed)          → Success
//!   ├─ Finished(Failed|Stopped)  → RemoteFailure(status)
//!   ├─ TimedOut                  → TimedOut
//!   └─ Failed(cause)             → OrchestrationError(cause)
//! ```
//!
//! ## Rules
//! - Start failures **never** enter the poll phase
//! - Start and query retry budgets are **separate** counters with the same policy
//! - The deadline is fixed **once**, when the start call succeeds
//! - `execute` never reports the outcome and never decides the caller's fate;
//!   that is [`RunStep`](crate::RunStep)'s job
//! - No state survives between calls: each `execute` is independent

use std::sync::Arc;

use tokio::{select, time::Instant};
use tokio_util::sync::CancellationToken;

use crate::{
    config::RunConfig,
    core::{
        builder::OrchestratorBuilder,
        clock::{Wake, instant_after, suspend_for},
        poll::{PollLoop, PollSignal},
    },
    error::OrchestrationError,
    events::{Event, EventKind},
    outcome::Outcome,
    policies::{Attempt, RetryPolicy},
    remote::{ClientRef, RunHandle, RunStatus},
    subscribers::{Subscribe, SubscriberSet},
};

/// Drives one remote run per [`execute`](Orchestrator::execute) call.
///
/// Cheap to clone; the client and subscribers are shared.
#[derive(Clone)]
pub struct Orchestrator {
    client: ClientRef,
    subs: SubscriberSet,
}

impl Orchestrator {
    /// Creates an orchestrator over `client`, reporting progress to `subscribers`.
    pub fn new(client: ClientRef, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        Self::from_parts(client, SubscriberSet::new(subscribers))
    }

    /// Returns a builder for an orchestrator over `client`.
    pub fn builder(client: ClientRef) -> OrchestratorBuilder {
        OrchestratorBuilder::new(client)
    }

    pub(crate) fn from_parts(client: ClientRef, subs: SubscriberSet) -> Self {
        Self { client, subs }
    }

    /// Subscribers receiving this orchestrator's progress events.
    pub fn subscribers(&self) -> &SubscriberSet {
        &self.subs
    }

    /// Starts the run described by `cfg` and tracks it to a single [`Outcome`].
    ///
    /// `token` is the caller's abort signal; it is observed at every wait and
    /// around every remote call and yields `OrchestrationError(Cancelled)`.
    pub async fn execute(&self, cfg: &RunConfig, token: &CancellationToken) -> Outcome {
        let retry = cfg.retry_policy();

        let run = match self.start(cfg, retry, token).await {
            Ok(run) => run,
            Err(cause) => return Outcome::OrchestrationError(cause),
        };

        let deadline = instant_after(Instant::now(), cfg.timeout());
        self.subs
            .emit(
                Event::new(EventKind::RunStarted)
                    .with_run(&run)
                    .with_delay(cfg.polling_interval())
                    .with_timeout(cfg.timeout()),
            )
            .await;

        let mut poll = PollLoop::new(self.client.as_ref(), retry, &self.subs);
        match poll.begin(&run, cfg.polling_interval(), deadline, token).await {
            PollSignal::Finished(RunStatus::Passed) => Outcome::Success,
            PollSignal::Finished(status) => Outcome::RemoteFailure(status),
            PollSignal::TimedOut => Outcome::TimedOut {
                timeout: cfg.timeout(),
            },
            PollSignal::Failed(cause) => Outcome::OrchestrationError(cause),
        }
    }

    /// Start phase: calls `start` until it succeeds, fails for good, or is cancelled.
    async fn start(
        &self,
        cfg: &RunConfig,
        retry: RetryPolicy,
        token: &CancellationToken,
    ) -> Result<RunHandle, OrchestrationError> {
        let mut attempt = Attempt::new();

        loop {
            if token.is_cancelled() {
                return Err(self.cancelled().await);
            }

            self.subs
                .emit(Event::new(EventKind::StartRequested).with_attempt(attempt.index() + 1))
                .await;

            let res = select! {
                biased;
                _ = token.cancelled() => return Err(self.cancelled().await),
                res = self.client.start(cfg) => res,
            };

            let err = match res {
                Ok(run) => return Ok(run),
                Err(err) => err,
            };

            if !self.client.is_retryable(&err) || !retry.should_retry(attempt.index()) {
                return Err(OrchestrationError::StartFailed {
                    attempts: attempt.index() + 1,
                    source: err,
                });
            }

            let delay = retry.next_delay(attempt.index());
            attempt.fail();
            self.subs
                .emit(
                    Event::new(EventKind::StartRetryScheduled)
                        .with_attempt(attempt.index())
                        .with_delay(delay)
                        .with_reason(err.to_string()),
                )
                .await;

            if suspend_for(delay, token).await == Wake::Cancelled {
                return Err(self.cancelled().await);
            }
        }
    }

    async fn cancelled(&self) -> OrchestrationError {
        self.subs.emit(Event::new(EventKind::CancelObserved)).await;
        OrchestrationError::Cancelled
    }
}
