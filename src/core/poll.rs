//! # PollLoop: track one remote run to a terminal status.
//!
//! Queries the status of a started run at a fixed cadence until the run reaches
//! a terminal status, the deadline passes, a query fails for good, or the caller
//! cancels.
//!
//! ## States
//! ```text
//! Idle ──begin()──► Polling ──► Done(PollSignal)
//! ```
//!
//! ## Loop
//! ```text
//! loop {
//!   ├─► cancelled?            → Done(Failed(Cancelled))
//!   ├─► now >= deadline?      → Done(TimedOut)
//!   ├─► tick += 1, tick_start = now
//!   ├─► query_status (bounded by deadline, cancellable)
//!   │     ├─ Ok(status)       → reset attempt, publish StatusPolled
//!   │     │     ├─ terminal   → Done(Finished(status))
//!   │     │     └─ otherwise  → sleep until min(tick_start + interval, deadline)
//!   │     └─ Err(e)
//!   │           ├─ permanent / budget spent → Done(Failed(QueryFailed))
//!   │           └─ transient  → publish QueryRetryScheduled,
//!   │                           sleep until min(now + delay, deadline),
//!   │                           retry the same query
//!   └─ deadline during a query or a wait → Done(TimedOut)
//! }
//! ```
//!
//! ## Rules
//! - Queries for the run are **strictly sequential** (never two in flight)
//! - Timeout is checked **before every query and every retry**, so it preempts retries
//! - The retry clock and the polling cadence are **independent**: a tick that needed
//!   retries still schedules the next tick from its own start
//! - A successful query **resets** the retry bookkeeping

use std::time::Duration;

use tokio::{select, time::Instant};
use tokio_util::sync::CancellationToken;

use crate::{
    core::clock::{Wake, instant_after, suspend_until},
    error::{ClientError, OrchestrationError},
    events::{Event, EventKind},
    policies::{Attempt, RetryPolicy},
    remote::{RemoteTestClient, RunHandle, RunStatus},
    subscribers::SubscriberSet,
};

/// Lifecycle of a [`PollLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Not started yet.
    Idle,
    /// Querying the run.
    Polling,
    /// Finished; the loop cannot be restarted.
    Done,
}

/// Terminal signal of a [`PollLoop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollSignal {
    /// The run reached a terminal status.
    Finished(RunStatus),
    /// The deadline passed first.
    TimedOut,
    /// A query failed for good, the caller cancelled, or the loop already ran.
    Failed(OrchestrationError),
}

/// Status poller for one run.
///
/// Owns the retry bookkeeping of the query phase; the start phase keeps its own.
pub struct PollLoop<'a> {
    client: &'a dyn RemoteTestClient,
    subs: &'a SubscriberSet,
    retry: RetryPolicy,
    attempt: Attempt,
    state: PollState,
}

impl<'a> PollLoop<'a> {
    /// Creates an idle loop.
    pub fn new(
        client: &'a dyn RemoteTestClient,
        retry: RetryPolicy,
        subs: &'a SubscriberSet,
    ) -> Self {
        Self {
            client,
            subs,
            retry,
            attempt: Attempt::new(),
            state: PollState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> PollState {
        self.state
    }

    /// Polls `run` every `interval` until a terminal signal.
    ///
    /// The first query is issued immediately. `deadline` is absolute, so slow
    /// queries cannot extend it. Calling `begin` on a loop that is not idle
    /// returns `Failed(AlreadyFinished)` without touching the client.
    pub async fn begin(
        &mut self,
        run: &RunHandle,
        interval: Duration,
        deadline: Instant,
        token: &CancellationToken,
    ) -> PollSignal {
        if self.state != PollState::Idle {
            return PollSignal::Failed(OrchestrationError::AlreadyFinished);
        }
        self.state = PollState::Polling;
        let signal = self.poll(run, interval, deadline, token).await;
        self.state = PollState::Done;
        signal
    }

    async fn poll(
        &mut self,
        run: &RunHandle,
        interval: Duration,
        deadline: Instant,
        token: &CancellationToken,
    ) -> PollSignal {
        let mut tick: u32 = 0;

        loop {
            if token.is_cancelled() {
                return self.cancelled().await;
            }
            if Instant::now() >= deadline {
                return self.timed_out(run).await;
            }

            tick = tick.saturating_add(1);
            let tick_start = Instant::now();

            let status = match self.query(run, deadline, token).await {
                Ok(status) => status,
                Err(signal) => return signal,
            };
            self.subs
                .emit(
                    Event::new(EventKind::StatusPolled)
                        .with_run(run)
                        .with_attempt(tick)
                        .with_status(status),
                )
                .await;

            if status.is_terminal() {
                return PollSignal::Finished(status);
            }

            let next_tick = instant_after(tick_start, interval).min(deadline);
            if suspend_until(next_tick, token).await == Wake::Cancelled {
                return self.cancelled().await;
            }
        }
    }

    /// Runs one status query, retrying transient failures.
    async fn query(
        &mut self,
        run: &RunHandle,
        deadline: Instant,
        token: &CancellationToken,
    ) -> Result<RunStatus, PollSignal> {
        let client = self.client;
        loop {
            let res = select! {
                biased;
                _ = token.cancelled() => return Err(self.cancelled().await),
                res = tokio::time::timeout_at(deadline, client.query_status(run)) => res,
            };

            let err = match res {
                Ok(Ok(status)) => {
                    self.attempt.reset();
                    return Ok(status);
                }
                Ok(Err(err)) => err,
                Err(_elapsed) => return Err(self.timed_out(run).await),
            };

            if !client.is_retryable(&err) || !self.retry.should_retry(self.attempt.index()) {
                return Err(self.give_up(run, err));
            }

            let delay = self.retry.next_delay(self.attempt.index());
            self.attempt.fail();
            self.subs
                .emit(
                    Event::new(EventKind::QueryRetryScheduled)
                        .with_run(run)
                        .with_attempt(self.attempt.index())
                        .with_delay(delay)
                        .with_reason(err.to_string()),
                )
                .await;

            let wake_at = instant_after(Instant::now(), delay).min(deadline);
            if suspend_until(wake_at, token).await == Wake::Cancelled {
                return Err(self.cancelled().await);
            }
            if Instant::now() >= deadline {
                return Err(self.timed_out(run).await);
            }
        }
    }

    fn give_up(&self, run: &RunHandle, err: ClientError) -> PollSignal {
        PollSignal::Failed(OrchestrationError::QueryFailed {
            handle: run.to_string(),
            attempts: self.attempt.index().saturating_add(1),
            source: err,
        })
    }

    async fn timed_out(&self, run: &RunHandle) -> PollSignal {
        self.subs
            .emit(Event::new(EventKind::DeadlineExceeded).with_run(run))
            .await;
        PollSignal::TimedOut
    }

    async fn cancelled(&self) -> PollSignal {
        self.subs.emit(Event::new(EventKind::CancelObserved)).await;
        PollSignal::Failed(OrchestrationError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingSubscriber, ScriptedClient, assert_near, connection_error};

    const TICK: Duration = Duration::from_secs(10);

    fn retry(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            interval: Duration::from_secs(1),
            multiplier: 2.0,
            max_retries,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn finishes_on_terminal_status() {
        let client = ScriptedClient::new().with_statuses([
            Ok(RunStatus::Running),
            Ok(RunStatus::Unknown),
            Ok(RunStatus::Failed),
        ]);
        let subs = SubscriberSet::default();
        let token = CancellationToken::new();
        let mut poll = PollLoop::new(&client, retry(0), &subs);
        assert_eq!(poll.state(), PollState::Idle);

        let start = Instant::now();
        let signal = poll
            .begin(&RunHandle::new("r"), TICK, start + Duration::from_secs(600), &token)
            .await;

        assert_eq!(signal, PollSignal::Finished(RunStatus::Failed));
        assert_eq!(poll.state(), PollState::Done);
        assert_eq!(client.query_calls(), 3);
        assert_near(start.elapsed(), 2 * TICK);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_same_query_then_resets() {
        let client = ScriptedClient::new().with_statuses([
            Err(connection_error()),
            Err(connection_error()),
            Ok(RunStatus::Running),
            Err(connection_error()),
            Err(connection_error()),
            Ok(RunStatus::Passed),
        ]);
        let rec = RecordingSubscriber::new();
        let subs = rec.set();
        let token = CancellationToken::new();
        let mut poll = PollLoop::new(&client, retry(2), &subs);

        let signal = poll
            .begin(&RunHandle::new("r"), TICK, Instant::now() + Duration::from_secs(600), &token)
            .await;

        // a budget of 2 is enough twice only because success resets it
        assert_eq!(signal, PollSignal::Finished(RunStatus::Passed));
        assert_eq!(client.query_calls(), 6);
        let retries: Vec<_> = rec
            .events()
            .into_iter()
            .filter(|e| e.kind == EventKind::QueryRetryScheduled)
            .map(|e| (e.attempt, e.delay))
            .collect();
        assert_eq!(
            retries,
            vec![
                (Some(1), Some(Duration::from_secs(1))),
                (Some(2), Some(Duration::from_secs(2))),
                (Some(1), Some(Duration::from_secs(1))),
                (Some(2), Some(Duration::from_secs(2))),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn retry_waits_do_not_shift_cadence() {
        let client = ScriptedClient::new().with_statuses([
            Err(connection_error()),
            Ok(RunStatus::Running),
            Ok(RunStatus::Passed),
        ]);
        let subs = SubscriberSet::default();
        let token = CancellationToken::new();
        let mut poll = PollLoop::new(&client, retry(1), &subs);

        let start = Instant::now();
        let signal = poll
            .begin(&RunHandle::new("r"), TICK, start + Duration::from_secs(600), &token)
            .await;

        assert_eq!(signal, PollSignal::Finished(RunStatus::Passed));
        // 1s retry wait happens inside the first tick; second tick still at 10s
        assert_near(start.elapsed(), TICK);
    }

    #[tokio::test(start_paused = true)]
    async fn budget_exhausted_fails() {
        let client = ScriptedClient::new().with_statuses([
            Err(connection_error()),
            Err(connection_error()),
            Err(connection_error()),
        ]);
        let subs = SubscriberSet::default();
        let token = CancellationToken::new();
        let mut poll = PollLoop::new(&client, retry(2), &subs);

        let signal = poll
            .begin(&RunHandle::new("r"), TICK, Instant::now() + Duration::from_secs(600), &token)
            .await;

        match signal {
            PollSignal::Failed(OrchestrationError::QueryFailed { attempts, source, .. }) => {
                assert_eq!(attempts, 3);
                assert!(source.is_retryable());
            }
            other => panic!("unexpected signal {other:?}"),
        }
        assert_eq!(client.query_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_is_never_retried() {
        let client = ScriptedClient::new().with_statuses([Err(ClientError::NotFound {
            handle: "r".into(),
        })]);
        let subs = SubscriberSet::default();
        let token = CancellationToken::new();
        let mut poll = PollLoop::new(&client, retry(5), &subs);

        let signal = poll
            .begin(&RunHandle::new("r"), TICK, Instant::now() + Duration::from_secs(600), &token)
            .await;

        assert!(matches!(
            signal,
            PollSignal::Failed(OrchestrationError::QueryFailed { attempts: 1, .. })
        ));
        assert_eq!(client.query_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_preempts_retry_wait() {
        let client = ScriptedClient::new().with_statuses([Err(connection_error())]);
        let subs = SubscriberSet::default();
        let token = CancellationToken::new();
        let long_retry = RetryPolicy {
            interval: Duration::from_secs(300),
            multiplier: 1.0,
            max_retries: 10,
        };
        let mut poll = PollLoop::new(&client, long_retry, &subs);

        let start = Instant::now();
        let signal = poll
            .begin(&RunHandle::new("r"), TICK, start + Duration::from_secs(30), &token)
            .await;

        assert_eq!(signal, PollSignal::TimedOut);
        assert_near(start.elapsed(), Duration::from_secs(30));
        assert_eq!(client.query_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_query_cannot_extend_deadline() {
        let client = ScriptedClient::new().with_query_latency(Duration::from_secs(120));
        let subs = SubscriberSet::default();
        let token = CancellationToken::new();
        let mut poll = PollLoop::new(&client, retry(0), &subs);

        let start = Instant::now();
        let signal = poll
            .begin(&RunHandle::new("r"), TICK, start + Duration::from_secs(30), &token)
            .await;

        assert_eq!(signal, PollSignal::TimedOut);
        assert_near(start.elapsed(), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn second_begin_is_rejected() {
        let client = ScriptedClient::new().with_statuses([Ok(RunStatus::Passed)]);
        let rec = RecordingSubscriber::new();
        let subs = rec.set();
        let token = CancellationToken::new();
        let mut poll = PollLoop::new(&client, retry(0), &subs);
        let deadline = Instant::now() + Duration::from_secs(60);

        poll.begin(&RunHandle::new("r"), TICK, deadline, &token).await;
        let again = poll.begin(&RunHandle::new("r"), TICK, deadline, &token).await;

        assert_eq!(again, PollSignal::Failed(OrchestrationError::AlreadyFinished));
        assert_eq!(poll.state(), PollState::Done);
        assert_eq!(client.query_calls(), 1);
        assert_eq!(rec.kinds(), vec![EventKind::StatusPolled]);
    }
}
