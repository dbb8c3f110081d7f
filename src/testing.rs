//! Test doubles shared by the unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{PostRunAction, RunConfig};
use crate::error::ClientError;
use crate::events::{Event, EventKind};
use crate::remote::{RemoteTestClient, RunHandle, RunStatus};
use crate::subscribers::{Subscribe, SubscriberSet};

/// Valid config with the given timing and a small retry budget (3 × 1s).
pub(crate) fn config(timeout_secs: u64, polling_interval_secs: u64) -> RunConfig {
    RunConfig {
        project: "Checkout".into(),
        domain: "PERF".into(),
        test_plan_path: "Subject\\Load\\checkout".into(),
        test_lab_path: "Root\\Nightly\\checkout".into(),
        output_dir: "results".into(),
        post_run_action: PostRunAction::CollateAndAnalyze,
        timeout_secs,
        polling_interval_secs,
        retry_count: 3,
        retry_interval_secs: 1,
        retry_interval_multiplier: 1.0,
        ..RunConfig::default()
    }
}

pub(crate) fn connection_error() -> ClientError {
    ClientError::Connection {
        reason: "connection reset".into(),
    }
}

/// Asserts `actual` is `expected` give or take timer granularity.
#[track_caller]
pub(crate) fn assert_near(actual: Duration, expected: Duration) {
    let slack = Duration::from_millis(50);
    assert!(
        actual + slack >= expected && actual <= expected + slack,
        "expected ~{expected:?}, got {actual:?}"
    );
}

/// Client whose answers are scripted in advance.
///
/// - start: scripted results first, then `Ok(run-N)`
/// - query_status: scripted results first, then `Ok(Running)`
/// - panics if two status queries overlap
#[derive(Default)]
pub(crate) struct ScriptedClient {
    starts: Mutex<VecDeque<Result<RunHandle, ClientError>>>,
    statuses: Mutex<VecDeque<Result<RunStatus, ClientError>>>,
    start_latency: Duration,
    query_latency: Duration,
    start_calls: AtomicU32,
    query_calls: AtomicU32,
    querying: AtomicBool,
}

impl ScriptedClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_start_results(
        self,
        results: impl IntoIterator<Item = Result<RunHandle, ClientError>>,
    ) -> Self {
        lock(&self.starts).extend(results);
        self
    }

    pub(crate) fn with_start_failures(self, n: usize) -> Self {
        self.with_start_results((0..n).map(|_| Err(connection_error())))
    }

    pub(crate) fn with_statuses(
        self,
        results: impl IntoIterator<Item = Result<RunStatus, ClientError>>,
    ) -> Self {
        lock(&self.statuses).extend(results);
        self
    }

    pub(crate) fn with_start_latency(mut self, latency: Duration) -> Self {
        self.start_latency = latency;
        self
    }

    pub(crate) fn with_query_latency(mut self, latency: Duration) -> Self {
        self.query_latency = latency;
        self
    }

    pub(crate) fn start_calls(&self) -> u32 {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn query_calls(&self) -> u32 {
        self.query_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteTestClient for ScriptedClient {
    async fn start(&self, _cfg: &RunConfig) -> Result<RunHandle, ClientError> {
        let n = self.start_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.start_latency.is_zero() {
            tokio::time::sleep(self.start_latency).await;
        }
        lock(&self.starts)
            .pop_front()
            .unwrap_or_else(|| Ok(RunHandle::new(format!("run-{n}"))))
    }

    async fn query_status(&self, _run: &RunHandle) -> Result<RunStatus, ClientError> {
        assert!(
            !self.querying.swap(true, Ordering::SeqCst),
            "overlapping status queries"
        );
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        if !self.query_latency.is_zero() {
            tokio::time::sleep(self.query_latency).await;
        }
        let res = lock(&self.statuses)
            .pop_front()
            .unwrap_or(Ok(RunStatus::Running));
        self.querying.store(false, Ordering::SeqCst);
        res
    }
}

/// Subscriber that keeps every event it sees.
#[derive(Default)]
pub(crate) struct RecordingSubscriber {
    events: Mutex<Vec<Event>>,
}

impl RecordingSubscriber {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A set holding only this subscriber.
    pub(crate) fn set(self: &Arc<Self>) -> SubscriberSet {
        SubscriberSet::new(vec![self.clone() as Arc<dyn Subscribe>])
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        lock(&self.events).clone()
    }

    pub(crate) fn kinds(&self) -> Vec<EventKind> {
        lock(&self.events).iter().map(|e| e.kind).collect()
    }

    pub(crate) fn messages(&self) -> Vec<String> {
        lock(&self.events).iter().map(Event::message).collect()
    }
}

#[async_trait]
impl Subscribe for RecordingSubscriber {
    async fn on_event(&self, event: &Event) {
        lock(&self.events).push(event.clone());
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
