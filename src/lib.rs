//! # perfrun
//!
//! **perfrun** starts a performance test on a remote test-management service
//! and supervises it to exactly one outcome.
//!
//! It provides the control loop a build-pipeline step needs around a remote
//! run: retrying transient start/query failures, polling the run status on a
//! fixed interval, enforcing an overall deadline, and turning the outcome into
//! a hard failure or a tolerated one. Transport is left to an injected
//! [`RemoteTestClient`]; logging is left to injected [`Subscribe`]rs.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!                ┌──────────────┐
//!                │  RunConfig   │  (TOML or built in code, validated)
//!                └──────┬───────┘
//!                       ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  RunStep (host build step)                                        │
//! │  - logs banner + parameters                                       │
//! │  - OutcomePolicy (fail_if_task_fails ─► Abort / Continue)         │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Orchestrator                                                     │
//! │  - start phase (RetryPolicy + Attempt)                            │
//! │  - deadline = start success + timeout                             │
//! │  - PollLoop (interval, RetryPolicy + Attempt, deadline)           │
//! └──────┬─────────────────────────────────────────────┬──────────────┘
//!        │ start / query_status                        │ emit(Event)
//!        ▼                                             ▼
//! ┌──────────────────┐                     ┌───────────────────────┐
//! │ RemoteTestClient │                     │     SubscriberSet     │
//! │  (ClientRef)     │                     │ (in order, isolated)  │
//! └──────────────────┘                     └───┬───────────────┬───┘
//!                                              ▼               ▼
//!                                          LogWriter     ConsoleWriter
//! ```
//!
//! ### Lifecycle
//! ```text
//! execute(cfg, token)
//!   ├─► start: loop {
//!   │       ├─ Ok(handle)                       ─► break
//!   │       ├─ Err retryable, budget left       ─► StartRetryScheduled, sleep(next_delay)
//!   │       └─ Err otherwise                    ─► Outcome::OrchestrationError(StartFailed)
//!   │   }
//!   ├─► deadline = now + timeout
//!   └─► poll: loop {
//!           ├─ token cancelled                  ─► Outcome::OrchestrationError(Cancelled)
//!           ├─ now >= deadline                  ─► Outcome::TimedOut
//!           ├─ query_status
//!           │    ├─ Passed                      ─► Outcome::Success
//!           │    ├─ Failed / Stopped            ─► Outcome::RemoteFailure
//!           │    ├─ Running / Unknown           ─► sleep until next tick
//!           │    └─ Err retryable, budget left  ─► QueryRetryScheduled, sleep(next_delay)
//!           └─ Err otherwise                    ─► Outcome::OrchestrationError(QueryFailed)
//!       }
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                          |
//! |-------------------|---------------------------------------------------------------|---------------------------------------------|
//! | **Orchestration** | Start a run and poll it to one outcome.                       | [`Orchestrator`], [`PollLoop`], [`RunStep`] |
//! | **Policies**      | Retry delays and budgets; fail-flag handling.                 | [`RetryPolicy`], [`OutcomePolicy`]          |
//! | **Remote seam**   | Pluggable client for the test-management service.             | [`RemoteTestClient`], [`RunStatus`]         |
//! | **Subscriber API**| Hook into progress events (logging, console, custom).         | [`Subscribe`], [`Event`]                    |
//! | **Errors**        | Typed errors for clients, orchestration, config and the step. | [`ClientError`], [`OrchestrationError`]     |
//! | **Configuration** | Run parameters from TOML with validation.                     | [`RunConfig`], [`PostRunAction`]            |
//!
//! ## Optional features
//! - `logging` _(default)_: exports [`LogWriter`], a subscriber forwarding events to `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use tokio_util::sync::CancellationToken;
//! use perfrun::{
//!     ClientError, ConsoleWriter, Orchestrator, RemoteTestClient, RunConfig, RunHandle,
//!     RunStatus,
//! };
//!
//! struct Lab;
//!
//! #[async_trait]
//! impl RemoteTestClient for Lab {
//!     async fn start(&self, _cfg: &RunConfig) -> Result<RunHandle, ClientError> {
//!         Ok(RunHandle::new("42"))
//!     }
//!     async fn query_status(&self, _run: &RunHandle) -> Result<RunStatus, ClientError> {
//!         Ok(RunStatus::Passed)
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = RunConfig::from_toml_str(r#"
//!         project = "Checkout"
//!         domain = "PERF"
//!         test_plan_path = 'Subject\Load\checkout'
//!         test_lab_path = 'Root\Nightly\checkout'
//!         output_dir = "results"
//!         timeout = 600
//!         polling_interval = 15
//!     "#)?;
//!
//!     let step = Orchestrator::builder(Arc::new(Lab))
//!         .with_subscriber(Arc::new(ConsoleWriter::stdout()))
//!         .build_step();
//!
//!     let outcome = step.perform(&cfg, &CancellationToken::new()).await?;
//!     assert!(outcome.is_success());
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod outcome;
mod policies;
mod remote;
mod subscribers;

#[cfg(test)]
mod testing;

// ---- Public re-exports ----

pub use config::{PostRunAction, RunConfig, TEST_LAB_ROOT, TEST_PLAN_ROOT};
pub use crate::core::{Orchestrator, OrchestratorBuilder, PollLoop, PollSignal, PollState, RunStep};
pub use error::{ClientError, ConfigError, OrchestrationError, StepError};
pub use events::{CONTINUE_NOTICE, Event, EventKind, START_BANNER};
pub use outcome::Outcome;
pub use policies::{Attempt, Decision, OutcomePolicy, RetryPolicy};
pub use remote::{ClientRef, RemoteTestClient, RunHandle, RunStatus};
pub use subscribers::{ConsoleWriter, Subscribe, SubscriberSet};

// Optional: expose the tracing-backed subscriber.
// Enable with: `--features logging` (on by default)
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
