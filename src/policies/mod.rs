//! Retry and outcome policies.
//!
//! This module groups the pure decisions of the orchestrator: **if/when** a
//! failing remote call is retried, and **what the caller does** with the final
//! outcome.
//!
//! ## Contents
//! - [`RetryPolicy`]   how retry delays evolve (interval × multiplier^attempt) and the retry budget
//! - [`Attempt`]       per-call-site failure counter (reset on success)
//! - [`OutcomePolicy`] maps an [`Outcome`](crate::Outcome) to [`Decision::Abort`] / [`Decision::Continue`]
//!
//! ## Quick wiring
//! ```text
//! RunConfig { retry_count, retry_interval, retry_interval_multiplier, fail_if_task_fails }
//!      ├─► config.retry_policy() ─► core::orchestrator (start phase, own Attempt)
//!      │                         └► core::poll       (query phase, own Attempt)
//!      └─► OutcomePolicy::decide(outcome, fail_if_task_fails) ─► core::step
//! ```
//!
//! ## Defaults
//! - `RetryPolicy::default()` → interval=10s, multiplier=1.0 (constant), max_retries=3.

mod outcome;
mod retry;

pub use outcome::{Decision, OutcomePolicy};
pub use retry::{Attempt, RetryPolicy};
