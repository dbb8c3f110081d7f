//! Orchestration core: start, poll, decide.
//!
//! This module contains the control loop of the crate. The public API from
//! this module is [`Orchestrator`] (start a run and poll it to an outcome),
//! [`PollLoop`] (the status poller on its own), and [`RunStep`] (the host-facing
//! wrapper that logs and applies the fail flag).
//!
//! Internal modules:
//! - [`clock`]: cancellable suspension points and overflow-safe deadlines;
//! - [`poll`]: status polling state machine with per-tick retries and deadline;
//! - [`orchestrator`]: start phase with retries, then the poll phase;
//! - [`step`]: parameter/outcome logging and the outcome policy;
//! - [`builder`]: wiring of client and subscribers.
//!
//! ```text
//! RunStep ──► Orchestrator ──► start (RetryPolicy, Attempt)
//!                   │
//!                   └────────► PollLoop (RetryPolicy, Attempt, deadline)
//!                                   │
//!             every wait ──► clock::suspend_until (CancellationToken)
//! ```

mod builder;
mod clock;
mod orchestrator;
mod poll;
mod step;

pub use builder::OrchestratorBuilder;
pub use orchestrator::Orchestrator;
pub use poll::{PollLoop, PollSignal, PollState};
pub use step::RunStep;
