//! # Terminal result of one orchestration.
//!
//! [`Outcome`] is produced exactly once by
//! [`Orchestrator::execute`](crate::Orchestrator::execute) and never changes afterwards.
//! It says *what happened*; [`OutcomePolicy`](crate::OutcomePolicy) decides what the
//! caller should do about it.
//!
//! ```text
//! PollLoop signal          Outcome
//! ─────────────────────    ───────────────────────────────
//! Finished(Passed)    ──►  Success
//! Finished(Failed)    ──►  RemoteFailure(Failed)
//! Finished(Stopped)   ──►  RemoteFailure(Stopped)
//! TimedOut            ──►  TimedOut
//! Failed(cause)       ──►  OrchestrationError(cause)
//! ```

use std::fmt;
use std::time::Duration;

use crate::error::{OrchestrationError, fmt_duration};
use crate::remote::RunStatus;

/// Terminal result of one orchestration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The remote run passed.
    Success,
    /// The remote run reached a terminal, non-passing status.
    RemoteFailure(RunStatus),
    /// The deadline passed before the run reached a terminal status.
    TimedOut {
        /// The configured overall timeout.
        timeout: Duration,
    },
    /// The orchestration itself could not reach a verdict.
    OrchestrationError(OrchestrationError),
}

impl Outcome {
    /// Returns `true` only for [`Outcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::RemoteFailure(_) => "remote_failure",
            Outcome::TimedOut { .. } => "timed_out",
            Outcome::OrchestrationError(_) => "orchestration_error",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => f.write_str("run passed"),
            Outcome::RemoteFailure(status) => write!(f, "run finished with status {status}"),
            Outcome::TimedOut { timeout } => {
                write!(f, "run did not finish within {}", fmt_duration(*timeout))
            }
            Outcome::OrchestrationError(cause) => write!(f, "{cause}"),
        }
    }
}
