//! # Outcome policy: what the caller does with a finished orchestration.
//!
//! [`OutcomePolicy`] is the only place that reads the `fail_if_task_fails` flag.
//! The orchestrator and the poll loop are flag-agnostic.
//!
//! ```text
//! Outcome              fail_if_task_fails=true   fail_if_task_fails=false
//! ──────────────────   ───────────────────────   ────────────────────────
//! Success              Continue                  Continue
//! RemoteFailure        Abort                     Continue
//! TimedOut             Abort                     Continue
//! OrchestrationError   Abort                     Continue
//! ```

use crate::outcome::Outcome;

/// Caller action for a finished orchestration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Escalate to a hard failure of the calling job.
    Abort,
    /// Let the calling job proceed; a non-success outcome is reported, not raised.
    Continue,
}

/// Maps an [`Outcome`] to a [`Decision`].
#[derive(Clone, Copy, Debug, Default)]
pub struct OutcomePolicy;

impl OutcomePolicy {
    /// Decides whether the caller aborts.
    ///
    /// # Example
    /// ```
    /// use perfrun::{Decision, Outcome, OutcomePolicy, RunStatus};
    ///
    /// assert_eq!(OutcomePolicy::decide(&Outcome::Success, true), Decision::Continue);
    /// let failed = Outcome::RemoteFailure(RunStatus::Failed);
    /// assert_eq!(OutcomePolicy::decide(&failed, true), Decision::Abort);
    /// assert_eq!(OutcomePolicy::decide(&failed, false), Decision::Continue);
    /// ```
    pub fn decide(outcome: &Outcome, fail_if_task_fails: bool) -> Decision {
        match outcome {
            Outcome::Success => Decision::Continue,
            Outcome::RemoteFailure(_)
            | Outcome::TimedOut { .. }
            | Outcome::OrchestrationError(_) => {
                if fail_if_task_fails {
                    Decision::Abort
                } else {
                    Decision::Continue
                }
            }
        }
    }
}
