//! # RunStep: the host-facing wrapper around one orchestration.
//!
//! A host job-runner calls [`RunStep::perform`] once per job. The step owns
//! everything the orchestrator deliberately does not: the start banner,
//! parameter logging, reporting the outcome, and turning the outcome into
//! a hard failure or a tolerated one.
//!
//! ## Flow
//! ```text
//! perform(cfg)
//!   ├─► publish StepStarted ("Start Performance Center test")
//!   ├─► publish ParameterLogged × N
//!   ├─► Orchestrator::execute(cfg) ──► Outcome
//!   ├─► publish OutcomeReached (always, with cause)
//!   └─► OutcomePolicy::decide(outcome, fail_if_task_fails)
//!         ├─ Abort    → Err(StepError::Aborted)
//!         └─ Continue → [publish ContinuingAfterFailure if not Success] → Ok(outcome)
//! ```

use tokio_util::sync::CancellationToken;

use crate::{
    config::RunConfig,
    core::orchestrator::Orchestrator,
    error::StepError,
    events::{Event, EventKind},
    outcome::Outcome,
    policies::{Decision, OutcomePolicy},
};

/// Host build step running one performance test.
#[derive(Clone)]
pub struct RunStep {
    orchestrator: Orchestrator,
}

impl RunStep {
    /// Wraps an orchestrator.
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }

    /// The wrapped orchestrator.
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Runs the test described by `cfg` and applies the fail flag.
    ///
    /// Returns the outcome when the job may continue (success, or a failure
    /// tolerated because `fail_if_task_fails` is off).
    ///
    /// # Errors
    /// [`StepError::Aborted`] when the outcome is not a success and
    /// `fail_if_task_fails` is set.
    pub async fn perform(
        &self,
        cfg: &RunConfig,
        token: &CancellationToken,
    ) -> Result<Outcome, StepError> {
        let subs = self.orchestrator.subscribers();

        subs.emit(Event::new(EventKind::StepStarted)).await;
        for (name, value) in cfg.parameters() {
            subs.emit(
                Event::new(EventKind::ParameterLogged).with_reason(format!("{name}: {value}")),
            )
            .await;
        }

        let outcome = self.orchestrator.execute(cfg, token).await;

        subs.emit(
            Event::new(EventKind::OutcomeReached)
                .with_outcome(outcome.as_label())
                .with_reason(outcome.to_string()),
        )
        .await;

        match OutcomePolicy::decide(&outcome, cfg.fail_if_task_fails) {
            Decision::Abort => Err(StepError::Aborted { outcome }),
            Decision::Continue => {
                if !outcome.is_success() {
                    subs.emit(
                        Event::new(EventKind::ContinuingAfterFailure)
                            .with_outcome(outcome.as_label()),
                    )
                    .await;
                }
                Ok(outcome)
            }
        }
    }
}
