//! # LogWriter: `tracing` bridge
//!
//! Forwards every [`Event`] to `tracing` with structured fields, so a run's
//! progress lands in whatever subscriber the host installed.
//!
//! Levels:
//! - `warn`: retries, deadline, cancellation, tolerated failures, non-success outcomes
//! - `error`: subscriber panics
//! - `info`: everything else

use std::time::Duration;

use async_trait::async_trait;
use tracing::Level;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event-to-`tracing` subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let message = e.message();
        let run = e.run.as_ref().map(|r| r.as_str());
        let attempt = e.attempt;
        let delay_ms = e.delay.map(delay_ms);
        let level = level(e);

        if level == Level::ERROR {
            tracing::error!(subscriber = e.subscriber, seq = e.seq, "{message}");
        } else if level == Level::WARN {
            tracing::warn!(
                kind = ?e.kind,
                run,
                attempt,
                delay_ms,
                outcome = e.outcome,
                seq = e.seq,
                "{message}"
            );
        } else {
            tracing::info!(
                kind = ?e.kind,
                run,
                attempt,
                status = e.status.map(|s| s.as_label()),
                seq = e.seq,
                "{message}"
            );
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn delay_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Level an event is logged at.
fn level(e: &Event) -> Level {
    if e.kind == EventKind::SubscriberPanicked {
        Level::ERROR
    } else if e.is_warning() {
        Level::WARN
    } else {
        Level::INFO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_per_kind() {
        let cases = [
            (EventKind::StepStarted, Level::INFO),
            (EventKind::ParameterLogged, Level::INFO),
            (EventKind::ContinuingAfterFailure, Level::WARN),
            (EventKind::StartRequested, Level::INFO),
            (EventKind::StartRetryScheduled, Level::WARN),
            (EventKind::RunStarted, Level::INFO),
            (EventKind::StatusPolled, Level::INFO),
            (EventKind::QueryRetryScheduled, Level::WARN),
            (EventKind::DeadlineExceeded, Level::WARN),
            (EventKind::CancelObserved, Level::WARN),
            (EventKind::SubscriberPanicked, Level::ERROR),
        ];
        for (kind, expected) in cases {
            assert_eq!(level(&Event::new(kind)), expected, "{kind:?}");
        }
    }

    #[test]
    fn outcome_level_follows_label() {
        let ok = Event::new(EventKind::OutcomeReached).with_outcome("success");
        let timed_out = Event::new(EventKind::OutcomeReached).with_outcome("timed_out");
        assert_eq!(level(&ok), Level::INFO);
        assert_eq!(level(&timed_out), Level::WARN);
    }

    #[test]
    fn delay_ms_saturates() {
        assert_eq!(delay_ms(Duration::from_millis(1500)), 1500);
        assert_eq!(delay_ms(Duration::MAX), u64::MAX);
        assert_eq!(delay_ms(Duration::from_secs(u64::MAX / 1000 + 1)), u64::MAX);
    }
}
