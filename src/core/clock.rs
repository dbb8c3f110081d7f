//! # Suspension points and deadlines.
//!
//! Every wait in the orchestrator goes through [`suspend_until`], so cancellation
//! is observed the same way everywhere:
//! - the wait before a start retry;
//! - the wait between poll ticks;
//! - the wait before a status-query retry.
//!
//! All instants are [`tokio::time::Instant`] so a paused test clock drives them.

use std::time::Duration;

use tokio::{select, time::Instant};
use tokio_util::sync::CancellationToken;

/// Horizon used when `now + d` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// How a suspension ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wake {
    /// The wait ran to its end.
    Elapsed,
    /// The token fired first.
    Cancelled,
}

/// Returns `from + d`, saturating at a far-future horizon instead of overflowing.
pub(crate) fn instant_after(from: Instant, d: Duration) -> Instant {
    from.checked_add(d).unwrap_or_else(|| from + FAR_FUTURE)
}

/// Sleeps until `when` unless `token` is cancelled first.
///
/// Cancellation wins ties: an already-cancelled token never sleeps.
pub(crate) async fn suspend_until(when: Instant, token: &CancellationToken) -> Wake {
    select! {
        biased;
        _ = token.cancelled() => Wake::Cancelled,
        _ = tokio::time::sleep_until(when) => Wake::Elapsed,
    }
}

/// Sleeps for `d` unless `token` is cancelled first.
pub(crate) async fn suspend_for(d: Duration, token: &CancellationToken) -> Wake {
    suspend_until(instant_after(Instant::now(), d), token).await
}
