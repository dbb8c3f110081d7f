//! # Run handle and run status.

use std::fmt;
use std::sync::Arc;

/// Opaque identifier of a remote run, returned by
/// [`RemoteTestClient::start`](crate::RemoteTestClient::start).
///
/// Cheap to clone; the orchestrator owns it for the lifetime of one run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunHandle(Arc<str>);

impl RunHandle {
    /// Wraps a service-specific run identifier.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remote state of a run as reported by one status query.
///
/// `Passed`, `Failed` and `Stopped` are terminal. `Unknown` covers states the
/// service reports that are neither running nor finished (initializing,
/// collating, ...); polling continues through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunStatus {
    /// The test is executing.
    Running,
    /// The test finished and passed.
    Passed,
    /// The test finished and failed.
    Failed,
    /// The test was stopped before finishing.
    Stopped,
    /// Any other non-final state reported by the service.
    Unknown,
}

impl RunStatus {
    /// Returns `true` if no further polling is meaningful.
    ///
    /// # Example
    /// ```
    /// use perfrun::RunStatus;
    ///
    /// assert!(RunStatus::Stopped.is_terminal());
    /// assert!(!RunStatus::Unknown.is_terminal());
    /// ```
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Passed | RunStatus::Failed | RunStatus::Stopped)
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(self) -> &'static str {
        match self {
            RunStatus::Running => "running",
            RunStatus::Passed => "passed",
            RunStatus::Failed => "failed",
            RunStatus::Stopped => "stopped",
            RunStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
