//! Error types used by the orchestrator, the remote client seam and configuration.
//!
//! This module defines the error enums of the crate:
//!
//! - [`ClientError`] - failures reported by a [`RemoteTestClient`](crate::RemoteTestClient).
//! - [`OrchestrationError`] - the cause carried by [`Outcome::OrchestrationError`](crate::Outcome).
//! - [`ConfigError`] - configuration loading and validation failures.
//! - [`StepError`] - the hard failure a [`RunStep`](crate::RunStep) escalates to the host.
//!
//! Each type provides `as_label` (stable snake_case, for logs/metrics) and
//! client errors additionally expose [`ClientError::is_retryable`].

use std::time::Duration;
use thiserror::Error;

use crate::outcome::Outcome;

/// # Errors reported by the remote test-management service client.
///
/// Only [`ClientError::Connection`] is transient. Everything else is permanent:
/// retrying cannot fix bad credentials, a rejected request or an unknown run.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Transport-level failure (network blip, refused connection, 5xx).
    #[error("connection error: {reason}")]
    Connection {
        /// The underlying error message.
        reason: String,
    },

    /// Credentials were rejected.
    #[error("authentication failed: {reason}")]
    Auth {
        /// The underlying error message.
        reason: String,
    },

    /// The remote service rejected the run request.
    #[error("request rejected: {reason}")]
    Validation {
        /// The underlying error message.
        reason: String,
    },

    /// The run handle is not known to the remote service.
    #[error("run {handle} not found")]
    NotFound {
        /// The handle that could not be resolved.
        handle: String,
    },
}

impl ClientError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use perfrun::ClientError;
    ///
    /// let err = ClientError::Auth { reason: "bad token".into() };
    /// assert_eq!(err.as_label(), "client_auth");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ClientError::Connection { .. } => "client_connection",
            ClientError::Auth { .. } => "client_auth",
            ClientError::Validation { .. } => "client_validation",
            ClientError::NotFound { .. } => "client_not_found",
        }
    }

    /// Indicates whether the error is transient and safe to retry.
    ///
    /// Returns `true` only for [`ClientError::Connection`].
    ///
    /// # Example
    /// ```
    /// use perfrun::ClientError;
    ///
    /// assert!(ClientError::Connection { reason: "reset".into() }.is_retryable());
    /// assert!(!ClientError::NotFound { handle: "42".into() }.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Connection { .. })
    }
}

/// # Cause of an orchestration that could not reach a remote verdict.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrchestrationError {
    /// Starting the remote run failed permanently or ran out of retries.
    #[error("failed to start run after {attempts} attempt(s): {source}")]
    StartFailed {
        /// Number of start calls made.
        attempts: u32,
        /// Last client error.
        source: ClientError,
    },

    /// Querying the run status failed permanently or ran out of retries.
    #[error("failed to query status of run {handle} after {attempts} attempt(s): {source}")]
    QueryFailed {
        /// Handle of the run being polled.
        handle: String,
        /// Number of consecutive query calls made for the failing tick.
        attempts: u32,
        /// Last client error.
        source: ClientError,
    },

    /// The caller cancelled the orchestration.
    #[error("orchestration cancelled")]
    Cancelled,

    /// A poll loop was asked to begin again after it already ran.
    #[error("poll loop already ran; create a new one per run")]
    AlreadyFinished,
}

impl OrchestrationError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            OrchestrationError::StartFailed { .. } => "orchestration_start_failed",
            OrchestrationError::QueryFailed { .. } => "orchestration_query_failed",
            OrchestrationError::Cancelled => "orchestration_cancelled",
            OrchestrationError::AlreadyFinished => "orchestration_already_finished",
        }
    }

    /// Returns `true` if the orchestration was cancelled by the caller.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, OrchestrationError::Cancelled)
    }
}

/// # Errors produced while loading or validating a [`RunConfig`](crate::RunConfig).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required text field is empty.
    #[error("{field}: Required")]
    Empty {
        /// Field name.
        field: &'static str,
    },

    /// A path field does not start with its mandatory root.
    #[error("{message}")]
    BadPrefix {
        /// Field name.
        field: &'static str,
        /// Human-readable message.
        message: &'static str,
    },

    /// The post-run action label is not one of the known labels.
    #[error("unknown post-run action {label:?}; expected one of {expected:?}")]
    UnknownPostRunAction {
        /// Label found in the configuration.
        label: String,
        /// Accepted labels.
        expected: Vec<&'static str>,
    },

    /// A numeric field is outside its allowed range.
    #[error("{field} {detail}")]
    OutOfRange {
        /// Field name.
        field: &'static str,
        /// What the constraint is.
        detail: &'static str,
    },

    /// The configuration file is not valid TOML for a run.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::Empty { .. } => "config_empty",
            ConfigError::BadPrefix { .. } => "config_bad_prefix",
            ConfigError::UnknownPostRunAction { .. } => "config_unknown_post_run_action",
            ConfigError::OutOfRange { .. } => "config_out_of_range",
            ConfigError::Parse(_) => "config_parse",
            ConfigError::Io(_) => "config_io",
        }
    }
}

/// # Hard failure escalated to the host job-runner.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StepError {
    /// The run did not succeed and the step is configured to fail the job.
    #[error("performance test did not succeed: {outcome}")]
    Aborted {
        /// The outcome that triggered the abort.
        outcome: Outcome,
    },
}

impl StepError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            StepError::Aborted { .. } => "step_aborted",
        }
    }

    /// Returns the outcome behind the failure.
    pub fn outcome(&self) -> &Outcome {
        match self {
            StepError::Aborted { outcome } => outcome,
        }
    }
}

/// Formats a duration as whole seconds when possible (`"30s"`), otherwise debug form.
pub(crate) fn fmt_duration(d: Duration) -> String {
    if d.subsec_nanos() == 0 {
        format!("{}s", d.as_secs())
    } else {
        format!("{d:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_connection_errors_are_retryable() {
        assert!(ClientError::Connection { reason: "x".into() }.is_retryable());
        assert!(!ClientError::Auth { reason: "x".into() }.is_retryable());
        assert!(!ClientError::Validation { reason: "x".into() }.is_retryable());
        assert!(!ClientError::NotFound { handle: "x".into() }.is_retryable());
    }

    #[test]
    fn orchestration_error_labels() {
        let err = OrchestrationError::QueryFailed {
            handle: "7".into(),
            attempts: 3,
            source: ClientError::NotFound { handle: "7".into() },
        };
        assert_eq!(err.as_label(), "orchestration_query_failed");
        assert_eq!(
            err.to_string(),
            "failed to query status of run 7 after 3 attempt(s): run 7 not found"
        );
        assert!(OrchestrationError::Cancelled.is_cancelled());
        assert!(!OrchestrationError::AlreadyFinished.is_cancelled());
        assert_eq!(
            OrchestrationError::AlreadyFinished.as_label(),
            "orchestration_already_finished"
        );
    }

    #[test]
    fn fmt_duration_whole_seconds() {
        assert_eq!(fmt_duration(Duration::from_secs(30)), "30s");
        assert_eq!(fmt_duration(Duration::from_millis(1500)), "1.5s");
    }
}
