//! # Remote client capability.
//!
//! [`RemoteTestClient`] is the only outbound dependency of the orchestrator.
//! Implementations own the wire protocol; the orchestrator only needs to
//! start a run, ask for its status, and know which failures are transient.
//!
//! ## Contract
//! - `start` may fail with `Connection`, `Auth` or `Validation`.
//! - `query_status` may fail with `Connection` or `NotFound`.
//! - [`RemoteTestClient::is_retryable`] defaults to [`ClientError::is_retryable`]
//!   (only `Connection` is transient); override it if the service has its own rules.
//! - A client may be shared by many orchestrations; it must not keep
//!   per-run state. Status queries for one handle are never issued concurrently.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::RunConfig;
use crate::error::ClientError;
use crate::remote::{RunHandle, RunStatus};

/// # Capability to drive one remote performance test run.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use perfrun::{ClientError, RemoteTestClient, RunConfig, RunHandle, RunStatus};
///
/// struct AlwaysPasses;
///
/// #[async_trait]
/// impl RemoteTestClient for AlwaysPasses {
///     async fn start(&self, _cfg: &RunConfig) -> Result<RunHandle, ClientError> {
///         Ok(RunHandle::new("1"))
///     }
///
///     async fn query_status(&self, _run: &RunHandle) -> Result<RunStatus, ClientError> {
///         Ok(RunStatus::Passed)
///     }
/// }
/// ```
#[async_trait]
pub trait RemoteTestClient: Send + Sync + 'static {
    /// Starts a remote run described by `cfg`.
    async fn start(&self, cfg: &RunConfig) -> Result<RunHandle, ClientError>;

    /// Fetches the current status of `run`.
    async fn query_status(&self, run: &RunHandle) -> Result<RunStatus, ClientError>;

    /// Classifies `err` as transient (retry) or permanent (give up).
    fn is_retryable(&self, err: &ClientError) -> bool {
        err.is_retryable()
    }
}

/// Shared handle to a remote client.
pub type ClientRef = Arc<dyn RemoteTestClient>;
