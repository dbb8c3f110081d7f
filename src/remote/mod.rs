//! # Remote test-management service seam.
//!
//! The orchestrator never talks HTTP. It consumes the small capability
//! defined here and leaves transport, credentials and the service's
//! test-plan/test-lab semantics to the implementor.
//!
//! - [`RemoteTestClient`] - async trait: start a run, query its status, classify errors
//! - [`ClientRef`] - shared reference to a client (`Arc<dyn RemoteTestClient>`)
//! - [`RunHandle`] - opaque identifier of one remote run
//! - [`RunStatus`] - remote state reported by a status query

mod client;
mod status;

pub use client::{ClientRef, RemoteTestClient};
pub use status::{RunHandle, RunStatus};
