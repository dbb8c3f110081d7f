//! # Event subscribers: the injected logging capability.
//!
//! This module provides the [`Subscribe`] trait and built-in implementations
//! for handling progress [`Event`](crate::Event)s.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   RunStep / Orchestrator / PollLoop ── emit(Event) ──► SubscriberSet
//!                                                           │ (in order, one by one)
//!                                              ┌────────────┼─────────────┐
//!                                              ▼            ▼             ▼
//!                                          LogWriter  ConsoleWriter   Custom ...
//!                                          (tracing)  (build console)
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use perfrun::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct RetryCounter;
//!
//! #[async_trait]
//! impl Subscribe for RetryCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::QueryRetryScheduled {
//!             // increment retry counter
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "retry-counter"
//!     }
//! }
//! ```

mod console;
#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

pub use console::ConsoleWriter;
#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
