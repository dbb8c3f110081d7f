//! Progress events: the data model of the logging capability.
//!
//! The orchestrator and the run step describe what they are doing as
//! [`Event`]s and hand them to a [`SubscriberSet`](crate::SubscriberSet),
//! which delivers each one, in order, to every injected subscriber.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`START_BANNER`], [`CONTINUE_NOTICE`] fixed console lines
//!
//! ## Quick reference
//! - **Publishers**: `RunStep` (step start, parameters, outcome, continue notice),
//!   `Orchestrator` (start attempts, start retries), `PollLoop` (status, query retries, deadline),
//!   `SubscriberSet` (subscriber panics).
//! - **Consumers**: any [`Subscribe`](crate::Subscribe) implementation,
//!   e.g. `LogWriter` (tracing) or `ConsoleWriter` (build console).

mod event;

pub use event::{CONTINUE_NOTICE, Event, EventKind, START_BANNER};
