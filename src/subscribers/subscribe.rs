//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging log sinks into a run.
//! Subscribers are injected per orchestrator, so tests can observe progress
//! without any process-wide logger.
//!
//! ## Contract
//! - Events arrive in emission order, one at a time.
//! - Delivery is awaited by the orchestrator: keep handlers short. A slow
//!   subscriber delays the run, it never reorders it.
//! - A panicking subscriber is isolated by [`SubscriberSet`](crate::SubscriberSet)
//!   and reported as [`EventKind::SubscriberPanicked`](crate::EventKind) to the others.

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event subscribers.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    ///
    /// # Parameters
    /// - `event`: Reference to the event (does not transfer ownership)
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
