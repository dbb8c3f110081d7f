//! # In-order event fan-out to multiple subscribers.
//!
//! Provides [`SubscriberSet`], which delivers each event to every subscriber
//! before the publisher continues.
//!
//! ## Architecture
//! ```text
//! emit(event)
//!     │
//!     ├──► subscriber1.on_event() ──► panic → SubscriberPanicked (to the others)
//!     ├──► subscriber2.on_event()
//!     └──► subscriberN.on_event()
//! ```
//!
//! ## Rules
//! - **Total order**: every subscriber sees every event in emission order
//! - **Awaited**: `emit()` returns after all subscribers handled the event
//! - **Isolation**: a panicking subscriber doesn't affect others or the run
//!
//! ## Panic handling
//! Delivery uses `catch_unwind` to isolate panics:
//! - Panic is caught and converted to a `SubscriberPanicked` event
//! - That event goes to every *other* subscriber (never back to the panicking one)
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if a subscriber uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::events::Event;
use crate::subscribers::Subscribe;

/// Ordered fan-out over injected subscribers.
#[derive(Clone, Default)]
pub struct SubscriberSet {
    subs: Arc<[Arc<dyn Subscribe>]>,
}

impl SubscriberSet {
    /// Creates a set over the given subscribers.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        Self { subs: subs.into() }
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.subs.len()
    }

    /// Returns `true` if no subscriber is attached.
    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    /// Delivers `event` to all subscribers, in order.
    pub async fn emit(&self, event: Event) {
        for (idx, sub) in self.subs.iter().enumerate() {
            if let Err(panic_err) = AssertUnwindSafe(sub.on_event(&event)).catch_unwind().await {
                let report = Event::subscriber_panicked(sub.name(), panic_message(&*panic_err));
                self.report_panic(idx, &report).await;
            }
        }
    }

    /// Sends a panic report to every subscriber except the one at `skip`.
    ///
    /// Panics while handling the report are swallowed to avoid loops.
    async fn report_panic(&self, skip: usize, report: &Event) {
        for (idx, sub) in self.subs.iter().enumerate() {
            if idx == skip {
                continue;
            }
            let _ = AssertUnwindSafe(sub.on_event(report)).catch_unwind().await;
        }
    }
}

fn panic_message(any: &(dyn Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
