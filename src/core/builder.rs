use std::sync::Arc;

use crate::{
    core::{orchestrator::Orchestrator, step::RunStep},
    remote::ClientRef,
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for an [`Orchestrator`] (and the [`RunStep`] around it).
pub struct OrchestratorBuilder {
    client: ClientRef,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl OrchestratorBuilder {
    /// Creates a new builder over the given client.
    pub fn new(client: ClientRef) -> Self {
        Self {
            client,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers, replacing any added before.
    ///
    /// Subscribers receive progress events (start attempts, retries, status
    /// ticks, outcome) in emission order.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds one subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Adds the built-in `tracing` bridge.
    ///
    /// Requires the `logging` feature flag.
    #[cfg(feature = "logging")]
    pub fn with_tracing(self) -> Self {
        self.with_subscriber(Arc::new(crate::subscribers::LogWriter::new()))
    }

    /// Builds the orchestrator.
    pub fn build(self) -> Orchestrator {
        Orchestrator::from_parts(self.client, SubscriberSet::new(self.subscribers))
    }

    /// Builds a host-facing step around the orchestrator.
    pub fn build_step(self) -> RunStep {
        RunStep::new(self.build())
    }
}
