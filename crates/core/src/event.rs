//! Domain event system: decoupled communication between bounded contexts.
//!
//! Events are published when a pipeline run completes, a tool executes, or
//! a submission is screened. Other components subscribe without tight coupling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// A tool was executed through the registry
    ToolExecuted {
        tool_name: String,
        success: bool,
        confidence: f64,
        timestamp: DateTime<Utc>,
    },

    /// A pipeline run finished and was recorded in the ledger
    PipelineCompleted {
        version_label: String,
        final_quality: f64,
        iterations: usize,
        threshold_met: bool,
        timestamp: DateTime<Utc>,
    },

    /// A community tool submission was screened
    SubmissionScreened {
        tool_id: String,
        submitter: String,
        approved: bool,
        timestamp: DateTime<Utc>,
    },

    /// The background evolution cycle ticked
    EvolutionTick {
        build: u64,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
