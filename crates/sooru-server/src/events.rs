// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventEnvelope {
    pub topic: String,
    pub event: String,
    pub payload: Value,
}

/// Fire-and-forget sink for change notifications. Topics are `user-{id}`,
/// `project-{id}` and `floorplan-{id}`.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, topic: &str, event: &str, payload: Value);
}

#[must_use]
pub fn user_topic(id: &str) -> String {
    format!("user-{id}")
}

#[must_use]
pub fn project_topic(id: &str) -> String {
    format!("project-{id}")
}

#[must_use]
pub fn floorplan_topic(id: &str) -> String {
    format!("floorplan-{id}")
}

/// In-process fan-out. Publishing with no subscribers drops the event.
#[derive(Debug, Clone)]
pub struct BroadcastPublisher {
    sender: broadcast::Sender<EventEnvelope>,
}

impl BroadcastPublisher {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }
}

impl EventPublisher for BroadcastPublisher {
    fn publish(&self, topic: &str, event: &str, payload: Value) {
        let delivered = self
            .sender
            .send(EventEnvelope {
                topic: topic.to_string(),
                event: event.to_string(),
                payload,
            })
            .unwrap_or(0);
        tracing::debug!(topic, event, delivered, "event published");
    }
}

/// Keeps every published event; used by tests and the CLI.
#[derive(Debug, Clone, Default)]
pub struct RecordingPublisher {
    events: Arc<Mutex<Vec<EventEnvelope>>>,
}

impl RecordingPublisher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<EventEnvelope> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn on_topic(&self, topic: &str) -> Vec<EventEnvelope> {
        self.events()
            .into_iter()
            .filter(|e| e.topic == topic)
            .collect()
    }
}

impl EventPublisher for RecordingPublisher {
    fn publish(&self, topic: &str, event: &str, payload: Value) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(EventEnvelope {
                topic: topic.to_string(),
                event: event.to_string(),
                payload,
            });
        }
    }
}
