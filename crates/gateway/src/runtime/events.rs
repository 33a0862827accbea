//! Event bus — fan-out of lifecycle and webhook events to SSE clients.
//!
//! Events are arbitrary JSON values; the bus enforces no schema. A bounded
//! ring keeps the last 100 published events for debugging, and a broadcast
//! channel gives every subscriber a private queue. Subscribers attached
//! after a publish never see it (no replay). A lagged subscriber loses the
//! oldest events it missed and keeps going — publish never blocks.

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::broadcast;

/// Events retained in the history ring.
pub const HISTORY_LIMIT: usize = 100;

/// Per-subscriber queue capacity before the oldest events are dropped.
const CHANNEL_CAPACITY: usize = 256;

pub struct EventBus {
    history: Mutex<VecDeque<Value>>,
    tx: broadcast::Sender<Value>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            history: Mutex::new(VecDeque::with_capacity(HISTORY_LIMIT)),
            tx,
        }
    }

    /// Publish an event to every current subscriber.
    pub fn publish(&self, event: Value) {
        let event_type = event
            .get("event_type")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        tracing::info!(event_type = %event_type, "broadcasting event");

        {
            let mut history = self.history.lock();
            if history.len() == HISTORY_LIMIT {
                history.pop_front();
            }
            history.push_back(event.clone());
        }

        // Err means no subscribers are connected right now.
        let _ = self.tx.send(event);
    }

    /// Attach a new subscriber. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<Value> {
        self.tx.subscribe()
    }

    /// The retained recent events, oldest first.
    pub fn recent(&self) -> Vec<Value> {
        self.history.lock().iter().cloned().collect()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
