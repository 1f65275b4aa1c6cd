//! In-process change feed backed by a `tokio::sync::broadcast` channel.
//!
//! Every store mutation publishes a [`ChangeEvent`]; the live query layer
//! consumes the feed and re-delivers the result sets of affected
//! subscriptions. The bus is shared via the owning [`Store`](crate::Store)
//! handle.

use chrono::{DateTime, Utc};
use litoral_core::types::{Id, UserId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// ChangeEvent
// ---------------------------------------------------------------------------

/// What happened to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// A mutation on one of the durable collections, with just enough routing
/// information for subscription predicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "collection", rename_all = "snake_case")]
pub enum Change {
    Service {
        id: Id,
        kind: ChangeKind,
    },
    Favorite {
        user_id: UserId,
        service_id: Id,
        kind: ChangeKind,
    },
    Chat {
        id: Id,
        participants: [UserId; 2],
        kind: ChangeKind,
    },
    Message {
        chat_id: Id,
        kind: ChangeKind,
    },
}

/// A change notification as delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub change: Change,
    /// When the mutation was published (UTC).
    pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(change: Change) -> Self {
        Self {
            change,
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// ChangeBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
pub const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out hub for [`ChangeEvent`]s.
///
/// Wraps a [`broadcast::Sender`] so any number of subscribers independently
/// receive every published change. When a receiver's buffer overflows it
/// observes `RecvError::Lagged`; consumers recover by re-reading the store.
pub struct ChangeBus {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeBus {
    /// Create a bus with a specific channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a change to all current subscribers.
    ///
    /// With zero subscribers the change is silently dropped; the store
    /// itself is the durable record, the feed is purely a wake-up signal.
    pub fn publish(&self, change: Change) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(ChangeEvent::new(change));
    }

    /// Subscribe to all changes published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
