//! Chat message entity model.

use litoral_core::types::{Id, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// A row from the `messages` collection. Append-only; `read` is the only
/// mutable field, flipped by the recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Id,
    pub chat_id: Id,
    /// Position in the chat, starting at 1. Strictly increasing in append
    /// order; the stable total order for display.
    pub seq: u64,
    pub sender_id: UserId,
    pub content: String,
    /// Assigned by the store, monotonically non-decreasing within the chat.
    pub created_at: Timestamp,
    pub read: bool,
}
