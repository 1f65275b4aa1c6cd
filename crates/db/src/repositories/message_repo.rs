//! Message log: append-only per-chat history, unread bookkeeping.

use litoral_core::error::CoreError;
use litoral_core::types::Id;

use crate::models::Message;
use crate::store::Store;

/// Provides the `messages` collection.
pub struct MessageRepo;

impl MessageRepo {
    /// Append a message to a chat.
    ///
    /// Content is trimmed and must be non-empty; the sender must be a chat
    /// participant. On success the parent chat's `last_message`,
    /// `last_message_time`, and `unread_count` are updated in the same
    /// critical section — a failed append changes nothing.
    pub async fn append(
        store: &Store,
        chat_id: Id,
        sender_id: &str,
        content: &str,
    ) -> Result<Message, CoreError> {
        if sender_id.trim().is_empty() {
            return Err(CoreError::InvalidArgument("sender_id"));
        }
        let message = store.append_message(chat_id, sender_id, content).await?;
        tracing::debug!(chat_id = %chat_id, seq = message.seq, "message appended");
        Ok(message)
    }

    /// Mark everything the reader has not sent as read and reset the chat's
    /// unread counter. Safe to call repeatedly.
    pub async fn mark_read(store: &Store, chat_id: Id, reader_id: &str) -> Result<(), CoreError> {
        if reader_id.trim().is_empty() {
            return Err(CoreError::InvalidArgument("reader_id"));
        }
        store.mark_read(chat_id, reader_id).await
    }

    /// Full history in append order.
    pub async fn list(store: &Store, chat_id: Id) -> Result<Vec<Message>, CoreError> {
        store.messages_for_chat(chat_id).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
