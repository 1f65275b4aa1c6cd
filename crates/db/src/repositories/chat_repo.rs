//! Conversation directory: race-safe chat lookup-or-create per triple.

use litoral_core::error::CoreError;
use litoral_core::types::Id;

use crate::models::Chat;
use crate::store::Store;

/// Provides the `chats` collection keyed by the
/// `(customer, supplier, service)` triple.
pub struct ChatRepo;

impl ChatRepo {
    /// Return the chat for the triple, creating it on first contact.
    ///
    /// Near-simultaneous calls may both observe "absent"; the store
    /// serializes the lookup-and-insert, so both receive the same chat id —
    /// two ids for one triple would be a correctness violation.
    pub async fn get_or_create(
        store: &Store,
        customer_id: &str,
        supplier_id: &str,
        service_id: Id,
    ) -> Result<Chat, CoreError> {
        if customer_id.trim().is_empty() {
            return Err(CoreError::InvalidArgument("customer_id"));
        }
        if supplier_id.trim().is_empty() {
            return Err(CoreError::InvalidArgument("supplier_id"));
        }
        if service_id.is_nil() {
            return Err(CoreError::InvalidArgument("service_id"));
        }

        let (chat, created) = store
            .get_or_create_chat(customer_id, supplier_id, service_id)
            .await?;
        if created {
            tracing::debug!(chat_id = %chat.id, customer_id, supplier_id, %service_id, "chat created");
        }
        Ok(chat)
    }

    pub async fn get(store: &Store, id: Id) -> Result<Option<Chat>, CoreError> {
        store.get_chat(id).await
    }

    /// All chats the user participates in, most recent activity first.
    pub async fn list_for_user(store: &Store, user_id: &str) -> Result<Vec<Chat>, CoreError> {
        if user_id.trim().is_empty() {
            return Err(CoreError::InvalidArgument("user_id"));
        }
        store.chats_for_user(user_id).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
