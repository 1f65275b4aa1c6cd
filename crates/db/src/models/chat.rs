//! Chat (conversation container) entity model.

use litoral_core::types::{Id, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// A conversation between one customer and one supplier about one service.
///
/// At most one chat exists per `(customer_id, supplier_id, service_id)`
/// triple. `last_message*` is updated opportunistically on append;
/// `unread_count` is a single shared counter ("new activity since any
/// participant last read"), preserved as observed in production.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: Id,
    pub customer_id: UserId,
    pub supplier_id: UserId,
    pub service_id: Id,
    pub participants: [UserId; 2],
    pub last_message: Option<String>,
    pub last_message_time: Timestamp,
    pub unread_count: u32,
    pub created_at: Timestamp,
}

impl Chat {
    pub fn is_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }
}
