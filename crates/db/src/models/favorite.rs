//! Favorite relation model.

use litoral_core::types::{Id, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// A row from the `favorites` collection: one user bookmarking one service.
///
/// The `(user_id, service_id)` pair is unique; rows are only ever created
/// and destroyed through the toggle, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: Id,
    pub user_id: UserId,
    pub service_id: Id,
    pub created_at: Timestamp,
}
