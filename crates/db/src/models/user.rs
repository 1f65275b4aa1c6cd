//! User profile entity model.

use litoral_core::roles::Role;
use litoral_core::types::{Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// A profile from the `users` collection.
///
/// The id is issued by the external identity provider; the profile is
/// created on first sign-in and mutated only by role changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub roles: Vec<Role>,
    pub active_role: Option<Role>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub created_at: Timestamp,
}

impl UserProfile {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}
