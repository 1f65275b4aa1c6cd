//! User roles.

use serde::{Deserialize, Serialize};

/// A marketplace role. Users may hold both and switch the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Browses, favorites, and books services.
    Customer,
    /// Lists and manages services.
    Supplier,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Supplier => "supplier",
        }
    }
}
