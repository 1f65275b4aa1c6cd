//! External identity provider capability.
//!
//! Identity (sign-up, sessions, tokens) is entirely delegated; the core
//! only ever asks "who is signed in right now". Injected explicitly so
//! tests can substitute a fixed identity.

use crate::types::UserId;

#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The currently signed-in user, or `None` when signed out.
    async fn current_user(&self) -> Option<UserId>;
}
