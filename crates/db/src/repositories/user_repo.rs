//! User profile repository: first-sign-in creation and role switching.

use chrono::Utc;
use litoral_core::error::CoreError;
use litoral_core::identity::IdentityProvider;
use litoral_core::roles::Role;

use crate::models::UserProfile;
use crate::store::Store;

/// Provides the `users` collection.
pub struct UserRepo;

impl UserRepo {
    /// Create the profile on first sign-in, or return the existing one.
    pub async fn ensure_profile(
        store: &Store,
        user_id: &str,
        email: &str,
        initial_role: Role,
    ) -> Result<UserProfile, CoreError> {
        if user_id.trim().is_empty() {
            return Err(CoreError::InvalidArgument("user_id"));
        }
        if email.trim().is_empty() {
            return Err(CoreError::InvalidArgument("email"));
        }

        let profile = UserProfile {
            id: user_id.to_string(),
            email: email.to_string(),
            roles: vec![initial_role],
            active_role: Some(initial_role),
            name: None,
            phone: None,
            created_at: Utc::now(),
        };
        store.insert_user_if_absent(profile).await
    }

    /// Switch the active role; the user must already hold it.
    pub async fn switch_role(
        store: &Store,
        user_id: &str,
        role: Role,
    ) -> Result<UserProfile, CoreError> {
        store
            .modify_user(user_id, |profile| {
                if !profile.has_role(role) {
                    return Err(CoreError::invalid_field("role"));
                }
                profile.active_role = Some(role);
                Ok(())
            })
            .await
    }

    /// Grant an additional role (e.g. a customer becoming a supplier).
    pub async fn add_role(
        store: &Store,
        user_id: &str,
        role: Role,
    ) -> Result<UserProfile, CoreError> {
        store
            .modify_user(user_id, |profile| {
                if !profile.has_role(role) {
                    profile.roles.push(role);
                }
                Ok(())
            })
            .await
    }

    pub async fn get(store: &Store, user_id: &str) -> Result<Option<UserProfile>, CoreError> {
        store.get_user(user_id).await
    }

    /// Resolve the signed-in user's profile through the identity provider.
    /// `None` when signed out or when no profile exists yet.
    pub async fn signed_in_profile(
        store: &Store,
        identity: &dyn IdentityProvider,
    ) -> Result<Option<UserProfile>, CoreError> {
        match identity.current_user().await {
            Some(user_id) => store.get_user(&user_id).await,
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
