//! Favorites repository: idempotent toggle and resolution to live services.

use litoral_core::error::CoreError;
use litoral_core::types::Id;

use crate::models::Service;
use crate::repositories::ServiceRepo;
use crate::store::Store;

/// Provides the user–service favorite relation.
pub struct FavoriteRepo;

impl FavoriteRepo {
    fn check_ids(user_id: &str, service_id: Id) -> Result<(), CoreError> {
        if user_id.trim().is_empty() {
            return Err(CoreError::InvalidArgument("user_id"));
        }
        if service_id.is_nil() {
            return Err(CoreError::InvalidArgument("service_id"));
        }
        Ok(())
    }

    /// Flip the favorite state and return the new one. Duplicate concurrent
    /// toggles serialize inside the store, so the pair never duplicates.
    pub async fn toggle(store: &Store, user_id: &str, service_id: Id) -> Result<bool, CoreError> {
        Self::check_ids(user_id, service_id)?;
        let favorited = store.toggle_favorite(user_id, service_id).await?;
        tracing::debug!(user_id, %service_id, favorited, "favorite toggled");
        Ok(favorited)
    }

    /// Resolve the user's favorites to live services, newest favorite
    /// first. Rows pointing at deleted services are silently omitted, and a
    /// single failed lookup degrades to omission rather than aborting the
    /// whole list.
    pub async fn list(store: &Store, user_id: &str) -> Result<Vec<Service>, CoreError> {
        if user_id.trim().is_empty() {
            return Err(CoreError::InvalidArgument("user_id"));
        }

        let rows = store.favorites_for_user(user_id).await?;
        let mut services = Vec::with_capacity(rows.len());
        for row in rows {
            match ServiceRepo::get_by_id(store, row.service_id).await {
                Ok(Some(service)) => services.push(service),
                Ok(None) => {} // favorite outlived its service
                Err(e) => {
                    tracing::warn!(service_id = %row.service_id, error = %e, "skipping unresolvable favorite");
                }
            }
        }
        Ok(services)
    }

    pub async fn is_favorite(
        store: &Store,
        user_id: &str,
        service_id: Id,
    ) -> Result<bool, CoreError> {
        Self::check_ids(user_id, service_id)?;
        store.is_favorite(user_id, service_id).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use litoral_core::address::Address;
    use litoral_core::service::{PriceType, ServiceDetails, ServiceDraft, TourDetails};
    use uuid::Uuid;

    async fn seed_tour(store: &Store, name: &str) -> Service {
        ServiceRepo::create(
            store,
            ServiceDraft {
                name: name.into(),
                description: "Passeio.".into(),
                price: 120.0,
                address: Address {
                    cep: "88010000".into(),
                    street: "Rua".into(),
                    number: "1".into(),
                    complement: None,
                    neighborhood: "Centro".into(),
                    city: "Bombinhas".into(),
                    state: "SC".into(),
                },
                images: vec!["https://cdn.example.com/t.jpg".into()],
                details: ServiceDetails::Tour(TourDetails {
                    price_type: PriceType::PerGroup,
                    max_participants: 8,
                    duration: None,
                    meeting_point: None,
                    included: vec![],
                }),
                supplier_id: "sup-1".into(),
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn toggle_flips_true_then_false() {
        let store = Store::default();
        let service = seed_tour(&store, "escuna").await;

        assert!(FavoriteRepo::toggle(&store, "u1", service.id).await.unwrap());
        assert!(FavoriteRepo::is_favorite(&store, "u1", service.id)
            .await
            .unwrap());
        assert!(!FavoriteRepo::toggle(&store, "u1", service.id).await.unwrap());
        assert!(!FavoriteRepo::is_favorite(&store, "u1", service.id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn empty_ids_rejected() {
        let store = Store::default();
        assert_matches!(
            FavoriteRepo::toggle(&store, "", Uuid::now_v7()).await,
            Err(CoreError::InvalidArgument("user_id"))
        );
        assert_matches!(
            FavoriteRepo::toggle(&store, "u1", Uuid::nil()).await,
            Err(CoreError::InvalidArgument("service_id"))
        );
        assert_matches!(
            FavoriteRepo::list(&store, " ").await,
            Err(CoreError::InvalidArgument("user_id"))
        );
    }

    #[tokio::test]
    async fn list_resolves_to_live_services() {
        let store = Store::default();
        let a = seed_tour(&store, "a").await;
        let b = seed_tour(&store, "b").await;
        FavoriteRepo::toggle(&store, "u1", a.id).await.unwrap();
        FavoriteRepo::toggle(&store, "u1", b.id).await.unwrap();
        // Another user's favorite stays out of the list.
        FavoriteRepo::toggle(&store, "u2", a.id).await.unwrap();

        let list = FavoriteRepo::list(&store, "u1").await.unwrap();
        assert_eq!(list.len(), 2);
        // Newest favorite first.
        assert_eq!(list[0].id, b.id);
        assert_eq!(list[1].id, a.id);
    }

    #[tokio::test]
    async fn deleted_service_silently_dropped_from_list() {
        let store = Store::default();
        let kept = seed_tour(&store, "fica").await;
        let gone = seed_tour(&store, "some").await;
        FavoriteRepo::toggle(&store, "u1", kept.id).await.unwrap();
        FavoriteRepo::toggle(&store, "u1", gone.id).await.unwrap();

        ServiceRepo::delete(&store, gone.id).await.unwrap();

        let list = FavoriteRepo::list(&store, "u1").await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, kept.id);

        // The orphan row itself is left for a separate cleanup process.
        assert!(FavoriteRepo::is_favorite(&store, "u1", gone.id)
            .await
            .unwrap());
    }
}
