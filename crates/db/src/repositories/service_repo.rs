//! Catalog repository: service CRUD, cached reads, and bounded search.

use chrono::Utc;
use litoral_core::error::CoreError;
use litoral_core::service::{self, ServiceDraft, ServicePatch, ServiceType};
use litoral_core::types::Id;
use uuid::Uuid;

use crate::models::Service;
use crate::store::Store;

/// Search results are capped to bound the cost of unindexed scans; callers
/// needing more must paginate.
pub const SEARCH_RESULT_CAP: usize = 50;

/// Independently optional search filters.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub service_type: Option<ServiceType>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_capacity: Option<u32>,
    /// Case-insensitive prefix match on the derived location.
    pub location_prefix: Option<String>,
    /// Services without a rating never match a positive threshold.
    pub min_rating: Option<f64>,
}

impl SearchFilters {
    fn matches(&self, service: &Service) -> bool {
        if let Some(t) = self.service_type {
            if service.service_type != t {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if service.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if service.price > max {
                return false;
            }
        }
        if let Some(min) = self.min_capacity {
            if service.capacity.map_or(true, |c| c < min) {
                return false;
            }
        }
        if let Some(prefix) = &self.location_prefix {
            if !service
                .location
                .to_lowercase()
                .starts_with(&prefix.to_lowercase())
            {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            // Unrated services are excluded, not treated as zero-rated.
            match service.rating {
                Some(rating) if rating >= min => {}
                _ => return false,
            }
        }
        true
    }
}

/// Provides CRUD and search over the `services` collection.
pub struct ServiceRepo;

impl ServiceRepo {
    /// Validate and persist a new listing. The service type, price type,
    /// location, and capacity are derived from the draft.
    pub async fn create(store: &Store, draft: ServiceDraft) -> Result<Service, CoreError> {
        service::validate_draft(&draft)?;

        let now = Utc::now();
        let created = Service {
            id: Uuid::now_v7(),
            service_type: draft.details.service_type(),
            price_type: draft.details.price_type(),
            location: service::derive_location(&draft.address),
            capacity: draft.details.capacity(),
            name: draft.name,
            description: draft.description,
            price: draft.price,
            address: draft.address,
            images: draft.images,
            details: draft.details,
            supplier_id: draft.supplier_id,
            rating: None,
            created_at: now,
            updated_at: now,
        };
        store.insert_service(created.clone()).await?;
        tracing::debug!(service_id = %created.id, supplier_id = %created.supplier_id, "service created");
        Ok(created)
    }

    /// Apply a partial update. The owning supplier is enforced upstream;
    /// this repository only guards the data invariants — in particular the
    /// service type is immutable, so a details payload of a different
    /// variant is rejected.
    pub async fn update(store: &Store, id: Id, patch: ServicePatch) -> Result<Service, CoreError> {
        service::validate_patch(&patch)?;

        let updated = store
            .modify_service(id, move |svc| {
                if let Some(details) = &patch.details {
                    if details.service_type() != svc.service_type {
                        return Err(CoreError::invalid_field("details.type"));
                    }
                }

                if let Some(name) = patch.name {
                    svc.name = name;
                }
                if let Some(description) = patch.description {
                    svc.description = description;
                }
                if let Some(price) = patch.price {
                    svc.price = price;
                }
                if let Some(address) = patch.address {
                    svc.location = service::derive_location(&address);
                    svc.address = address;
                }
                if let Some(images) = patch.images {
                    svc.images = images;
                }
                if let Some(details) = patch.details {
                    svc.capacity = details.capacity();
                    svc.price_type = details.price_type();
                    svc.details = details;
                }
                if let Some(rating) = patch.rating {
                    svc.rating = Some(rating);
                }
                Ok(())
            })
            .await?;
        tracing::debug!(service_id = %id, "service updated");
        Ok(updated)
    }

    /// Remove a listing. Deleting an already-absent id is a no-op.
    pub async fn delete(store: &Store, id: Id) -> Result<(), CoreError> {
        let removed = store.remove_service(id).await?;
        if removed {
            tracing::debug!(service_id = %id, "service deleted");
        }
        Ok(())
    }

    /// Read-through cached lookup. A fresh cache entry is returned as-is;
    /// otherwise the store is consulted and the entry refreshed. Absent ids
    /// are a normal "no data" outcome, not an error.
    pub async fn get_by_id(store: &Store, id: Id) -> Result<Option<Service>, CoreError> {
        if let Some(cached) = store.cache().get(id).await {
            return Ok(Some(cached));
        }

        let fetched = store.get_service(id).await?;
        if let Some(service) = &fetched {
            store.cache().insert(service.clone()).await;
        }
        Ok(fetched)
    }

    /// Filtered search, newest first, capped at [`SEARCH_RESULT_CAP`].
    pub async fn search(
        store: &Store,
        filters: &SearchFilters,
    ) -> Result<Vec<Service>, CoreError> {
        let mut results: Vec<Service> = store
            .list_services()
            .await?
            .into_iter()
            .filter(|s| filters.matches(s))
            .collect();
        results.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        results.truncate(SEARCH_RESULT_CAP);
        Ok(results)
    }

    /// All of a supplier's listings, newest first (no search cap).
    pub async fn list_by_supplier(
        store: &Store,
        supplier_id: &str,
    ) -> Result<Vec<Service>, CoreError> {
        store.services_by_supplier(supplier_id).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
