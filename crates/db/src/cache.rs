//! Short-lived read cache for service lookups.
//!
//! Entries older than the TTL are treated as absent and re-fetched by the
//! caller. Writes to a service proactively evict its entry, so a supplier
//! never sees a stale read of their own edit within the TTL window.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use litoral_core::types::Id;
use tokio::sync::RwLock;

use crate::models::Service;

struct CacheEntry {
    service: Service,
    stored_at: Instant,
}

/// TTL read cache keyed by service id.
///
/// Concurrent readers share the read lock; invalidation is a key-scoped
/// remove under the write lock (last write wins).
pub struct ServiceCache {
    ttl: Duration,
    entries: RwLock<HashMap<Id, CacheEntry>>,
}

impl ServiceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached service if its entry is still fresh.
    pub async fn get(&self, id: Id) -> Option<Service> {
        let entries = self.entries.read().await;
        match entries.get(&id) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.service.clone()),
            _ => None,
        }
    }

    /// Store a freshly fetched service, replacing any previous entry.
    pub async fn insert(&self, service: Service) {
        let entry = CacheEntry {
            stored_at: Instant::now(),
            service,
        };
        self.entries.write().await.insert(entry.service.id, entry);
    }

    /// Drop the entry for `id`, if any.
    pub async fn invalidate(&self, id: Id) {
        self.entries.write().await.remove(&id);
    }

    /// Number of entries currently held (fresh or stale).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use litoral_core::address::Address;
    use litoral_core::service::{AccommodationDetails, ServiceDetails, ServiceType};
    use uuid::Uuid;

    fn sample_service() -> Service {
        let now = Utc::now();
        Service {
            id: Uuid::now_v7(),
            service_type: ServiceType::Accommodation,
            name: "Pousada do Mar".into(),
            description: "Vista para a praia.".into(),
            price: 280.0,
            price_type: None,
            location: "Ilhabela, SP".into(),
            address: Address {
                cep: "11630000".into(),
                street: "Rua da Praia".into(),
                number: "10".into(),
                complement: None,
                neighborhood: "Perequê".into(),
                city: "Ilhabela".into(),
                state: "SP".into(),
            },
            images: vec!["https://cdn.example.com/pousada.jpg".into()],
            capacity: Some(4),
            details: ServiceDetails::Accommodation(AccommodationDetails {
                accommodation_type: "pousada".into(),
                capacity: 4,
                rooms: 2,
                bathrooms: 1,
                amenities: vec![],
                check_in: None,
                check_out: None,
            }),
            supplier_id: "sup-1".into(),
            rating: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn fresh_entry_returned_verbatim() {
        let cache = ServiceCache::new(Duration::from_secs(300));
        let service = sample_service();
        cache.insert(service.clone()).await;

        let hit = cache.get(service.id).await.expect("fresh entry");
        assert_eq!(hit, service);
    }

    #[tokio::test]
    async fn stale_entry_treated_as_absent() {
        // Zero TTL: every entry is already expired.
        let cache = ServiceCache::new(Duration::ZERO);
        let service = sample_service();
        cache.insert(service.clone()).await;

        assert!(cache.get(service.id).await.is_none());
        // The stale entry is still physically present until replaced.
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn invalidate_removes_entry() {
        let cache = ServiceCache::new(Duration::from_secs(300));
        let service = sample_service();
        cache.insert(service.clone()).await;

        cache.invalidate(service.id).await;
        assert!(cache.get(service.id).await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn insert_replaces_previous_entry() {
        let cache = ServiceCache::new(Duration::from_secs(300));
        let mut service = sample_service();
        cache.insert(service.clone()).await;

        service.name = "Pousada do Mar Azul".into();
        cache.insert(service.clone()).await;

        assert_eq!(cache.get(service.id).await.unwrap().name, service.name);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn unknown_id_misses() {
        let cache = ServiceCache::new(Duration::from_secs(300));
        assert!(cache.get(Uuid::now_v7()).await.is_none());
    }
}
