//! In-memory persistent-store capability.
//!
//! [`Store`] owns the durable collections (`services`, `favorites`,
//! `chats`, `messages`, plus user profiles), publishes every mutation on
//! the [`ChangeBus`], and enforces the uniqueness invariants — at most one
//! chat per `(customer, supplier, service)` triple and at most one favorite
//! per `(user, service)` pair — inside the owning table's write lock, so a
//! conflicting insert falls back to the existing row instead of duplicating
//! it.
//!
//! Shared via `Arc<Store>` and injected explicitly into repositories and
//! the live query layer; there are no globals.
//!
//! Lock discipline: methods that touch both the chat and message tables
//! acquire `chats` before `messages`, and no other method holds two table
//! locks at once.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use litoral_core::error::CoreError;
use litoral_core::types::{Id, UserId};
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::cache::ServiceCache;
use crate::changes::{Change, ChangeBus, ChangeEvent, ChangeKind};
use crate::config::StoreConfig;
use crate::models::{Chat, Favorite, Message, Service, UserProfile};

#[derive(Default)]
struct FavoriteTable {
    by_id: HashMap<Id, Favorite>,
    /// Uniqueness index over the `(user, service)` pair.
    by_pair: HashMap<(UserId, Id), Id>,
}

#[derive(Default)]
struct ChatTable {
    by_id: HashMap<Id, Chat>,
    /// Uniqueness index over the `(customer, supplier, service)` triple.
    by_triple: HashMap<(UserId, UserId, Id), Id>,
}

#[derive(Default)]
struct MessageTable {
    /// Append-only log per chat; vector order is the display order.
    by_chat: HashMap<Id, Vec<Message>>,
}

/// The backing store for all Litoral collections.
pub struct Store {
    services: RwLock<HashMap<Id, Service>>,
    favorites: RwLock<FavoriteTable>,
    chats: RwLock<ChatTable>,
    messages: RwLock<MessageTable>,
    users: RwLock<HashMap<UserId, UserProfile>>,
    cache: ServiceCache,
    changes: ChangeBus,
    closed: AtomicBool,
}

impl Store {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            services: RwLock::new(HashMap::new()),
            favorites: RwLock::new(FavoriteTable::default()),
            chats: RwLock::new(ChatTable::default()),
            messages: RwLock::new(MessageTable::default()),
            users: RwLock::new(HashMap::new()),
            cache: ServiceCache::new(Duration::from_secs(config.cache_ttl_secs)),
            changes: ChangeBus::new(config.change_capacity),
            closed: AtomicBool::new(false),
        }
    }

    /// Subscribe to the change feed covering all collections.
    pub fn subscribe_changes(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }

    /// The service read cache. Repositories consult it on `get_by_id`;
    /// store mutations evict entries themselves.
    pub fn cache(&self) -> &ServiceCache {
        &self.cache
    }

    /// Mark the store closed. Every subsequent operation fails with
    /// [`CoreError::Unavailable`].
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        tracing::info!("store closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<(), CoreError> {
        if self.is_closed() {
            Err(CoreError::Unavailable("store is closed".to_string()))
        } else {
            Ok(())
        }
    }

    // -----------------------------------------------------------------------
    // Services
    // -----------------------------------------------------------------------

    pub async fn insert_service(&self, service: Service) -> Result<(), CoreError> {
        self.ensure_open()?;
        let id = service.id;
        self.services.write().await.insert(id, service);
        self.changes.publish(Change::Service {
            id,
            kind: ChangeKind::Created,
        });
        Ok(())
    }

    pub async fn get_service(&self, id: Id) -> Result<Option<Service>, CoreError> {
        self.ensure_open()?;
        Ok(self.services.read().await.get(&id).cloned())
    }

    /// Apply a mutation to a service under the write lock.
    ///
    /// The closure runs against a copy; on error nothing is written, so a
    /// failed update leaves the row exactly as it was. On success
    /// `updated_at` is refreshed, the cache entry is evicted, and an
    /// `Updated` change is published.
    pub async fn modify_service<F>(&self, id: Id, mutate: F) -> Result<Service, CoreError>
    where
        F: FnOnce(&mut Service) -> Result<(), CoreError>,
    {
        self.ensure_open()?;
        let mut services = self.services.write().await;
        let current = services.get(&id).ok_or(CoreError::NotFound {
            entity: "service",
            id: id.to_string(),
        })?;

        let mut updated = current.clone();
        mutate(&mut updated)?;
        updated.updated_at = Utc::now();
        services.insert(id, updated.clone());
        drop(services);

        self.cache.invalidate(id).await;
        self.changes.publish(Change::Service {
            id,
            kind: ChangeKind::Updated,
        });
        Ok(updated)
    }

    /// Remove a service. Returns whether a row existed.
    pub async fn remove_service(&self, id: Id) -> Result<bool, CoreError> {
        self.ensure_open()?;
        let removed = self.services.write().await.remove(&id).is_some();
        if removed {
            self.cache.invalidate(id).await;
            self.changes.publish(Change::Service {
                id,
                kind: ChangeKind::Deleted,
            });
        }
        Ok(removed)
    }

    pub async fn list_services(&self) -> Result<Vec<Service>, CoreError> {
        self.ensure_open()?;
        Ok(self.services.read().await.values().cloned().collect())
    }

    pub async fn services_by_supplier(&self, supplier_id: &str) -> Result<Vec<Service>, CoreError> {
        self.ensure_open()?;
        let mut services: Vec<Service> = self
            .services
            .read()
            .await
            .values()
            .filter(|s| s.supplier_id == supplier_id)
            .cloned()
            .collect();
        services.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(services)
    }

    // -----------------------------------------------------------------------
    // Favorites
    // -----------------------------------------------------------------------

    /// Flip the favorite state of a `(user, service)` pair and return the
    /// new state. The pair index is maintained inside the write lock, so
    /// concurrent duplicate toggles serialize and the row count stays 0 or 1.
    pub async fn toggle_favorite(&self, user_id: &str, service_id: Id) -> Result<bool, CoreError> {
        self.ensure_open()?;
        let mut favorites = self.favorites.write().await;
        let key = (user_id.to_string(), service_id);

        if let Some(favorite_id) = favorites.by_pair.remove(&key) {
            favorites.by_id.remove(&favorite_id);
            drop(favorites);
            self.changes.publish(Change::Favorite {
                user_id: user_id.to_string(),
                service_id,
                kind: ChangeKind::Deleted,
            });
            Ok(false)
        } else {
            let favorite = Favorite {
                id: Uuid::now_v7(),
                user_id: user_id.to_string(),
                service_id,
                created_at: Utc::now(),
            };
            favorites.by_pair.insert(key, favorite.id);
            favorites.by_id.insert(favorite.id, favorite);
            drop(favorites);
            self.changes.publish(Change::Favorite {
                user_id: user_id.to_string(),
                service_id,
                kind: ChangeKind::Created,
            });
            Ok(true)
        }
    }

    pub async fn is_favorite(&self, user_id: &str, service_id: Id) -> Result<bool, CoreError> {
        self.ensure_open()?;
        Ok(self
            .favorites
            .read()
            .await
            .by_pair
            .contains_key(&(user_id.to_string(), service_id)))
    }

    /// All favorite rows for a user, newest first.
    pub async fn favorites_for_user(&self, user_id: &str) -> Result<Vec<Favorite>, CoreError> {
        self.ensure_open()?;
        let favorites = self.favorites.read().await;
        let mut rows: Vec<Favorite> = favorites
            .by_id
            .values()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    // -----------------------------------------------------------------------
    // Chats
    // -----------------------------------------------------------------------

    /// Look up or create the chat for a triple. Lookup and insert share the
    /// chats write lock, so concurrent callers always land on the same row.
    /// Returns the chat and whether it was created by this call.
    pub async fn get_or_create_chat(
        &self,
        customer_id: &str,
        supplier_id: &str,
        service_id: Id,
    ) -> Result<(Chat, bool), CoreError> {
        self.ensure_open()?;
        let mut chats = self.chats.write().await;
        let key = (
            customer_id.to_string(),
            supplier_id.to_string(),
            service_id,
        );

        if let Some(chat_id) = chats.by_triple.get(&key) {
            let chat = chats.by_id[chat_id].clone();
            return Ok((chat, false));
        }

        let now = Utc::now();
        let chat = Chat {
            id: Uuid::now_v7(),
            customer_id: customer_id.to_string(),
            supplier_id: supplier_id.to_string(),
            service_id,
            participants: [customer_id.to_string(), supplier_id.to_string()],
            last_message: None,
            last_message_time: now,
            unread_count: 0,
            created_at: now,
        };
        chats.by_triple.insert(key, chat.id);
        chats.by_id.insert(chat.id, chat.clone());
        drop(chats);

        self.changes.publish(Change::Chat {
            id: chat.id,
            participants: chat.participants.clone(),
            kind: ChangeKind::Created,
        });
        Ok((chat, true))
    }

    pub async fn get_chat(&self, id: Id) -> Result<Option<Chat>, CoreError> {
        self.ensure_open()?;
        Ok(self.chats.read().await.by_id.get(&id).cloned())
    }

    /// Chats the user participates in, most recent activity first.
    pub async fn chats_for_user(&self, user_id: &str) -> Result<Vec<Chat>, CoreError> {
        self.ensure_open()?;
        let chats = self.chats.read().await;
        let mut rows: Vec<Chat> = chats
            .by_id
            .values()
            .filter(|c| c.is_participant(user_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.last_message_time
                .cmp(&a.last_message_time)
                .then(b.id.cmp(&a.id))
        });
        Ok(rows)
    }

    // -----------------------------------------------------------------------
    // Messages
    // -----------------------------------------------------------------------

    /// Append a message and update the parent chat in one critical section.
    ///
    /// `seq` and `created_at` are assigned under the message table's write
    /// lock: `seq` strictly increases per chat and `created_at` never goes
    /// backwards, so concurrent senders get a stable total order. Any
    /// failure happens before the first write — a failed append leaves both
    /// the log and the chat untouched.
    pub async fn append_message(
        &self,
        chat_id: Id,
        sender_id: &str,
        content: &str,
    ) -> Result<Message, CoreError> {
        self.ensure_open()?;
        let content = content.trim();
        if content.is_empty() {
            return Err(CoreError::invalid_field("content"));
        }

        // Lock order: chats before messages.
        let mut chats = self.chats.write().await;
        let chat = chats.by_id.get_mut(&chat_id).ok_or(CoreError::NotFound {
            entity: "chat",
            id: chat_id.to_string(),
        })?;
        if !chat.is_participant(sender_id) {
            return Err(CoreError::invalid_field("sender_id"));
        }

        let mut messages = self.messages.write().await;
        let log = messages.by_chat.entry(chat_id).or_default();

        let now = Utc::now();
        let created_at = match log.last() {
            Some(last) if last.created_at >= now => {
                last.created_at + chrono::Duration::microseconds(1)
            }
            _ => now,
        };
        let message = Message {
            id: Uuid::now_v7(),
            chat_id,
            seq: log.len() as u64 + 1,
            sender_id: sender_id.to_string(),
            content: content.to_string(),
            created_at,
            read: false,
        };
        log.push(message.clone());

        chat.last_message = Some(message.content.clone());
        chat.last_message_time = created_at;
        chat.unread_count += 1;
        let participants = chat.participants.clone();
        drop(messages);
        drop(chats);

        self.changes.publish(Change::Message {
            chat_id,
            kind: ChangeKind::Created,
        });
        self.changes.publish(Change::Chat {
            id: chat_id,
            participants,
            kind: ChangeKind::Updated,
        });
        Ok(message)
    }

    /// Mark every message not sent by `reader_id` as read and reset the
    /// chat's unread counter. Idempotent: a second call finds nothing to
    /// flip and publishes nothing.
    pub async fn mark_read(&self, chat_id: Id, reader_id: &str) -> Result<(), CoreError> {
        self.ensure_open()?;

        let mut chats = self.chats.write().await;
        let chat = chats.by_id.get_mut(&chat_id).ok_or(CoreError::NotFound {
            entity: "chat",
            id: chat_id.to_string(),
        })?;

        let mut messages = self.messages.write().await;
        let mut flipped = 0usize;
        if let Some(log) = messages.by_chat.get_mut(&chat_id) {
            for message in log.iter_mut() {
                if !message.read && message.sender_id != reader_id {
                    message.read = true;
                    flipped += 1;
                }
            }
        }

        let changed = flipped > 0 || chat.unread_count != 0;
        chat.unread_count = 0;
        let participants = chat.participants.clone();
        drop(messages);
        drop(chats);

        if changed {
            self.changes.publish(Change::Message {
                chat_id,
                kind: ChangeKind::Updated,
            });
            self.changes.publish(Change::Chat {
                id: chat_id,
                participants,
                kind: ChangeKind::Updated,
            });
        }
        Ok(())
    }

    /// Full message history of a chat in append order.
    pub async fn messages_for_chat(&self, chat_id: Id) -> Result<Vec<Message>, CoreError> {
        self.ensure_open()?;
        Ok(self
            .messages
            .read()
            .await
            .by_chat
            .get(&chat_id)
            .cloned()
            .unwrap_or_default())
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    pub async fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>, CoreError> {
        self.ensure_open()?;
        Ok(self.users.read().await.get(user_id).cloned())
    }

    /// Insert a profile unless one already exists; returns the stored row
    /// either way (first sign-in is idempotent).
    pub async fn insert_user_if_absent(
        &self,
        profile: UserProfile,
    ) -> Result<UserProfile, CoreError> {
        self.ensure_open()?;
        let mut users = self.users.write().await;
        Ok(users
            .entry(profile.id.clone())
            .or_insert(profile)
            .clone())
    }

    /// Apply a mutation to a user profile under the write lock; on closure
    /// error nothing is written.
    pub async fn modify_user<F>(&self, user_id: &str, mutate: F) -> Result<UserProfile, CoreError>
    where
        F: FnOnce(&mut UserProfile) -> Result<(), CoreError>,
    {
        self.ensure_open()?;
        let mut users = self.users.write().await;
        let current = users.get(user_id).ok_or(CoreError::NotFound {
            entity: "user",
            id: user_id.to_string(),
        })?;

        let mut updated = current.clone();
        mutate(&mut updated)?;
        users.insert(user_id.to_string(), updated.clone());
        Ok(updated)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
