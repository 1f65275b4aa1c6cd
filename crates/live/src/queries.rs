//! Query workers: one spawned task per subscription.
//!
//! Every worker follows the same shape: subscribe to the store's change
//! feed FIRST, then take the initial snapshot. A change landing between
//! those two steps is therefore re-observed rather than lost, at worst
//! producing a redundant re-emit. A lagged receiver recovers the same way:
//! drop the missed deltas and re-emit from a fresh snapshot.

use std::sync::Arc;

use litoral_core::types::Id;
use litoral_db::models::{Chat, Message, Service};
use litoral_db::repositories::FavoriteRepo;
use litoral_db::{Change, ChangeKind, Store};
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

use crate::subscription::Subscription;

/// An update on a message thread subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum ThreadUpdate {
    /// The full history, sent on attach and whenever per-message state
    /// (read flags) changes or deltas were lost.
    Snapshot(Vec<Message>),
    /// A single newly appended message, in order.
    Appended(Message),
}

/// Entry point for live queries over a shared [`Store`].
#[derive(Clone)]
pub struct LiveQueries {
    store: Arc<Store>,
}

impl LiveQueries {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Live view of a user's chat list, most recent activity first.
    ///
    /// Emits the current list on attach and again whenever a chat the user
    /// participates in is created or updated.
    pub fn chats_for(&self, user_id: &str) -> Subscription<Vec<Chat>> {
        let store = self.store.clone();
        let user_id = user_id.to_string();
        let cancel = CancellationToken::new();
        let (tx, rx) = mpsc::unbounded_channel();

        let token = cancel.clone();
        tokio::spawn(async move {
            let mut changes = store.subscribe_changes();

            match store.chats_for_user(&user_id).await {
                Ok(chats) => {
                    if tx.send(chats).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    tracing::warn!(user_id, error = %e, "chat list query failed at attach");
                    return;
                }
            }

            loop {
                let relevant = match Self::next_change(&mut changes, &token).await {
                    Delta::Event(event) => matches!(
                        &event,
                        Change::Chat { participants, .. }
                            if participants.iter().any(|p| p == &user_id)
                    ),
                    Delta::Lagged => true,
                    Delta::Stop => break,
                };
                if !relevant {
                    continue;
                }
                match store.chats_for_user(&user_id).await {
                    Ok(chats) => {
                        if tx.send(chats).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(user_id, error = %e, "chat list query stopping");
                        break;
                    }
                }
            }
        });

        Subscription::new(rx, cancel)
    }

    /// Live view of one chat's message thread.
    ///
    /// Emits a [`ThreadUpdate::Snapshot`] on attach, then an
    /// [`Appended`](ThreadUpdate::Appended) per new message in send order.
    /// Read-state changes and lag recovery come as a fresh snapshot.
    pub fn messages_for(&self, chat_id: Id) -> Subscription<ThreadUpdate> {
        let store = self.store.clone();
        let cancel = CancellationToken::new();
        let (tx, rx) = mpsc::unbounded_channel();

        let token = cancel.clone();
        tokio::spawn(async move {
            let mut changes = store.subscribe_changes();

            let mut last_seq = match store.messages_for_chat(chat_id).await {
                Ok(log) => {
                    let last_seq = log.last().map(|m| m.seq).unwrap_or(0);
                    if tx.send(ThreadUpdate::Snapshot(log)).is_err() {
                        return;
                    }
                    last_seq
                }
                Err(e) => {
                    tracing::warn!(%chat_id, error = %e, "thread query failed at attach");
                    return;
                }
            };

            loop {
                let action = match Self::next_change(&mut changes, &token).await {
                    Delta::Event(Change::Message { chat_id: id, kind }) if id == chat_id => {
                        match kind {
                            ChangeKind::Created => ThreadAction::Deltas,
                            _ => ThreadAction::Snapshot,
                        }
                    }
                    Delta::Event(_) => continue,
                    Delta::Lagged => ThreadAction::Snapshot,
                    Delta::Stop => break,
                };

                let log = match store.messages_for_chat(chat_id).await {
                    Ok(log) => log,
                    Err(e) => {
                        tracing::warn!(%chat_id, error = %e, "thread query stopping");
                        break;
                    }
                };

                let sent = match action {
                    ThreadAction::Deltas => log
                        .iter()
                        .filter(|m| m.seq > last_seq)
                        .all(|m| tx.send(ThreadUpdate::Appended(m.clone())).is_ok()),
                    ThreadAction::Snapshot => tx.send(ThreadUpdate::Snapshot(log.clone())).is_ok(),
                };
                last_seq = log.last().map(|m| m.seq).unwrap_or(last_seq);
                if !sent {
                    break;
                }
            }
        });

        Subscription::new(rx, cancel)
    }

    /// Live view of a user's favorites, resolved to services, newest
    /// favorite first.
    ///
    /// Re-emits when the user toggles a favorite and when any service is
    /// updated or deleted, since either can change the resolved list.
    pub fn favorites_for(&self, user_id: &str) -> Subscription<Vec<Service>> {
        let store = self.store.clone();
        let user_id = user_id.to_string();
        let cancel = CancellationToken::new();
        let (tx, rx) = mpsc::unbounded_channel();

        let token = cancel.clone();
        tokio::spawn(async move {
            let mut changes = store.subscribe_changes();

            match FavoriteRepo::list(&store, &user_id).await {
                Ok(services) => {
                    if tx.send(services).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    tracing::warn!(user_id, error = %e, "favorites query failed at attach");
                    return;
                }
            }

            loop {
                let relevant = match Self::next_change(&mut changes, &token).await {
                    Delta::Event(event) => match &event {
                        Change::Favorite { user_id: owner, .. } => owner == &user_id,
                        Change::Service { kind, .. } => {
                            matches!(kind, ChangeKind::Updated | ChangeKind::Deleted)
                        }
                        _ => false,
                    },
                    Delta::Lagged => true,
                    Delta::Stop => break,
                };
                if !relevant {
                    continue;
                }
                match FavoriteRepo::list(&store, &user_id).await {
                    Ok(services) => {
                        if tx.send(services).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(user_id, error = %e, "favorites query stopping");
                        break;
                    }
                }
            }
        });

        Subscription::new(rx, cancel)
    }

    /// Wait for the next change, a lag notice, or a reason to stop.
    async fn next_change(
        changes: &mut broadcast::Receiver<litoral_db::ChangeEvent>,
        cancel: &CancellationToken,
    ) -> Delta {
        tokio::select! {
            _ = cancel.cancelled() => Delta::Stop,
            received = changes.recv() => match received {
                Ok(event) => Delta::Event(event.change),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "live query lagged, re-emitting from snapshot");
                    Delta::Lagged
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("change feed closed, live query shutting down");
                    Delta::Stop
                }
            },
        }
    }
}

enum Delta {
    Event(Change),
    Lagged,
    Stop,
}

enum ThreadAction {
    Deltas,
    Snapshot,
}
