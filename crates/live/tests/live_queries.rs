//! End-to-end behavior of the live query layer over a shared store.

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use litoral_core::address::Address;
use litoral_core::service::{PriceType, ServiceDetails, ServiceDraft, TourDetails};
use litoral_db::models::Service;
use litoral_db::repositories::{ChatRepo, FavoriteRepo, MessageRepo, ServiceRepo};
use litoral_db::Store;
use litoral_live::{LiveQueries, ThreadUpdate};
use tokio::time::timeout;
use uuid::Uuid;

const WAIT: Duration = Duration::from_secs(2);
const QUIET: Duration = Duration::from_millis(200);

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

async fn seed_tour(store: &Store, name: &str) -> Service {
    ServiceRepo::create(
        store,
        ServiceDraft {
            name: name.into(),
            description: "Passeio de barco.".into(),
            price: 150.0,
            address: Address {
                cep: "88215000".into(),
                street: "Av. Beira Mar".into(),
                number: "10".into(),
                complement: None,
                neighborhood: "Centro".into(),
                city: "Bombinhas".into(),
                state: "SC".into(),
            },
            images: vec!["https://cdn.example.com/barco.jpg".into()],
            details: ServiceDetails::Tour(TourDetails {
                price_type: PriceType::PerPerson,
                max_participants: 12,
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

// -- chat list ---------------------------------------------------------------

#[tokio::test]
async fn chat_list_emits_snapshot_then_updates() {
    init_tracing();
    let store = Arc::new(Store::default());
    let live = LiveQueries::new(store.clone());

    let mut sub = live.chats_for("cust-1");
    let initial = timeout(WAIT, sub.recv()).await.unwrap().unwrap();
    assert!(initial.is_empty());

    let chat = ChatRepo::get_or_create(&store, "cust-1", "sup-1", Uuid::now_v7())
        .await
        .unwrap();
    let after_create = timeout(WAIT, sub.recv()).await.unwrap().unwrap();
    assert_eq!(after_create.len(), 1);
    assert_eq!(after_create[0].id, chat.id);

    MessageRepo::append(&store, chat.id, "cust-1", "Olá!")
        .await
        .unwrap();
    let after_send = timeout(WAIT, sub.recv()).await.unwrap().unwrap();
    assert_eq!(after_send[0].last_message.as_deref(), Some("Olá!"));
    assert_eq!(after_send[0].unread_count, 1);
}

#[tokio::test]
async fn chat_list_orders_by_most_recent_activity() {
    init_tracing();
    let store = Arc::new(Store::default());
    let live = LiveQueries::new(store.clone());

    let older = ChatRepo::get_or_create(&store, "cust-1", "sup-1", Uuid::now_v7())
        .await
        .unwrap();
    let newer = ChatRepo::get_or_create(&store, "cust-1", "sup-2", Uuid::now_v7())
        .await
        .unwrap();

    let mut sub = live.chats_for("cust-1");
    let initial = timeout(WAIT, sub.recv()).await.unwrap().unwrap();
    assert_eq!(initial[0].id, newer.id);

    // A message in the older chat moves it to the front.
    MessageRepo::append(&store, older.id, "sup-1", "Oi")
        .await
        .unwrap();
    let reordered = timeout(WAIT, sub.recv()).await.unwrap().unwrap();
    assert_eq!(reordered[0].id, older.id);
    assert_eq!(reordered[1].id, newer.id);
}

#[tokio::test]
async fn chat_list_ignores_other_users_chats() {
    init_tracing();
    let store = Arc::new(Store::default());
    let live = LiveQueries::new(store.clone());

    let mut sub = live.chats_for("cust-1");
    timeout(WAIT, sub.recv()).await.unwrap().unwrap();

    ChatRepo::get_or_create(&store, "cust-2", "sup-1", Uuid::now_v7())
        .await
        .unwrap();
    assert!(timeout(QUIET, sub.recv()).await.is_err());
}

// -- message thread ----------------------------------------------------------

#[tokio::test]
async fn thread_snapshot_then_appends_in_order() {
    init_tracing();
    let store = Arc::new(Store::default());
    let live = LiveQueries::new(store.clone());

    let chat = ChatRepo::get_or_create(&store, "cust-1", "sup-1", Uuid::now_v7())
        .await
        .unwrap();
    MessageRepo::append(&store, chat.id, "cust-1", "primeira")
        .await
        .unwrap();

    let mut sub = live.messages_for(chat.id);
    let initial = timeout(WAIT, sub.recv()).await.unwrap().unwrap();
    assert_matches!(&initial, ThreadUpdate::Snapshot(log) if log.len() == 1);

    MessageRepo::append(&store, chat.id, "sup-1", "segunda")
        .await
        .unwrap();
    MessageRepo::append(&store, chat.id, "cust-1", "terceira")
        .await
        .unwrap();

    let mut appended = Vec::new();
    while appended.len() < 2 {
        match timeout(WAIT, sub.recv()).await.unwrap().unwrap() {
            ThreadUpdate::Appended(message) => appended.push(message),
            ThreadUpdate::Snapshot(_) => panic!("new messages must arrive as deltas"),
        }
    }
    assert_eq!(appended[0].content, "segunda");
    assert_eq!(appended[0].seq, 2);
    assert_eq!(appended[1].content, "terceira");
    assert_eq!(appended[1].seq, 3);
}

#[tokio::test]
async fn read_flip_arrives_as_fresh_snapshot() {
    init_tracing();
    let store = Arc::new(Store::default());
    let live = LiveQueries::new(store.clone());

    let chat = ChatRepo::get_or_create(&store, "cust-1", "sup-1", Uuid::now_v7())
        .await
        .unwrap();
    MessageRepo::append(&store, chat.id, "cust-1", "Olá")
        .await
        .unwrap();

    let mut sub = live.messages_for(chat.id);
    timeout(WAIT, sub.recv()).await.unwrap().unwrap();

    MessageRepo::mark_read(&store, chat.id, "sup-1").await.unwrap();
    let update = timeout(WAIT, sub.recv()).await.unwrap().unwrap();
    assert_matches!(&update, ThreadUpdate::Snapshot(log) if log.iter().all(|m| m.read));
}

// -- favorites ---------------------------------------------------------------

#[tokio::test]
async fn favorites_follow_toggles_and_deletions() {
    init_tracing();
    let store = Arc::new(Store::default());
    let live = LiveQueries::new(store.clone());
    let service = seed_tour(&store, "escuna").await;

    let mut sub = live.favorites_for("u1");
    let initial = timeout(WAIT, sub.recv()).await.unwrap().unwrap();
    assert!(initial.is_empty());

    FavoriteRepo::toggle(&store, "u1", service.id).await.unwrap();
    let favorited = timeout(WAIT, sub.recv()).await.unwrap().unwrap();
    assert_eq!(favorited.len(), 1);
    assert_eq!(favorited[0].id, service.id);

    ServiceRepo::delete(&store, service.id).await.unwrap();
    let after_delete = timeout(WAIT, sub.recv()).await.unwrap().unwrap();
    assert!(after_delete.is_empty());
}

#[tokio::test]
async fn favorites_ignore_other_users_toggles() {
    init_tracing();
    let store = Arc::new(Store::default());
    let live = LiveQueries::new(store.clone());
    let service = seed_tour(&store, "trilha").await;

    let mut sub = live.favorites_for("u1");
    timeout(WAIT, sub.recv()).await.unwrap().unwrap();

    FavoriteRepo::toggle(&store, "u2", service.id).await.unwrap();
    assert!(timeout(QUIET, sub.recv()).await.is_err());
}

// -- cancellation ------------------------------------------------------------

#[tokio::test]
async fn cancelled_subscription_delivers_nothing_more() {
    init_tracing();
    let store = Arc::new(Store::default());
    let live = LiveQueries::new(store.clone());

    let mut sub = live.chats_for("cust-1");
    timeout(WAIT, sub.recv()).await.unwrap().unwrap();

    sub.cancel();
    ChatRepo::get_or_create(&store, "cust-1", "sup-1", Uuid::now_v7())
        .await
        .unwrap();

    // Once cancel() returns, recv yields None immediately.
    assert!(sub.recv().await.is_none());
    assert!(sub.is_cancelled());
}

#[tokio::test]
async fn subscription_survives_consumer_lag_via_resnapshot() {
    init_tracing();
    let store = Arc::new(Store::default());
    let live = LiveQueries::new(store.clone());

    let chat = ChatRepo::get_or_create(&store, "cust-1", "sup-1", Uuid::now_v7())
        .await
        .unwrap();
    let mut sub = live.chats_for("cust-1");
    timeout(WAIT, sub.recv()).await.unwrap().unwrap();

    // Burst of activity while the consumer is not reading. The worker's
    // unbounded channel absorbs it; the consumer catches up and the final
    // update reflects the latest state.
    for i in 0..10 {
        MessageRepo::append(&store, chat.id, "cust-1", &format!("m{i}"))
            .await
            .unwrap();
    }

    let mut latest = None;
    while let Ok(Some(update)) = timeout(QUIET, sub.recv()).await {
        latest = Some(update);
    }
    let chats = latest.expect("at least one update after the burst");
    assert_eq!(chats[0].last_message.as_deref(), Some("m9"));
    assert_eq!(chats[0].unread_count, 10);
}
