//! Persisted entity models.
//!
//! Each submodule contains the serializable entity struct for one of the
//! durable collections (`services`, `favorites`, `chats`, `messages`) plus
//! user profiles.

pub mod chat;
pub mod favorite;
pub mod message;
pub mod service;
pub mod user;

pub use chat::Chat;
pub use favorite::Favorite;
pub use message::Message;
pub use service::Service;
pub use user::UserProfile;
