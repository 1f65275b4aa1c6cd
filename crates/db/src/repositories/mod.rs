//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept the [`Store`](crate::Store) handle as the first argument, one
//! repository per component: catalog, favorites, conversations, messages,
//! users.

pub mod chat_repo;
pub mod favorite_repo;
pub mod message_repo;
pub mod service_repo;
pub mod user_repo;

pub use chat_repo::ChatRepo;
pub use favorite_repo::FavoriteRepo;
pub use message_repo::MessageRepo;
pub use service_repo::{SearchFilters, ServiceRepo};
pub use user_repo::UserRepo;
