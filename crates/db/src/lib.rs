//! In-memory persistence layer: the [`Store`], its change feed, the
//! service read cache, and the per-collection repositories.

pub mod cache;
pub mod changes;
pub mod config;
pub mod models;
pub mod repositories;
pub mod store;

pub use changes::{Change, ChangeBus, ChangeEvent, ChangeKind};
pub use config::StoreConfig;
pub use store::Store;
