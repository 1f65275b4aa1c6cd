//! Litoral domain core.
//!
//! Entity value types, validation, the error taxonomy, and the capability
//! traits for external collaborators (identity provider, object storage,
//! address lookup). This crate has no internal dependencies; the storage
//! layer (`litoral-db`) and the live query layer (`litoral-live`) build on
//! top of it.

pub mod address;
pub mod error;
pub mod identity;
pub mod roles;
pub mod service;
pub mod storage;
pub mod types;

pub use address::{Address, AddressLookup};
pub use error::CoreError;
pub use identity::IdentityProvider;
pub use roles::Role;
pub use service::{PriceType, ServiceDetails, ServiceDraft, ServicePatch, ServiceType};
pub use storage::ObjectStorage;
