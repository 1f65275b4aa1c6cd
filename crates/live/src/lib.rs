//! Live query layer.
//!
//! Each query takes an initial snapshot from the store, then re-emits on
//! every relevant change published on the store's change feed. Consumers
//! receive updates through a [`Subscription`], which stops delivering the
//! moment it is cancelled.

pub mod queries;
pub mod subscription;

pub use queries::{LiveQueries, ThreadUpdate};
pub use subscription::Subscription;
