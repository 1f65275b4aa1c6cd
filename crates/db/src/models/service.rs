//! Service listing entity model.

use litoral_core::address::Address;
use litoral_core::service::{PriceType, ServiceDetails, ServiceType};
use litoral_core::types::{Id, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// A listing from the `services` collection.
///
/// `service_type`, `price_type`, `location`, and `capacity` are all derived
/// from the draft at create time; `service_type` never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: Id,
    pub service_type: ServiceType,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub price_type: Option<PriceType>,
    /// Displayed location, `"{city}, {state}"`. Prefix-searchable.
    pub location: String,
    pub address: Address,
    pub images: Vec<String>,
    pub capacity: Option<u32>,
    pub details: ServiceDetails,
    pub supplier_id: UserId,
    /// Review average on a 0–5 scale; absent until first review.
    pub rating: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
