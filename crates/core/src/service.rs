//! Service listing domain: the four service types, their per-type detail
//! payloads, and draft/patch validation.
//!
//! The submit payload is a tagged union — one detail struct per service
//! type — merged into the common service record by the catalog at create
//! time. The service type is carried by the details variant, so a patch
//! cannot change it: [`ServicePatch`] has no type field.

use serde::{Deserialize, Serialize};

use crate::address::{self, Address};
use crate::error::CoreError;
use crate::types::UserId;

/// Ratings are a 0–5 scale.
pub const MAX_RATING: f64 = 5.0;

// ---------------------------------------------------------------------------
// Service and price types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Accommodation,
    Tour,
    Boat,
    Guide,
}

impl ServiceType {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceType::Accommodation => "accommodation",
            ServiceType::Tour => "tour",
            ServiceType::Boat => "boat",
            ServiceType::Guide => "guide",
        }
    }
}

/// How a tour price is quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceType {
    PerPerson,
    PerGroup,
}

// ---------------------------------------------------------------------------
// Per-type detail payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccommodationDetails {
    /// e.g. `"pousada"`, `"hotel"`, `"casa"`.
    pub accommodation_type: String,
    pub capacity: u32,
    pub rooms: u32,
    pub bathrooms: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourDetails {
    pub price_type: PriceType,
    pub max_participants: u32,
    pub duration: Option<String>,
    pub meeting_point: Option<String>,
    #[serde(default)]
    pub included: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoatDetails {
    /// e.g. `"lancha"`, `"veleiro"`, `"escuna"`.
    pub boat_type: String,
    pub capacity: u32,
    pub cabins: Option<u32>,
    pub length_meters: Option<f64>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideDetails {
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    pub experience_years: Option<u32>,
    pub max_group_size: u32,
}

/// Per-type service payload. The variant fixes the service type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServiceDetails {
    Accommodation(AccommodationDetails),
    Tour(TourDetails),
    Boat(BoatDetails),
    Guide(GuideDetails),
}

impl ServiceDetails {
    pub fn service_type(&self) -> ServiceType {
        match self {
            ServiceDetails::Accommodation(_) => ServiceType::Accommodation,
            ServiceDetails::Tour(_) => ServiceType::Tour,
            ServiceDetails::Boat(_) => ServiceType::Boat,
            ServiceDetails::Guide(_) => ServiceType::Guide,
        }
    }

    /// Guest capacity for search filtering: beds, tour seats, boat capacity,
    /// or guide group size.
    pub fn capacity(&self) -> Option<u32> {
        match self {
            ServiceDetails::Accommodation(d) => Some(d.capacity),
            ServiceDetails::Tour(d) => Some(d.max_participants),
            ServiceDetails::Boat(d) => Some(d.capacity),
            ServiceDetails::Guide(d) => Some(d.max_group_size),
        }
    }

    /// Pricing mode; only tours carry one.
    pub fn price_type(&self) -> Option<PriceType> {
        match self {
            ServiceDetails::Tour(d) => Some(d.price_type),
            _ => None,
        }
    }

    /// Per-variant validation; appends offending field names to `fields`.
    fn collect_invalid_fields(&self, fields: &mut Vec<String>) {
        match self {
            ServiceDetails::Accommodation(d) => {
                if d.accommodation_type.trim().is_empty() {
                    fields.push("details.accommodation_type".into());
                }
                if d.capacity == 0 {
                    fields.push("details.capacity".into());
                }
            }
            ServiceDetails::Tour(d) => {
                if d.max_participants == 0 {
                    fields.push("details.max_participants".into());
                }
            }
            ServiceDetails::Boat(d) => {
                if d.boat_type.trim().is_empty() {
                    fields.push("details.boat_type".into());
                }
                if d.capacity == 0 {
                    fields.push("details.capacity".into());
                }
            }
            ServiceDetails::Guide(d) => {
                if d.max_group_size == 0 {
                    fields.push("details.max_group_size".into());
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Draft and patch
// ---------------------------------------------------------------------------

/// Submit payload for a new listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub address: Address,
    /// Must be non-empty at publish time.
    pub images: Vec<String>,
    pub details: ServiceDetails,
    pub supplier_id: UserId,
}

/// Partial update for an existing listing. Absent fields are left as-is.
///
/// `details`, when present, must match the existing service type — the
/// catalog rejects a variant change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServicePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub address: Option<Address>,
    pub images: Option<Vec<String>>,
    pub details: Option<ServiceDetails>,
    pub rating: Option<f64>,
}

/// Displayed location, derived from the address.
pub fn derive_location(address: &Address) -> String {
    format!("{}, {}", address.city, address.state)
}

/// Validate a draft, naming every missing or invalid field at once.
pub fn validate_draft(draft: &ServiceDraft) -> Result<(), CoreError> {
    let mut fields = Vec::new();

    if draft.name.trim().is_empty() {
        fields.push("name".into());
    }
    if draft.description.trim().is_empty() {
        fields.push("description".into());
    }
    if !(draft.price > 0.0) {
        fields.push("price".into());
    }
    if draft.images.is_empty() {
        fields.push("images".into());
    }
    if draft.supplier_id.trim().is_empty() {
        fields.push("supplier_id".into());
    }
    fields.extend(address::invalid_fields(&draft.address));
    draft.details.collect_invalid_fields(&mut fields);

    if fields.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation { fields })
    }
}

/// Validate the populated fields of a patch.
pub fn validate_patch(patch: &ServicePatch) -> Result<(), CoreError> {
    let mut fields = Vec::new();

    if let Some(name) = &patch.name {
        if name.trim().is_empty() {
            fields.push("name".into());
        }
    }
    if let Some(description) = &patch.description {
        if description.trim().is_empty() {
            fields.push("description".into());
        }
    }
    if let Some(price) = patch.price {
        if !(price > 0.0) {
            fields.push("price".into());
        }
    }
    if let Some(images) = &patch.images {
        if images.is_empty() {
            fields.push("images".into());
        }
    }
    if let Some(address) = &patch.address {
        fields.extend(address::invalid_fields(address));
    }
    if let Some(details) = &patch.details {
        details.collect_invalid_fields(&mut fields);
    }
    if let Some(rating) = patch.rating {
        if !(0.0..=MAX_RATING).contains(&rating) {
            fields.push("rating".into());
        }
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation { fields })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
