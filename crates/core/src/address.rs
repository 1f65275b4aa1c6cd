//! Structured address model, CEP helpers, and the external address-lookup
//! capability.
//!
//! Postal codes (CEP) are stored normalized: digits only, exactly
//! [`CEP_LEN`] of them. State is the two-letter UF code.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Digits in a normalized CEP.
pub const CEP_LEN: usize = 8;

/// Letters in a UF state code.
pub const UF_LEN: usize = 2;

/// A Brazilian-format structured address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Normalized postal code (8 digits).
    pub cep: String,
    pub street: String,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    /// Two-letter UF code, e.g. `"SP"`.
    pub state: String,
}

// ---------------------------------------------------------------------------
// CEP normalization
// ---------------------------------------------------------------------------

/// Strip non-digit characters from a raw CEP and require exactly
/// [`CEP_LEN`] digits.
///
/// Returns `None` for malformed input — CEP handling never errors.
pub fn normalize_cep(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == CEP_LEN {
        Some(digits)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Collect the names of missing or invalid address fields, prefixed with
/// `address.` so they can be merged into a larger validation report.
pub fn invalid_fields(address: &Address) -> Vec<String> {
    let mut fields = Vec::new();

    if normalize_cep(&address.cep).as_deref() != Some(address.cep.as_str()) {
        fields.push("address.cep".to_string());
    }
    if address.street.trim().is_empty() {
        fields.push("address.street".to_string());
    }
    if address.number.trim().is_empty() {
        fields.push("address.number".to_string());
    }
    if address.neighborhood.trim().is_empty() {
        fields.push("address.neighborhood".to_string());
    }
    if address.city.trim().is_empty() {
        fields.push("address.city".to_string());
    }
    if address.state.len() != UF_LEN || !address.state.chars().all(|c| c.is_ascii_uppercase()) {
        fields.push("address.state".to_string());
    }

    fields
}

/// Validate a full address, failing with a [`CoreError::Validation`] naming
/// every offending field.
pub fn validate_address(address: &Address) -> Result<(), CoreError> {
    let fields = invalid_fields(address);
    if fields.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation { fields })
    }
}

// ---------------------------------------------------------------------------
// Address lookup capability
// ---------------------------------------------------------------------------

/// External postal-code lookup service (ViaCEP in production).
///
/// Implementations resolve a CEP to a street/neighborhood/city/state
/// skeleton the user completes with `number`/`complement`. Malformed or
/// unknown codes yield `None`; lookup never errors.
#[async_trait::async_trait]
pub trait AddressLookup: Send + Sync {
    async fn lookup(&self, postal_code: &str) -> Option<Address>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
