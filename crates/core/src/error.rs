//! Error taxonomy shared by every Litoral component.
//!
//! - [`CoreError::Validation`] — bad input shape or value; never retried,
//!   surfaced to the caller for correction. Carries the offending field
//!   names so callers can highlight them.
//! - [`CoreError::InvalidArgument`] — a required identifier is missing.
//! - [`CoreError::Unavailable`] — transient backend failure; the caller may
//!   retry, nothing retries automatically.
//! - [`CoreError::Upload`] — object storage rejected a file.
//! - [`CoreError::NotFound`] — a referenced entity is absent where absence
//!   is exceptional. Plain reads return `Option` instead.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {}", fields.join(", "))]
    Validation { fields: Vec<String> },

    #[error("Invalid argument: {0} is required")]
    InvalidArgument(&'static str),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Upload rejected: {0}")]
    Upload(String),
}

impl CoreError {
    /// Validation error naming a single offending field.
    pub fn invalid_field(field: impl Into<String>) -> Self {
        Self::Validation {
            fields: vec![field.into()],
        }
    }

    /// True when the error names the given field.
    pub fn names_field(&self, field: &str) -> bool {
        match self {
            Self::Validation { fields } => fields.iter().any(|f| f == field),
            _ => false,
        }
    }
}
