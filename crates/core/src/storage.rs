//! Object storage capability and upload pre-validation.
//!
//! Listing images are stored by an external object store; the core only
//! checks size and file type before delegating, and keeps the returned URL.

use crate::error::CoreError;

/// Maximum accepted upload size (5 MiB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Accepted image file extensions (lowercase).
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// External blob store (cloud bucket in production).
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store a blob under `path` and return its public URL.
    async fn upload(&self, bytes: &[u8], path: &str) -> Result<String, CoreError>;
}

/// Reject oversized or non-image uploads before touching the store.
pub fn validate_upload(bytes: &[u8], path: &str) -> Result<(), CoreError> {
    if bytes.is_empty() {
        return Err(CoreError::Upload("file is empty".to_string()));
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(CoreError::Upload(format!(
            "file exceeds {MAX_UPLOAD_BYTES} bytes"
        )));
    }

    let extension = path
        .rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension {
        Some(ext) if ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(CoreError::Upload(format!(
            "unsupported file type, allowed: {}",
            ALLOWED_IMAGE_EXTENSIONS.join(", ")
        ))),
    }
}

/// Validate and upload an image, returning its URL.
pub async fn upload_image(
    storage: &dyn ObjectStorage,
    bytes: &[u8],
    path: &str,
) -> Result<String, CoreError> {
    validate_upload(bytes, path)?;
    storage.upload(bytes, path).await
}
