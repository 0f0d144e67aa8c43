/// Upload validation and record construction for user images
use thiserror::Error;
use uuid::Uuid;

use super::{ImageBlob, NewImage};

pub const ALLOWED_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Limit before compression
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Invalid file type: {0}. Allowed types: JPEG, PNG, WebP")]
    InvalidType(String),
    #[error("File too large: {:.2}MB. Maximum size: 10MB", megabytes(.0))]
    TooLarge(u64),
}

fn megabytes(bytes: &u64) -> f64 {
    *bytes as f64 / 1024.0 / 1024.0
}

pub fn validate_upload(mime_type: &str, size: u64) -> Result<(), UploadError> {
    if !ALLOWED_TYPES.contains(&mime_type) {
        return Err(UploadError::InvalidType(mime_type.to_string()));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge(size));
    }
    Ok(())
}

/// A user upload with a fresh random id
pub fn new_upload(name: &str, blob: ImageBlob, now: f64) -> NewImage {
    NewImage {
        id: Uuid::new_v4().to_string(),
        blob,
        name: name.to_string(),
        uploaded_at: now,
        is_default: false,
    }
}
