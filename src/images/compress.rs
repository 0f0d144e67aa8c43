/// Upload compression: downscale to Full HD and re-encode as JPEG
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use thiserror::Error;

use super::ImageBlob;

/// Longest edge after compression
pub const MAX_DIMENSION: u32 = 1920;

/// Size the encoder aims for
pub const TARGET_BYTES: usize = 500 * 1024;

pub const INITIAL_QUALITY: u8 = 85;

/// Quality is never lowered past this, even if the target is missed.
pub const MIN_QUALITY: u8 = 45;

const QUALITY_STEP: u8 = 10;

#[derive(Debug, Error)]
pub enum CompressError {
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// Size that fits inside `MAX_DIMENSION` on both edges, keeping the aspect ratio.
/// Smaller images are never upscaled.
pub fn fitted_dimensions(width: u32, height: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= MAX_DIMENSION {
        return (width, height);
    }
    let scale = MAX_DIMENSION as f64 / longest as f64;
    let fit = |edge: u32| ((edge as f64 * scale).round() as u32).max(1);
    (fit(width), fit(height))
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, CompressError> {
    let rgb = image.to_rgb8();
    let mut bytes = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
        encoder
            .encode_image(&rgb)
            .map_err(|e| CompressError::Encode(e.to_string()))?;
    }
    Ok(bytes)
}

/// Decode an uploaded JPEG, PNG or WebP and re-encode it as a JPEG no larger
/// than Full HD, lowering quality step by step until it fits `TARGET_BYTES`.
pub fn compress(blob: &ImageBlob) -> Result<ImageBlob, CompressError> {
    let decoded =
        image::load_from_memory(&blob.bytes).map_err(|e| CompressError::Decode(e.to_string()))?;

    let (width, height) = decoded.dimensions();
    let (fit_width, fit_height) = fitted_dimensions(width, height);
    let resized = if (fit_width, fit_height) == (width, height) {
        decoded
    } else {
        decoded.resize_exact(fit_width, fit_height, FilterType::Triangle)
    };

    let mut quality = INITIAL_QUALITY;
    let mut bytes = encode_jpeg(&resized, quality)?;
    while bytes.len() > TARGET_BYTES && quality > MIN_QUALITY {
        quality = quality.saturating_sub(QUALITY_STEP).max(MIN_QUALITY);
        bytes = encode_jpeg(&resized, quality)?;
    }

    log::info!(
        "Compressed {}x{} {} ({} bytes) to {}x{} JPEG q{} ({} bytes)",
        width,
        height,
        blob.mime_type,
        blob.bytes.len(),
        fit_width,
        fit_height,
        quality,
        bytes.len()
    );
    Ok(ImageBlob::new("image/jpeg", bytes))
}
