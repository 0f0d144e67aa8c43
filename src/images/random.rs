/// Random image selection with tiered fallback
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use super::{ImageBlob, ImageRecord, ImageStoreError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RandomImageError {
    #[error("No images available")]
    NoImages,
    #[error(transparent)]
    Store(#[from] ImageStoreError),
}

/// Which fallback tier produced the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolTier {
    CustomEnabled,
    DefaultEnabled,
    DefaultAny,
}

/// Pick the candidate pool:
/// 1. enabled user images,
/// 2. otherwise enabled defaults,
/// 3. otherwise every default regardless of its flag.
pub fn select_pool(records: &[ImageRecord]) -> Option<(PoolTier, Vec<&ImageRecord>)> {
    let tiers: [(PoolTier, fn(&ImageRecord) -> bool); 3] = [
        (PoolTier::CustomEnabled, |r: &ImageRecord| !r.is_default && r.is_enabled),
        (PoolTier::DefaultEnabled, |r: &ImageRecord| r.is_default && r.is_enabled),
        (PoolTier::DefaultAny, |r: &ImageRecord| r.is_default),
    ];

    tiers.into_iter().find_map(|(tier, keep)| {
        let pool: Vec<&ImageRecord> = records.iter().filter(|r| keep(r)).collect();
        (!pool.is_empty()).then_some((tier, pool))
    })
}

pub fn pick_random<'a, R: Rng + ?Sized>(
    records: &'a [ImageRecord],
    rng: &mut R,
) -> Option<&'a ImageRecord> {
    let (tier, pool) = select_pool(records)?;
    log::debug!("Choosing from {} images ({:?})", pool.len(), tier);
    pool.choose(rng).copied()
}

/// `data:<mime>;base64,<payload>`
pub fn to_data_url(blob: &ImageBlob) -> String {
    let mime = if blob.mime_type.is_empty() {
        "application/octet-stream"
    } else {
        blob.mime_type.as_str()
    };
    format!("data:{};base64,{}", mime, STANDARD.encode(&blob.bytes))
}

/// Choose one image from `records` and encode it for transport.
pub fn encode_random<R: Rng + ?Sized>(
    records: &[ImageRecord],
    rng: &mut R,
) -> Result<String, RandomImageError> {
    let chosen = pick_random(records, rng).ok_or(RandomImageError::NoImages)?;
    Ok(to_data_url(&chosen.blob))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::test_support::new_image;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn record(id: &str, is_default: bool, is_enabled: bool) -> ImageRecord {
        let mut record = new_image(id, is_default).into_record(0);
        record.is_enabled = is_enabled;
        record
    }

    fn pool_ids(records: &[ImageRecord]) -> (PoolTier, Vec<&str>) {
        let (tier, pool) = select_pool(records).unwrap();
        (tier, pool.iter().map(|r| r.id.as_str()).collect())
    }

    #[test]
    fn test_custom_enabled_preferred() {
        let records = vec![
            record("default-1", true, true),
            record("mine", false, true),
            record("hidden", false, false),
        ];
        assert_eq!(pool_ids(&records), (PoolTier::CustomEnabled, vec!["mine"]));
    }

    #[test]
    fn test_falls_back_to_enabled_defaults() {
        let records = vec![
            record("default-1", true, true),
            record("default-2", true, false),
            record("hidden", false, false),
        ];
        assert_eq!(pool_ids(&records), (PoolTier::DefaultEnabled, vec!["default-1"]));
    }

    #[test]
    fn test_falls_back_to_any_default() {
        let records = vec![
            record("default-1", true, false),
            record("default-2", true, false),
            record("hidden", false, false),
        ];
        assert_eq!(
            pool_ids(&records),
            (PoolTier::DefaultAny, vec!["default-1", "default-2"])
        );
    }

    #[test]
    fn test_only_disabled_custom_images_is_empty() {
        let records = vec![record("hidden", false, false)];
        assert!(select_pool(&records).is_none());
        assert!(select_pool(&[]).is_none());
    }

    #[test]
    fn test_pick_random_stays_in_pool() {
        let records = vec![
            record("default-1", true, true),
            record("a", false, true),
            record("b", false, true),
        ];
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let chosen = pick_random(&records, &mut rng).unwrap();
            assert!(chosen.id == "a" || chosen.id == "b");
        }
    }

    #[test]
    fn test_data_url() {
        let blob = ImageBlob::new("image/png", vec![0x89, 0x50, 0x4e, 0x47]);
        assert_eq!(to_data_url(&blob), "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_nothing_to_encode() {
        let mut rng = StdRng::seed_from_u64(1);

        let error = encode_random(&[], &mut rng).unwrap_err();
        assert_eq!(error, RandomImageError::NoImages);
        assert_eq!(error.to_string(), "No images available");

        let hidden = vec![record("hidden", false, false)];
        assert_eq!(encode_random(&hidden, &mut rng), Err(RandomImageError::NoImages));
    }

    #[test]
    fn test_disabled_defaults_still_served() {
        let records = vec![record("default-1", true, false)];
        let mut rng = StdRng::seed_from_u64(1);

        let url = encode_random(&records, &mut rng).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }
}
