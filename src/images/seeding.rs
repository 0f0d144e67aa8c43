/// One-time install seeding of the bundled default images
use async_trait::async_trait;
use thiserror::Error;

use super::{ImageBackend, ImageBlob, ImageStore, ImageStoreError, NewImage, StoreResult};

pub const DEFAULT_IMAGE_COUNT: usize = 15;

/// Path of the n-th bundled image (1-based), relative to the extension root.
pub fn default_image_path(n: usize) -> String {
    format!("/images/defaults/nature-{:02}.jpg", n)
}

pub fn default_image_id(n: usize) -> String {
    format!("default-{}", n)
}

/// Source of resources packaged with the extension
#[async_trait(?Send)]
pub trait BundledAssets {
    async fn fetch(&self, path: &str) -> Result<ImageBlob, String>;
}

/// Why one default image did not load
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedError {
    #[error("failed to fetch {id}: {reason}")]
    Fetch { id: String, reason: String },
    #[error("failed to save {id}: {source}")]
    Save { id: String, source: ImageStoreError },
}

impl SeedError {
    pub fn id(&self) -> &str {
        match self {
            SeedError::Fetch { id, .. } | SeedError::Save { id, .. } => id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub loaded: usize,
    pub failed: Vec<SeedError>,
    /// The store already had images, nothing was attempted.
    pub skipped: bool,
}

/// Load the bundled defaults if the store is empty.
///
/// A failing image is logged and recorded in the report; the rest still load.
/// Only a failure to count the store aborts the run.
pub async fn seed_default_images<B, A>(
    store: &ImageStore<B>,
    assets: &A,
    now: f64,
) -> StoreResult<SeedReport>
where
    B: ImageBackend,
    A: BundledAssets + ?Sized,
{
    let existing = store.count().await?;
    if existing > 0 {
        log::info!("Store already has {} images, skipping default seeding", existing);
        return Ok(SeedReport {
            skipped: true,
            ..SeedReport::default()
        });
    }

    log::info!("Loading {} default images...", DEFAULT_IMAGE_COUNT);
    let mut report = SeedReport::default();

    for n in 1..=DEFAULT_IMAGE_COUNT {
        let id = default_image_id(n);
        let outcome = match assets.fetch(&default_image_path(n)).await {
            Ok(blob) => store
                .save(NewImage {
                    id: id.clone(),
                    blob,
                    name: format!("Default Nature {}", n),
                    uploaded_at: now,
                    is_default: true,
                })
                .await
                .map(|_| ())
                .map_err(|source| SeedError::Save { id, source }),
            Err(reason) => Err(SeedError::Fetch { id, reason }),
        };

        match outcome {
            Ok(()) => {
                report.loaded += 1;
                log::debug!("Loaded default image {}/{}", n, DEFAULT_IMAGE_COUNT);
            }
            Err(e) => {
                log::error!("Failed to load default image {}: {}", n, e);
                report.failed.push(e);
            }
        }
    }

    log::info!(
        "Default seeding finished: {} loaded, {} failed",
        report.loaded,
        report.failed.len()
    );
    Ok(report)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::collections::HashSet;

    /// Serves every bundled path except the ones listed as broken
    #[derive(Default)]
    pub struct FakeAssets {
        pub broken: HashSet<String>,
    }

    impl FakeAssets {
        pub fn with_broken(paths: &[&str]) -> Self {
            FakeAssets {
                broken: paths.iter().map(|p| p.to_string()).collect(),
            }
        }
    }

    #[async_trait(?Send)]
    impl BundledAssets for FakeAssets {
        async fn fetch(&self, path: &str) -> Result<ImageBlob, String> {
            if self.broken.contains(path) {
                Err(format!("404 for {}", path))
            } else {
                Ok(ImageBlob::new("image/jpeg", path.as_bytes().to_vec()))
            }
        }
    }
}
