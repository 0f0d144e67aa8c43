/// Persistent image library: user uploads plus the bundled defaults
use thiserror::Error;

pub mod backend;
pub mod compress;
pub mod random;
pub mod seeding;
pub mod upload;

#[cfg(target_arch = "wasm32")]
pub mod idb;

pub use backend::ImageBackend;

/// Raw image bytes and their MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageBlob {
    pub fn new(mime_type: &str, bytes: Vec<u8>) -> ImageBlob {
        ImageBlob {
            mime_type: mime_type.to_string(),
            bytes,
        }
    }
}

/// A stored image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    pub id: String,
    pub blob: ImageBlob,
    pub name: String,
    /// Milliseconds since the epoch
    pub uploaded_at: f64,
    pub order: u32,
    pub is_default: bool,
    pub is_enabled: bool,
}

/// An image about to be stored; the backend assigns its order.
#[derive(Debug, Clone, PartialEq)]
pub struct NewImage {
    pub id: String,
    pub blob: ImageBlob,
    pub name: String,
    pub uploaded_at: f64,
    pub is_default: bool,
}

impl NewImage {
    pub fn into_record(self, order: u32) -> ImageRecord {
        ImageRecord {
            id: self.id,
            blob: self.blob,
            name: self.name,
            uploaded_at: self.uploaded_at,
            order,
            is_default: self.is_default,
            is_enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageStoreError {
    #[error("default image {0} cannot be deleted")]
    DefaultImageProtected(String),
    #[error("image {0} not found")]
    NotFound(String),
    #[error("image store failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, ImageStoreError>;

/// Image collection operations on top of an atomic key-value backend
pub struct ImageStore<B> {
    backend: B,
}

impl<B: ImageBackend> ImageStore<B> {
    pub fn new(backend: B) -> Self {
        ImageStore { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Persist a new image at the end of the list (max order + 1).
    pub async fn save(&self, image: NewImage) -> StoreResult<ImageRecord> {
        let record = self.backend.append(image).await?;
        log::info!("Saved image {} at order {}", record.id, record.order);
        Ok(record)
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<ImageRecord>> {
        self.backend.get(id).await
    }

    /// All images, ascending by order.
    pub async fn get_all(&self) -> StoreResult<Vec<ImageRecord>> {
        let mut records = self.backend.get_all().await?;
        records.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        Ok(records)
    }

    pub async fn count(&self) -> StoreResult<usize> {
        self.backend.count().await
    }

    /// Delete a user image. Deleting a missing id is a no-op.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        match self.backend.get(id).await? {
            Some(record) if record.is_default => {
                Err(ImageStoreError::DefaultImageProtected(id.to_string()))
            }
            Some(_) => {
                self.backend.remove(id).await?;
                log::info!("Deleted image {}", id);
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Rewrite each listed record's order to its position in `ids`.
    pub async fn reorder(&self, ids: &[String]) -> StoreResult<()> {
        for (position, id) in ids.iter().enumerate() {
            match self.backend.get(id).await? {
                Some(mut record) => {
                    record.order = position as u32;
                    self.backend.put(record).await?;
                }
                None => log::debug!("Skipping unknown image {} during reorder", id),
            }
        }
        Ok(())
    }

    /// Flip the enabled flag and return the new value.
    pub async fn toggle_enabled(&self, id: &str) -> StoreResult<bool> {
        let mut record = self
            .backend
            .get(id)
            .await?
            .ok_or_else(|| ImageStoreError::NotFound(id.to_string()))?;

        record.is_enabled = !record.is_enabled;
        let enabled = record.is_enabled;
        self.backend.put(record).await?;
        Ok(enabled)
    }
}

/// Ids with the entry at `index` moved one step up or down, or `None` when
/// it is already at that end.
pub fn move_one(ids: &[String], index: usize, up: bool) -> Option<Vec<String>> {
    let target = if up { index.checked_sub(1)? } else { index + 1 };
    if index >= ids.len() || target >= ids.len() {
        return None;
    }
    let mut moved = ids.to_vec();
    moved.swap(index, target);
    Some(moved)
}
