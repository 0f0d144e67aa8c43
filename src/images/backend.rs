/// Key-value contract the image store is built on
use async_trait::async_trait;

use super::{ImageRecord, NewImage, StoreResult};

/// Each call is atomic on its own; nothing spans two calls.
#[async_trait(?Send)]
pub trait ImageBackend {
    /// Store `image` with order = current max order + 1 (0 when empty).
    ///
    /// Reading the max and writing the record happen in one transaction so
    /// two uploads racing from different contexts never share an order.
    async fn append(&self, image: NewImage) -> StoreResult<ImageRecord>;

    async fn get(&self, id: &str) -> StoreResult<Option<ImageRecord>>;

    /// Every record, in no particular order.
    async fn get_all(&self) -> StoreResult<Vec<ImageRecord>>;

    /// Insert or overwrite by id.
    async fn put(&self, record: ImageRecord) -> StoreResult<()>;

    async fn remove(&self, id: &str) -> StoreResult<()>;

    async fn count(&self) -> StoreResult<usize>;
}
