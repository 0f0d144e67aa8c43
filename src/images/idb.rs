/// IndexedDB-backed image backend (through the `/idb.js` bridge)
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::{ImageBackend, ImageBlob, ImageRecord, ImageStoreError, NewImage, StoreResult};

#[wasm_bindgen(module = "/idb.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn idbAppendImage(record: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn idbGetImage(id: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn idbGetAllImages() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn idbPutImage(record: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn idbDeleteImage(id: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn idbCountImages() -> Result<JsValue, JsValue>;
}

/// Record fields as stored; the bytes travel separately as a `Uint8Array`
/// under the `blob` key.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredImage {
    id: String,
    name: String,
    #[serde(default)]
    mime_type: String,
    uploaded_at: f64,
    #[serde(default)]
    order: u32,
    #[serde(default)]
    is_default: bool,
    #[serde(default = "enabled_by_default")]
    is_enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

fn js_error(context: &str, e: JsValue) -> ImageStoreError {
    ImageStoreError::Backend(format!("{}: {:?}", context, e))
}

fn to_js(meta: &StoredImage, bytes: &[u8]) -> StoreResult<JsValue> {
    let value = serde_wasm_bindgen::to_value(meta)
        .map_err(|e| ImageStoreError::Backend(format!("Failed to serialize image: {:?}", e)))?;
    let array = js_sys::Uint8Array::from(bytes);
    js_sys::Reflect::set(&value, &"blob".into(), &array).map_err(|e| js_error("Failed to attach blob", e))?;
    Ok(value)
}

fn from_js(value: JsValue) -> StoreResult<ImageRecord> {
    let blob = js_sys::Reflect::get(&value, &"blob".into())
        .map_err(|e| js_error("Failed to read blob", e))?;
    let bytes = blob
        .dyn_into::<js_sys::Uint8Array>()
        .map_err(|other| js_error("Stored image payload is not a byte array", other))?
        .to_vec();

    let meta: StoredImage = serde_wasm_bindgen::from_value(value)
        .map_err(|e| ImageStoreError::Backend(format!("Failed to parse image: {:?}", e)))?;

    Ok(ImageRecord {
        id: meta.id,
        blob: ImageBlob {
            mime_type: meta.mime_type,
            bytes,
        },
        name: meta.name,
        uploaded_at: meta.uploaded_at,
        order: meta.order,
        is_default: meta.is_default,
        is_enabled: meta.is_enabled,
    })
}

fn record_to_js(record: &ImageRecord) -> StoreResult<JsValue> {
    let meta = StoredImage {
        id: record.id.clone(),
        name: record.name.clone(),
        mime_type: record.blob.mime_type.clone(),
        uploaded_at: record.uploaded_at,
        order: record.order,
        is_default: record.is_default,
        is_enabled: record.is_enabled,
    };
    to_js(&meta, &record.blob.bytes)
}

pub struct IndexedDbBackend;

impl IndexedDbBackend {
    pub fn new() -> Self {
        IndexedDbBackend
    }
}

impl Default for IndexedDbBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl ImageBackend for IndexedDbBackend {
    async fn append(&self, image: NewImage) -> StoreResult<ImageRecord> {
        // The bridge overwrites `order` inside its readwrite transaction.
        let draft = image.into_record(0);
        let stored = idbAppendImage(record_to_js(&draft)?)
            .await
            .map_err(|e| js_error("Failed to save image", e))?;
        from_js(stored)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<ImageRecord>> {
        let value = idbGetImage(id)
            .await
            .map_err(|e| js_error("Failed to get image", e))?;
        if value.is_null() || value.is_undefined() {
            Ok(None)
        } else {
            from_js(value).map(Some)
        }
    }

    async fn get_all(&self) -> StoreResult<Vec<ImageRecord>> {
        let values = idbGetAllImages()
            .await
            .map_err(|e| js_error("Failed to list images", e))?;
        js_sys::Array::from(&values).iter().map(from_js).collect()
    }

    async fn put(&self, record: ImageRecord) -> StoreResult<()> {
        idbPutImage(record_to_js(&record)?)
            .await
            .map_err(|e| js_error("Failed to update image", e))
    }

    async fn remove(&self, id: &str) -> StoreResult<()> {
        idbDeleteImage(id)
            .await
            .map_err(|e| js_error("Failed to delete image", e))
    }

    async fn count(&self) -> StoreResult<usize> {
        let count = idbCountImages()
            .await
            .map_err(|e| js_error("Failed to count images", e))?;
        Ok(count.as_f64().unwrap_or(0.0) as usize)
    }
}
