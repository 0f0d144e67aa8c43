// chrome.storage.sync integration

use async_trait::async_trait;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::{PreferenceError, SyncStorage};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["chrome", "storage", "sync"], js_name = get)]
    fn sync_get(keys: JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["chrome", "storage", "sync"], js_name = set)]
    fn sync_set(items: JsValue) -> js_sys::Promise;
}

pub struct ChromeSyncStorage;

fn storage_error(context: &str, e: impl std::fmt::Debug) -> PreferenceError {
    PreferenceError::Storage(format!("{}: {:?}", context, e))
}

#[async_trait(?Send)]
impl SyncStorage for ChromeSyncStorage {
    async fn get_item(&self, key: &str) -> Result<Option<serde_json::Value>, PreferenceError> {
        let result = JsFuture::from(sync_get(JsValue::from_str(key)))
            .await
            .map_err(|e| storage_error("Failed to read sync storage", e))?;

        let item = js_sys::Reflect::get(&result, &JsValue::from_str(key))
            .map_err(|e| storage_error("Failed to read sync item", e))?;
        if item.is_undefined() || item.is_null() {
            return Ok(None);
        }

        serde_wasm_bindgen::from_value(item)
            .map(Some)
            .map_err(|e| storage_error("Failed to parse sync item", e))
    }

    async fn set_item(&self, key: &str, value: serde_json::Value) -> Result<(), PreferenceError> {
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let js_value = value
            .serialize(&serializer)
            .map_err(|e| storage_error("Failed to serialize sync item", e))?;

        let items = js_sys::Object::new();
        js_sys::Reflect::set(&items, &JsValue::from_str(key), &js_value)
            .map_err(|e| storage_error("Failed to build sync item", e))?;

        JsFuture::from(sync_set(items.into()))
            .await
            .map_err(|e| storage_error("Failed to write sync storage", e))?;
        Ok(())
    }
}
