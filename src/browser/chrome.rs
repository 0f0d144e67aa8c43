// Chrome extension API bindings.
// Promise-returning APIs are bound directly; the coordinator only sees them
// through the `Browser` trait.

use async_trait::async_trait;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::{Browser, BrowserError, Delivery, Notice, Tab, TabId};
use crate::images::ImageBlob;
use crate::images::seeding::BundledAssets;
use crate::messages::Message;
use crate::presenter::IconState;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["chrome", "tabs"], js_name = query)]
    fn tabs_query(query_info: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["chrome", "tabs"], js_name = get)]
    fn tabs_get(tab_id: TabId) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["chrome", "tabs"], js_name = sendMessage)]
    fn tabs_send_message(tab_id: TabId, message: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["chrome", "action"], js_name = setBadgeBackgroundColor)]
    fn action_set_badge_background_color(details: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["chrome", "action"], js_name = setBadgeText)]
    fn action_set_badge_text(details: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["chrome", "action"], js_name = setTitle)]
    fn action_set_title(details: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["chrome", "action"], js_name = setIcon)]
    fn action_set_icon(details: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["chrome", "notifications"], js_name = create)]
    fn notifications_create(options: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["chrome", "runtime"], js_name = getURL)]
    fn runtime_get_url(path: &str) -> String;

    #[wasm_bindgen(js_namespace = ["chrome", "runtime"], js_name = sendMessage)]
    fn runtime_send_message(message: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["chrome", "i18n"], js_name = getMessage)]
    fn i18n_get_message(key: &str) -> String;

    // Events

    #[wasm_bindgen(js_namespace = ["chrome", "action", "onClicked"], js_name = addListener)]
    pub fn on_action_clicked(callback: &Closure<dyn FnMut(JsValue)>);

    #[wasm_bindgen(js_namespace = ["chrome", "tabs", "onRemoved"], js_name = addListener)]
    pub fn on_tab_removed(callback: &Closure<dyn FnMut(TabId, JsValue)>);

    #[wasm_bindgen(js_namespace = ["chrome", "tabs", "onActivated"], js_name = addListener)]
    pub fn on_tab_activated(callback: &Closure<dyn FnMut(JsValue)>);

    #[wasm_bindgen(js_namespace = ["chrome", "tabs", "onUpdated"], js_name = addListener)]
    pub fn on_tab_updated(callback: &Closure<dyn FnMut(TabId, JsValue, JsValue)>);

    #[wasm_bindgen(js_namespace = ["chrome", "runtime", "onInstalled"], js_name = addListener)]
    pub fn on_installed(callback: &Closure<dyn FnMut(JsValue)>);

    #[wasm_bindgen(js_namespace = ["chrome", "runtime", "onMessage"], js_name = addListener)]
    pub fn on_runtime_message(callback: &Closure<dyn FnMut(JsValue, JsValue, js_sys::Function) -> bool>);
}

#[wasm_bindgen(module = "/assets.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn fetchBundledImage(url: &str) -> Result<JsValue, JsValue>;
}

fn browser_error(context: &str, e: JsValue) -> BrowserError {
    BrowserError(format!("{}: {:?}", context, e))
}

/// Build a plain JS object from key/value pairs.
fn details(pairs: &[(&str, JsValue)]) -> Result<JsValue, BrowserError> {
    let obj = js_sys::Object::new();
    for (key, value) in pairs {
        js_sys::Reflect::set(&obj, &JsValue::from_str(key), value)
            .map_err(|e| browser_error("Failed to build details", e))?;
    }
    Ok(obj.into())
}

async fn call(context: &str, promise: js_sys::Promise) -> Result<JsValue, BrowserError> {
    JsFuture::from(promise)
        .await
        .map_err(|e| browser_error(context, e))
}

fn message_to_js(message: Message) -> Result<JsValue, BrowserError> {
    serde_wasm_bindgen::to_value(&message)
        .map_err(|e| BrowserError(format!("Failed to serialize message: {:?}", e)))
}

/// Localized string with an English fallback when the key is missing.
pub fn localized(key: &str, fallback: &str) -> String {
    let message = i18n_get_message(key);
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

/// Send a message to the background worker and wait for its reply.
pub async fn send_to_background(message: Message) -> Result<JsValue, BrowserError> {
    let value = message_to_js(message)?;
    call("Failed to reach background", runtime_send_message(&value)).await
}

fn icon_paths(enabled: bool) -> Result<JsValue, BrowserError> {
    let folder = if enabled { "icon" } else { "icon/disabled" };
    let sizes = ["16", "32", "48", "128"];
    let pairs: Vec<(&str, JsValue)> = sizes
        .iter()
        .map(|size| (*size, JsValue::from_str(&format!("/{}/{}.png", folder, size))))
        .collect();
    details(&pairs)
}

pub struct ChromeBrowser;

#[async_trait(?Send)]
impl Browser for ChromeBrowser {
    async fn query_tabs(&self) -> Result<Vec<Tab>, BrowserError> {
        let tabs = call("Failed to query tabs", tabs_query(&js_sys::Object::new().into())).await?;
        serde_wasm_bindgen::from_value(tabs)
            .map_err(|e| BrowserError(format!("Failed to parse tabs: {:?}", e)))
    }

    async fn get_tab(&self, tab_id: TabId) -> Result<Tab, BrowserError> {
        let tab = call("Failed to get tab", tabs_get(tab_id)).await?;
        serde_wasm_bindgen::from_value(tab)
            .map_err(|e| BrowserError(format!("Failed to parse tab: {:?}", e)))
    }

    async fn focused_tab(&self) -> Result<Option<Tab>, BrowserError> {
        let query = details(&[
            ("active", JsValue::TRUE),
            ("lastFocusedWindow", JsValue::TRUE),
        ])?;
        let tabs = call("Failed to query focused tab", tabs_query(&query)).await?;
        let tabs: Vec<Tab> = serde_wasm_bindgen::from_value(tabs)
            .map_err(|e| BrowserError(format!("Failed to parse tabs: {:?}", e)))?;
        Ok(tabs.into_iter().next())
    }

    async fn apply_icon(&self, tab_id: TabId, icon: &IconState) -> Result<(), BrowserError> {
        let tab = JsValue::from_f64(tab_id as f64);

        call(
            "Failed to set badge color",
            action_set_badge_background_color(&details(&[
                ("color", JsValue::from_str(icon.badge_color)),
                ("tabId", tab.clone()),
            ])?),
        )
        .await?;
        call(
            "Failed to set badge text",
            action_set_badge_text(&details(&[
                ("text", JsValue::from_str(icon.badge_text)),
                ("tabId", tab.clone()),
            ])?),
        )
        .await?;
        call(
            "Failed to set title",
            action_set_title(&details(&[
                ("title", JsValue::from_str(icon.title)),
                ("tabId", tab.clone()),
            ])?),
        )
        .await?;
        call(
            "Failed to set icon",
            action_set_icon(&details(&[("path", icon_paths(icon.enabled)?), ("tabId", tab)])?),
        )
        .await?;
        Ok(())
    }

    async fn send_to_tab(&self, tab_id: TabId, message: Message) -> Delivery {
        let value = match message_to_js(message) {
            Ok(value) => value,
            Err(e) => return Delivery::ReceiverAbsent(e.to_string()),
        };
        match JsFuture::from(tabs_send_message(tab_id, &value)).await {
            Ok(_) => Delivery::Delivered,
            Err(e) => Delivery::ReceiverAbsent(format!("{:?}", e)),
        }
    }

    async fn notify(&self, notice: Notice) -> Result<(), BrowserError> {
        let (title, message) = match notice {
            Notice::Activated => (
                localized("notificationActivatedTitle", "Screen saver activated"),
                localized("notificationActivatedMessage", "Press ESC to exit."),
            ),
            Notice::RestrictedPage => (
                localized("notificationRestrictedTitle", "Screen saver unavailable"),
                localized(
                    "notificationRestrictedMessage",
                    "Browser pages and extension stores can't show the screen saver.",
                ),
            ),
        };

        let options = details(&[
            ("type", JsValue::from_str("basic")),
            ("iconUrl", JsValue::from_str(&runtime_get_url("/icon/48.png"))),
            ("title", JsValue::from_str(&title)),
            ("message", JsValue::from_str(&message)),
        ])?;
        call("Failed to create notification", notifications_create(&options)).await?;
        Ok(())
    }
}

/// Images packaged under the extension root, fetched by URL
pub struct ChromeAssets;

#[async_trait(?Send)]
impl BundledAssets for ChromeAssets {
    async fn fetch(&self, path: &str) -> Result<ImageBlob, String> {
        let url = runtime_get_url(path);
        let fetched = fetchBundledImage(&url)
            .await
            .map_err(|e| format!("Failed to fetch {}: {:?}", url, e))?;

        let mime_type = js_sys::Reflect::get(&fetched, &"mimeType".into())
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_else(|| "image/jpeg".to_string());
        let bytes = js_sys::Reflect::get(&fetched, &"bytes".into())
            .map_err(|e| format!("Malformed asset {}: {:?}", url, e))?;

        Ok(ImageBlob {
            mime_type,
            bytes: js_sys::Uint8Array::new(&bytes).to_vec(),
        })
    }
}
