/// Screen Saver - Chrome extension that covers a tab with a full-screen image
/// Built with Rust + WASM + Yew

pub mod browser;
pub mod coordinator;
pub mod i18n;
pub mod images;
pub mod messages;
pub mod overlay;
pub mod preferences;
pub mod presenter;
pub mod registry;
pub mod restricted;
pub mod round_trip;

#[cfg(target_arch = "wasm32")]
mod background;
#[cfg(target_arch = "wasm32")]
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Entry point for the background service worker
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start_background() {
    background::start();
}

// Entry point for the content script injected into every page
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start_overlay() {
    overlay::content::start();
}

// Start the Yew app for the settings page
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start_options() {
    yew::Renderer::<ui::options::Options>::new().render();
}

/// Exposed for the page scripts: whether the screen saver can run on `url`.
#[wasm_bindgen]
pub fn is_restricted_url(url: &str) -> bool {
    restricted::is_restricted_url(Some(url))
}
