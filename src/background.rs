// Background service worker: wires Chrome events to the coordinator.
// Listeners are registered synchronously at startup so Chrome can wake the
// worker for them after it has been unloaded.

use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::browser::chrome::{self, ChromeAssets, ChromeBrowser};
use crate::browser::{Tab, TabId};
use crate::coordinator::{Coordinator, InstallReason};
use crate::images::ImageStore;
use crate::images::idb::IndexedDbBackend;
use crate::messages::Message;

type BackgroundCoordinator = Coordinator<ChromeBrowser, IndexedDbBackend, ChromeAssets, StdRng>;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActiveInfo {
    tab_id: TabId,
}

#[derive(Deserialize)]
struct InstalledDetails {
    reason: InstallReason,
}

#[derive(Deserialize)]
struct ChangeInfo {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Sender tab of a runtime message, if it came from a content script.
fn sender_tab(sender: &JsValue) -> Option<TabId> {
    let tab = js_sys::Reflect::get(sender, &"tab".into()).ok()?;
    let id = js_sys::Reflect::get(&tab, &"id".into()).ok()?;
    id.as_f64().map(|id| id as TabId)
}

pub fn start() {
    let coordinator: Rc<BackgroundCoordinator> = Rc::new(Coordinator::new(
        ChromeBrowser,
        ImageStore::new(IndexedDbBackend::new()),
        ChromeAssets,
        StdRng::from_entropy(),
    ));

    register_click(coordinator.clone());
    register_tab_events(coordinator.clone());
    register_install(coordinator.clone());
    register_messages(coordinator.clone());

    spawn_local(async move {
        coordinator.on_startup().await;
    });
}

fn register_click(coordinator: Rc<BackgroundCoordinator>) {
    let closure = Closure::wrap(Box::new(move |tab_js: JsValue| {
        let coordinator = coordinator.clone();
        spawn_local(async move {
            match serde_wasm_bindgen::from_value::<Tab>(tab_js) {
                Ok(tab) => {
                    let outcome = coordinator.on_icon_clicked(tab).await;
                    log::debug!("Icon click: {:?}", outcome);
                }
                Err(e) => log::error!("Failed to parse clicked tab: {:?}", e),
            }
        });
    }) as Box<dyn FnMut(JsValue)>);
    chrome::on_action_clicked(&closure);
    closure.forget();
}

fn register_tab_events(coordinator: Rc<BackgroundCoordinator>) {
    let removed = {
        let coordinator = coordinator.clone();
        Closure::wrap(Box::new(move |tab_id: TabId, _remove_info: JsValue| {
            coordinator.on_tab_removed(tab_id);
        }) as Box<dyn FnMut(TabId, JsValue)>)
    };
    chrome::on_tab_removed(&removed);
    removed.forget();

    let activated = {
        let coordinator = coordinator.clone();
        Closure::wrap(Box::new(move |info: JsValue| {
            let coordinator = coordinator.clone();
            spawn_local(async move {
                match serde_wasm_bindgen::from_value::<ActiveInfo>(info) {
                    Ok(info) => coordinator.on_tab_activated(info.tab_id).await,
                    Err(e) => log::error!("Failed to parse activeInfo: {:?}", e),
                }
            });
        }) as Box<dyn FnMut(JsValue)>)
    };
    chrome::on_tab_activated(&activated);
    activated.forget();

    let updated = Closure::wrap(Box::new(move |_tab_id: TabId, change: JsValue, tab_js: JsValue| {
        let relevant = serde_wasm_bindgen::from_value::<ChangeInfo>(change)
            .map(|c| c.url.is_some() || c.status.as_deref() == Some("complete"))
            .unwrap_or(false);
        if !relevant {
            return;
        }

        let coordinator = coordinator.clone();
        spawn_local(async move {
            match serde_wasm_bindgen::from_value::<Tab>(tab_js) {
                Ok(tab) => coordinator.on_tab_updated(tab).await,
                Err(e) => log::error!("Failed to parse updated tab: {:?}", e),
            }
        });
    }) as Box<dyn FnMut(TabId, JsValue, JsValue)>);
    chrome::on_tab_updated(&updated);
    updated.forget();
}

fn register_install(coordinator: Rc<BackgroundCoordinator>) {
    let closure = Closure::wrap(Box::new(move |details: JsValue| {
        let coordinator = coordinator.clone();
        spawn_local(async move {
            match serde_wasm_bindgen::from_value::<InstalledDetails>(details) {
                Ok(details) => {
                    coordinator.on_installed(details.reason, js_sys::Date::now()).await;
                }
                Err(e) => log::error!("Failed to parse install details: {:?}", e),
            }
        });
    }) as Box<dyn FnMut(JsValue)>);
    chrome::on_installed(&closure);
    closure.forget();
}

fn register_messages(coordinator: Rc<BackgroundCoordinator>) {
    let closure = Closure::wrap(Box::new(
        move |message: JsValue, sender: JsValue, send_response: js_sys::Function| -> bool {
            let Ok(message) = serde_wasm_bindgen::from_value::<Message>(message) else {
                return false;
            };
            let tab_id = sender_tab(&sender);
            let expects_reply = message == Message::GetRandomImage;

            let coordinator = coordinator.clone();
            spawn_local(async move {
                let Some(reply) = coordinator.on_message(message, tab_id).await else {
                    return;
                };
                match serde_wasm_bindgen::to_value(&reply) {
                    Ok(reply) => {
                        if let Err(e) = send_response.call1(&JsValue::NULL, &reply) {
                            log::debug!("Reply channel closed: {:?}", e);
                        }
                    }
                    Err(e) => log::error!("Failed to serialize reply: {:?}", e),
                }
            });

            // keep the channel open for the async reply
            expects_reply
        },
    ) as Box<dyn FnMut(JsValue, JsValue, js_sys::Function) -> bool>);
    chrome::on_runtime_message(&closure);
    closure.forget();
}
