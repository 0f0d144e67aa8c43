// Content script side of the overlay: mounts the screen saver on ACTIVATE,
// removes it on DEACTIVATE.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;
use yew::AppHandle;

use super::{OverlayCommand, OverlayLifecycle};
use crate::browser::chrome::{self, send_to_background};
use crate::messages::{Message, RandomImageResponse};
use crate::round_trip::{ROUND_TRIP_TIMEOUT_MS, with_deadline};
use crate::ui::screen_saver::ScreenSaver;

const HOST_ID: &str = "screen-saver-overlay-host";

struct Mounted {
    host: Element,
    app: AppHandle<ScreenSaver>,
}

#[derive(Default)]
struct OverlayController {
    lifecycle: OverlayLifecycle,
    mounted: Option<Mounted>,
}

impl OverlayController {
    fn handle(&mut self, message: Message) {
        match self.lifecycle.handle(message) {
            OverlayCommand::Mount => match mount() {
                Ok(mounted) => self.mounted = Some(mounted),
                Err(e) => {
                    log::error!("Failed to mount overlay: {:?}", e);
                    self.lifecycle = OverlayLifecycle::new();
                }
            },
            OverlayCommand::Unmount => {
                if let Some(Mounted { host, app }) = self.mounted.take() {
                    app.destroy();
                    host.remove();
                }
            }
            OverlayCommand::Nothing => {}
        }
    }
}

fn mount() -> Result<Mounted, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let parent: Element = match document.body() {
        Some(body) => body.into(),
        None => document
            .document_element()
            .ok_or_else(|| JsValue::from_str("no document element"))?,
    };

    let host = document.create_element("div")?;
    host.set_id(HOST_ID);
    parent.append_child(&host)?;

    let app = yew::Renderer::<ScreenSaver>::with_root(host.clone()).render();
    Ok(Mounted { host, app })
}

/// Ask the background for a random image, giving up after the round-trip timeout.
pub async fn request_random_image() -> Result<Option<RandomImageResponse>, String> {
    let reply = with_deadline(
        send_to_background(Message::GetRandomImage),
        TimeoutFuture::new(ROUND_TRIP_TIMEOUT_MS),
    )
    .await
    .map_err(|e| e.to_string())?
    .map_err(|e| e.to_string())?;

    if reply.is_undefined() || reply.is_null() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value(reply)
        .map(Some)
        .map_err(|e| format!("Malformed image response: {:?}", e))
}

/// ESC pressed: ask the background to deactivate this tab.
pub fn request_deactivate() {
    spawn_local(async {
        if let Err(e) = send_to_background(Message::Deactivate).await {
            log::debug!("Could not reach background: {}", e);
        }
    });
}

pub fn start() {
    let controller = Rc::new(RefCell::new(OverlayController::default()));

    let closure = Closure::wrap(Box::new(
        move |message: JsValue, _sender: JsValue, _send_response: js_sys::Function| -> bool {
            match serde_wasm_bindgen::from_value::<Message>(message) {
                Ok(message) => controller.borrow_mut().handle(message),
                Err(e) => log::debug!("Ignoring unknown message: {:?}", e),
            }
            false
        },
    ) as Box<dyn FnMut(JsValue, JsValue, js_sys::Function) -> bool>);
    chrome::on_runtime_message(&closure);
    closure.forget();

    log::debug!("Overlay controller ready");
}
