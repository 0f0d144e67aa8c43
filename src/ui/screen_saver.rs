/// Full-viewport screen saver surface mounted into the page

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::KeyboardEvent;
use yew::prelude::*;

use crate::overlay::content::{request_deactivate, request_random_image};
use crate::overlay::{ImageView, exit_request};
use crate::preferences::chrome_sync::ChromeSyncStorage;
use crate::preferences::{ClockSettings, DisplaySettings, PreferenceStore};
use crate::ui::clock::{Clock, local_clock_settings};
use crate::ui::components::{ErrorState, LoadingState};

#[function_component(ScreenSaver)]
pub fn screen_saver() -> Html {
    let image = use_state(|| ImageView::Loading);
    let display = use_state(DisplaySettings::default);
    let clock = use_state(ClockSettings::default);

    // Fetch the image and both settings documents together on mount
    {
        let image = image.clone();
        let display = display.clone();
        let clock = clock.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                let preferences = PreferenceStore::new(ChromeSyncStorage);
                let (reply, display_settings, clock_settings) = futures::join!(
                    request_random_image(),
                    preferences.load::<DisplaySettings>(),
                    preferences.load_or(local_clock_settings()),
                );

                display.set(display_settings.unwrap_or_else(|e| {
                    log::warn!("Using default display settings: {}", e);
                    DisplaySettings::default()
                }));
                clock.set(clock_settings.unwrap_or_else(|e| {
                    log::warn!("Using default clock settings: {}", e);
                    local_clock_settings()
                }));
                image.set(ImageView::from_reply(reply));
            });
            || ()
        });
    }

    // ESC anywhere on the page, captured before the page's own handlers
    use_effect_with((), move |_| {
        let listener = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            if exit_request(&event.key()).is_some() {
                event.prevent_default();
                request_deactivate();
            }
        }) as Box<dyn FnMut(KeyboardEvent)>);

        let window = web_sys::window();
        if let Some(window) = &window {
            if let Err(e) = window.add_event_listener_with_callback_and_bool(
                "keydown",
                listener.as_ref().unchecked_ref(),
                true,
            ) {
                log::error!("Failed to listen for ESC: {:?}", e);
            }
        }

        move || {
            if let Some(window) = window {
                let _ = window.remove_event_listener_with_callback_and_bool(
                    "keydown",
                    listener.as_ref().unchecked_ref(),
                    true,
                );
            }
        }
    });

    let surface_style = format!(
        "position: fixed; inset: 0; z-index: 2147483647; display: flex; align-items: center; justify-content: center; background-color: {};",
        display.background_color
    );

    html! {
        <div style={surface_style}>
            {match &*image {
                ImageView::Loading => html! {
                    <LoadingState message={Some("Loading...".to_string())} />
                },
                ImageView::Ready(data_url) => html! {
                    <img
                        src={data_url.clone()}
                        alt=""
                        style={format!("width: 100%; height: 100%; object-fit: {};", display.image_fit.css_value())}
                    />
                },
                ImageView::Failed(error) => html! {
                    <ErrorState
                        message={"Could not load an image".to_string()}
                        hint={Some(error.clone())}
                    />
                },
            }}
            if clock.enabled {
                <Clock timezone={clock.timezone.clone()} />
            }
        </div>
    }
}
