/// Settings page: image library management plus display, clock and language preferences

use patternfly_yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{File, HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::i18n::{Text, fit_label, t, upload_error};
use crate::images::compress::compress;
use crate::images::idb::IndexedDbBackend;
use crate::images::random::to_data_url;
use crate::images::upload::{new_upload, validate_upload};
use crate::images::{ImageBlob, ImageRecord, ImageStore, ImageStoreError, move_one};
use crate::preferences::chrome_sync::ChromeSyncStorage;
use crate::preferences::{
    ClockSettings, DisplaySettings, ImageFit, LanguageSettings, Locale, PreferenceDocument,
    PreferenceStore, TIMEZONES,
};
use crate::ui::clock::local_clock_settings;

#[wasm_bindgen(module = "/assets.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn readImageFile(file: &File) -> Result<JsValue, JsValue>;
}

#[derive(Clone, PartialEq)]
enum PageState {
    Idle,
    Loading(String),
    Error(String),
}

fn image_store() -> ImageStore<IndexedDbBackend> {
    ImageStore::new(IndexedDbBackend::new())
}

fn preference_store() -> PreferenceStore<ChromeSyncStorage> {
    PreferenceStore::new(ChromeSyncStorage)
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

fn select_value(e: &Event) -> Option<String> {
    e.target_dyn_into::<HtmlSelectElement>().map(|s| s.value())
}

fn input_element(e: &Event) -> Option<HtmlInputElement> {
    e.target_dyn_into::<HtmlInputElement>()
}

/// Reload the image list into `images`, reporting failures through `state`.
fn refresh(
    images: UseStateHandle<Vec<ImageRecord>>,
    state: UseStateHandle<PageState>,
    locale: Locale,
) {
    spawn_local(async move {
        match image_store().get_all().await {
            Ok(records) => {
                images.set(records);
                state.set(PageState::Idle);
            }
            Err(e) => state.set(PageState::Error(format!("{}: {}", t(locale, Text::LoadFailed), e))),
        }
    });
}

/// Validate, save and report a preference document.
fn save_preference<T: PreferenceDocument + 'static>(
    doc: T,
    handle: UseStateHandle<T>,
    state: UseStateHandle<PageState>,
    locale: Locale,
) {
    spawn_local(async move {
        match preference_store().save(&doc).await {
            Ok(()) => handle.set(doc),
            Err(e) => state.set(PageState::Error(format!("{}: {}", t(locale, Text::SaveFailed), e))),
        }
    });
}

async fn read_upload(file: &File) -> Result<ImageBlob, String> {
    let read = readImageFile(file)
        .await
        .map_err(|e| format!("Failed to read {}: {:?}", file.name(), e))?;

    let mime_type = js_sys::Reflect::get(&read, &"mimeType".into())
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_else(|| file.type_());
    let bytes = js_sys::Reflect::get(&read, &"bytes".into())
        .map_err(|e| format!("Malformed file {}: {:?}", file.name(), e))?;

    let picked = ImageBlob {
        mime_type,
        bytes: js_sys::Uint8Array::new(&bytes).to_vec(),
    };
    compress(&picked).map_err(|e| format!("{}: {}", file.name(), e))
}

#[function_component(Options)]
pub fn options() -> Html {
    let state = use_state(|| PageState::Loading(t(Locale::En, Text::Loading).to_string()));
    let images = use_state(Vec::<ImageRecord>::new);
    let display = use_state(DisplaySettings::default);
    let clock = use_state(local_clock_settings);
    let language = use_state(LanguageSettings::default);
    let locale = language.locale;

    // Load images and all preference documents on mount
    {
        let state = state.clone();
        let images = images.clone();
        let display = display.clone();
        let clock = clock.clone();
        let language = language.clone();

        use_effect_with((), move |_| {
            refresh(images, state.clone(), Locale::En);
            spawn_local(async move {
                let preferences = preference_store();
                let (d, c, l) = futures::join!(
                    preferences.load::<DisplaySettings>(),
                    preferences.load_or(local_clock_settings()),
                    preferences.load::<LanguageSettings>(),
                );
                match d {
                    Ok(d) => display.set(d),
                    Err(e) => state.set(PageState::Error(e.to_string())),
                }
                match c {
                    Ok(c) => clock.set(c),
                    Err(e) => state.set(PageState::Error(e.to_string())),
                }
                match l {
                    Ok(l) => language.set(l),
                    Err(e) => state.set(PageState::Error(e.to_string())),
                }
            });
            || ()
        });
    }

    let on_toggle = {
        let state = state.clone();
        let images = images.clone();

        Callback::from(move |id: String| {
            let state = state.clone();
            let images = images.clone();

            spawn_local(async move {
                match image_store().toggle_enabled(&id).await {
                    Ok(enabled) => {
                        log::info!("Image {} enabled: {}", id, enabled);
                        refresh(images, state, locale);
                    }
                    Err(e) => state.set(PageState::Error(format!("{}: {}", t(locale, Text::ToggleFailed), e))),
                }
            });
        })
    };

    let on_delete = {
        let state = state.clone();
        let images = images.clone();

        Callback::from(move |id: String| {
            if !confirm(t(locale, Text::ConfirmDelete)) {
                return;
            }
            let state = state.clone();
            let images = images.clone();

            spawn_local(async move {
                match image_store().delete(&id).await {
                    Ok(()) => refresh(images, state, locale),
                    Err(ImageStoreError::DefaultImageProtected(_)) => {
                        alert(t(locale, Text::DefaultProtected));
                    }
                    Err(e) => state.set(PageState::Error(format!("{}: {}", t(locale, Text::DeleteFailed), e))),
                }
            });
        })
    };

    let on_move = {
        let state = state.clone();
        let images = images.clone();

        Callback::from(move |(index, up): (usize, bool)| {
            let ids: Vec<String> = images.iter().map(|r| r.id.clone()).collect();
            let Some(order) = move_one(&ids, index, up) else {
                return;
            };
            let state = state.clone();
            let images = images.clone();

            spawn_local(async move {
                match image_store().reorder(&order).await {
                    Ok(()) => refresh(images, state, locale),
                    Err(e) => state.set(PageState::Error(format!("{}: {}", t(locale, Text::ReorderFailed), e))),
                }
            });
        })
    };

    let on_upload = {
        let state = state.clone();
        let images = images.clone();

        Callback::from(move |e: Event| {
            let Some(input) = input_element(&e) else {
                return;
            };
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            input.set_value("");

            if let Err(e) = validate_upload(&file.type_(), file.size() as u64) {
                alert(&upload_error(locale, &e));
                return;
            }

            let state = state.clone();
            let images = images.clone();
            state.set(PageState::Loading(format!("{} {}...", t(locale, Text::Uploading), file.name())));

            spawn_local(async move {
                let blob = match read_upload(&file).await {
                    Ok(blob) => blob,
                    Err(e) => {
                        state.set(PageState::Error(format!("{}: {}", t(locale, Text::UploadFailed), e)));
                        return;
                    }
                };
                let upload = new_upload(&file.name(), blob, js_sys::Date::now());
                match image_store().save(upload).await {
                    Ok(_) => refresh(images, state, locale),
                    Err(e) => state.set(PageState::Error(format!("{}: {}", t(locale, Text::UploadFailed), e))),
                }
            });
        })
    };

    let on_fit_change = {
        let state = state.clone();
        let display = display.clone();

        Callback::from(move |e: Event| {
            let Some(fit) = select_value(&e).and_then(|v| ImageFit::from_css_value(&v)) else {
                return;
            };
            let doc = DisplaySettings {
                image_fit: fit,
                ..(*display).clone()
            };
            save_preference(doc, display.clone(), state.clone(), locale);
        })
    };

    let on_color_change = {
        let state = state.clone();
        let display = display.clone();

        Callback::from(move |e: Event| {
            let Some(input) = input_element(&e) else {
                return;
            };
            let doc = DisplaySettings {
                background_color: input.value(),
                ..(*display).clone()
            };
            save_preference(doc, display.clone(), state.clone(), locale);
        })
    };

    let on_clock_toggle = {
        let state = state.clone();
        let clock = clock.clone();

        Callback::from(move |e: Event| {
            let Some(input) = input_element(&e) else {
                return;
            };
            let doc = ClockSettings {
                enabled: input.checked(),
                ..(*clock).clone()
            };
            save_preference(doc, clock.clone(), state.clone(), locale);
        })
    };

    let on_timezone_change = {
        let state = state.clone();
        let clock = clock.clone();

        Callback::from(move |e: Event| {
            let Some(timezone) = select_value(&e) else {
                return;
            };
            let doc = ClockSettings {
                timezone,
                ..(*clock).clone()
            };
            save_preference(doc, clock.clone(), state.clone(), locale);
        })
    };

    let on_locale_change = {
        let state = state.clone();
        let language = language.clone();

        Callback::from(move |e: Event| {
            let Some(locale) = select_value(&e).and_then(|v| Locale::from_code(&v)) else {
                return;
            };
            save_preference(LanguageSettings { locale }, language.clone(), state.clone(), locale);
        })
    };

    let image_count = images.len();
    let timezone_listed = TIMEZONES.iter().any(|(_, id)| *id == clock.timezone);

    html! {
        <div class="options-container" style="max-width: 720px; margin: 0 auto; padding: 24px;">
            <h1>{t(locale, Text::SettingsTitle)}</h1>

            {match &*state {
                PageState::Loading(msg) => html! {
                    <div style="display: flex; align-items: center; gap: 8px;">
                        <Spinner />
                        <span>{msg}</span>
                    </div>
                },
                PageState::Error(msg) => html! {
                    <Alert r#type={AlertType::Danger} title={t(locale, Text::Error)} inline={true}>
                        {msg}
                    </Alert>
                },
                PageState::Idle => html! {},
            }}

            <section>
                <h2>{t(locale, Text::ImagesHeading)}</h2>
                <p>
                    <label>
                        {t(locale, Text::UploadLabel)}{" "}
                        <input type="file" accept="image/jpeg,image/png,image/webp" onchange={on_upload} />
                    </label>
                </p>
                if images.is_empty() {
                    <p>{t(locale, Text::NoImages)}</p>
                }
                <ul style="list-style: none; padding: 0;">
                    {for images.iter().enumerate().map(|(index, record)| html! {
                        <ImageRow
                            key={record.id.clone()}
                            record={record.clone()}
                            locale={locale}
                            first={index == 0}
                            last={index + 1 == image_count}
                            on_toggle={on_toggle.reform({
                                let id = record.id.clone();
                                move |_| id.clone()
                            })}
                            on_delete={on_delete.reform({
                                let id = record.id.clone();
                                move |_| id.clone()
                            })}
                            on_up={on_move.reform(move |_| (index, true))}
                            on_down={on_move.reform(move |_| (index, false))}
                        />
                    })}
                </ul>
            </section>

            <section>
                <h2>{t(locale, Text::DisplayHeading)}</h2>
                <p>
                    <label>
                        {t(locale, Text::ImageFit)}{" "}
                        <select onchange={on_fit_change}>
                            {for [ImageFit::Cover, ImageFit::Contain].into_iter().map(|fit| html! {
                                <option value={fit.css_value()} selected={display.image_fit == fit}>
                                    {fit_label(locale, fit)}
                                </option>
                            })}
                        </select>
                    </label>
                </p>
                <p>
                    <label>
                        {t(locale, Text::BackgroundColor)}{" "}
                        <input type="color" value={display.background_color.clone()} onchange={on_color_change} />
                    </label>
                </p>
            </section>

            <section>
                <h2>{t(locale, Text::ClockHeading)}</h2>
                <p>
                    <label>
                        <input type="checkbox" checked={clock.enabled} onchange={on_clock_toggle} />
                        {" "}{t(locale, Text::ShowClock)}
                    </label>
                </p>
                <p>
                    <label>
                        {t(locale, Text::Timezone)}{" "}
                        <select onchange={on_timezone_change} disabled={!clock.enabled}>
                            if !timezone_listed {
                                <option value={clock.timezone.clone()} selected={true}>
                                    {clock.timezone.clone()}
                                </option>
                            }
                            {for TIMEZONES.iter().map(|(label, id)| html! {
                                <option value={*id} selected={clock.timezone == *id}>
                                    {*label}
                                </option>
                            })}
                        </select>
                    </label>
                </p>
            </section>

            <section>
                <h2>{t(locale, Text::LanguageHeading)}</h2>
                <select onchange={on_locale_change}>
                    {for Locale::ALL.into_iter().map(|locale| html! {
                        <option value={locale.code()} selected={language.locale == locale}>
                            {locale.label()}
                        </option>
                    })}
                </select>
            </section>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ImageRowProps {
    record: ImageRecord,
    locale: Locale,
    first: bool,
    last: bool,
    on_toggle: Callback<Event>,
    on_delete: Callback<MouseEvent>,
    on_up: Callback<MouseEvent>,
    on_down: Callback<MouseEvent>,
}

#[function_component(ImageRow)]
fn image_row(props: &ImageRowProps) -> Html {
    let record = &props.record;
    let locale = props.locale;
    let thumbnail = use_memo(record.id.clone(), {
        let blob = record.blob.clone();
        move |_| to_data_url(&blob)
    });

    html! {
        <li style="display: flex; align-items: center; gap: 12px; padding: 8px 0; border-bottom: 1px solid #e5e7eb;">
            <img src={(*thumbnail).clone()} alt={record.name.clone()} style="width: 96px; height: 54px; object-fit: cover; border-radius: 4px;" />
            <div style="flex: 1; min-width: 0;">
                <div style="overflow: hidden; text-overflow: ellipsis; white-space: nowrap;">{&record.name}</div>
                if record.is_default {
                    <small style="color: #6b7280;">{t(locale, Text::DefaultBadge)}</small>
                }
            </div>
            <label>
                <input type="checkbox" checked={record.is_enabled} onchange={props.on_toggle.clone()} />
                {" "}{t(locale, Text::Enabled)}
            </label>
            <Button onclick={props.on_up.clone()} disabled={props.first} variant={ButtonVariant::Secondary}>
                {"↑"}
            </Button>
            <Button onclick={props.on_down.clone()} disabled={props.last} variant={ButtonVariant::Secondary}>
                {"↓"}
            </Button>
            <Button onclick={props.on_delete.clone()} variant={ButtonVariant::Danger}>
                {t(locale, Text::Delete)}
            </Button>
        </li>
    }
}
