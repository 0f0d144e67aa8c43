/// Live clock shown over the screen saver

use gloo_timers::callback::Interval;
use wasm_bindgen::prelude::*;
use yew::prelude::*;

use crate::preferences::ClockSettings;

#[wasm_bindgen(module = "/clock.js")]
extern "C" {
    fn formatClock(time_zone: &str) -> String;

    fn localTimezone() -> String;
}

/// Clock settings used until the user saves their own: hidden, in the
/// machine's timezone.
pub fn local_clock_settings() -> ClockSettings {
    ClockSettings::hidden_in(&localTimezone())
}

#[derive(Properties, PartialEq)]
pub struct ClockProps {
    pub timezone: String,
}

#[function_component(Clock)]
pub fn clock(props: &ClockProps) -> Html {
    let time = use_state(String::new);

    {
        let time = time.clone();
        use_effect_with(props.timezone.clone(), move |timezone| {
            let timezone = timezone.clone();
            let tick = move || time.set(formatClock(&timezone));
            tick();
            let interval = Interval::new(1_000, tick);
            // dropping the interval cancels it
            move || drop(interval)
        });
    }

    html! {
        <div style="position: absolute; right: 48px; bottom: 40px; color: white; font-family: sans-serif; font-size: 64px; font-weight: 300; text-shadow: 0 2px 8px rgba(0, 0, 0, 0.6);">
            {(*time).clone()}
        </div>
    }
}
