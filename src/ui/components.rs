/// Reusable UI components

use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LoadingStateProps {
    #[prop_or_default]
    pub message: Option<String>,
}

#[function_component(LoadingState)]
pub fn loading_state(props: &LoadingStateProps) -> Html {
    html! {
        <div style="display: flex; flex-direction: column; align-items: center; gap: 12px; color: rgba(255, 255, 255, 0.7); font-family: sans-serif;">
            <div style="width: 32px; height: 32px; border: 3px solid rgba(255, 255, 255, 0.2); border-top-color: white; border-radius: 50%;"></div>
            if let Some(msg) = &props.message {
                <p style="margin: 0; font-size: 14px;">{msg}</p>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ErrorStateProps {
    pub message: String,
    #[prop_or_default]
    pub hint: Option<String>,
}

#[function_component(ErrorState)]
pub fn error_state(props: &ErrorStateProps) -> Html {
    html! {
        <div style="text-align: center; color: white; font-family: sans-serif;">
            <p style="margin: 0; font-size: 24px;">{&props.message}</p>
            if let Some(hint) = &props.hint {
                <p style="margin: 8px 0 0; font-size: 14px; color: rgba(255, 255, 255, 0.7);">{hint}</p>
            }
        </div>
    }
}
