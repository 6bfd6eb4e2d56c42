use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

/// Optional text input carried by an alert (rename, create, report).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlertInput {
    pub placeholder: String,
    /// Pre-filled value (e.g. the current channel name for rename).
    pub value: String,
    pub multiline: bool,
}

#[derive(Properties, PartialEq)]
pub struct AlertProps {
    pub open: bool,
    pub header: String,
    #[prop_or_default]
    pub message: Option<String>,
    #[prop_or_default]
    pub input: Option<AlertInput>,
    #[prop_or_else(|| "OK".to_string())]
    pub confirm_label: String,
    /// Destructive-styled confirm button (delete flows).
    #[prop_or_default]
    pub destructive: bool,
    /// Receives the input value, or an empty string when no input is shown.
    pub on_confirm: Callback<String>,
    pub on_cancel: Callback<()>,
}

/// Modal confirmation dialog. Nothing reaches `on_confirm` without an
/// explicit tap on the confirm button.
#[function_component(Alert)]
pub fn alert(props: &AlertProps) -> Html {
    let value = use_state(String::new);

    // Re-seed the input each time the dialog opens.
    {
        let value = value.clone();
        let seed = props
            .input
            .as_ref()
            .map(|input| input.value.clone())
            .unwrap_or_default();
        use_effect_with((props.open, seed), move |(open, seed)| {
            if *open {
                value.set(seed.clone());
            }
        });
    }

    if !props.open {
        return html! {};
    }

    let on_input = {
        let value = value.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                value.set(input.value());
            } else if let Some(area) = e.target_dyn_into::<HtmlTextAreaElement>() {
                value.set(area.value());
            }
        })
    };

    let on_confirm = {
        let on_confirm = props.on_confirm.clone();
        let value = value.clone();
        Callback::from(move |_: MouseEvent| {
            on_confirm.emit((*value).clone());
        })
    };

    let on_cancel = {
        let on_cancel = props.on_cancel.clone();
        Callback::from(move |_: MouseEvent| on_cancel.emit(()))
    };

    let confirm_class = if props.destructive {
        "px-4 py-2 rounded-lg text-sm font-medium text-white bg-red-600 hover:bg-red-700"
    } else {
        "px-4 py-2 rounded-lg text-sm font-medium text-white bg-blue-500 hover:bg-blue-600"
    };

    html! {
        <div class="fixed inset-0 z-50 flex items-center justify-center">
            <div class="absolute inset-0 bg-black/40" onclick={on_cancel.clone()} />
            <div class="relative bg-white rounded-xl p-4 w-80 shadow-xl">
                <h3 class="text-base font-semibold mb-2">{&props.header}</h3>
                if let Some(message) = &props.message {
                    <p class="text-sm text-gray-600 mb-2 whitespace-pre-wrap">{message}</p>
                }
                if let Some(input) = &props.input {
                    if input.multiline {
                        <textarea
                            value={(*value).clone()}
                            oninput={on_input}
                            placeholder={input.placeholder.clone()}
                            class="w-full px-2 py-1 border border-gray-300 rounded text-sm mb-3"
                            rows="3"
                        />
                    } else {
                        <input
                            type="text"
                            value={(*value).clone()}
                            oninput={on_input}
                            placeholder={input.placeholder.clone()}
                            class="w-full px-2 py-1 border border-gray-300 rounded text-sm mb-3"
                        />
                    }
                }
                <div class="flex justify-end gap-2 mt-2">
                    <button
                        onclick={on_cancel}
                        class="px-4 py-2 rounded-lg text-sm text-gray-600 hover:bg-gray-100"
                    >
                        {"Cancel"}
                    </button>
                    <button onclick={on_confirm} class={confirm_class}>
                        {&props.confirm_label}
                    </button>
                </div>
            </div>
        </div>
    }
}
