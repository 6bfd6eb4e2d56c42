use gloo::timers::callback::Timeout;
use yew::prelude::*;

use crate::store::{Toast, ToastKind};

/// How long a toast stays on screen.
pub const TOAST_DISMISS_MS: u32 = 4000;

#[derive(Properties, PartialEq)]
pub struct ToastHostProps {
    pub toasts: Vec<Toast>,
    pub on_dismiss: Callback<u64>,
}

#[function_component(ToastHost)]
pub fn toast_host(props: &ToastHostProps) -> Html {
    html! {
        <div class="fixed bottom-4 left-1/2 -translate-x-1/2 z-50 flex flex-col gap-2">
            {
                props.toasts.iter().map(|toast| html! {
                    <ToastView key={toast.id} toast={toast.clone()} on_dismiss={props.on_dismiss.clone()} />
                }).collect::<Html>()
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ToastViewProps {
    toast: Toast,
    on_dismiss: Callback<u64>,
}

/// A single toast owning its auto-dismiss timer; dropping the handle on
/// unmount cancels the timer, so a dismissed host never fires stale updates.
#[function_component(ToastView)]
fn toast_view(props: &ToastViewProps) -> Html {
    {
        let on_dismiss = props.on_dismiss.clone();
        let id = props.toast.id;
        use_effect_with(id, move |_| {
            let handle = Timeout::new(TOAST_DISMISS_MS, move || on_dismiss.emit(id));
            move || drop(handle)
        });
    }

    let on_click = {
        let on_dismiss = props.on_dismiss.clone();
        let id = props.toast.id;
        Callback::from(move |_: MouseEvent| on_dismiss.emit(id))
    };

    let color = match props.toast.kind {
        ToastKind::Info => "bg-gray-800",
        ToastKind::Error => "bg-red-600",
    };

    html! {
        <div
            onclick={on_click}
            class={classes!(
                "px-4",
                "py-2",
                "rounded-lg",
                "text-white",
                "text-sm",
                "shadow-lg",
                "cursor-pointer",
                color
            )}
        >
            {&props.toast.text}
        </div>
    }
}
