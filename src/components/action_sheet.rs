use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonRole {
    Default,
    Destructive,
    Cancel,
}

/// One entry in an action sheet. `value` is what `on_select` reports.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetButton {
    pub label: String,
    pub value: &'static str,
    pub role: ButtonRole,
}

impl SheetButton {
    pub fn new(label: &str, value: &'static str) -> Self {
        Self {
            label: label.to_string(),
            value,
            role: ButtonRole::Default,
        }
    }

    pub fn destructive(label: &str, value: &'static str) -> Self {
        Self {
            label: label.to_string(),
            value,
            role: ButtonRole::Destructive,
        }
    }

    pub fn cancel() -> Self {
        Self {
            label: "Cancel".to_string(),
            value: "cancel",
            role: ButtonRole::Cancel,
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct ActionSheetProps {
    pub open: bool,
    #[prop_or_default]
    pub header: Option<String>,
    pub buttons: Vec<SheetButton>,
    /// Reports the `value` of the chosen button. Cancel-role buttons and
    /// backdrop taps go to `on_dismiss` instead.
    pub on_select: Callback<&'static str>,
    pub on_dismiss: Callback<()>,
}

/// Bottom action sheet with a dimmed backdrop, the contextual menu used for
/// post and channel actions.
#[function_component(ActionSheet)]
pub fn action_sheet(props: &ActionSheetProps) -> Html {
    if !props.open {
        return html! {};
    }

    let on_backdrop = {
        let on_dismiss = props.on_dismiss.clone();
        Callback::from(move |_: MouseEvent| on_dismiss.emit(()))
    };

    html! {
        <div class="fixed inset-0 z-40 flex flex-col justify-end">
            <div class="absolute inset-0 bg-black/40" onclick={on_backdrop} />
            <div class="relative bg-white rounded-t-2xl p-2 shadow-lg">
                if let Some(header) = &props.header {
                    <div class="px-4 py-2 text-sm text-gray-500">{header}</div>
                }
                {
                    props.buttons.iter().map(|button| {
                        let on_select = props.on_select.clone();
                        let on_dismiss = props.on_dismiss.clone();
                        let role = button.role;
                        let value = button.value;
                        let onclick = Callback::from(move |_: MouseEvent| {
                            if role == ButtonRole::Cancel {
                                on_dismiss.emit(());
                            } else {
                                on_select.emit(value);
                            }
                        });
                        let color = match button.role {
                            ButtonRole::Destructive => "text-red-600",
                            ButtonRole::Cancel => "text-gray-500",
                            ButtonRole::Default => "text-gray-900",
                        };
                        html! {
                            <button
                                key={button.value}
                                {onclick}
                                class={classes!(
                                    "w-full",
                                    "px-4",
                                    "py-3",
                                    "text-left",
                                    "rounded-lg",
                                    "hover:bg-gray-100",
                                    color
                                )}
                            >
                                {&button.label}
                            </button>
                        }
                    }).collect::<Html>()
                }
            </div>
        </div>
    }
}
