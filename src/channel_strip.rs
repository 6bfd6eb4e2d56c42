use gloo::timers::callback::Timeout;
use yew::prelude::*;

use crate::components::{ActionSheet, Alert, AlertInput, SheetButton};
use crate::gesture::{LongPress, LONG_PRESS_HOLD_MS};
use crate::store::use_app_state;
use crate::types::{channel_initials, Channel};

#[derive(Debug, Clone, PartialEq)]
enum ChannelDialog {
    Create,
    Rename,
    ConfirmDelete,
}

#[derive(Properties, PartialEq)]
pub struct ChannelStripProps {
    pub channels: Vec<Channel>,
    pub selected: Option<Channel>,
    pub on_select: Callback<Channel>,
    pub on_create: Callback<String>,
    pub on_rename: Callback<(Channel, String)>,
    pub on_delete: Callback<String>,
}

/// Horizontal strip of chat room tiles. Tapping a tile selects its room;
/// admins long-press the selected tile for rename/delete and get a trailing
/// "+" tile to create a room. Every destructive or naming action goes
/// through a confirmation dialog.
#[function_component(ChannelStrip)]
pub fn channel_strip(props: &ChannelStripProps) -> Html {
    let state = use_app_state();
    let sheet_open = use_state(|| false);
    let dialog = use_state(|| None::<ChannelDialog>);
    let press = use_mut_ref(|| LongPress::new(LONG_PRESS_HOLD_MS));
    let hold_timer = use_mut_ref(|| None::<Timeout>);

    let mut channels = props.channels.clone();
    channels.sort_by(|a, b| a.create_at.partial_cmp(&b.create_at).unwrap_or(std::cmp::Ordering::Equal));

    let selected_id = props.selected.as_ref().map(|channel| channel.id.clone());

    let on_sheet_select = {
        let sheet_open = sheet_open.clone();
        let dialog = dialog.clone();
        Callback::from(move |value: &'static str| {
            sheet_open.set(false);
            match value {
                "rename" => dialog.set(Some(ChannelDialog::Rename)),
                "delete" => dialog.set(Some(ChannelDialog::ConfirmDelete)),
                _ => {}
            }
        })
    };
    let on_sheet_dismiss = {
        let sheet_open = sheet_open.clone();
        Callback::from(move |_: ()| sheet_open.set(false))
    };

    let tiles = channels
        .iter()
        .map(|channel| {
            let is_selected = selected_id.as_deref() == Some(channel.id.as_str());
            let admin_pressable = is_selected && state.is_loop_admin;

            let onclick = {
                let on_select = props.on_select.clone();
                let channel = channel.clone();
                let selectable = !is_selected;
                Callback::from(move |_: MouseEvent| {
                    if selectable {
                        on_select.emit(channel.clone());
                    }
                })
            };

            let onmousedown = {
                let press = press.clone();
                let hold_timer = hold_timer.clone();
                let sheet_open = sheet_open.clone();
                Callback::from(move |_: MouseEvent| {
                    if !admin_pressable {
                        return;
                    }
                    press.borrow_mut().press(js_sys::Date::now());
                    let press = press.clone();
                    let sheet_open = sheet_open.clone();
                    let timeout = Timeout::new(LONG_PRESS_HOLD_MS as u32, move || {
                        if press.borrow_mut().expire(js_sys::Date::now()) {
                            sheet_open.set(true);
                        }
                    });
                    *hold_timer.borrow_mut() = Some(timeout);
                })
            };
            let onmouseup = {
                let press = press.clone();
                let hold_timer = hold_timer.clone();
                Callback::from(move |_: MouseEvent| {
                    let _ = press.borrow_mut().release(js_sys::Date::now());
                    *hold_timer.borrow_mut() = None;
                })
            };
            let onmouseleave = {
                let press = press.clone();
                let hold_timer = hold_timer.clone();
                Callback::from(move |_: MouseEvent| {
                    press.borrow_mut().cancel();
                    *hold_timer.borrow_mut() = None;
                })
            };

            let ring = if is_selected {
                "ring-2 ring-purple-500"
            } else {
                "ring-1 ring-transparent"
            };
            html! {
                <button
                    key={channel.id.clone()}
                    class="p-2 flex flex-col items-center group"
                    {onclick}
                    {onmousedown}
                    {onmouseup}
                    {onmouseleave}
                >
                    <div class={classes!(
                        "relative",
                        "font-bold",
                        "w-12",
                        "h-12",
                        "rounded-full",
                        "bg-purple-100",
                        "flex",
                        "items-center",
                        "justify-center",
                        "transition-colors",
                        ring
                    )}>
                        <span>{channel_initials(&channel.display_name)}</span>
                        if is_selected && state.is_loop_admin {
                            <div class="absolute bottom-0 right-0 bg-gray-200 z-10 w-5 h-5 rounded-full -m-1 flex justify-center items-center text-xs">
                                {"\u{2699}"}
                            </div>
                        }
                    </div>
                    <div class={classes!(
                        "text-xs",
                        "text-center",
                        "truncate",
                        "max-w-[3.5rem]",
                        is_selected.then_some("font-bold")
                    )}>
                        {&channel.display_name}
                    </div>
                </button>
            }
        })
        .collect::<Html>();

    let create_tile = if state.is_loop_admin {
        let dialog = dialog.clone();
        let onclick = Callback::from(move |_: MouseEvent| dialog.set(Some(ChannelDialog::Create)));
        html! {
            <div key="plus" class="p-2 me-4 flex shrink-0">
                <button
                    {onclick}
                    class="font-bold w-12 h-12 rounded-full bg-gray-200 hover:bg-purple-200 flex items-center justify-center text-2xl"
                >
                    {"+"}
                </button>
            </div>
        }
    } else {
        html! {}
    };

    let dialog_view = match &*dialog {
        Some(ChannelDialog::Create) => {
            let on_confirm = {
                let on_create = props.on_create.clone();
                let dialog = dialog.clone();
                Callback::from(move |name: String| {
                    dialog.set(None);
                    let name = name.trim().to_string();
                    if !name.is_empty() {
                        on_create.emit(name);
                    }
                })
            };
            let on_cancel = {
                let dialog = dialog.clone();
                Callback::from(move |_: ()| dialog.set(None))
            };
            html! {
                <Alert
                    open=true
                    header="Create a chat room"
                    confirm_label="Create"
                    input={AlertInput {
                        placeholder: "Name".to_string(),
                        value: String::new(),
                        multiline: false,
                    }}
                    {on_confirm}
                    {on_cancel}
                />
            }
        }
        Some(ChannelDialog::Rename) => {
            let current_name = props
                .selected
                .as_ref()
                .map(|channel| channel.display_name.clone())
                .unwrap_or_default();
            let on_confirm = {
                let on_rename = props.on_rename.clone();
                let selected = props.selected.clone();
                let dialog = dialog.clone();
                Callback::from(move |name: String| {
                    dialog.set(None);
                    let name = name.trim().to_string();
                    if let (Some(channel), false) = (selected.clone(), name.is_empty()) {
                        on_rename.emit((channel, name));
                    }
                })
            };
            let on_cancel = {
                let dialog = dialog.clone();
                Callback::from(move |_: ()| dialog.set(None))
            };
            html! {
                <Alert
                    open=true
                    header="Rename chat room?"
                    confirm_label="Save"
                    input={AlertInput {
                        placeholder: current_name.clone(),
                        value: current_name,
                        multiline: false,
                    }}
                    {on_confirm}
                    {on_cancel}
                />
            }
        }
        Some(ChannelDialog::ConfirmDelete) => {
            let on_confirm = {
                let on_delete = props.on_delete.clone();
                let selected = props.selected.clone();
                let dialog = dialog.clone();
                Callback::from(move |_: String| {
                    dialog.set(None);
                    if let Some(channel) = &selected {
                        on_delete.emit(channel.id.clone());
                    }
                })
            };
            let on_cancel = {
                let dialog = dialog.clone();
                Callback::from(move |_: ()| dialog.set(None))
            };
            html! {
                <Alert
                    open=true
                    header="Delete chat room?"
                    confirm_label="Delete"
                    destructive=true
                    {on_confirm}
                    {on_cancel}
                />
            }
        }
        None => html! {},
    };

    html! {
        <div class="shrink-0 w-full flex px-2 gap-1 overflow-x-auto bg-purple-50">
            {tiles}
            {create_tile}
            <ActionSheet
                open={*sheet_open}
                header={Some("Chat room options".to_string())}
                buttons={vec![
                    SheetButton::new("Rename", "rename"),
                    SheetButton::destructive("Delete", "delete"),
                    SheetButton::cancel(),
                ]}
                on_select={on_sheet_select}
                on_dismiss={on_sheet_dismiss}
            />
            {dialog_view}
        </div>
    }
}
