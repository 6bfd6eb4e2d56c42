use web_sys::{File, HtmlInputElement, HtmlTextAreaElement, KeyboardEvent};
use yew::prelude::*;

use crate::store::{use_app_state, ToastKind};

#[derive(Properties, PartialEq)]
pub struct ComposerProps {
    pub on_send_message: Callback<String>,
    /// Uploads the attached file to the channel file store; the continuation
    /// receives the file id, or `None` on failure.
    pub on_upload_file: Callback<(File, Callback<Option<String>>)>,
    pub on_send_message_with_image: Callback<(String, String)>,
}

/// Message composer: textarea with Enter-to-send (Shift+Enter for a new
/// line) and an image attach button. With a file attached the send becomes
/// upload-then-send; a failed upload drops the send and surfaces a toast,
/// leaving resubmission to the user.
#[function_component(Composer)]
pub fn composer(props: &ComposerProps) -> Html {
    let state = use_app_state();
    let draft = use_state(String::new);
    let pending_file = use_state(|| None::<File>);
    let file_input_ref = use_node_ref();

    let send = {
        let draft = draft.clone();
        let pending_file = pending_file.clone();
        let on_send_message = props.on_send_message.clone();
        let on_upload_file = props.on_upload_file.clone();
        let on_send_message_with_image = props.on_send_message_with_image.clone();
        let notify = state.notify.clone();
        Callback::from(move |_: ()| {
            let text = (*draft).trim().to_string();
            if text.is_empty() {
                return;
            }
            match (*pending_file).clone() {
                Some(file) => {
                    let on_send_message_with_image = on_send_message_with_image.clone();
                    let notify = notify.clone();
                    let text_for_send = text.clone();
                    on_upload_file.emit((
                        file,
                        Callback::from(move |file_id: Option<String>| match file_id {
                            Some(file_id) => {
                                on_send_message_with_image.emit((text_for_send.clone(), file_id));
                            }
                            None => {
                                log::warn!("attachment upload failed; message not sent");
                                notify.emit((
                                    ToastKind::Error,
                                    "Image upload failed. Please try again.".to_string(),
                                ));
                            }
                        }),
                    ));
                }
                None => on_send_message.emit(text),
            }
            draft.set(String::new());
            pending_file.set(None);
        })
    };

    let on_input = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(textarea) = e.target_dyn_into::<HtmlTextAreaElement>() {
                draft.set(textarea.value());
            }
        })
    };

    let on_keydown = {
        let send = send.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" && !e.shift_key() {
                e.prevent_default();
                send.emit(());
            }
        })
    };

    let on_send_click = {
        let send = send.clone();
        Callback::from(move |_: MouseEvent| send.emit(()))
    };

    let on_attach_click = {
        let file_input_ref = file_input_ref.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(input) = file_input_ref.cast::<HtmlInputElement>() {
                input.click();
            }
        })
    };

    let on_file_change = {
        let pending_file = pending_file.clone();
        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let file = input.files().and_then(|files| files.get(0));
            pending_file.set(file);
            input.set_value("");
        })
    };

    let attachment_chip = if let Some(file) = &*pending_file {
        let on_clear = {
            let pending_file = pending_file.clone();
            Callback::from(move |_: MouseEvent| pending_file.set(None))
        };
        html! {
            <div class="flex items-center gap-1 px-2 py-1 text-xs bg-gray-100 rounded">
                <span class="truncate max-w-[12rem]">{file.name()}</span>
                <button onclick={on_clear} class="text-gray-500 hover:text-gray-800">{"\u{00D7}"}</button>
            </div>
        }
    } else {
        html! {}
    };

    html! {
        <div class="p-2 border-t border-gray-300">
            {attachment_chip}
            <div class="flex items-end gap-2">
                <button
                    onclick={on_attach_click}
                    class="px-3 py-2 rounded-lg text-sm bg-gray-100 hover:bg-gray-200"
                    title="Attach image"
                >
                    {"\u{1F4CE}"}
                </button>
                <input
                    type="file"
                    accept="image/*"
                    ref={file_input_ref}
                    onchange={on_file_change}
                    class="hidden"
                />
                <textarea
                    value={(*draft).clone()}
                    oninput={on_input}
                    onkeydown={on_keydown}
                    placeholder="Type a message... (Shift+Enter for new line)"
                    class="flex-1 px-3 py-2 border border-gray-300 rounded-lg text-sm resize-none focus:outline-none focus:ring-2 focus:ring-blue-500"
                    rows="2"
                />
                <button
                    onclick={on_send_click}
                    class="px-4 py-2 bg-blue-500 text-white rounded-lg text-sm font-medium hover:bg-blue-600 transition-colors"
                >
                    {"Send"}
                </button>
            </div>
        </div>
    }
}
