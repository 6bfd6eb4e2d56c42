use std::cell::RefCell;
use std::rc::Rc;

use gloo::file::callbacks::{read_as_data_url, FileReader};
use gloo::timers::callback::Timeout;
use web_sys::{File, HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::store::{use_app_state, ToastKind};
use crate::types::{join_bulky, BulkyItem};
use crate::upload::{
    data_url_to_base64, reconcile_dual_upload, validate_bulky, BulkyField, DualUpload, UploadPhase,
    SUCCESS_RESET_MS,
};

/// Preview path convention for files already stored by the channel file
/// store, used to prefill the image card when editing an existing item.
fn attachment_preview_url(file_id: &str) -> String {
    if file_id.is_empty() {
        String::new()
    } else {
        format!("/files/{}/preview", file_id)
    }
}

#[derive(Properties, PartialEq)]
pub struct BulkyModalProps {
    pub open: bool,
    /// Some: editing an existing item (prefilled). None: creating a new one.
    #[prop_or_default]
    pub edit: Option<BulkyItem>,
    pub on_dismiss: Callback<()>,
    /// Uploads a base64 image to the external hosting service; answers the
    /// public preview URL.
    pub on_host_image: Callback<(String, Callback<Result<String, String>>)>,
    /// Uploads the local file to the channel file store; answers the durable
    /// attachment id. Create-only: together with `on_host_image` this is the
    /// deliberate dual-write described in the design notes.
    pub on_upload_file: Callback<(File, Callback<Option<String>>)>,
    /// (message body, attachment file id)
    pub on_send_bulky: Callback<(String, String)>,
    /// (post id, message body)
    pub on_update_bulky: Callback<(String, String)>,
}

fn schedule_success_reset(
    phase: &UseStateHandle<UploadPhase>,
    reset_timer: &Rc<RefCell<Option<Timeout>>>,
) {
    let phase = phase.clone();
    let timeout = Timeout::new(SUCCESS_RESET_MS, move || phase.set(UploadPhase::Idle));
    // Replacing (or dropping at unmount) cancels the previous timer, so the
    // reset can never touch a component that is gone.
    *reset_timer.borrow_mut() = Some(timeout);
}

/// Modal form creating or editing a bulky item: title, description and an
/// image that goes through local read -> host upload -> preview URL before
/// the form may be submitted.
#[function_component(BulkyModal)]
pub fn bulky_modal(props: &BulkyModalProps) -> Html {
    let state = use_app_state();
    let title = use_state(String::new);
    let description = use_state(String::new);
    let image_url = use_state(String::new);
    let error = use_state(|| None::<BulkyField>);
    let phase = use_state(UploadPhase::default);
    let local_file = use_state(|| None::<File>);
    let file_input_ref = use_node_ref();
    let reader = use_mut_ref(|| None::<FileReader>);
    let reset_timer = use_mut_ref(|| None::<Timeout>);

    // Re-seed the form whenever the modal opens.
    {
        let title = title.clone();
        let description = description.clone();
        let image_url = image_url.clone();
        let error = error.clone();
        let phase = phase.clone();
        let local_file = local_file.clone();
        use_effect_with((props.open, props.edit.clone()), move |(open, edit)| {
            if !*open {
                return;
            }
            match edit {
                Some(item) => {
                    title.set(item.title.clone());
                    description.set(item.message.clone());
                    image_url.set(attachment_preview_url(&item.file_id));
                }
                None => {
                    title.set(String::new());
                    description.set(String::new());
                    image_url.set(String::new());
                }
            }
            local_file.set(None);
            error.set(None);
            phase.set(UploadPhase::Idle);
        });
    }

    if !props.open {
        return html! {};
    }

    let on_pick_image = {
        let file_input_ref = file_input_ref.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(input) = file_input_ref.cast::<HtmlInputElement>() {
                input.click();
            }
        })
    };

    let on_file_change = {
        let local_file = local_file.clone();
        let image_url = image_url.clone();
        let phase = phase.clone();
        let reader = reader.clone();
        let reset_timer = reset_timer.clone();
        let on_host_image = props.on_host_image.clone();
        let notify = state.notify.clone();
        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            input.set_value("");
            local_file.set(Some(file.clone()));
            phase.set(UploadPhase::Loading);

            let image_url = image_url.clone();
            let phase = phase.clone();
            let reset_timer = reset_timer.clone();
            let on_host_image = on_host_image.clone();
            let notify = notify.clone();
            let handle = read_as_data_url(&gloo::file::File::from(file), move |result| {
                match result {
                    Ok(data_url) => {
                        let base64 = data_url_to_base64(&data_url).to_string();
                        on_host_image.emit((
                            base64,
                            Callback::from(move |hosted: Result<String, String>| match hosted {
                                Ok(url) => {
                                    image_url.set(url);
                                    phase.set(UploadPhase::Success);
                                    schedule_success_reset(&phase, &reset_timer);
                                }
                                Err(err) => {
                                    log::error!("image host upload failed: {err}");
                                    notify.emit((
                                        ToastKind::Error,
                                        "Image upload failed.".to_string(),
                                    ));
                                    phase.set(UploadPhase::Error);
                                }
                            }),
                        ));
                    }
                    Err(err) => {
                        log::error!("could not read image file: {err}");
                        notify.emit((ToastKind::Error, "Could not read that file.".to_string()));
                        phase.set(UploadPhase::Error);
                    }
                }
            });
            // Holding the handle keeps the read alive; dropping it at
            // unmount aborts the read.
            *reader.borrow_mut() = Some(handle);
        })
    };

    let close = {
        let on_dismiss = props.on_dismiss.clone();
        let title = title.clone();
        let description = description.clone();
        let image_url = image_url.clone();
        let local_file = local_file.clone();
        let error = error.clone();
        let phase = phase.clone();
        Callback::from(move |_: ()| {
            title.set(String::new());
            description.set(String::new());
            image_url.set(String::new());
            local_file.set(None);
            error.set(None);
            phase.set(UploadPhase::Idle);
            on_dismiss.emit(());
        })
    };

    let on_cancel = {
        let close = close.clone();
        Callback::from(move |_: MouseEvent| close.emit(()))
    };

    let on_save = {
        let title = title.clone();
        let description = description.clone();
        let image_url = image_url.clone();
        let error = error.clone();
        let local_file = local_file.clone();
        let edit = props.edit.clone();
        let on_upload_file = props.on_upload_file.clone();
        let on_send_bulky = props.on_send_bulky.clone();
        let on_update_bulky = props.on_update_bulky.clone();
        let notify = state.notify.clone();
        let close = close.clone();
        Callback::from(move |_: MouseEvent| {
            if let Err(field) = validate_bulky(&title, &description, &image_url) {
                error.set(Some(field));
                return;
            }
            error.set(None);
            let body = join_bulky(title.trim(), description.trim());

            match &edit {
                Some(item) => {
                    if item.post_id.is_empty() || item.file_id.is_empty() {
                        return;
                    }
                    on_update_bulky.emit((item.post_id.clone(), body));
                }
                None => {
                    let Some(file) = (*local_file).clone() else {
                        notify.emit((
                            ToastKind::Error,
                            "Please choose an image first.".to_string(),
                        ));
                        return;
                    };
                    let preview = (*image_url).clone();
                    let on_send_bulky = on_send_bulky.clone();
                    let notify = notify.clone();
                    on_upload_file.emit((
                        file,
                        Callback::from(move |file_id: Option<String>| {
                            match reconcile_dual_upload(Some(&preview), file_id.as_deref()) {
                                DualUpload::Complete => {
                                    if let Some(file_id) = file_id.clone() {
                                        on_send_bulky.emit((body.clone(), file_id));
                                    }
                                }
                                outcome => {
                                    // The hosted preview is disposable: drop
                                    // it and abort the send.
                                    log::warn!("bulky dual upload incomplete: {:?}", outcome);
                                    notify.emit((
                                        ToastKind::Error,
                                        "Image upload failed. The item was not posted.".to_string(),
                                    ));
                                }
                            }
                        }),
                    ));
                }
            }
            close.emit(());
        })
    };

    let on_title_input = {
        let title = title.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                title.set(input.value());
            }
        })
    };
    let on_description_input = {
        let description = description.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(area) = e.target_dyn_into::<HtmlTextAreaElement>() {
                description.set(area.value());
            }
        })
    };

    let field_class = |field: BulkyField| {
        if *error == Some(field) {
            "w-full px-2 py-1 border border-red-500 rounded text-sm"
        } else {
            "w-full px-2 py-1 border border-gray-300 rounded text-sm"
        }
    };

    let image_area = if !phase.is_loading() && !image_url.is_empty() {
        html! {
            <div
                onclick={on_pick_image.clone()}
                class="my-4 mx-8 border border-blue-300 rounded-lg cursor-pointer overflow-hidden"
            >
                <img src={(*image_url).clone()} alt="preview" class="max-w-full" />
            </div>
        }
    } else {
        html! {
            <div class="w-full h-40 flex justify-center items-center">
                <div
                    onclick={on_pick_image.clone()}
                    class={classes!(
                        "border",
                        "rounded-lg",
                        "w-32",
                        "h-32",
                        "flex",
                        "justify-center",
                        "items-center",
                        "cursor-pointer",
                        "text-3xl",
                        if phase.is_loading() { "border-gray-300 text-gray-300" } else { "border-blue-300 text-gray-400" }
                    )}
                >
                    {if phase.is_loading() { "\u{23F3}" } else { "\u{1F5BC}" }}
                </div>
            </div>
        }
    };

    let header = if props.edit.is_some() {
        "Update bulky item"
    } else {
        "Create bulky item"
    };

    html! {
        <div class="fixed inset-0 z-50 flex items-center justify-center">
            <div class="absolute inset-0 bg-black/40" />
            <div class="relative bg-white rounded-xl w-[28rem] max-h-[90vh] overflow-y-auto shadow-xl">
                <div class="flex items-center justify-between px-4 py-3 border-b border-gray-200">
                    <button onclick={on_cancel} class="text-sm text-gray-600 hover:text-gray-900">
                        {"Cancel"}
                    </button>
                    <h3 class="text-base font-semibold">{header}</h3>
                    <button
                        onclick={on_save}
                        class={classes!(
                            "text-sm",
                            "font-medium",
                            if error.is_some() { "text-red-600" } else { "text-blue-600" }
                        )}
                    >
                        {"Save"}
                    </button>
                </div>
                <div class="p-4 space-y-3">
                    <label class="block text-sm">
                        <span class="text-gray-600">{"Title"}</span>
                        <input
                            type="text"
                            value={(*title).clone()}
                            oninput={on_title_input}
                            class={field_class(BulkyField::Title)}
                        />
                    </label>
                    <label class="block text-sm">
                        <span class="text-gray-600">{"Description"}</span>
                        <textarea
                            value={(*description).clone()}
                            oninput={on_description_input}
                            class={field_class(BulkyField::Description)}
                            rows="4"
                        />
                    </label>
                    <div class={classes!(
                        "text-sm",
                        (*error == Some(BulkyField::ImageUrl)).then_some("text-red-600")
                    )}>
                        {"Image"}
                    </div>
                    {image_area}
                    <button
                        onclick={on_pick_image}
                        class={classes!(
                            "w-full",
                            "px-4",
                            "py-2",
                            "rounded-lg",
                            "text-sm",
                            "font-medium",
                            "text-white",
                            phase.button_class()
                        )}
                    >
                        {phase.label()}
                    </button>
                    <input
                        type="file"
                        accept="image/*"
                        ref={file_input_ref}
                        onchange={on_file_change}
                        class="hidden"
                    />
                </div>
            </div>
        </div>
    }
}
