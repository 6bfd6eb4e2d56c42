use std::collections::HashMap;
use std::rc::Rc;

use gloo::timers::callback::Timeout;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::store::use_app_state;
use crate::types::{is_redacted, User};
use crate::user_card::UserCard;

/// Quiet period before an edited admin note is persisted.
pub const NOTE_AUTOSAVE_MS: u32 = 1300;

#[derive(Properties, PartialEq)]
pub struct MemberDetailProps {
    pub member: User,
    /// Saved admin note for this member, the seed for the editor.
    #[prop_or_default]
    pub note: String,
    pub on_save_note: Callback<(String, String)>,
    pub on_set_warden: Callback<(String, bool)>,
    pub on_back: Callback<()>,
}

/// Member page: the contact card plus host-only controls. Note edits autosave
/// after a quiet period; the pending save is dropped at unmount.
#[function_component(MemberDetail)]
pub fn member_detail(props: &MemberDetailProps) -> Html {
    let state = use_app_state();
    let note = use_state(|| props.note.clone());
    let saved = use_state(|| false);
    let save_timer = use_mut_ref(|| None::<Timeout>);

    // Re-seed the editor when switching members.
    {
        let note = note.clone();
        let saved = saved.clone();
        let seed = props.note.clone();
        use_effect_with(props.member.uid.clone(), move |_| {
            note.set(seed);
            saved.set(false);
        });
    }

    let on_note_input = {
        let note = note.clone();
        let saved = saved.clone();
        let save_timer = save_timer.clone();
        let on_save_note = props.on_save_note.clone();
        let member_uid = props.member.uid.clone();
        Callback::from(move |e: InputEvent| {
            let Some(area) = e.target_dyn_into::<HtmlTextAreaElement>() else {
                return;
            };
            let value = area.value();
            note.set(value.clone());
            saved.set(false);

            let saved = saved.clone();
            let on_save_note = on_save_note.clone();
            let member_uid = member_uid.clone();
            // Each keystroke replaces (and thereby cancels) the previous
            // pending save.
            let timeout = Timeout::new(NOTE_AUTOSAVE_MS, move || {
                on_save_note.emit((member_uid.clone(), value.clone()));
                saved.set(true);
            });
            *save_timer.borrow_mut() = Some(timeout);
        })
    };

    let warden_toggle = if state.is_loop_admin && !props.member.is_admin_of(&state.active_loop.uid)
    {
        let is_warden = props.member.is_warden_of(&state.active_loop.uid);
        let on_change = {
            let on_set_warden = props.on_set_warden.clone();
            let member_uid = props.member.uid.clone();
            Callback::from(move |e: Event| {
                if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                    on_set_warden.emit((member_uid.clone(), input.checked()));
                }
            })
        };
        html! {
            <label class="flex items-center gap-2 text-sm">
                <input type="checkbox" checked={is_warden} onchange={on_change} />
                {"Warden of this loop"}
            </label>
        }
    } else {
        html! {}
    };

    let on_back_click = {
        let on_back = props.on_back.clone();
        Callback::from(move |_: MouseEvent| on_back.emit(()))
    };

    html! {
        <div class="p-4 space-y-4 max-w-lg mx-auto">
            <button onclick={on_back_click} class="text-sm text-blue-600 hover:underline">
                {"\u{2190} All members"}
            </button>
            <UserCard user={props.member.clone()} />
            if state.is_loop_admin {
                <div class="space-y-1">
                    <div class="flex items-center gap-2 text-sm text-gray-600">
                        {"Host note"}
                        if *saved {
                            <span class="text-green-600" title="Saved">{"\u{2713}"}</span>
                        }
                    </div>
                    <textarea
                        value={(*note).clone()}
                        oninput={on_note_input}
                        placeholder="Notes about this member (only hosts see this)"
                        class="w-full px-2 py-1 border border-gray-300 rounded text-sm"
                        rows="3"
                    />
                </div>
                {warden_toggle}
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct MemberDirectoryProps {
    /// Admin notes keyed by member uid.
    #[prop_or_default]
    pub notes: Rc<HashMap<String, String>>,
    pub on_save_note: Callback<(String, String)>,
    pub on_set_warden: Callback<(String, bool)>,
}

/// Member list for the active loop; selecting an entry opens its detail page.
#[function_component(MemberDirectory)]
pub fn member_directory(props: &MemberDirectoryProps) -> Html {
    let state = use_app_state();
    let selected_uid = use_state(|| None::<String>);

    if let Some(uid) = &*selected_uid {
        if let Some(member) = state.member(uid) {
            let on_back = {
                let selected_uid = selected_uid.clone();
                Callback::from(move |_: ()| selected_uid.set(None))
            };
            return html! {
                <MemberDetail
                    member={member.clone()}
                    note={props.notes.get(uid).cloned().unwrap_or_default()}
                    on_save_note={props.on_save_note.clone()}
                    on_set_warden={props.on_set_warden.clone()}
                    {on_back}
                />
            };
        }
    }

    let rows = state
        .members
        .iter()
        .map(|member| {
            let onclick = {
                let selected_uid = selected_uid.clone();
                let uid = member.uid.clone();
                Callback::from(move |_: MouseEvent| selected_uid.set(Some(uid.clone())))
            };
            html! {
                <button
                    key={member.uid.clone()}
                    {onclick}
                    class="w-full flex items-center justify-between px-3 py-2 bg-white rounded-lg shadow-sm hover:bg-purple-50 text-left"
                >
                    <span class="text-sm font-medium">
                        {&member.name}
                        if member.is_admin_of(&state.active_loop.uid) {
                            {" \u{1F6E1}"}
                        }
                    </span>
                    if !is_redacted(&member.address) {
                        <span class="text-xs text-gray-500 truncate max-w-[12rem]">
                            {&member.address}
                        </span>
                    }
                </button>
            }
        })
        .collect::<Html>();

    html! {
        <div class="p-4 space-y-2 max-w-lg mx-auto">
            <h2 class="text-base font-semibold">{format!("{} members", state.members.len())}</h2>
            {rows}
        </div>
    }
}
