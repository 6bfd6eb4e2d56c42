use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::timers::callback::Timeout;
use yew::prelude::*;

use crate::components::{ActionSheet, Alert, AlertInput, SheetButton};
use crate::gesture::{LongPress, LONG_PRESS_HOLD_MS};
use crate::store::use_app_state;
use crate::types::{
    is_expandable, resolve_author, split_bulky, BulkyItem, Post, UserProfile, EXPAND_CHAR_LIMIT,
    EXPAND_LINE_LIMIT,
};

/// What a selection in the post action sheet leads to. Delete and report go
/// through a confirmation step first; nothing reaches the parent callbacks
/// until that step is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SheetOutcome {
    ConfirmDelete,
    ConfirmReport,
    EditBulky,
    None,
}

fn selection_outcome(value: &str) -> SheetOutcome {
    match value {
        "delete" => SheetOutcome::ConfirmDelete,
        "report" => SheetOutcome::ConfirmReport,
        "edit" => SheetOutcome::EditBulky,
        _ => SheetOutcome::None,
    }
}

/// Context actions offered for a post: owners may delete, everyone else may
/// report, and privileged viewers may edit a bulky item.
fn post_actions(is_me: bool, can_edit: bool) -> Vec<SheetButton> {
    let mut buttons = Vec::new();
    if is_me {
        buttons.push(SheetButton::destructive("Delete", "delete"));
    } else {
        buttons.push(SheetButton::destructive("Report", "report"));
    }
    if can_edit {
        buttons.push(SheetButton::new("Edit", "edit"));
    }
    buttons.push(SheetButton::cancel());
    buttons
}

/// Clipped body shown while a long message is collapsed.
fn collapsed_preview(message: &str) -> String {
    let clipped_lines: Vec<&str> = message.lines().take(EXPAND_LINE_LIMIT).collect();
    let mut preview = clipped_lines.join("\n");
    if preview.chars().count() > EXPAND_CHAR_LIMIT {
        preview = preview.chars().take(EXPAND_CHAR_LIMIT).collect();
    }
    preview.push('\u{2026}');
    preview
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PostConfirm {
    Delete,
    Report,
}

#[derive(Properties, PartialEq)]
pub struct PostViewProps {
    pub post: Post,
    pub get_profile: Callback<(String, Callback<Option<UserProfile>>)>,
    pub get_file: Callback<(String, f64, Callback<Option<String>>)>,
    pub on_delete_post: Callback<String>,
    pub on_report_post: Callback<(String, String)>,
    pub on_edit_bulky: Callback<BulkyItem>,
}

fn start_press(
    press: &Rc<RefCell<LongPress>>,
    hold_timer: &Rc<RefCell<Option<Timeout>>>,
    sheet_open: &UseStateHandle<bool>,
) {
    press.borrow_mut().press(js_sys::Date::now());
    let press = press.clone();
    let sheet_open = sheet_open.clone();
    let timeout = Timeout::new(LONG_PRESS_HOLD_MS as u32, move || {
        if press.borrow_mut().expire(js_sys::Date::now()) {
            sheet_open.set(true);
        }
    });
    *hold_timer.borrow_mut() = Some(timeout);
}

fn end_press(press: &Rc<RefCell<LongPress>>, hold_timer: &Rc<RefCell<Option<Timeout>>>) {
    let _ = press.borrow_mut().release(js_sys::Date::now());
    // Dropping the handle cancels the pending timer.
    *hold_timer.borrow_mut() = None;
}

#[function_component(PostView)]
pub fn post_view(props: &PostViewProps) -> Html {
    // Service messages render as a centered notice with no interaction.
    if props.post.is_system() {
        return html! {
            <div class="shrink-0 text-center text-xs text-gray-500 py-2 whitespace-pre-wrap">
                {&props.post.message}
            </div>
        };
    }

    let state = use_app_state();
    let sheet_open = use_state(|| false);
    let confirm = use_state(|| None::<PostConfirm>);
    let expanded = use_state(|| false);
    let fetched_author = use_state(|| None::<String>);
    let image_url = use_state(|| None::<String>);
    let press = use_mut_ref(|| LongPress::new(LONG_PRESS_HOLD_MS));
    let hold_timer = use_mut_ref(|| None::<Timeout>);

    let resolved = resolve_author(&state.members, &props.post);

    // Fallback profile lookup for authors outside the member list. The
    // liveness flag stops the continuation from touching state after the
    // component is gone.
    {
        let fetched_author = fetched_author.clone();
        let get_profile = props.get_profile.clone();
        let user_id = props.post.user_id.clone();
        let needs_lookup = resolved.is_empty() && !props.post.user_id.is_empty();
        use_effect_with(user_id.clone(), move |_| {
            let alive = Rc::new(Cell::new(true));
            if needs_lookup {
                let alive = alive.clone();
                get_profile.emit((
                    user_id,
                    Callback::from(move |profile: Option<UserProfile>| {
                        if !alive.get() {
                            return;
                        }
                        if let Some(profile) = profile {
                            fetched_author.set(Some(profile.username));
                        }
                    }),
                ));
            }
            move || alive.set(false)
        });
    }

    // Resolve the first attachment to an image URL; a failed lookup just
    // leaves the attachment area empty.
    {
        let image_url = image_url.clone();
        let get_file = props.get_file.clone();
        let file_id = props.post.first_file_id().map(str::to_string);
        let timestamp = props.post.create_at;
        use_effect_with(file_id, move |file_id| {
            let alive = Rc::new(Cell::new(true));
            if let Some(file_id) = file_id.clone() {
                let alive = alive.clone();
                get_file.emit((
                    file_id,
                    timestamp,
                    Callback::from(move |url: Option<String>| {
                        if alive.get() {
                            image_url.set(url);
                        }
                    }),
                ));
            }
            move || alive.set(false)
        });
    }

    let author = (*fetched_author)
        .clone()
        .unwrap_or(resolved);
    let is_me = props.post.user_id == state.auth_user.uid;
    let can_edit = props.post.is_bulky() && state.is_loop_admin;

    let on_sheet_select = {
        let sheet_open = sheet_open.clone();
        let confirm = confirm.clone();
        let on_edit_bulky = props.on_edit_bulky.clone();
        let post = props.post.clone();
        Callback::from(move |value: &'static str| {
            sheet_open.set(false);
            match selection_outcome(value) {
                SheetOutcome::ConfirmDelete => confirm.set(Some(PostConfirm::Delete)),
                SheetOutcome::ConfirmReport => confirm.set(Some(PostConfirm::Report)),
                SheetOutcome::EditBulky => {
                    let (title, message) = split_bulky(&post.message);
                    on_edit_bulky.emit(BulkyItem {
                        post_id: post.id.clone(),
                        title,
                        message,
                        file_id: post.first_file_id().unwrap_or_default().to_string(),
                    });
                }
                SheetOutcome::None => {}
            }
        })
    };

    let on_sheet_dismiss = {
        let sheet_open = sheet_open.clone();
        Callback::from(move |_: ()| sheet_open.set(false))
    };

    let onmousedown = {
        let press = press.clone();
        let hold_timer = hold_timer.clone();
        let sheet_open = sheet_open.clone();
        Callback::from(move |_: MouseEvent| start_press(&press, &hold_timer, &sheet_open))
    };
    let onmouseup = {
        let press = press.clone();
        let hold_timer = hold_timer.clone();
        Callback::from(move |_: MouseEvent| end_press(&press, &hold_timer))
    };
    let onmouseleave = {
        let press = press.clone();
        let hold_timer = hold_timer.clone();
        Callback::from(move |_: MouseEvent| {
            press.borrow_mut().cancel();
            *hold_timer.borrow_mut() = None;
        })
    };
    let ontouchstart = {
        let press = press.clone();
        let hold_timer = hold_timer.clone();
        let sheet_open = sheet_open.clone();
        Callback::from(move |_: TouchEvent| start_press(&press, &hold_timer, &sheet_open))
    };
    let ontouchend = {
        let press = press.clone();
        let hold_timer = hold_timer.clone();
        Callback::from(move |_: TouchEvent| end_press(&press, &hold_timer))
    };

    let open_sheet_button = if state.is_loop_admin {
        let sheet_open = sheet_open.clone();
        let onclick = Callback::from(move |_: MouseEvent| sheet_open.set(true));
        html! {
            <button {onclick} class="text-gray-400 hover:text-gray-600 px-1" title="Actions">
                {"\u{22EF}"}
            </button>
        }
    } else {
        html! {}
    };

    let expandable = is_expandable(&props.post.message);
    let body = if props.post.is_bulky() {
        let (title, description) = split_bulky(&props.post.message);
        html! {
            <div>
                <div class="font-semibold">{title}</div>
                if let Some(url) = (*image_url).clone() {
                    <img src={url} alt="bulky item" class="max-w-full rounded-lg my-1" />
                }
                <div class="whitespace-pre-wrap">{description}</div>
            </div>
        }
    } else if expandable && !*expanded {
        let on_read_more = {
            let expanded = expanded.clone();
            Callback::from(move |e: MouseEvent| {
                e.stop_propagation();
                expanded.set(true);
            })
        };
        html! {
            <div>
                <div class="whitespace-pre-wrap">{collapsed_preview(&props.post.message)}</div>
                <button onclick={on_read_more} class="text-blue-500 text-sm mt-1">
                    {"Read more"}
                </button>
            </div>
        }
    } else {
        html! { <div class="whitespace-pre-wrap">{&props.post.message}</div> }
    };

    let expanded_modal = if *expanded {
        let on_close = {
            let expanded = expanded.clone();
            Callback::from(move |_: MouseEvent| expanded.set(false))
        };
        html! {
            <div class="fixed inset-0 z-50 flex items-center justify-center">
                <div class="absolute inset-0 bg-black/40" onclick={on_close.clone()} />
                <div class="relative bg-white rounded-xl p-4 w-96 max-h-[80vh] overflow-y-auto shadow-xl">
                    <div class="font-bold mb-2">{author.clone()}</div>
                    <div class="whitespace-pre-wrap text-sm">{&props.post.message}</div>
                    <div class="flex justify-end mt-3">
                        <button
                            onclick={on_close}
                            class="px-4 py-2 rounded-lg text-sm text-gray-600 hover:bg-gray-100"
                        >
                            {"Close"}
                        </button>
                    </div>
                </div>
            </div>
        }
    } else {
        html! {}
    };

    let confirm_dialog = match *confirm {
        Some(PostConfirm::Delete) => {
            let on_confirm = {
                let on_delete_post = props.on_delete_post.clone();
                let confirm = confirm.clone();
                let post_id = props.post.id.clone();
                Callback::from(move |_: String| {
                    confirm.set(None);
                    on_delete_post.emit(post_id.clone());
                })
            };
            let on_cancel = {
                let confirm = confirm.clone();
                Callback::from(move |_: ()| confirm.set(None))
            };
            html! {
                <Alert
                    open=true
                    header="Delete post?"
                    confirm_label="Delete"
                    destructive=true
                    {on_confirm}
                    {on_cancel}
                />
            }
        }
        Some(PostConfirm::Report) => {
            let on_confirm = {
                let on_report_post = props.on_report_post.clone();
                let confirm = confirm.clone();
                let post_id = props.post.id.clone();
                Callback::from(move |description: String| {
                    confirm.set(None);
                    on_report_post.emit((post_id.clone(), description));
                })
            };
            let on_cancel = {
                let confirm = confirm.clone();
                Callback::from(move |_: ()| confirm.set(None))
            };
            html! {
                <Alert
                    open=true
                    header="Report post?"
                    confirm_label="Report"
                    destructive=true
                    input={AlertInput {
                        placeholder: "Report description (optional)".to_string(),
                        value: String::new(),
                        multiline: true,
                    }}
                    {on_confirm}
                    {on_cancel}
                />
            }
        }
        None => html! {},
    };

    let bubble_class = classes!(
        "shrink-0",
        "rounded-tl-2xl",
        "rounded-tr-2xl",
        "mb-2",
        "p-3",
        "bg-gray-100",
        "max-w-[75%]",
        "select-none",
        if is_me {
            "rounded-bl-2xl self-end ml-8 mr-4"
        } else {
            "rounded-br-2xl mr-8 ml-4 self-start"
        }
    );

    html! {
        <div class="flex flex-col">
            <div
                class={bubble_class}
                {onmousedown}
                {onmouseup}
                {onmouseleave}
                {ontouchstart}
                {ontouchend}
            >
                <div class="flex items-start justify-between gap-2">
                    <div class="font-bold text-sm">{author.clone()}</div>
                    {open_sheet_button}
                </div>
                {body}
            </div>
            <ActionSheet
                open={*sheet_open}
                header={Some("Actions".to_string())}
                buttons={post_actions(is_me, can_edit)}
                on_select={on_sheet_select}
                on_dismiss={on_sheet_dismiss}
            />
            {confirm_dialog}
            {expanded_modal}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ButtonRole;

    #[test]
    fn test_selection_outcomes_require_confirmation() {
        // Delete and report only queue a confirmation; the parent callback
        // fires from the confirm dialog, never from the sheet itself.
        assert_eq!(selection_outcome("delete"), SheetOutcome::ConfirmDelete);
        assert_eq!(selection_outcome("report"), SheetOutcome::ConfirmReport);
        assert_eq!(selection_outcome("edit"), SheetOutcome::EditBulky);
        assert_eq!(selection_outcome("bogus"), SheetOutcome::None);
    }

    #[test]
    fn test_post_actions_for_owner() {
        let buttons = post_actions(true, false);
        assert_eq!(buttons.len(), 2);
        assert_eq!(buttons[0].value, "delete");
        assert_eq!(buttons[0].role, ButtonRole::Destructive);
        assert_eq!(buttons[1].role, ButtonRole::Cancel);
    }

    #[test]
    fn test_post_actions_for_privileged_viewer_of_bulky() {
        let buttons = post_actions(false, true);
        let values: Vec<&str> = buttons.iter().map(|b| b.value).collect();
        assert_eq!(values, vec!["report", "edit", "cancel"]);
    }

    #[test]
    fn test_collapsed_preview_clips_chars_and_lines() {
        let long = "x".repeat(300);
        let preview = collapsed_preview(&long);
        assert_eq!(preview.chars().count(), EXPAND_CHAR_LIMIT + 1);
        assert!(preview.ends_with('\u{2026}'));

        let many_lines = "a\nb\nc\nd\ne\nf\ng";
        let preview = collapsed_preview(many_lines);
        assert_eq!(preview.matches('\n').count(), EXPAND_LINE_LIMIT - 1);
    }
}
