use std::collections::HashSet;

use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::store::use_app_state;
use crate::types::{sole_host_loops, Loop};

/// Exit-survey reasons offered on account deletion, in display order.
pub const REASONS: [(&str, &str); 5] = [
    ("not_active", "My loop is not active"),
    ("moved", "I moved away"),
    ("too_far", "Addresses are too far apart"),
    ("planned_pause", "I only wanted to pause"),
    ("app_issues", "The app did not work well for me"),
];

/// Checked reasons in display order, with any free text appended as its own
/// entry. "other" on its own contributes nothing without text.
pub fn collect_reasons(checked: &HashSet<String>, other_text: &str) -> Vec<String> {
    let mut reasons: Vec<String> = REASONS
        .iter()
        .filter(|(key, _)| checked.contains(*key))
        .map(|(key, _)| key.to_string())
        .collect();
    let other = other_text.trim();
    if checked.contains("other") && !other.is_empty() {
        reasons.push(other.to_string());
    }
    reasons
}

#[derive(Properties, PartialEq)]
pub struct DeleteSurveyProps {
    /// All loops the authenticated user belongs to.
    pub loops: Vec<Loop>,
    pub on_delete_account: Callback<Vec<String>>,
}

/// Account-deletion page. A user who is the only host of a loop is blocked
/// with a notice naming those loops; everyone else gets the exit survey.
#[function_component(DeleteSurvey)]
pub fn delete_survey(props: &DeleteSurveyProps) -> Html {
    let state = use_app_state();
    let checked = use_state(HashSet::<String>::new);
    let other_text = use_state(String::new);

    let blocked = sole_host_loops(&state.auth_user, &props.loops);
    if !blocked.is_empty() {
        return html! {
            <div class="p-4 max-w-lg mx-auto space-y-2">
                <h2 class="text-base font-semibold">{"Delete account"}</h2>
                <div class="p-3 bg-amber-50 border border-amber-300 rounded-lg text-sm">
                    <p>{"You are the only host of these loops. Hand hosting over or close them before deleting your account:"}</p>
                    <ul class="list-disc ms-5 mt-1">
                        { blocked.iter().map(|name| html! {
                            <li key={name.clone()}>{name}</li>
                        }).collect::<Html>() }
                    </ul>
                </div>
            </div>
        };
    }

    let toggle = |key: &'static str| {
        let checked = checked.clone();
        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let mut next = (*checked).clone();
            if input.checked() {
                next.insert(key.to_string());
            } else {
                next.remove(key);
            }
            checked.set(next);
        })
    };

    let on_other_input = {
        let other_text = other_text.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(area) = e.target_dyn_into::<HtmlTextAreaElement>() {
                other_text.set(area.value());
            }
        })
    };

    let on_submit = {
        let checked = checked.clone();
        let other_text = other_text.clone();
        let on_delete_account = props.on_delete_account.clone();
        Callback::from(move |_: MouseEvent| {
            on_delete_account.emit(collect_reasons(&checked, &other_text));
        })
    };

    let other_checked = checked.contains("other");

    html! {
        <div class="p-4 max-w-lg mx-auto space-y-3">
            <h2 class="text-base font-semibold">{"Delete account"}</h2>
            <p class="text-sm text-gray-600">{"Sorry to see you go. What made you leave?"}</p>
            <div class="space-y-1">
                { REASONS.iter().map(|&(key, label)| html! {
                    <label key={key} class="flex items-center gap-2 text-sm">
                        <input
                            type="checkbox"
                            checked={checked.contains(key)}
                            onchange={toggle(key)}
                        />
                        {label}
                    </label>
                }).collect::<Html>() }
                <label class="flex items-center gap-2 text-sm">
                    <input type="checkbox" checked={other_checked} onchange={toggle("other")} />
                    {"Other"}
                </label>
            </div>
            if other_checked {
                <textarea
                    value={(*other_text).clone()}
                    oninput={on_other_input}
                    placeholder="Tell us more"
                    class="w-full px-2 py-1 border border-gray-300 rounded text-sm"
                    rows="3"
                />
            }
            <button
                onclick={on_submit}
                class="px-4 py-2 bg-red-600 hover:bg-red-700 text-white rounded-lg text-sm font-medium"
            >
                {"Delete my account"}
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(keys: &[&str]) -> HashSet<String> {
        keys.iter().map(|key| key.to_string()).collect()
    }

    #[test]
    fn test_collect_reasons_in_display_order() {
        let checked = set(&["planned_pause", "not_active"]);
        assert_eq!(
            collect_reasons(&checked, ""),
            vec!["not_active".to_string(), "planned_pause".to_string()]
        );
    }

    #[test]
    fn test_other_text_appended_last() {
        let checked = set(&["moved", "other"]);
        assert_eq!(
            collect_reasons(&checked, "  no sizes for me  "),
            vec!["moved".to_string(), "no sizes for me".to_string()]
        );
    }

    #[test]
    fn test_other_without_text_contributes_nothing() {
        let checked = set(&["other"]);
        assert!(collect_reasons(&checked, "   ").is_empty());
    }
}
