use yew::prelude::*;

use crate::store::use_app_state;
use crate::types::{is_redacted, User};

/// Maps search link for a street address.
pub fn maps_search_url(address: &str) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={}",
        address.replace(' ', "+")
    )
}

#[derive(Properties, PartialEq)]
pub struct UserCardProps {
    pub user: User,
}

/// Contact card for a loop member. Contact fields the backend redacted for
/// privacy (marked with `***`) are left out entirely rather than rendered
/// as masked text.
#[function_component(UserCard)]
pub fn user_card(props: &UserCardProps) -> Html {
    let state = use_app_state();
    let user = &props.user;
    let loop_uid = &state.active_loop.uid;

    let role_marker = if user.is_admin_of(loop_uid) {
        html! { <span title="Loop host">{"\u{1F6E1}"}</span> }
    } else if user.is_warden_of(loop_uid) {
        html! { <span class="text-xs text-purple-600 font-medium">{"warden"}</span> }
    } else {
        html! {}
    };

    let paused_marker = if user.is_paused {
        html! { <span class="text-xs text-gray-500 italic">{"on pause"}</span> }
    } else {
        html! {}
    };

    let sizes = user
        .sizes
        .iter()
        .map(|size| {
            html! {
                <span key={size.clone()} class="px-2 py-0.5 text-xs bg-purple-100 rounded-full">
                    {size}
                </span>
            }
        })
        .collect::<Html>();

    let email = (!user.email.is_empty() && !is_redacted(&user.email)).then(|| {
        html! {
            <a href={format!("mailto:{}", user.email)} class="block text-sm text-blue-600 hover:underline">
                {&user.email}
            </a>
        }
    });
    let phone = (!user.phone_number.is_empty() && !is_redacted(&user.phone_number)).then(|| {
        html! {
            <a href={format!("tel:{}", user.phone_number)} class="block text-sm text-blue-600 hover:underline">
                {&user.phone_number}
            </a>
        }
    });
    let address = (!user.address.is_empty() && !is_redacted(&user.address)).then(|| {
        html! {
            <a
                href={maps_search_url(&user.address)}
                target="_blank"
                rel="noreferrer"
                class="block text-sm text-gray-700 hover:underline"
            >
                {"\u{1F4CD} "}{&user.address}
            </a>
        }
    });

    html! {
        <div class="p-4 bg-white rounded-xl shadow-sm space-y-2">
            <div class="flex items-center gap-2">
                <h3 class="text-base font-semibold">{&user.name}</h3>
                {role_marker}
                {paused_marker}
            </div>
            if !user.sizes.is_empty() {
                <div class="flex flex-wrap gap-1">{sizes}</div>
            }
            {email}
            {phone}
            {address}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_search_url_encodes_spaces() {
        assert_eq!(
            maps_search_url("Oudegracht 12 Utrecht"),
            "https://www.google.com/maps/search/?api=1&query=Oudegracht+12+Utrecht"
        );
    }
}
