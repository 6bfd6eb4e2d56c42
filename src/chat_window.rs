use web_sys::{Element, File, ScrollBehavior, ScrollToOptions};
use yew::prelude::*;

use crate::bulky_modal::BulkyModal;
use crate::channel_strip::ChannelStrip;
use crate::composer::Composer;
use crate::message_feed::MessageFeed;
use crate::types::{BulkyItem, Channel, PostList, UserProfile};

#[derive(Properties, PartialEq)]
pub struct ChatWindowProps {
    pub channels: Vec<Channel>,
    pub selected: Option<Channel>,
    /// Posts of the selected channel, newest first.
    pub post_list: PostList,
    pub on_select_channel: Callback<Channel>,
    pub on_create_channel: Callback<String>,
    pub on_rename_channel: Callback<(Channel, String)>,
    pub on_delete_channel: Callback<String>,
    /// Pagination trigger carrying the oldest loaded post id.
    pub on_scroll_top: Callback<String>,
    pub get_profile: Callback<(String, Callback<Option<UserProfile>>)>,
    pub get_file: Callback<(String, f64, Callback<Option<String>>)>,
    /// `(text, done)`; `done` fires once the post is in the list.
    pub on_send_message: Callback<(String, Callback<()>)>,
    /// `(text, attachment file id, done)`
    pub on_send_message_with_image: Callback<(String, String, Callback<()>)>,
    /// `(post id, new text, done)`
    pub on_update_message: Callback<(String, String, Callback<()>)>,
    pub on_upload_file: Callback<(File, Callback<Option<String>>)>,
    pub on_host_image: Callback<(String, Callback<Result<String, String>>)>,
    pub on_delete_post: Callback<String>,
    pub on_report_post: Callback<(String, String)>,
}

/// Chat surface for the active loop: room strip on top, reverse-scrolled
/// feed in the middle, composer at the bottom. Owns the feed's scroll root
/// so send completions can snap back to the newest post, and owns the bulky
/// item modal for both the create and edit paths.
#[function_component(ChatWindow)]
pub fn chat_window(props: &ChatWindowProps) -> Html {
    let scroll_ref = use_node_ref();
    let modal_open = use_state(|| false);
    let bulky_edit = use_state(|| None::<BulkyItem>);

    // With column-reverse layout the newest post sits at scrollTop 0.
    let scroll_to_newest = {
        let scroll_ref = scroll_ref.clone();
        Callback::from(move |_: ()| {
            if let Some(root) = scroll_ref.cast::<Element>() {
                let options = ScrollToOptions::new();
                options.set_top(0.0);
                options.set_behavior(ScrollBehavior::Smooth);
                root.scroll_to_with_scroll_to_options(&options);
            }
        })
    };

    let send_message = {
        let on_send_message = props.on_send_message.clone();
        let scroll_to_newest = scroll_to_newest.clone();
        Callback::from(move |text: String| {
            on_send_message.emit((text, scroll_to_newest.clone()));
        })
    };
    let send_message_with_image = {
        let on_send = props.on_send_message_with_image.clone();
        let scroll_to_newest = scroll_to_newest.clone();
        Callback::from(move |(text, file_id): (String, String)| {
            on_send.emit((text, file_id, scroll_to_newest.clone()));
        })
    };
    let send_bulky = send_message_with_image.clone();
    let update_bulky = {
        let on_update = props.on_update_message.clone();
        let scroll_to_newest = scroll_to_newest.clone();
        Callback::from(move |(post_id, text): (String, String)| {
            on_update.emit((post_id, text, scroll_to_newest.clone()));
        })
    };

    let on_edit_bulky = {
        let modal_open = modal_open.clone();
        let bulky_edit = bulky_edit.clone();
        Callback::from(move |item: BulkyItem| {
            bulky_edit.set(Some(item));
            modal_open.set(true);
        })
    };
    let on_share_bulky = {
        let modal_open = modal_open.clone();
        let bulky_edit = bulky_edit.clone();
        Callback::from(move |_: MouseEvent| {
            bulky_edit.set(None);
            modal_open.set(true);
        })
    };
    let on_modal_dismiss = {
        let modal_open = modal_open.clone();
        let bulky_edit = bulky_edit.clone();
        Callback::from(move |_: ()| {
            modal_open.set(false);
            bulky_edit.set(None);
        })
    };

    let body = match &props.selected {
        Some(channel) => html! {
            <>
                <div class="shrink-0 flex items-center justify-between px-3 py-2 border-b border-gray-200">
                    <h2 class="text-sm font-semibold truncate">{&channel.display_name}</h2>
                    <button
                        onclick={on_share_bulky}
                        class="px-3 py-1 text-xs font-medium text-white bg-purple-500 hover:bg-purple-600 rounded-full"
                    >
                        {"Share bulky item"}
                    </button>
                </div>
                <MessageFeed
                    post_list={props.post_list.clone()}
                    scroll_ref={scroll_ref.clone()}
                    on_scroll_top={props.on_scroll_top.clone()}
                    get_profile={props.get_profile.clone()}
                    get_file={props.get_file.clone()}
                    on_delete_post={props.on_delete_post.clone()}
                    on_report_post={props.on_report_post.clone()}
                    {on_edit_bulky}
                />
                <Composer
                    on_send_message={send_message}
                    on_upload_file={props.on_upload_file.clone()}
                    on_send_message_with_image={send_message_with_image}
                />
            </>
        },
        None => html! {
            <div class="flex-grow flex items-center justify-center text-sm text-gray-500">
                {"Select a chat room to start"}
            </div>
        },
    };

    html! {
        <div class="h-full flex flex-col">
            <ChannelStrip
                channels={props.channels.clone()}
                selected={props.selected.clone()}
                on_select={props.on_select_channel.clone()}
                on_create={props.on_create_channel.clone()}
                on_rename={props.on_rename_channel.clone()}
                on_delete={props.on_delete_channel.clone()}
            />
            {body}
            <BulkyModal
                open={*modal_open}
                edit={(*bulky_edit).clone()}
                on_dismiss={on_modal_dismiss}
                on_host_image={props.on_host_image.clone()}
                on_upload_file={props.on_upload_file.clone()}
                on_send_bulky={send_bulky}
                on_update_bulky={update_bulky}
            />
        </div>
    }
}
