use gloo::timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};
use yew::prelude::*;

use crate::debounce::{Debouncer, SCROLL_TOP_QUIET_MS};
use crate::post_view::PostView;
use crate::types::{BulkyItem, PostList, UserProfile};

#[derive(Properties, PartialEq)]
pub struct MessageFeedProps {
    pub post_list: PostList,
    /// Scroll root, owned by the chat window so send completions can reset it.
    pub scroll_ref: NodeRef,
    /// Pagination trigger: fires with the oldest post id after the sentinel
    /// has been visible through a quiet period.
    pub on_scroll_top: Callback<String>,
    pub get_profile: Callback<(String, Callback<Option<UserProfile>>)>,
    pub get_file: Callback<(String, f64, Callback<Option<String>>)>,
    pub on_delete_post: Callback<String>,
    pub on_report_post: Callback<(String, String)>,
    pub on_edit_bulky: Callback<BulkyItem>,
}

/// Reverse-chronological post feed. The column-reverse layout keeps the
/// newest post at the visual bottom; the sentinel element sits at the oldest
/// (visual top) end and drives infinite scroll through an
/// IntersectionObserver debounced by [`Debouncer`].
#[function_component(MessageFeed)]
pub fn message_feed(props: &MessageFeedProps) -> Html {
    let sentinel_ref = use_node_ref();
    let debouncer = use_mut_ref(|| Debouncer::new(SCROLL_TOP_QUIET_MS));
    let fire_timer = use_mut_ref(|| None::<Timeout>);

    {
        let sentinel_ref = sentinel_ref.clone();
        let scroll_ref = props.scroll_ref.clone();
        let debouncer = debouncer.clone();
        let fire_timer = fire_timer.clone();
        let on_scroll_top = props.on_scroll_top.clone();
        let oldest = props.post_list.oldest_id().map(str::to_string);

        // Rebuilt whenever the oldest id changes so the trigger always
        // reports the current oldest end. Observer, closure and timer are
        // all torn down with the effect.
        use_effect_with(oldest, move |oldest| {
            let oldest = oldest.clone();
            let teardown_timer = fire_timer.clone();
            let observer_closure = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
                move |entries: js_sys::Array, _observer: IntersectionObserver| {
                    let intersecting = entries.iter().any(|entry| {
                        entry
                            .dyn_into::<IntersectionObserverEntry>()
                            .map(|entry| entry.is_intersecting())
                            .unwrap_or(false)
                    });
                    if !intersecting {
                        // Sentinel scrolled back out: disarm the pending trigger.
                        debouncer.borrow_mut().cancel();
                        *fire_timer.borrow_mut() = None;
                        return;
                    }
                    // Empty feed: no oldest id to report, no fetch.
                    let Some(oldest) = oldest.clone() else {
                        return;
                    };
                    debouncer.borrow_mut().poke(js_sys::Date::now());

                    let debouncer = debouncer.clone();
                    let on_scroll_top = on_scroll_top.clone();
                    let timeout = Timeout::new(SCROLL_TOP_QUIET_MS as u32, move || {
                        if debouncer.borrow_mut().fire_due(js_sys::Date::now()) {
                            on_scroll_top.emit(oldest.clone());
                        }
                    });
                    *fire_timer.borrow_mut() = Some(timeout);
                },
            );

            let init = IntersectionObserverInit::new();
            if let Some(root) = scroll_ref.cast::<Element>() {
                init.set_root(Some(&root));
            }
            let observer = IntersectionObserver::new_with_options(
                observer_closure.as_ref().unchecked_ref(),
                &init,
            )
            .ok();
            if let (Some(observer), Some(sentinel)) = (&observer, sentinel_ref.cast::<Element>()) {
                observer.observe(&sentinel);
            }

            move || {
                if let Some(observer) = observer {
                    observer.disconnect();
                }
                // A debounce timeout armed under the old oldest id must not
                // survive into the next epoch.
                *teardown_timer.borrow_mut() = None;
                drop(observer_closure);
            }
        });
    }

    html! {
        <div
            ref={props.scroll_ref.clone()}
            class="flex-grow flex flex-col-reverse overflow-y-auto px-2 py-2"
        >
            {
                props.post_list.iter_ordered().map(|post| html! {
                    <PostView
                        key={post.id.clone()}
                        post={post.clone()}
                        get_profile={props.get_profile.clone()}
                        get_file={props.get_file.clone()}
                        on_delete_post={props.on_delete_post.clone()}
                        on_report_post={props.on_report_post.clone()}
                        on_edit_bulky={props.on_edit_bulky.clone()}
                    />
                }).collect::<Html>()
            }
            <span key="top" ref={sentinel_ref}></span>
        </div>
    }
}
