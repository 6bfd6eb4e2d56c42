use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::window;
use yew::prelude::*;

use crate::auth::{AuthView, SignupForm};
use crate::chat_window::ChatWindow;
use crate::components::ToastHost;
use crate::delete_survey::DeleteSurvey;
use crate::members::MemberDirectory;
use crate::new_loop::{NewLoopRequest, NewLoopView};
use crate::store::{AppState, Toast, ToastKind};
use crate::types::{Channel, Loop, Post, PostList, User, UserChain, UserProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActiveTab {
    Rooms,
    Members,
    Account,
}

impl ActiveTab {
    fn label(self) -> &'static str {
        match self {
            ActiveTab::Rooms => "Rooms",
            ActiveTab::Members => "Members",
            ActiveTab::Account => "Account",
        }
    }

    fn next(self) -> Self {
        match self {
            ActiveTab::Rooms => ActiveTab::Members,
            ActiveTab::Members => ActiveTab::Account,
            ActiveTab::Account => ActiveTab::Rooms,
        }
    }
}

fn fresh_id(counter: &Rc<RefCell<u64>>) -> u64 {
    let mut n = counter.borrow_mut();
    *n += 1;
    *n
}

/// Root component. Owns the demo in-memory backend (channels, posts, members,
/// notes) and fulfills every collaborator callback against it, deferring each
/// continuation through `spawn_local` so completions behave like network
/// answers instead of re-entering during dispatch.
#[function_component(App)]
pub fn app() -> Html {
    let active_tab = use_state(|| ActiveTab::Rooms);
    let authed = use_state(|| false);
    let channels = use_state(seed_channels);
    let selected = use_state(|| seed_channels().first().cloned());
    let posts_by_channel = use_state(seed_posts);
    let members = use_state(|| Rc::new(seed_members()));
    let notes = use_state(|| Rc::new(HashMap::<String, String>::new()));
    let toasts = use_state(Vec::<Toast>::new);
    let counter = use_mut_ref(|| 100u64);
    // file id -> object URL for files "uploaded" in this session
    let file_urls = use_mut_ref(HashMap::<String, String>::new);

    // Keyboard shortcut for Cmd/Ctrl+K: cycle the main tabs. The listener is
    // rebuilt per tab so it always advances from the current one.
    {
        let active_tab = active_tab.clone();
        use_effect_with(*active_tab, move |tab| {
            let tab = *tab;
            let window = window().expect("no global `window` exists");
            let document = window.document().expect("should have a document");

            let listener = EventListener::new(&document, "keydown", move |event| {
                if let Some(keyboard_event) = event.dyn_ref::<web_sys::KeyboardEvent>() {
                    if (keyboard_event.meta_key() || keyboard_event.ctrl_key())
                        && keyboard_event.key() == "k"
                    {
                        keyboard_event.prevent_default();
                        active_tab.set(tab.next());
                    }
                }
            });

            move || drop(listener)
        });
    }

    let auth_user = members
        .first()
        .cloned()
        .unwrap_or_else(|| seed_members().remove(0));
    let active_loop = seed_loop();

    let notify = {
        let toasts = toasts.clone();
        let counter = counter.clone();
        Callback::from(move |(kind, text): (ToastKind, String)| {
            let mut next = (*toasts).clone();
            next.push(Toast {
                id: fresh_id(&counter),
                kind,
                text,
            });
            toasts.set(next);
        })
    };
    let on_dismiss_toast = {
        let toasts = toasts.clone();
        Callback::from(move |id: u64| {
            let mut next = (*toasts).clone();
            next.retain(|toast| toast.id != id);
            toasts.set(next);
        })
    };

    let state = AppState {
        is_loop_admin: auth_user.is_admin_of(&active_loop.uid),
        auth_user: auth_user.clone(),
        active_loop: active_loop.clone(),
        members: (*members).clone(),
        notify: notify.clone(),
    };

    let on_select_channel = {
        let selected = selected.clone();
        Callback::from(move |channel: Channel| selected.set(Some(channel)))
    };
    let on_create_channel = {
        let channels = channels.clone();
        let selected = selected.clone();
        let posts_by_channel = posts_by_channel.clone();
        let counter = counter.clone();
        Callback::from(move |name: String| {
            let channel = Channel::new(
                format!("c{}", fresh_id(&counter)),
                name,
                js_sys::Date::now(),
            );
            let mut next = (*channels).clone();
            next.push(channel.clone());
            channels.set(next);
            let mut posts = (*posts_by_channel).clone();
            posts.insert(channel.id.clone(), PostList::new());
            posts_by_channel.set(posts);
            selected.set(Some(channel));
        })
    };
    let on_rename_channel = {
        let channels = channels.clone();
        let selected = selected.clone();
        Callback::from(move |(channel, name): (Channel, String)| {
            let mut next = (*channels).clone();
            if let Some(existing) = next.iter_mut().find(|c| c.id == channel.id) {
                existing.display_name = name.clone();
            }
            channels.set(next);
            if selected.as_ref().map(|c| c.id.as_str()) == Some(channel.id.as_str()) {
                selected.set(Some(Channel {
                    display_name: name,
                    ..channel
                }));
            }
        })
    };
    let on_delete_channel = {
        let channels = channels.clone();
        let selected = selected.clone();
        let posts_by_channel = posts_by_channel.clone();
        Callback::from(move |id: String| {
            let mut next = (*channels).clone();
            next.retain(|c| c.id != id);
            let fallback = next.first().cloned();
            channels.set(next);
            let mut posts = (*posts_by_channel).clone();
            posts.remove(&id);
            posts_by_channel.set(posts);
            if selected.as_ref().map(|c| c.id.as_str()) == Some(id.as_str()) {
                selected.set(fallback);
            }
        })
    };

    // Pagination: synthesize a page of older posts below the reported oldest.
    let on_scroll_top = {
        let posts_by_channel = posts_by_channel.clone();
        let selected = selected.clone();
        let counter = counter.clone();
        Callback::from(move |oldest_id: String| {
            let Some(channel) = (*selected).clone() else {
                return;
            };
            let posts_by_channel = posts_by_channel.clone();
            let counter = counter.clone();
            spawn_local(async move {
                let mut posts = (*posts_by_channel).clone();
                let Some(list) = posts.get_mut(&channel.id) else {
                    return;
                };
                let Some(oldest_at) = list.get(&oldest_id).map(|post| post.create_at) else {
                    return;
                };
                let page = (1..=3)
                    .map(|offset| Post {
                        id: format!("p{}", fresh_id(&counter)),
                        user_id: "u-gone".to_string(),
                        message: format!("Archived message #{offset}"),
                        file_ids: Vec::new(),
                        create_at: oldest_at - 60_000.0 * offset as f64,
                        kind: String::new(),
                        username: "old-neighbour".to_string(),
                    })
                    .collect();
                list.append_older(page);
                posts_by_channel.set(posts);
            });
        })
    };

    let get_profile = {
        Callback::from(
            move |(user_id, k): (String, Callback<Option<UserProfile>>)| {
                spawn_local(async move {
                    let profile = (user_id == "u-gone").then(|| UserProfile {
                        id: user_id.clone(),
                        username: "old-neighbour".to_string(),
                    });
                    k.emit(profile);
                });
            },
        )
    };

    let get_file = {
        let file_urls = file_urls.clone();
        Callback::from(
            move |(file_id, _timestamp, k): (String, f64, Callback<Option<String>>)| {
                let url = file_urls.borrow().get(&file_id).cloned();
                spawn_local(async move {
                    // Seeded attachments have no session object URL; serve a
                    // deterministic placeholder instead.
                    let url = url
                        .or_else(|| Some(format!("https://picsum.photos/seed/{file_id}/400/300")));
                    k.emit(url);
                });
            },
        )
    };

    let on_upload_file = {
        let file_urls = file_urls.clone();
        let counter = counter.clone();
        Callback::from(
            move |(file, k): (web_sys::File, Callback<Option<String>>)| {
                let file_id = format!("f{}", fresh_id(&counter));
                let url = web_sys::Url::create_object_url_with_blob(&file).ok();
                if let Some(url) = url.clone() {
                    file_urls.borrow_mut().insert(file_id.clone(), url);
                }
                spawn_local(async move {
                    k.emit(url.map(|_| file_id));
                });
            },
        )
    };

    // The real hosting service answers `{ "data": { "image": url } }`; the
    // demo builds the same envelope and decodes it the same way.
    let on_host_image = {
        Callback::from(
            move |(base64, k): (String, Callback<Result<String, String>>)| {
                spawn_local(async move {
                    let envelope = serde_json::json!({
                        "data": { "image": format!("data:image/png;base64,{base64}") }
                    });
                    let url = envelope
                        .get("data")
                        .and_then(|data| data.get("image"))
                        .and_then(|image| image.as_str())
                        .map(str::to_string)
                        .ok_or_else(|| "malformed hosting response".to_string());
                    k.emit(url);
                });
            },
        )
    };

    let append_post = {
        let posts_by_channel = posts_by_channel.clone();
        let selected = selected.clone();
        let counter = counter.clone();
        let auth_uid = auth_user.uid.clone();
        Callback::from(
            move |(text, file_ids, done): (String, Vec<String>, Callback<()>)| {
                let Some(channel) = (*selected).clone() else {
                    return;
                };
                let post = Post {
                    id: format!("p{}", fresh_id(&counter)),
                    user_id: auth_uid.clone(),
                    message: text,
                    file_ids,
                    create_at: js_sys::Date::now(),
                    kind: String::new(),
                    username: String::new(),
                };
                let posts_by_channel = posts_by_channel.clone();
                spawn_local(async move {
                    let mut posts = (*posts_by_channel).clone();
                    if let Some(list) = posts.get_mut(&channel.id) {
                        list.prepend_newest(post);
                        posts_by_channel.set(posts);
                        done.emit(());
                    }
                });
            },
        )
    };
    let on_send_message = {
        let append_post = append_post.clone();
        Callback::from(move |(text, done): (String, Callback<()>)| {
            append_post.emit((text, Vec::new(), done));
        })
    };
    let on_send_message_with_image = {
        let append_post = append_post.clone();
        Callback::from(move |(text, file_id, done): (String, String, Callback<()>)| {
            append_post.emit((text, vec![file_id], done));
        })
    };
    let on_update_message = {
        let posts_by_channel = posts_by_channel.clone();
        let selected = selected.clone();
        Callback::from(move |(post_id, text, done): (String, String, Callback<()>)| {
            let Some(channel) = (*selected).clone() else {
                return;
            };
            let posts_by_channel = posts_by_channel.clone();
            spawn_local(async move {
                let mut posts = (*posts_by_channel).clone();
                if let Some(list) = posts.get_mut(&channel.id) {
                    list.set_message(&post_id, text);
                    posts_by_channel.set(posts);
                    done.emit(());
                }
            });
        })
    };
    let on_delete_post = {
        let posts_by_channel = posts_by_channel.clone();
        let selected = selected.clone();
        Callback::from(move |post_id: String| {
            let Some(channel) = (*selected).clone() else {
                return;
            };
            let mut posts = (*posts_by_channel).clone();
            if let Some(list) = posts.get_mut(&channel.id) {
                list.remove(&post_id);
                posts_by_channel.set(posts);
            }
        })
    };
    let on_report_post = {
        let notify = notify.clone();
        Callback::from(move |(post_id, description): (String, String)| {
            log::info!("report for post {post_id}: {description}");
            notify.emit((
                ToastKind::Info,
                "Thank you, the hosts will take a look.".to_string(),
            ));
        })
    };

    let on_save_note = {
        let notes = notes.clone();
        Callback::from(move |(member_uid, note): (String, String)| {
            let mut next = (**notes).clone();
            next.insert(member_uid, note);
            notes.set(Rc::new(next));
        })
    };
    let on_set_warden = {
        let members = members.clone();
        let loop_uid = active_loop.uid.clone();
        Callback::from(move |(member_uid, flag): (String, bool)| {
            let mut next = (**members).clone();
            if let Some(member) = next.iter_mut().find(|member| member.uid == member_uid) {
                match member
                    .chains
                    .iter_mut()
                    .find(|uc| uc.chain_uid == loop_uid)
                {
                    Some(uc) => uc.is_chain_warden = flag,
                    None => member.chains.push(UserChain {
                        chain_uid: loop_uid.clone(),
                        is_chain_admin: false,
                        is_chain_warden: flag,
                    }),
                }
            }
            members.set(Rc::new(next));
        })
    };
    // Demo auth: any email gets a passcode, and the fixed demo passcode
    // logs in. The passcode is logged instead of emailed.
    let on_request_token = {
        Callback::from(
            move |(email, k): (String, Callback<Result<(), String>>)| {
                log::info!("passcode for {email}: 123456");
                spawn_local(async move {
                    k.emit(Ok(()));
                });
            },
        )
    };
    let on_verify_token = {
        let authed = authed.clone();
        Callback::from(
            move |(token, k): (String, Callback<Result<(), String>>)| {
                let authed = authed.clone();
                spawn_local(async move {
                    if token == "123456" {
                        authed.set(true);
                        k.emit(Ok(()));
                    } else {
                        k.emit(Err("That passcode is not correct.".to_string()));
                    }
                });
            },
        )
    };
    let on_signup = {
        Callback::from(
            move |(form, k): (SignupForm, Callback<Result<(), String>>)| {
                log::info!("signup request for {} <{}>", form.name, form.email);
                spawn_local(async move {
                    k.emit(Ok(()));
                });
            },
        )
    };
    let on_create_loop = {
        let notify = notify.clone();
        Callback::from(
            move |(request, k): (NewLoopRequest, Callback<Result<(), String>>)| {
                log::info!("new loop registered: {} at {}", request.name, request.address);
                let notify = notify.clone();
                spawn_local(async move {
                    notify.emit((ToastKind::Info, "Loop registered.".to_string()));
                    k.emit(Ok(()));
                });
            },
        )
    };

    let on_delete_account = {
        let notify = notify.clone();
        Callback::from(move |reasons: Vec<String>| {
            log::info!("account deletion requested, reasons: {reasons:?}");
            notify.emit((
                ToastKind::Info,
                "Account deletion requested.".to_string(),
            ));
        })
    };

    let post_list = selected
        .as_ref()
        .and_then(|channel| posts_by_channel.get(&channel.id))
        .cloned()
        .unwrap_or_default();

    let tab_bar = [ActiveTab::Rooms, ActiveTab::Members, ActiveTab::Account]
        .into_iter()
        .map(|tab| {
            let onclick = {
                let active_tab = active_tab.clone();
                Callback::from(move |_: MouseEvent| active_tab.set(tab))
            };
            html! {
                <button
                    key={tab.label()}
                    {onclick}
                    class={classes!(
                        "px-3",
                        "py-1",
                        "text-sm",
                        "rounded-full",
                        (*active_tab == tab).then_some("bg-purple-500 text-white")
                    )}
                >
                    {tab.label()}
                </button>
            }
        })
        .collect::<Html>();

    let body = match *active_tab {
        ActiveTab::Rooms => html! {
            <ChatWindow
                channels={(*channels).clone()}
                selected={(*selected).clone()}
                {post_list}
                {on_select_channel}
                {on_create_channel}
                {on_rename_channel}
                {on_delete_channel}
                {on_scroll_top}
                {get_profile}
                {get_file}
                {on_send_message}
                {on_send_message_with_image}
                {on_update_message}
                {on_upload_file}
                {on_host_image}
                {on_delete_post}
                {on_report_post}
            />
        },
        ActiveTab::Members => html! {
            <MemberDirectory
                notes={(*notes).clone()}
                {on_save_note}
                {on_set_warden}
            />
        },
        ActiveTab::Account => html! {
            <div class="max-w-lg mx-auto w-full pt-4 px-4">
                <NewLoopView {on_create_loop} />
                <DeleteSurvey
                    loops={seed_all_loops()}
                    {on_delete_account}
                />
            </div>
        },
    };

    // Everything above stays behind the login gate.
    let body = if *authed {
        body
    } else {
        html! {
            <AuthView
                {on_request_token}
                {on_verify_token}
                {on_signup}
            />
        }
    };

    html! {
        <ContextProvider<AppState> context={state}>
            <div class="h-screen flex flex-col bg-gray-50">
                <header class="shrink-0 flex items-center justify-between px-4 py-2 bg-white border-b border-gray-200">
                    <h1 class="text-base font-bold">{&active_loop.name}</h1>
                    if *authed {
                        <nav class="flex gap-1">{tab_bar}</nav>
                    }
                </header>
                <main class="flex-grow min-h-0 flex flex-col">{body}</main>
                <ToastHost toasts={(*toasts).clone()} on_dismiss={on_dismiss_toast} />
            </div>
        </ContextProvider<AppState>>
    }
}

fn seed_loop() -> Loop {
    Loop {
        uid: "loop-utrecht-east".to_string(),
        name: "Utrecht East".to_string(),
        total_hosts: 1,
    }
}

fn seed_all_loops() -> Vec<Loop> {
    vec![
        seed_loop(),
        Loop {
            uid: "loop-amsterdam-west".to_string(),
            name: "Amsterdam West".to_string(),
            total_hosts: 3,
        },
    ]
}

fn seed_members() -> Vec<User> {
    let loop_uid = seed_loop().uid;
    vec![
        User {
            uid: "u1".to_string(),
            name: "Alma Visser".to_string(),
            email: "alma@example.com".to_string(),
            phone_number: "+31 6 1234 5678".to_string(),
            address: "Oudegracht 12 Utrecht".to_string(),
            sizes: vec!["M".to_string(), "L".to_string()],
            is_root_admin: false,
            is_paused: false,
            chains: vec![UserChain {
                chain_uid: loop_uid.clone(),
                is_chain_admin: true,
                is_chain_warden: false,
            }],
        },
        User {
            uid: "u2".to_string(),
            name: "Bram de Jong".to_string(),
            email: "b***@example.com".to_string(),
            phone_number: "***".to_string(),
            address: "Biltstraat 4 Utrecht".to_string(),
            sizes: vec!["S".to_string()],
            is_root_admin: false,
            is_paused: true,
            chains: vec![UserChain {
                chain_uid: loop_uid.clone(),
                is_chain_admin: false,
                is_chain_warden: true,
            }],
        },
        User {
            uid: "u3".to_string(),
            name: "Chinwe Okafor".to_string(),
            email: "chinwe@example.com".to_string(),
            phone_number: String::new(),
            address: "Adelaarstraat 89 Utrecht".to_string(),
            sizes: vec!["XL".to_string()],
            is_root_admin: false,
            is_paused: false,
            chains: vec![UserChain {
                chain_uid: loop_uid,
                is_chain_admin: false,
                is_chain_warden: false,
            }],
        },
    ]
}

fn seed_channels() -> Vec<Channel> {
    vec![
        Channel::new("c1".to_string(), "General".to_string(), 1_000.0),
        Channel::new("c2".to_string(), "Bulky Items".to_string(), 2_000.0),
    ]
}

fn seed_posts() -> HashMap<String, PostList> {
    let now = js_sys::Date::now();
    let mut general = PostList::new();
    general.prepend_newest(Post {
        id: "p1".to_string(),
        user_id: String::new(),
        message: "Alma created the chat room \"General\"".to_string(),
        file_ids: Vec::new(),
        create_at: now - 180_000.0,
        kind: "system_generic".to_string(),
        username: String::new(),
    });
    general.prepend_newest(Post {
        id: "p2".to_string(),
        user_id: "u3".to_string(),
        message: "Hello everyone, the bag is with me this week!".to_string(),
        file_ids: Vec::new(),
        create_at: now - 120_000.0,
        kind: String::new(),
        username: String::new(),
    });

    let mut bulky = PostList::new();
    bulky.prepend_newest(Post {
        id: "p3".to_string(),
        user_id: "u1".to_string(),
        message: "Winter coat\n\nSize M, barely worn. Pick up near the Oudegracht."
            .to_string(),
        file_ids: vec!["seed-coat".to_string()],
        create_at: now - 60_000.0,
        kind: String::new(),
        username: String::new(),
    });

    let mut posts = HashMap::new();
    posts.insert("c1".to_string(), general);
    posts.insert("c2".to_string(), bulky);
    posts
}
