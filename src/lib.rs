mod app;
mod auth;
mod bulky_modal;
mod channel_strip;
mod chat_window;
mod components;
mod composer;
mod debounce;
mod delete_survey;
mod gesture;
mod members;
mod message_feed;
mod new_loop;
mod post_view;
mod store;
mod types;
mod upload;
mod user_card;

use app::App;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn run_app() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("starting loop rooms client");
    yew::Renderer::<App>::new().render();
}
