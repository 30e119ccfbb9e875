/// Site Mute - Firefox extension that mutes every tab of a site
/// Built with Rust + WASM + Yew

mod browser;
mod config;
mod domain;
mod error;
mod events;
mod host;
mod muted_set;
mod reconciler;
mod storage;
mod tab_data;
pub mod ui;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::browser::BrowserHost;
use crate::config::Config;
use crate::events::Event;
use crate::reconciler::Reconciler;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export domain parsing for JavaScript access
#[wasm_bindgen]
pub fn domain_of(url: &str) -> Option<String> {
    domain::domain_of(url)
}

// Start the background page: queue startup, wire listeners, run the handler loop
#[wasm_bindgen]
pub fn start_background() {
    let (queue, events) = events::channel();
    queue.push(Event::Startup);
    browser::install_listeners(&queue);

    spawn_local(async move {
        let host = BrowserHost;
        let config = Config::default();
        let settings = storage::load_settings(&host, &config.settings_key).await;

        let mut reconciler = Reconciler::new(host, config, settings);
        events::run(&mut reconciler, events).await;
    });
}

// Start the Yew app for the options page
#[wasm_bindgen]
pub fn start_options() {
    yew::Renderer::<ui::options::OptionsPage>::new().render();
}
