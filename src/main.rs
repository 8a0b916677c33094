use deskterm::app::App;
use deskterm::utils::console;
use leptos::prelude::*;
use log::LevelFilter;
use wasm_bindgen::JsCast;

fn main() {
    console_error_panic_hook::set_once();
    console::init(if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });

    match document().get_element_by_id("app") {
        Some(root) => mount_to(root.unchecked_into::<web_sys::HtmlElement>(), App).forget(),
        None => {
            log::warn!("#app element missing, mounting to body");
            mount_to_body(App);
        }
    }
}
