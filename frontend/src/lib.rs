pub mod api;
pub mod config;
pub mod pages;
pub mod state;
pub mod utils;

pub use api::{ApiClient, ApiError, ErrorKind};
pub use state::{auth::AuthContext, session::Session};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    log::info!("starting mentorship frontend (wasm)");

    // window.__MENTORSHIP_ENV wins over ./config.json when both are present.
    wasm_bindgen_futures::spawn_local(async move {
        config::init().await;
        let auth = AuthContext::new(ApiClient::new());
        auth.init().await;
        log::info!("session restored: {}", auth.is_authenticated());
    });
}
