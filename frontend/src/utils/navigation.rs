pub const LOGIN_PATH: &str = "/login";

/// Client-side navigation used when the session can no longer be recovered.
pub trait Navigator {
    fn redirect_to_login(&self);
}

/// Navigates the browser window; outside the browser it only logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowNavigator;

impl Navigator for WindowNavigator {
    #[cfg(target_arch = "wasm32")]
    fn redirect_to_login(&self) {
        if let Some(window) = web_sys::window() {
            let location = window.location();
            if let Ok(pathname) = location.pathname() {
                if pathname == LOGIN_PATH {
                    return;
                }
            }
            if location.set_href(LOGIN_PATH).is_err() {
                log::warn!("failed to navigate to {LOGIN_PATH}");
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn redirect_to_login(&self) {
        log::info!("login required, navigation to {LOGIN_PATH} requested");
    }
}
