use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const API_BASE_URL_ENV: &str = "MENTORSHIP_API_BASE_URL";
pub const TIME_ZONE_ENV: &str = "MENTORSHIP_TIME_ZONE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub api_base_url: Option<String>,
    pub time_zone: Option<String>,
}

impl RuntimeConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            api_base_url: non_empty(API_BASE_URL_ENV),
            time_zone: non_empty(TIME_ZONE_ENV),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Fills unset fields from `other`.
    pub fn or(self, other: RuntimeConfig) -> Self {
        Self {
            api_base_url: self.api_base_url.or(other.api_base_url),
            time_zone: self.time_zone.or(other.time_zone),
        }
    }

    pub fn resolved_api_base_url(&self) -> String {
        self.api_base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }

    pub fn resolved_time_zone(&self) -> Tz {
        parse_time_zone(self.time_zone.as_deref())
    }
}

pub fn parse_time_zone(name: Option<&str>) -> Tz {
    match name {
        None => Tz::UTC,
        Some(name) => name.trim().parse::<Tz>().unwrap_or_else(|_| {
            log::warn!("unknown time zone {name:?}, falling back to UTC");
            Tz::UTC
        }),
    }
}

static RUNTIME_CONFIG: OnceLock<RuntimeConfig> = OnceLock::new();

pub fn current_config() -> Option<&'static RuntimeConfig> {
    RUNTIME_CONFIG.get()
}

pub fn current_time_zone() -> Tz {
    current_config()
        .map(RuntimeConfig::resolved_time_zone)
        .unwrap_or(Tz::UTC)
}

pub async fn await_api_base_url() -> String {
    load().await.resolved_api_base_url()
}

pub async fn init() {
    let config = load().await;
    log::info!(
        "runtime config initialized: api_base_url={}, time_zone={}",
        config.resolved_api_base_url(),
        config.resolved_time_zone()
    );
}

async fn load() -> &'static RuntimeConfig {
    if let Some(cached) = RUNTIME_CONFIG.get() {
        return cached;
    }
    let loaded = discover().await;
    RUNTIME_CONFIG.get_or_init(|| loaded)
}

#[cfg(not(target_arch = "wasm32"))]
async fn discover() -> RuntimeConfig {
    RuntimeConfig::from_env()
}

#[cfg(target_arch = "wasm32")]
async fn discover() -> RuntimeConfig {
    let from_globals = browser::from_window_global("__MENTORSHIP_ENV")
        .or(browser::from_window_global("__MENTORSHIP_CONFIG"));
    if from_globals.api_base_url.is_some() && from_globals.time_zone.is_some() {
        return from_globals;
    }
    match browser::fetch_runtime_config().await {
        Some(fetched) => from_globals.or(fetched),
        None => from_globals,
    }
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::RuntimeConfig;

    fn read_key(obj: &js_sys::Object, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| {
            js_sys::Reflect::get(obj, &(*key).into())
                .ok()
                .filter(|v| !v.is_undefined() && !v.is_null())
                .and_then(|v| v.as_string())
        })
    }

    pub fn from_window_global(name: &str) -> RuntimeConfig {
        let Some(window) = web_sys::window() else {
            return RuntimeConfig::default();
        };
        let any = match js_sys::Reflect::get(&window, &name.into()) {
            Ok(value) if !value.is_undefined() && !value.is_null() => value,
            _ => return RuntimeConfig::default(),
        };
        let obj = js_sys::Object::from(any);
        RuntimeConfig {
            api_base_url: read_key(&obj, &["API_BASE_URL", "api_base_url"]),
            time_zone: read_key(&obj, &["TIME_ZONE", "time_zone"]),
        }
    }

    pub async fn fetch_runtime_config() -> Option<RuntimeConfig> {
        let origin = web_sys::window()?.location().origin().ok()?;
        let resp = reqwest::get(format!("{origin}/config.json")).await.ok()?;
        if !resp.status().is_success() {
            return None;
        }
        resp.json::<RuntimeConfig>().await.ok()
    }
}
