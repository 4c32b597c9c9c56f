use std::rc::Rc;

use crate::{
    api::{ApiError, TokenPair},
    utils::storage::{KeyValueStore, MemoryStorage, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY},
};

/// Owns the persisted token pair. Cloning shares the underlying storage.
#[derive(Clone)]
pub struct Session {
    storage: Rc<dyn KeyValueStore>,
}

impl Default for Session {
    fn default() -> Self {
        Self::local()
    }
}

impl Session {
    pub fn new(storage: Rc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Rc::new(MemoryStorage::new()))
    }

    /// Browser `localStorage` when available, memory otherwise.
    #[cfg(target_arch = "wasm32")]
    pub fn local() -> Self {
        match crate::utils::storage::BrowserStorage::local() {
            Ok(storage) => Self::new(Rc::new(storage)),
            Err(err) => {
                log::warn!("{}, keeping tokens in memory", err);
                Self::in_memory()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn local() -> Self {
        Self::in_memory()
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(err) => {
                log::warn!("{}", err);
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), ApiError> {
        self.storage.set_item(key, value).map_err(ApiError::storage)
    }

    pub fn access_token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN_KEY)
    }

    pub fn tokens(&self) -> Option<TokenPair> {
        Some(TokenPair {
            access: self.access_token()?,
            refresh: self.refresh_token()?,
        })
    }

    pub fn store_tokens(&self, tokens: &TokenPair) -> Result<(), ApiError> {
        self.store_access_token(&tokens.access)?;
        self.store_refresh_token(&tokens.refresh)
    }

    pub fn store_access_token(&self, token: &str) -> Result<(), ApiError> {
        self.write(ACCESS_TOKEN_KEY, token)
    }

    pub fn store_refresh_token(&self, token: &str) -> Result<(), ApiError> {
        self.write(REFRESH_TOKEN_KEY, token)
    }

    /// Removes both tokens. Failures are logged; teardown never aborts.
    pub fn clear(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if let Err(err) = self.storage.remove_item(key) {
                log::warn!("{}", err);
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }
}
