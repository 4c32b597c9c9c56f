use std::{cell::RefCell, collections::HashMap, rc::Rc};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Minimal string key-value store, shaped after the browser `Storage` API.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove_item(&self, key: &str) -> Result<(), String>;
}

#[derive(Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), String> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::{local_storage, window, BrowserStorage};

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::KeyValueStore;
    use web_sys::{Storage, Window};

    pub fn window() -> Result<Window, String> {
        web_sys::window().ok_or_else(|| "No window object".to_string())
    }

    pub fn local_storage() -> Result<Storage, String> {
        window()?
            .local_storage()
            .map_err(|_| "No localStorage".to_string())?
            .ok_or_else(|| "No localStorage".to_string())
    }

    pub struct BrowserStorage {
        storage: Storage,
    }

    impl BrowserStorage {
        pub fn local() -> Result<Self, String> {
            Ok(Self {
                storage: local_storage()?,
            })
        }
    }

    impl KeyValueStore for BrowserStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, String> {
            self.storage
                .get_item(key)
                .map_err(|_| format!("Failed to read {key}"))
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
            self.storage
                .set_item(key, value)
                .map_err(|_| format!("Failed to write {key}"))
        }

        fn remove_item(&self, key: &str) -> Result<(), String> {
            self.storage
                .remove_item(key)
                .map_err(|_| format!("Failed to remove {key}"))
        }
    }
}
