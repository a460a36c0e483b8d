//! Browser LocalStorage backend for the persistence port

use crate::persistence::Store;

/// `window.localStorage`, if the page has one.
///
/// Natively there is no LocalStorage; every read misses and writes are
/// dropped, so the game behaves like a fresh install.
#[derive(Debug, Default)]
pub struct LocalStore {
    #[cfg(target_arch = "wasm32")]
    storage: Option<web_sys::Storage>,
}

impl LocalStore {
    #[cfg(target_arch = "wasm32")]
    pub fn open() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable, progress will not be saved");
        }
        Self { storage }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn open() -> Self {
        Self::default()
    }

    /// Whether writes will actually persist
    pub fn is_available(&self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            self.storage.is_some()
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            false
        }
    }
}

impl Store for LocalStore {
    #[cfg(target_arch = "wasm32")]
    fn get(&self, key: &str) -> Option<String> {
        self.storage
            .as_ref()
            .and_then(|s| s.get_item(key).ok())
            .flatten()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    #[cfg(target_arch = "wasm32")]
    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if storage.set_item(key, value).is_err() {
                log::warn!("Failed to write {key} to LocalStorage");
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn set(&mut self, _key: &str, _value: &str) {
        // No-op for native
    }
}
