//! `window.localStorage` as a [`KeyValueStore`]

use tracing::warn;
use wasm_bindgen::JsValue;
use web_sys::Storage;

use crate::store::{KeyValueStore, MemoryStore, StoreError, StoreResult};

/// Browser local storage
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// Opens the current window's local storage
    pub fn open() -> StoreResult<Self> {
        let window =
            web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(unavailable)?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".into()))?;
        Ok(Self { storage })
    }
}

fn unavailable(err: JsValue) -> StoreError {
    StoreError::Unavailable(format!("{err:?}"))
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.storage.get_item(key).map_err(unavailable)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.storage.set_item(key, value).map_err(unavailable)
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.storage.remove_item(key).map_err(unavailable)
    }
}

/// Local storage when the page allows it, memory otherwise
#[derive(Debug, Clone)]
pub enum PageStore {
    /// Persistent browser storage
    Local(LocalStorage),
    /// Session-only fallback
    Memory(MemoryStore),
}

impl PageStore {
    /// Opens local storage, falling back to memory with a warning
    #[must_use]
    pub fn open() -> Self {
        match LocalStorage::open() {
            Ok(local) => Self::Local(local),
            Err(e) => {
                warn!(error = %e, "local storage unavailable, history will not persist");
                Self::Memory(MemoryStore::new())
            }
        }
    }
}

impl KeyValueStore for PageStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match self {
            Self::Local(s) => s.get(key),
            Self::Memory(s) => s.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        match self {
            Self::Local(s) => s.set(key, value),
            Self::Memory(s) => s.set(key, value),
        }
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        match self {
            Self::Local(s) => s.remove(key),
            Self::Memory(s) => s.remove(key),
        }
    }
}
