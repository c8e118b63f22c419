use std::cell::RefCell;
use std::collections::HashMap;

use web_sys::Storage;

use crate::error::StorageError;
use crate::post::Id;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

pub fn like_key(id: Id) -> String {
    format!("blog-{}-liked", id)
}

/// Anything other than a stored `true` reads as not liked.
pub fn load_liked(store: &dyn KeyValueStore, id: Id) -> bool {
    match store.get(&like_key(id)) {
        Some(raw) => serde_json::from_str::<bool>(&raw).unwrap_or_else(|_| {
            log::warn!("ignoring unreadable like flag {:?} for blog {}", raw, id);
            false
        }),
        None => false,
    }
}

pub fn save_liked(store: &dyn KeyValueStore, id: Id, liked: bool) -> Result<(), StorageError> {
    store.set(&like_key(id), if liked { "true" } else { "false" })
}

/// `window.localStorage`.
pub struct LocalStore {
    storage: Storage,
}

impl LocalStore {
    pub fn new(storage: Storage) -> Self {
        LocalStore { storage }
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|err| StorageError::Rejected(format!("{:?}", err)))
    }
}

#[derive(Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
