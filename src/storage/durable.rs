//! Durable key/value store port and the in-memory implementation

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// String-keyed persistence that survives restarts of the process
pub trait DurableStore: Send {
    /// Read a value; unreadable storage reads as absent
    fn get_item(&self, key: &str) -> Option<String>;

    /// Write a value, overwriting any previous entry
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), String>;

    /// Remove a value; removing a missing key is not an error
    fn remove_item(&mut self, key: &str) -> Result<(), String>;
}

/// Shared in-memory store. Clones see the same entries, which lets tests
/// simulate a reload by handing a clone to a fresh controller.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the store currently holds the key
    pub fn contains(&self, key: &str) -> bool {
        self.get_item(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DurableStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), String> {
        let mut entries = self.entries.lock()
            .map_err(|e| format!("Failed to lock memory store: {}", e))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), String> {
        let mut entries = self.entries.lock()
            .map_err(|e| format!("Failed to lock memory store: {}", e))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let mut store = MemoryStore::new();
        let view = store.clone();

        store.set_item("timeLeft", "42").unwrap();
        assert_eq!(view.get_item("timeLeft").as_deref(), Some("42"));

        store.remove_item("timeLeft").unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn removing_missing_key_is_ok() {
        let mut store = MemoryStore::new();
        assert!(store.remove_item("nope").is_ok());
    }
}
