//! Session-scoped scratch storage.

use dashmap::DashMap;

/// String key-value store that lives as long as the page session.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str) -> Option<String>;
}

/// In-memory session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: DashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).map(|r| r.value().clone())
    }

    fn set(&self, key: &str, value: String) {
        self.inner.insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) -> Option<String> {
        self.inner.remove(key).map(|(_, v)| v)
    }
}
