// In-process cache, for tests and runs that must not touch disk.

use dashmap::DashMap;
use serde_json::Value;

use super::ListCache;

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, Value>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ListCache for MemoryCache {
    fn load(&self, key: &str) -> Option<Value> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn store(&self, key: &str, value: &Value) {
        self.entries.insert(key.to_owned(), value.clone());
    }

    fn clear(&self, key: &str) {
        self.entries.remove(key);
    }

    fn clear_all(&self) {
        self.entries.clear();
    }
}
