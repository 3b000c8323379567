//! In-memory blob store.

use super::{BlobStore, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory store for tests and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, String>>,
}

impl MemoryBlobStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.blobs.read().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let blobs = self
            .blobs
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        Ok(blobs.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        blobs.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_set_and_get() {
        let store = MemoryBlobStore::new();
        store.set("layout", "[]").unwrap();
        assert_eq!(store.get("layout").unwrap().as_deref(), Some("[]"));
        store.set("layout", "[1]").unwrap();
        assert_eq!(store.get("layout").unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_missing_key() {
        let store = MemoryBlobStore::new();
        assert_eq!(store.get("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_remove() {
        let store = MemoryBlobStore::new();
        store.set("layout", "[]").unwrap();
        store.remove("layout").unwrap();
        store.remove("layout").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_shared_behind_arc() {
        let store = Arc::new(MemoryBlobStore::new());
        let writer = Arc::clone(&store);
        writer.set("k", "v").unwrap();
        assert_eq!(BlobStore::get(&store, "k").unwrap().as_deref(), Some("v"));
    }
}
