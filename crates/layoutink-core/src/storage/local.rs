//! Browser `localStorage` blob store.

use super::{BlobStore, StorageError, StorageResult};

/// Store backed by `window.localStorage`.
pub struct LocalStorageBlobStore {
    storage: web_sys::Storage,
}

impl LocalStorageBlobStore {
    /// Open the window's `localStorage`.
    pub fn new() -> StorageResult<Self> {
        let window = web_sys::window().ok_or_else(|| StorageError::Other("No window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Other(format!("localStorage unavailable: {:?}", e)))?
            .ok_or_else(|| StorageError::Other("localStorage unavailable".to_string()))?;
        Ok(Self { storage })
    }
}

impl BlobStore for LocalStorageBlobStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {:?}", key, e)))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {:?}", key, e)))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Io(format!("Failed to delete {}: {:?}", key, e)))
    }
}
