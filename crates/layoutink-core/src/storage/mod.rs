//! Persistence: key-value blob stores and the bridge that keeps the element
//! list in one of them.

mod bridge;
mod memory;
mod record;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(target_arch = "wasm32")]
mod local;

pub use bridge::PersistenceBridge;
pub use memory::MemoryBlobStore;
pub use record::{ElementRecord, RecordError, records_from_json, records_to_json};

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileBlobStore;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorageBlobStore;

use std::sync::Arc;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Key not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A string-keyed store of string blobs.
///
/// Implementations keep values in memory, in files, or in the browser's
/// `localStorage`. All operations are synchronous.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait BlobStore: Send + Sync {
    /// Read the value under `key`; `Ok(None)` when absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete the value under `key`. Deleting an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// A string-keyed store of string blobs (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait BlobStore {
    /// Read the value under `key`; `Ok(None)` when absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete the value under `key`. Deleting an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<S: BlobStore + ?Sized> BlobStore for Arc<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}
