//! Persistence bridge: keeps the element list in a blob store.

use super::record::{records_from_json, records_to_json};
use super::{BlobStore, StorageError, StorageResult};
use crate::config::WritePolicy;
use crate::elements::Element;

/// Serializes the element list to a fixed key of a [`BlobStore`].
///
/// Writes are fire-and-forget: a failed write is logged and leaves the bridge
/// dirty so the next commit retries it.
pub struct PersistenceBridge<S: BlobStore> {
    store: S,
    key: String,
    policy: WritePolicy,
    /// Whether the store lags behind the editor.
    dirty: bool,
}

impl<S: BlobStore> PersistenceBridge<S> {
    pub fn new(store: S, key: impl Into<String>, policy: WritePolicy) -> Self {
        Self {
            store,
            key: key.into(),
            policy,
            dirty: false,
        }
    }

    /// Mark the stored value as out of date.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the full ordered list, replacing the previous value.
    /// Returns false if the write failed.
    pub fn save(&mut self, elements: &[Element]) -> bool {
        match self.try_save(elements) {
            Ok(()) => {
                self.dirty = false;
                true
            }
            Err(e) => {
                log::error!("Failed to persist {} elements under {}: {}", elements.len(), self.key, e);
                self.dirty = true;
                false
            }
        }
    }

    fn try_save(&self, elements: &[Element]) -> StorageResult<()> {
        let json = records_to_json(elements, false).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store.set(&self.key, &json)
    }

    /// Record an intermediate gesture step according to the write policy.
    pub fn gesture_step(&mut self, elements: &[Element]) {
        match self.policy {
            WritePolicy::Immediate => {
                self.save(elements);
            }
            WritePolicy::Coalesce => self.mark_dirty(),
        }
    }

    /// Write if anything is pending. Returns false only if a write failed.
    pub fn flush(&mut self, elements: &[Element]) -> bool {
        if self.dirty { self.save(elements) } else { true }
    }

    /// Read the stored list. An absent key is an empty list.
    pub fn load(&self, line_thickness: f64) -> StorageResult<Vec<Element>> {
        let Some(json) = self.store.get(&self.key)? else {
            log::info!("No saved layout under {}", self.key);
            return Ok(Vec::new());
        };
        let elements = records_from_json(&json, line_thickness).inspect_err(|e| {
            log::warn!("Discarding unreadable layout under {}: {}", self.key, e);
        })?;
        log::info!("Loaded {} elements from {}", elements.len(), self.key);
        Ok(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementId, ElementKind};
    use crate::geometry::LINE_THICKNESS;
    use crate::storage::MemoryBlobStore;
    use kurbo::{Point, Size};
    use std::sync::Arc;

    struct FailingStore;

    impl BlobStore for FailingStore {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }

        fn set(&self, key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Io(format!("disk full writing {}", key)))
        }

        fn remove(&self, _key: &str) -> StorageResult<()> {
            Ok(())
        }
    }

    fn elements() -> Vec<Element> {
        vec![Element::new(
            ElementId(1),
            ElementKind::Rectangle,
            Point::new(60.0, 60.0),
            Size::new(120.0, 80.0),
            LINE_THICKNESS,
        )]
    }

    #[test]
    fn test_save_then_load() {
        let mut bridge = PersistenceBridge::new(MemoryBlobStore::new(), "k", WritePolicy::Immediate);
        assert!(bridge.load(LINE_THICKNESS).unwrap().is_empty());
        assert!(bridge.save(&elements()));
        assert_eq!(bridge.load(LINE_THICKNESS).unwrap(), elements());
    }

    #[test]
    fn test_coalesce_defers_until_flush() {
        let store = Arc::new(MemoryBlobStore::new());
        let mut bridge = PersistenceBridge::new(Arc::clone(&store), "k", WritePolicy::Coalesce);
        bridge.gesture_step(&elements());
        assert!(bridge.is_dirty());
        assert!(store.is_empty());
        assert!(bridge.flush(&elements()));
        assert!(!bridge.is_dirty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_failed_write_stays_dirty() {
        let mut bridge = PersistenceBridge::new(FailingStore, "k", WritePolicy::Immediate);
        assert!(!bridge.save(&elements()));
        assert!(bridge.is_dirty());
    }

    #[test]
    fn test_corrupt_blob_is_serialization_error() {
        let store = MemoryBlobStore::new();
        store.set("k", "[{\"id\":").unwrap();
        let bridge = PersistenceBridge::new(store, "k", WritePolicy::Immediate);
        assert!(matches!(bridge.load(LINE_THICKNESS), Err(StorageError::Serialization(_))));
    }
}
