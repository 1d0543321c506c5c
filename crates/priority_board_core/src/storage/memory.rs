//! In-memory key-value storage.
//!
//! Holds values for the lifetime of the process. Switches for disabling the
//! store and capping its size let callers exercise the failure paths of the
//! board store without a real backend.

use super::{KeyValueStorage, StorageError, StorageResult};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Process-local storage backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
    disabled: Cell<bool>,
    quota_bytes: Cell<Option<usize>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call fail with `StorageError::Unavailable`.
    pub fn disable(&self) {
        self.disabled.set(true);
    }

    pub fn enable(&self) {
        self.disabled.set(false);
    }

    /// Caps the total size (keys plus values, in bytes) of stored entries.
    pub fn set_quota(&self, limit: Option<usize>) {
        self.quota_bytes.set(limit);
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn ensure_enabled(&self) -> StorageResult<()> {
        if self.disabled.get() {
            return Err(StorageError::Unavailable);
        }
        Ok(())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.ensure_enabled()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.ensure_enabled()?;
        let mut entries = self.entries.borrow_mut();

        if let Some(limit) = self.quota_bytes.get() {
            let others: usize = entries
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(existing, stored)| existing.len() + stored.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded { needed, limit });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.ensure_enabled()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStorage;
    use crate::storage::{KeyValueStorage, StorageError};

    #[test]
    fn set_get_remove_roundtrip() {
        let storage = MemoryStorage::new();
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
        storage.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);
        storage.remove("k").unwrap();
    }

    #[test]
    fn disabled_storage_rejects_every_call() {
        let storage = MemoryStorage::new();
        storage.disable();
        assert!(matches!(storage.get("k"), Err(StorageError::Unavailable)));
        assert!(matches!(storage.set("k", "v"), Err(StorageError::Unavailable)));
        assert!(matches!(storage.remove("k"), Err(StorageError::Unavailable)));
    }

    #[test]
    fn quota_counts_replaced_value_once() {
        let storage = MemoryStorage::new();
        storage.set_quota(Some(10));
        storage.set("key", "1234567").unwrap();
        storage.set("key", "7654321").unwrap();
        let err = storage.set("key", "12345678").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                needed: 11,
                limit: 10
            }
        ));
        assert_eq!(storage.get("key").unwrap().as_deref(), Some("7654321"));
    }
}
