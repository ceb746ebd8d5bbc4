use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::keys::validate_key;
use crate::traits::BlobStore;

/// In-memory, HashMap-based blob store.
///
/// Intended for tests and embedding. Blobs are held behind a `RwLock` and
/// cloned on read. Data is lost when the store is dropped.
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, String>>,
}

impl InMemoryBlobStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> StoreResult<usize> {
        let map = self
            .blobs
            .read()
            .map_err(|_| StoreError::LockPoisoned("len"))?;
        Ok(map.len())
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Total bytes across all stored blobs.
    pub fn total_bytes(&self) -> StoreResult<u64> {
        let map = self
            .blobs
            .read()
            .map_err(|_| StoreError::LockPoisoned("total_bytes"))?;
        Ok(map.values().map(|b| b.len() as u64).sum())
    }

    /// Remove all blobs from the store.
    pub fn clear(&self) -> StoreResult<()> {
        self.blobs
            .write()
            .map_err(|_| StoreError::LockPoisoned("clear"))?
            .clear();
        Ok(())
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        validate_key(key)?;
        let map = self
            .blobs
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(map.get(key).cloned())
    }

    fn write(&self, key: &str, blob: &str) -> StoreResult<()> {
        validate_key(key)?;
        let mut map = self
            .blobs
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;
        map.insert(key.to_string(), blob.to_string());
        debug!(key, bytes = blob.len(), "blob written");
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        validate_key(key)?;
        let mut map = self
            .blobs
            .write()
            .map_err(|_| StoreError::LockPoisoned("remove"))?;
        Ok(map.remove(key).is_some())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let map = self
            .blobs
            .read()
            .map_err(|_| StoreError::LockPoisoned("keys"))?;
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("blob_count", &self.len().ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Core read/write
    // -----------------------------------------------------------------------

    #[test]
    fn write_and_read_blob() {
        let store = InMemoryBlobStore::new();
        store.write("people", r#"{"1":{"personId":1}}"#).unwrap();
        assert_eq!(
            store.read("people").unwrap().as_deref(),
            Some(r#"{"1":{"personId":1}}"#)
        );
    }

    #[test]
    fn write_replaces_whole_blob() {
        let store = InMemoryBlobStore::new();
        store.write("movies", "{\"a\":1}").unwrap();
        store.write("movies", "{}").unwrap();
        assert_eq!(store.read("movies").unwrap().as_deref(), Some("{}"));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn read_missing_blob_returns_none() {
        let store = InMemoryBlobStore::new();
        assert!(store.read("publishers").unwrap().is_none());
        assert_eq!(store.read_or("publishers", "{}").unwrap(), "{}");
    }

    // -----------------------------------------------------------------------
    // Exists / Remove / Keys
    // -----------------------------------------------------------------------

    #[test]
    fn remove_present_and_missing() {
        let store = InMemoryBlobStore::new();
        store.write("actors", "{}").unwrap();
        assert!(store.exists("actors").unwrap());
        assert!(store.remove("actors").unwrap());
        assert!(!store.exists("actors").unwrap());
        assert!(!store.remove("actors").unwrap());
    }

    #[test]
    fn keys_are_sorted() {
        let store = InMemoryBlobStore::new();
        store.write("publishers", "{}").unwrap();
        store.write("movies", "{}").unwrap();
        store.write("actors", "{}").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["actors", "movies", "publishers"]);
    }

    #[test]
    fn clear_and_byte_count() {
        let store = InMemoryBlobStore::new();
        store.write("people", "12345").unwrap();
        store.write("movies", "123").unwrap();
        assert_eq!(store.total_bytes().unwrap(), 8);
        store.clear().unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn invalid_key_is_rejected() {
        let store = InMemoryBlobStore::new();
        let err = store.write("../people", "{}").unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey { .. }));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let store = std::sync::Arc::new(InMemoryBlobStore::new());
        let writer = std::sync::Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = writer.blobs.write().unwrap();
            panic!("writer panicked while holding the lock");
        })
        .join();

        assert!(matches!(store.len(), Err(StoreError::LockPoisoned("len"))));
        assert!(matches!(
            store.total_bytes(),
            Err(StoreError::LockPoisoned("total_bytes"))
        ));
        assert!(store.is_empty().is_err());
        assert!(store.read("people").is_err());
    }

    #[test]
    fn boxed_store_delegates() {
        let store: Box<dyn BlobStore> = Box::new(InMemoryBlobStore::new());
        store.write("directors", "{}").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["directors"]);
    }
}
