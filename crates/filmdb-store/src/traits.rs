use crate::error::StoreResult;

/// Key-value store holding one serialized collection per key.
///
/// All implementations must satisfy these invariants:
/// - `write` replaces the whole blob under a key.
/// - `read` returns exactly what the last `write` stored, or `None`.
/// - Keys are validated with [`crate::validate_key`] before use.
/// - All I/O errors are propagated, never silently ignored.
pub trait BlobStore: Send + Sync {
    /// Read the blob stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing has been written under that key.
    fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replace the blob stored under `key`.
    fn write(&self, key: &str, blob: &str) -> StoreResult<()>;

    /// Remove the blob under `key`. Returns `true` if it existed.
    fn remove(&self, key: &str) -> StoreResult<bool>;

    /// All keys currently holding a blob, sorted.
    fn keys(&self) -> StoreResult<Vec<String>>;

    /// Check whether a blob exists under `key`.
    fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.read(key)?.is_some())
    }

    /// Read `key`, falling back to `default` when nothing is stored.
    fn read_or(&self, key: &str, default: &str) -> StoreResult<String> {
        Ok(self.read(key)?.unwrap_or_else(|| default.to_string()))
    }
}

impl<S: BlobStore + ?Sized> BlobStore for Box<S> {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, blob: &str) -> StoreResult<()> {
        (**self).write(key, blob)
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        (**self).remove(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        (**self).keys()
    }
}
