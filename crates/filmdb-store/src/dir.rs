//! Directory-backed blob store.
//!
//! Layout:
//! ```text
//! <root>/
//!   people.json
//!   publishers.json
//!   movies.json
//!   ...
//! ```
//!
//! Writes go to a temp file in `<root>` that is renamed over the target, so a
//! reader never sees a half-written blob.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::keys::validate_key;
use crate::traits::BlobStore;

const BLOB_EXTENSION: &str = "json";

/// Blob store keeping one `<key>.json` file per blob.
#[derive(Debug, Clone)]
pub struct DirBlobStore {
    root: PathBuf,
}

impl DirBlobStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "directory blob store opened");
        Ok(Self { root })
    }

    /// The directory holding the blob files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.{BLOB_EXTENSION}")))
    }
}

impl BlobStore for DirBlobStore {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|_| StoreError::NotUtf8 {
                    key: key.to_string(),
                }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, blob: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(blob.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StoreError::Persist {
            key: key.to_string(),
            source: e.error,
        })?;
        debug!(key, bytes = blob.len(), path = %path.display(), "blob written");
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(BLOB_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if validate_key(stem).is_ok() {
                keys.push(stem.to_string());
            } else {
                warn!(path = %path.display(), "ignoring file with invalid blob key");
            }
        }
        keys.sort();
        Ok(keys)
    }
}
