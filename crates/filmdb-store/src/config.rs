use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dir::DirBlobStore;
use crate::error::{StoreError, StoreResult};
use crate::memory::InMemoryBlobStore;
use crate::traits::BlobStore;

/// Which backend holds the blobs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process memory; nothing survives the process.
    #[default]
    Memory,
    /// One JSON file per blob under `root`.
    Directory,
}

/// Configuration selecting and locating the blob store.
///
/// ```toml
/// backend = "directory"
/// root = "./filmdb-data"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Root directory; required for the directory backend.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

impl StoreConfig {
    /// An in-memory configuration.
    pub fn memory() -> Self {
        Self::default()
    }

    /// A directory configuration rooted at `root`.
    pub fn directory(root: impl Into<PathBuf>) -> Self {
        Self {
            backend: StoreBackend::Directory,
            root: Some(root.into()),
        }
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> StoreResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| StoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the selected backend has everything it needs.
    pub fn validate(&self) -> StoreResult<()> {
        if self.backend == StoreBackend::Directory && self.root.is_none() {
            return Err(StoreError::Config(
                "the directory backend requires a `root` path".into(),
            ));
        }
        Ok(())
    }

    /// Open the configured store.
    pub fn open(&self) -> StoreResult<Box<dyn BlobStore>> {
        self.validate()?;
        match (&self.backend, &self.root) {
            (StoreBackend::Directory, Some(root)) => {
                info!(root = %root.display(), "opening directory blob store");
                Ok(Box::new(DirBlobStore::open(root.clone())?))
            }
            _ => {
                info!("opening in-memory blob store");
                Ok(Box::new(InMemoryBlobStore::new()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_memory() {
        let c = StoreConfig::default();
        assert_eq!(c.backend, StoreBackend::Memory);
        assert!(c.root.is_none());
    }

    #[test]
    fn parse_directory_config() {
        let c = StoreConfig::from_toml_str("backend = \"directory\"\nroot = \"/tmp/films\"\n").unwrap();
        assert_eq!(c, StoreConfig::directory("/tmp/films"));
    }

    #[test]
    fn empty_toml_means_memory() {
        assert_eq!(StoreConfig::from_toml_str("").unwrap(), StoreConfig::memory());
    }

    #[test]
    fn directory_without_root_is_rejected() {
        let err = StoreConfig::from_toml_str("backend = \"directory\"").unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(StoreConfig::from_toml_str("backend = \"memory\"\nsize = 3").is_err());
        assert!(StoreConfig::from_toml_str("backend = \"cloud\"").is_err());
    }

    #[test]
    fn open_directory_store_writes_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = StoreConfig::directory(dir.path()).open().unwrap();
        store.write("movies", "{}").unwrap();
        assert!(dir.path().join("movies.json").is_file());
    }

    #[test]
    fn open_memory_store() {
        let store = StoreConfig::memory().open().unwrap();
        assert!(store.keys().unwrap().is_empty());
    }
}
