//! Whole-collection blob storage for filmdb.
//!
//! The model layer persists each entity collection as a single JSON blob
//! under a fixed key (`"people"`, `"movies"`, ...). This crate defines that
//! collaborator as the [`BlobStore`] trait and ships two backends.
//!
//! # Storage Backends
//!
//! - [`InMemoryBlobStore`] -- `HashMap`-based store for tests and embedding
//! - [`DirBlobStore`] -- one `<key>.json` file per blob under a root directory
//!
//! # Design Rules
//!
//! 1. Blobs are opaque strings; the store never parses them.
//! 2. A blob is replaced wholesale on every write; there are no partial updates.
//! 3. Keys are validated before any backend is touched.
//! 4. A missing blob reads as `None`, never as an error.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod config;
pub mod dir;
pub mod error;
pub mod keys;
pub mod memory;
pub mod traits;

pub use config::{StoreBackend, StoreConfig};
pub use dir::DirBlobStore;
pub use error::{StoreError, StoreResult};
pub use keys::validate_key;
pub use memory::InMemoryBlobStore;
pub use traits::BlobStore;
