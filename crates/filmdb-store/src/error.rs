/// Errors from blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The blob key is not acceptable to any backend.
    #[error("invalid blob key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A finished temp file could not be moved into place.
    #[error("failed to persist blob {key}: {source}")]
    Persist {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A stored blob is not valid UTF-8 text.
    #[error("blob {key} is not valid UTF-8")]
    NotUtf8 { key: String },

    /// A lock guarding shared state was poisoned by a panicking writer.
    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),

    /// The store configuration is malformed or incomplete.
    #[error("invalid store configuration: {0}")]
    Config(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
