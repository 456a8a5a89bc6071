//! Slice storage port - the key/value blob store slices persist into

/// Failures of the storage collaborator. None of these are fatal: the
/// in-memory slice stays authoritative and the caller sees a warning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage rejected write for {key}: {reason}")]
    Rejected { key: String, reason: String },
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Opaque per-key blob store (browser local storage, a directory, memory).
///
/// Calls are synchronous and expected to be cheap; no call may block a
/// UI mutation for long.
pub trait SliceStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, blob: &str) -> Result<(), StorageError>;
    fn clear(&self, key: &str) -> Result<(), StorageError>;
}
