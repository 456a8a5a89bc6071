//! In-memory slice storage

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::application::ports::outbound::{SliceStorage, StorageError};

/// Process-local blob store. Used when nothing needs to survive a restart,
/// and by tests, which can make it refuse writes.
#[derive(Debug, Default)]
pub struct InMemorySliceStorage {
    blobs: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl InMemorySliceStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every `set` and `clear` is rejected as if the quota were full
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().map(|b| b.keys().cloned().collect()).unwrap_or_default();
        keys.sort();
        keys
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.blobs
            .lock()
            .map_err(|_| StorageError::Unavailable("storage lock poisoned".to_string()))
    }

    fn check_writable(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Rejected {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            });
        }
        Ok(())
    }
}

impl SliceStorage for InMemorySliceStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, blob: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        self.lock()?.insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        self.lock()?.remove(key);
        Ok(())
    }
}
