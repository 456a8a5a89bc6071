//! Storage factory - picks the slice storage adapter from configuration

use std::sync::Arc;

use anyhow::{Context, Result};

use super::{InMemorySliceStorage, JsonFileSliceStorage};
use crate::application::ports::outbound::SliceStorage;
use crate::infrastructure::config::{AppConfig, StorageBackend};

pub fn build_storage(config: &AppConfig) -> Result<Arc<dyn SliceStorage>> {
    let storage: Arc<dyn SliceStorage> = match config.storage_backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory slice storage");
            Arc::new(InMemorySliceStorage::new())
        }
        StorageBackend::File => {
            let storage = JsonFileSliceStorage::open(&config.storage_dir).with_context(|| {
                format!("Failed to open slice directory {}", config.storage_dir.display())
            })?;
            tracing::info!("Using file slice storage at {}", config.storage_dir.display());
            Arc::new(storage)
        }
    };
    Ok(storage)
}
