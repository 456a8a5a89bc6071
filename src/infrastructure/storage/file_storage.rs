//! Directory-backed slice storage: one `<key>.json` file per slice

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::application::ports::outbound::{SliceStorage, StorageError};

#[derive(Debug, Clone)]
pub struct JsonFileSliceStorage {
    dir: PathBuf,
}

impl JsonFileSliceStorage {
    /// Use `dir` for slice files, creating it if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            StorageError::Unavailable(format!("cannot create {}: {}", dir.display(), e))
        })?;
        debug!(dir = %dir.display(), "Opened slice directory");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid {
            return Err(StorageError::Rejected {
                key: key.to_string(),
                reason: "keys may only contain lowercase letters, digits and '-'".to_string(),
            });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_error(key: &str, e: std::io::Error) -> StorageError {
    StorageError::Rejected {
        key: key.to_string(),
        reason: e.to_string(),
    }
}

impl SliceStorage for JsonFileSliceStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Unavailable(e.to_string())),
        }
    }

    fn set(&self, key: &str, blob: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        // Write then rename, so a crash never leaves a half-written slice
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, blob).map_err(|e| io_error(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| io_error(key, e))
    }

    fn clear(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::application::state::NovelWorkflow;
    use crate::domain::value_objects::WorkflowStep;

    #[test]
    fn test_blobs_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileSliceStorage::open(dir.path().join("slices")).unwrap();

        assert_eq!(storage.get("novel-genre-storage").unwrap(), None);
        storage.set("novel-genre-storage", "{\"version\":1}").unwrap();
        assert!(dir.path().join("slices/novel-genre-storage.json").exists());
        assert_eq!(
            storage.get("novel-genre-storage").unwrap().as_deref(),
            Some("{\"version\":1}")
        );

        storage.clear("novel-genre-storage").unwrap();
        storage.clear("novel-genre-storage").unwrap();
        assert_eq!(storage.get("novel-genre-storage").unwrap(), None);
    }

    #[test]
    fn test_rejects_keys_that_escape_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileSliceStorage::open(dir.path()).unwrap();
        assert!(matches!(
            storage.set("../outside", "{}"),
            Err(StorageError::Rejected { .. })
        ));
        assert!(storage.get("").is_err());
    }

    #[test]
    fn test_workflow_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let storage = Arc::new(JsonFileSliceStorage::open(dir.path()).unwrap());
            let mut workflow = NovelWorkflow::load(storage);
            workflow.go_to_step(WorkflowStep::Timeline).unwrap();
            workflow.wizard.try_update(|w| w.set_title("The Long Tide")).unwrap();
        }

        let storage = Arc::new(JsonFileSliceStorage::open(dir.path()).unwrap());
        let workflow = NovelWorkflow::load(storage);
        assert_eq!(workflow.current_step(), WorkflowStep::Timeline);
        assert_eq!(workflow.wizard.get().basic_info.title, "The Long Tide");
        assert!(!workflow.is_dirty());
    }
}
