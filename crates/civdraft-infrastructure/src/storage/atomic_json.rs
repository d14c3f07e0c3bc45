//! Atomic JSON file operations with ACID guarantees.
//!
//! Provides a thin layer for safe concurrent access to single JSON records.
//!
//! - **Atomicity**: updates are all-or-nothing via tmp file + atomic rename
//! - **Isolation**: file locking prevents concurrent writers
//! - **Durability**: explicit fsync before rename

use civdraft_core::error::{DraftError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// A handle to one JSON record on disk with atomic write semantics.
pub struct AtomicJsonFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicJsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Creates a new atomic JSON file handle.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    /// The path this handle points at.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the JSON file and deserializes it.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = serde_json::from_str(&content)?;
        Ok(Some(data))
    }

    /// Saves data to the JSON file atomically.
    ///
    /// Takes an exclusive advisory lock, writes to a temporary file in the
    /// same directory, fsyncs, then renames over the target.
    pub fn save(&self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let _lock = FileLock::acquire(&self.path)?;

        let json = serde_json::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Removes the record from disk.
    ///
    /// Returns `true` if a file was removed, `false` if none existed.
    pub fn delete(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        let _lock = FileLock::acquire(&self.path)?;
        fs::remove_file(&self.path)?;
        Ok(true)
    }

    /// Temporary file path used for atomic writes.
    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self.path.parent().ok_or_else(|| {
            DraftError::io("Path has no parent directory")
        })?;
        let file_name = self.path.file_name().ok_or_else(|| {
            DraftError::io("Path has no file name")
        })?;
        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(parent.join(tmp_name))
    }
}

/// A file lock guard that automatically releases the lock when dropped.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    /// Acquires an exclusive lock next to `path`.
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| DraftError::data_access(format!("Failed to acquire lock: {e}")))?;
        }

        #[cfg(not(unix))]
        {
            // No advisory locking on non-Unix; acceptable for a single-user
            // local store.
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock is automatic when the file handle is dropped.
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestRecord {
        name: String,
        count: u32,
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<TestRecord>::new(temp_dir.path().join("record.json"));

        let record = TestRecord {
            name: "test".to_string(),
            count: 42,
        };
        file.save(&record).unwrap();

        let loaded = file.load().unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<TestRecord>::new(temp_dir.path().join("missing.json"));
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<TestRecord>::new(temp_dir.path().join("record.json"));

        file.save(&TestRecord {
            name: "first".to_string(),
            count: 1,
        })
        .unwrap();
        file.save(&TestRecord {
            name: "second".to_string(),
            count: 2,
        })
        .unwrap();

        let loaded = file.load().unwrap().unwrap();
        assert_eq!(loaded.name, "second");
    }

    #[test]
    fn test_delete() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<TestRecord>::new(temp_dir.path().join("record.json"));

        assert!(!file.delete().unwrap());
        file.save(&TestRecord {
            name: "x".to_string(),
            count: 0,
        })
        .unwrap();
        assert!(file.delete().unwrap());
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<TestRecord>::new(temp_dir.path().join("record.json"));

        file.save(&TestRecord {
            name: "x".to_string(),
            count: 0,
        })
        .unwrap();

        assert!(!temp_dir.path().join(".record.json.tmp").exists());
        assert!(temp_dir.path().join("record.json").exists());
    }
}
