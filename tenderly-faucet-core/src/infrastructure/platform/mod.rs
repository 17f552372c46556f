//! Key/value storage backends
//!
//! Slots live in a data directory, one JSON file per key.

use crate::shared::error::FaucetError;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Platform-specific storage implementation
pub trait PlatformStorage: Send + Sync {
    /// Store data under `key`, replacing what was there
    fn store(&self, key: &str, data: &[u8]) -> Result<(), FaucetError>;

    /// Retrieve data stored under `key`
    fn retrieve(&self, key: &str) -> Result<Vec<u8>, FaucetError>;

    /// Delete data; deleting a missing key is not an error
    fn delete(&self, key: &str) -> Result<(), FaucetError>;

    /// Check if data exists
    fn exists(&self, key: &str) -> Result<bool, FaucetError>;

    /// List all stored keys
    fn list_keys(&self) -> Result<Vec<String>, FaucetError>;
}

/// One `<key>.json` file per key inside a data directory
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, FaucetError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Storage in the OS data directory, falling back to `./data`
    pub fn in_user_data_dir() -> Result<Self, FaucetError> {
        let base_dir = dirs::data_dir()
            .map(|dir| dir.join("tenderly-faucet"))
            .unwrap_or_else(|| PathBuf::from("./data"));
        Self::new(base_dir)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    // Keys come from constants, but keep them from escaping the directory anyway
    fn file_path(&self, key: &str) -> Result<PathBuf, FaucetError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(FaucetError::storage(format!("Invalid storage key: {}", key)));
        }
        Ok(self.base_dir.join(format!("{}.json", key)))
    }
}

impl PlatformStorage for FileStorage {
    fn store(&self, key: &str, data: &[u8]) -> Result<(), FaucetError> {
        let path = self.file_path(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn retrieve(&self, key: &str) -> Result<Vec<u8>, FaucetError> {
        let path = self.file_path(key)?;
        fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FaucetError::storage(format!("Key not found: {}", key)),
            _ => e.into(),
        })
    }

    fn delete(&self, key: &str) -> Result<(), FaucetError> {
        let path = self.file_path(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, key: &str) -> Result<bool, FaucetError> {
        Ok(self.file_path(key)?.exists())
    }

    fn list_keys(&self) -> Result<Vec<String>, FaucetError> {
        let mut keys = vec![];
        for entry in fs::read_dir(&self.base_dir)?.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(name) = path.file_stem().and_then(|n| n.to_str()) {
                    keys.push(name.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// In-process storage, used by tests and when no data directory is wanted
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlatformStorage for MemoryStorage {
    fn store(&self, key: &str, data: &[u8]) -> Result<(), FaucetError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn retrieve(&self, key: &str) -> Result<Vec<u8>, FaucetError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .cloned()
            .ok_or_else(|| FaucetError::storage(format!("Key not found: {}", key)))
    }

    fn delete(&self, key: &str) -> Result<(), FaucetError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, FaucetError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.contains_key(key))
    }

    fn list_keys(&self) -> Result<Vec<String>, FaucetError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
