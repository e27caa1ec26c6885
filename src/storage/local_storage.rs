use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::error::StorageError;

const STORAGE_FILE: &str = "local_storage.json";

/// String key/value entries persisted as one pretty-printed JSON file
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create storage rooted at `base_path`
    pub fn new_with_base_dir(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn file_path(&self) -> PathBuf {
        self.base_path.join(STORAGE_FILE)
    }

    fn load_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let path = self.file_path();
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(path)?;
        let entries = serde_json::from_str(&contents)?;
        Ok(entries)
    }

    fn save_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path)?;
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(self.file_path(), json)?;
        Ok(())
    }

    /// Read a value, `None` when the key was never written
    pub fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load_entries()?.remove(key))
    }

    /// Write a value, replacing any previous one
    pub fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.load_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.save_entries(&entries)?;
        log::debug!("Stored '{}' = '{}'", key, value);
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.load_entries()?;
        if entries.remove(key).is_some() {
            self.save_entries(&entries)?;
        }
        Ok(())
    }
}
