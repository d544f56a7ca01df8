use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const NAVIGATION_CONFIG: &str = "navigation-config";
pub const PRESENTATION_DATA: &str = "presentation-data";
pub const COLOR_SCHEME: &str = "color-scheme";
pub const CURRENT_THEME: &str = "current-theme";
pub const CUSTOM_THEMES: &str = "custom-themes";
pub const ANIMATION_CONFIG: &str = "animation-config";
pub const IMAGE_LINKS: &str = "image-links";

pub const ALL_KEYS: [&str; 7] = [
    NAVIGATION_CONFIG,
    PRESENTATION_DATA,
    COLOR_SCHEME,
    CURRENT_THEME,
    CUSTOM_THEMES,
    ANIMATION_CONFIG,
    IMAGE_LINKS,
];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unknown storage key `{0}`")]
    UnknownKey(String),
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// String key/value store. Values are JSON documents, except `current-theme`
/// which holds a bare preset id.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

fn check_key(key: &str) -> Result<(), StorageError> {
    if ALL_KEYS.contains(&key) {
        Ok(())
    } else {
        Err(StorageError::UnknownKey(key.to_string()))
    }
}

/// One `<key>.json` file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<data dir>/deckview/storage`
    pub fn default_dir() -> anyhow::Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(data_dir.join("deckview").join("storage"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        check_key(key)?;
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        check_key(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path_for(key);
        std::fs::write(&path, value).map_err(|source| StorageError::Io { path, source })?;
        log::debug!("Stored {key}");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        check_key(key)?;
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        check_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        check_key(key)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        check_key(key)?;
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(storage: &mut dyn Storage) {
        assert_eq!(storage.get(CURRENT_THEME).unwrap(), None);
        storage.set(CURRENT_THEME, "blue-ocean").unwrap();
        assert_eq!(
            storage.get(CURRENT_THEME).unwrap().as_deref(),
            Some("blue-ocean")
        );
        storage.remove(CURRENT_THEME).unwrap();
        assert_eq!(storage.get(CURRENT_THEME).unwrap(), None);
        // Removing twice is fine.
        storage.remove(CURRENT_THEME).unwrap();
    }

    #[test]
    fn test_memory_storage() {
        round_trip(&mut MemoryStorage::new());
    }

    #[test]
    fn test_file_storage() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested"));
        round_trip(&mut storage);
        storage.set(IMAGE_LINKS, "[]").unwrap();
        assert!(dir.path().join("nested").join("image-links.json").exists());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut storage = MemoryStorage::new();
        assert!(matches!(
            storage.set("../escape", "{}"),
            Err(StorageError::UnknownKey(_))
        ));
        assert!(storage.get("whatever").is_err());
    }
}
