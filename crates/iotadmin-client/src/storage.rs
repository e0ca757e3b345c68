//! Session storage backends.

use crate::error::StorageError;
use async_trait::async_trait;
use iotadmin_core::config::session::{SessionBackend, SessionConfig};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// A flat string key/value store that outlives a single request.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Read a key.
    async fn get(&self, key: &str) -> Option<String>;

    /// Write several keys at once.
    async fn set_many(&self, pairs: &[(&str, &str)]) -> Result<(), StorageError>;

    /// Remove several keys at once. Missing keys are ignored.
    async fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError>;
}

/// Create a storage backend based on configuration.
pub async fn create_storage(config: &SessionConfig) -> Result<Arc<dyn SessionStorage>, StorageError> {
    match config.backend {
        SessionBackend::Memory => Ok(Arc::new(MemoryStorage::default())),
        SessionBackend::File => Ok(Arc::new(FileStorage::open(&config.path).await?)),
    }
}

/// Process-local storage; forgotten on exit.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    /// Snapshot of every stored key.
    pub fn keys(&self) -> Vec<String> {
        self.entries
            .read()
            .map(|e| e.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SessionStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    async fn set_many(&self, pairs: &[(&str, &str)]) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        for (k, v) in pairs {
            entries.insert((*k).to_string(), (*v).to_string());
        }
        Ok(())
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        for k in keys {
            entries.remove(*k);
        }
        Ok(())
    }
}

/// JSON object on disk, mirrored in memory.
///
/// Every write rewrites the whole file; sessions are five short strings.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open the file, starting empty if it does not exist yet.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "session file opened");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, snapshot: BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(&snapshot)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStorage for FileStorage {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    async fn set_many(&self, pairs: &[(&str, &str)]) -> Result<(), StorageError> {
        let snapshot = {
            let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
            for (k, v) in pairs {
                entries.insert((*k).to_string(), (*v).to_string());
            }
            entries.clone()
        };
        self.persist(snapshot).await
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        let snapshot = {
            let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
            for k in keys {
                entries.remove(*k);
            }
            entries.clone()
        };
        self.persist(snapshot).await
    }
}
