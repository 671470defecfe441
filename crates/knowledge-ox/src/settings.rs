use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Model used when the settings leave it blank
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Key the settings are persisted under
pub const SETTINGS_KEY: &str = "knowledge-ox.settings";

/// Caller-supplied credentials and targets, passed into every operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub api_key: String,
    pub model: String,
    pub vector_store_id: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            vector_store_id: String::new(),
        }
    }
}

impl Settings {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        vector_store_id: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            vector_store_id: vector_store_id.into(),
        }
    }

    /// Trimmed model name, or [`DEFAULT_MODEL`] when blank
    #[must_use]
    pub fn effective_model(&self) -> &str {
        match self.model.trim() {
            "" => DEFAULT_MODEL,
            model => model,
        }
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    #[must_use]
    pub fn has_vector_store(&self) -> bool {
        !self.vector_store_id.trim().is_empty()
    }

    /// Read settings from `store`; absent or corrupt data yields the default
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(raw) = store.get(SETTINGS_KEY) else {
            return Self::default();
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable stored settings: {e}");
            Self::default()
        })
    }

    /// Persist settings into `store`
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        store.set(SETTINGS_KEY, &serde_json::to_string(self)?)
    }
}

/// Errors raised while persisting values
#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// String key-value persistence owned by the caller
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a single JSON object file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries on disk; a missing file is empty
    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_all().ok()?.remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.read_all().unwrap_or_else(|e| {
            log::warn!(
                "Overwriting unreadable store file {}: {e}",
                self.path.display()
            );
            BTreeMap::new()
        });
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}
