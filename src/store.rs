//! Durable slots for the last submitted problem and the last solver result.
//!
//! Pages reach storage through [`SessionStore`] and its typed
//! [`Repository`] slots. Reads never fail: unreadable or unparseable content
//! is logged and reported as absent.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use simplex_api_sdk::{ProblemPayload, SolverResult};
use thiserror::Error;

/// Key of the last submitted problem
pub const LAST_INPUTS: &str = "simplex_inputs";
/// Key of the last optimal solver result
pub const LAST_RESULT: &str = "simplex_result";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
}

/// String-valued key/value storage
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Process-local storage; lost on restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// One file per key inside a directory
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open the store, creating the directory when needed
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(FileStore { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // Write then rename so readers never see a half-written value.
        let tmp = self.dir.join(format!(".{}.tmp", key));
        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, self.path(key)))
            .map_err(|source| StoreError::Io {
                key: key.to_string(),
                source,
            })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// What a slot held when it was read
#[derive(Debug, Clone, PartialEq)]
pub enum SlotRead<T> {
    Present(T),
    Absent,
    /// Something was stored but it could not be read or parsed
    Corrupt,
}

impl<T> SlotRead<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            SlotRead::Present(value) => Some(value),
            SlotRead::Absent | SlotRead::Corrupt => None,
        }
    }
}

/// A typed slot stored as JSON under one key
pub struct Repository<T> {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Repository {
            store: Arc::clone(&self.store),
            key: self.key,
            _marker: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> Repository<T> {
    pub fn new(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Repository {
            store,
            key,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Store a value; failures are logged and otherwise ignored
    pub fn save(&self, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.save_raw(&json),
            Err(e) => log::error!("Could not serialize '{}': {}", self.key, e),
        }
    }

    /// Store an already serialized value verbatim
    pub fn save_raw(&self, json: &str) {
        if let Err(e) = self.store.set(self.key, json) {
            log::error!("Could not save '{}': {}", self.key, e);
        }
    }

    /// Read the slot, telling absent and corrupt content apart
    pub fn read(&self) -> SlotRead<T> {
        let raw = match self.store.get(self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return SlotRead::Absent,
            Err(e) => {
                log::warn!("Could not read '{}': {}", self.key, e);
                return SlotRead::Corrupt;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => SlotRead::Present(value),
            Err(e) => {
                log::warn!("Ignoring unparseable '{}': {}", self.key, e);
                SlotRead::Corrupt
            }
        }
    }

    /// The last saved value, if any could be read
    pub fn load_last(&self) -> Option<T> {
        self.read().into_option()
    }

    /// Empty the slot; failures are logged and otherwise ignored
    pub fn clear(&self) {
        if let Err(e) = self.store.remove(self.key) {
            log::error!("Could not clear '{}': {}", self.key, e);
        }
    }
}

/// The slots shared by the editor page and the tables page
#[derive(Clone)]
pub struct SessionStore {
    /// Last submitted problem, saved on every submission attempt
    pub inputs: Repository<ProblemPayload>,
    /// Last optimal result, cleared when a new submission starts
    pub result: Repository<SolverResult>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        SessionStore {
            inputs: Repository::new(Arc::clone(&store), LAST_INPUTS),
            result: Repository::new(store, LAST_RESULT),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }
}
