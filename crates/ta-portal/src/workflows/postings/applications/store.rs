use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::domain::Application;
use crate::workflows::postings::domain::PostingId;

/// Key holding the ordered application list, newest first.
pub const APPLICATIONS_KEY: &str = "apps";
/// Key holding the posting currently selected in the professor view.
pub const SELECTED_POSTING_KEY: &str = "profPostingId";

/// Session-local key/value persistence for portal state.
///
/// Loads are infallible by contract: a missing or corrupt value yields
/// the documented fallback (empty list, no selection) instead of an
/// error, so a damaged store never blocks the student flow.
pub trait StateStore: Send + Sync {
    fn load_applications(&self) -> Vec<Application>;
    fn save_applications(&self, records: &[Application]) -> Result<(), StoreError>;
    fn load_selected_posting(&self) -> Option<PostingId>;
    fn save_selected_posting(&self, posting_id: &PostingId) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to persist state for key '{key}': {source}")]
    Io {
        key: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode state for key '{key}': {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// In-memory store mirroring the key/value layout byte for byte, so
/// tests and the demo exercise the same JSON round trip as the file
/// store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStateStore {
    values: Arc<Mutex<HashMap<&'static str, String>>>,
}

impl MemoryStateStore {
    /// Seed a raw value for a key, bypassing encoding. Lets tests plant
    /// corrupt payloads.
    pub fn put_raw(&self, key: &'static str, value: impl Into<String>) {
        self.values
            .lock()
            .expect("store mutex poisoned")
            .insert(key, value.into());
    }

    fn read<T: DeserializeOwned>(&self, key: &'static str) -> Option<T> {
        let values = self.values.lock().expect("store mutex poisoned");
        let raw = values.get(key)?;
        decode(key, raw.as_bytes())
    }

    fn write<T: Serialize>(&self, key: &'static str, value: &T) -> Result<(), StoreError> {
        let encoded =
            serde_json::to_string(value).map_err(|source| StoreError::Encode { key, source })?;
        self.values
            .lock()
            .expect("store mutex poisoned")
            .insert(key, encoded);
        Ok(())
    }
}

impl StateStore for MemoryStateStore {
    fn load_applications(&self) -> Vec<Application> {
        self.read(APPLICATIONS_KEY).unwrap_or_default()
    }

    fn save_applications(&self, records: &[Application]) -> Result<(), StoreError> {
        self.write(APPLICATIONS_KEY, &records)
    }

    fn load_selected_posting(&self) -> Option<PostingId> {
        self.read(SELECTED_POSTING_KEY)
    }

    fn save_selected_posting(&self, posting_id: &PostingId) -> Result<(), StoreError> {
        self.write(SELECTED_POSTING_KEY, posting_id)
    }
}

/// File-backed store: one `<key>.json` document per key under a data
/// directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }

    fn read<T: DeserializeOwned>(&self, key: &'static str) -> Option<T> {
        let raw = fs::read(self.path_for(key)).ok()?;
        decode(key, &raw)
    }

    fn write<T: Serialize>(&self, key: &'static str, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir).map_err(|source| StoreError::Io { key, source })?;
        let encoded =
            serde_json::to_vec_pretty(value).map_err(|source| StoreError::Encode { key, source })?;
        fs::write(self.path_for(key), encoded).map_err(|source| StoreError::Io { key, source })
    }
}

impl StateStore for JsonFileStore {
    fn load_applications(&self) -> Vec<Application> {
        self.read(APPLICATIONS_KEY).unwrap_or_default()
    }

    fn save_applications(&self, records: &[Application]) -> Result<(), StoreError> {
        self.write(APPLICATIONS_KEY, &records)
    }

    fn load_selected_posting(&self) -> Option<PostingId> {
        self.read(SELECTED_POSTING_KEY)
    }

    fn save_selected_posting(&self, posting_id: &PostingId) -> Result<(), StoreError> {
        self.write(SELECTED_POSTING_KEY, posting_id)
    }
}

fn decode<T: DeserializeOwned>(key: &str, raw: &[u8]) -> Option<T> {
    match serde_json::from_slice(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, %err, "stored state unreadable, using fallback");
            None
        }
    }
}
