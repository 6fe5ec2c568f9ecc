//! Namespaced key/value configuration storage.
//!
//! This module provides a small JSON-backed settings store addressed by
//! `(namespace, key)` pairs, written to the standard configuration directory
//! (`~/.config/missive/settings.json` on most platforms). The file is safe
//! to read and write from multiple threads thanks to the internal `Mutex`,
//! and an `ephemeral()` in-memory mode backs tests and hosts that manage
//! configuration themselves.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::error::StoreError;
use crate::paths::{default_store_path, expand_tilde_path};

/// Environment variable allowing callers to override the settings file path.
pub const SETTINGS_PATH_ENV: &str = "MISSIVE_SETTINGS_PATH";

/// Default filename for the JSON payload.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Namespace reserved for this workspace's own settings.
pub const SETTINGS_NAMESPACE: &str = "missive.settings";

/// Whether template saves enqueue argument refresh work. Defaults to `false`.
pub const UPDATE_TOKENS_ENABLED: &str = "update_tokens.enabled";

/// Which template edits trigger a refresh; one of the `UpdatePolicy` string
/// forms. Defaults to `update_when_item`.
pub const UPDATE_TOKENS_HOW_TO_ACT: &str = "update_tokens.how_to_act";

/// Maximum number of message ids per enqueued refresh batch. Defaults to 100.
pub const UPDATE_TOKENS_BATCH_SIZE: &str = "update_tokens.batch_size";

type SettingsPayload = BTreeMap<String, BTreeMap<String, Value>>;

/// Thread-safe namespaced settings store backed by a JSON file.
#[derive(Debug, Default)]
pub struct SettingsStore {
    path: PathBuf,
    payload: Mutex<SettingsPayload>,
    persist_to_disk: bool,
}

impl SettingsStore {
    /// Create a store rooted at the default path (honoring the
    /// `MISSIVE_SETTINGS_PATH` override).
    pub fn new() -> Result<Self, StoreError> {
        Self::at_path(default_store_path(SETTINGS_PATH_ENV, SETTINGS_FILE_NAME))
    }

    /// Create a store rooted at the provided path.
    pub fn at_path(path: PathBuf) -> Result<Self, StoreError> {
        let resolved_path = expand_tilde_path(path);
        let payload = load_payload(&resolved_path)?;
        Ok(Self {
            path: resolved_path,
            payload: Mutex::new(payload),
            persist_to_disk: true,
        })
    }

    /// Build an in-memory store that never touches the filesystem.
    pub fn ephemeral() -> Self {
        Self {
            path: PathBuf::new(),
            payload: Mutex::new(SettingsPayload::default()),
            persist_to_disk: false,
        }
    }

    /// Path to the underlying JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store a value under `(namespace, key)`.
    pub fn set(&self, namespace: &str, key: &str, value: impl Serialize) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)?;
        let mut payload = self.payload.lock().expect("settings lock poisoned");
        payload.entry(namespace.to_string()).or_default().insert(key.to_string(), value);
        if self.persist_to_disk {
            self.save_locked(&payload)?;
        }
        Ok(())
    }

    /// Fetch the raw JSON value stored under `(namespace, key)`.
    pub fn get(&self, namespace: &str, key: &str) -> Option<Value> {
        let payload = self.payload.lock().expect("settings lock poisoned");
        payload.get(namespace).and_then(|entries| entries.get(key)).cloned()
    }

    /// Fetch and deserialize a typed value. Values that fail to deserialize
    /// are treated as absent, with a warning, so a hand-edited settings file
    /// degrades to defaults rather than wedging callers.
    pub fn get_as<T: DeserializeOwned>(&self, namespace: &str, key: &str) -> Option<T> {
        let value = self.get(namespace, key)?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(error) => {
                warn!(namespace, key, error = %error, "Ignoring settings value with unexpected shape");
                None
            }
        }
    }

    fn save_locked(&self, payload: &SettingsPayload) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(payload)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

fn load_payload(path: &Path) -> Result<SettingsPayload, StoreError> {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(payload) => Ok(payload),
            Err(error) => {
                warn!(path = %path.display(), error = %error, "Failed to parse settings file; using defaults");
                Ok(SettingsPayload::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(SettingsPayload::default()),
        Err(error) => Err(StoreError::Io(error)),
    }
}
