//! Small persistent key/value store for user preferences.
//!
//! Holds things like the colour theme and per-brand logo overrides
//! (`brand-logo:<brand>`). The whole map is rewritten as pretty JSON on
//! every change; it is expected to stay tiny.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

/// Longest accepted key, in bytes.
pub const MAX_KEY_LEN: usize = 128;

/// Errors from the preference store.
#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("invalid preference key: {reason}")]
    InvalidKey { reason: &'static str },

    #[error("failed to read preferences from {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to write preferences to {path}: {message}")]
    Write { path: String, message: String },
}

fn validate_key(key: &str) -> Result<(), PreferenceError> {
    if key.trim().is_empty() {
        return Err(PreferenceError::InvalidKey {
            reason: "must not be empty",
        });
    }
    if key.len() > MAX_KEY_LEN {
        return Err(PreferenceError::InvalidKey {
            reason: "must be at most 128 bytes",
        });
    }
    if key.chars().any(char::is_control) {
        return Err(PreferenceError::InvalidKey {
            reason: "must not contain control characters",
        });
    }
    Ok(())
}

/// Thread-safe preference map backed by a JSON file.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    values: Arc<RwLock<BTreeMap<String, String>>>,
    path: PathBuf,
}

impl PreferenceStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, PreferenceError> {
        let path = path.into();

        let values = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|e| PreferenceError::Read {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(PreferenceError::Read {
                    path: path.display().to_string(),
                    message: e.to_string(),
                });
            }
        };

        Ok(Self {
            values: Arc::new(RwLock::new(values)),
            path,
        })
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.values.read().await.get(key).cloned()
    }

    /// Store `value` under `key`, returning the previous value.
    pub async fn set(
        &self,
        key: &str,
        value: impl Into<String>,
    ) -> Result<Option<String>, PreferenceError> {
        validate_key(key)?;

        let mut guard = self.values.write().await;
        let previous = guard.insert(key.to_string(), value.into());
        self.persist(&guard).await?;
        debug!(key, "preference set");

        Ok(previous)
    }

    /// Remove `key`, returning its value if it was present.
    pub async fn remove(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let mut guard = self.values.write().await;
        let previous = guard.remove(key);
        if previous.is_some() {
            self.persist(&guard).await?;
            debug!(key, "preference removed");
        }

        Ok(previous)
    }

    /// Every stored preference, ordered by key.
    pub async fn all(&self) -> BTreeMap<String, String> {
        self.values.read().await.clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), PreferenceError> {
        let write_err = |message: String| PreferenceError::Write {
            path: self.path.display().to_string(),
            message,
        };

        let json = serde_json::to_string_pretty(values).map_err(|e| write_err(e.to_string()))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| write_err(e.to_string()))?;
        }

        // Write beside the target then rename, so a crash never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| write_err(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| write_err(e.to_string()))
    }
}
