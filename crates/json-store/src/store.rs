//! Named JSON documents in a data directory.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::event_log::{EventLog, ACTIVITY_LOG_FILE, ERROR_LOG_FILE};

/// Whole-document JSON persistence rooted at a directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Create a store rooted at `root` without touching the filesystem.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(root);
        tokio::fs::create_dir_all(&store.root)
            .await
            .map_err(|e| StoreError::io(&store.root, e))?;
        Ok(store)
    }

    /// Directory holding the documents.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a named document.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        let valid = !name.is_empty()
            && !name.contains(|c| c == '/' || c == '\\')
            && name != "."
            && name != "..";
        if !valid {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }

    /// Load a document. A missing file is `Ok(None)`.
    pub async fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let path = self.path_for(name)?;
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Document {} not found, starting empty", path.display());
                return Ok(None);
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Malformed { path, source })
    }

    /// Load a document, falling back to `T::default()` when it is missing
    /// or unreadable. Failures are logged.
    pub async fn load_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        match self.load(name).await {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                warn!("Failed to load {}, using defaults: {}", name, e);
                T::default()
            }
        }
    }

    /// Serialize `value` and replace the document with it.
    ///
    /// The new content is written to a sibling temp file and renamed into place.
    pub async fn save<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.path_for(name)?;
        let payload = serde_json::to_string_pretty(value)?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, payload)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::io(&path, e))?;

        debug!("Saved {}", path.display());
        Ok(())
    }

    /// The activity log living next to the documents.
    pub fn activity_log(&self) -> EventLog {
        EventLog::new(self.root.join(ACTIVITY_LOG_FILE))
    }

    /// The error log living next to the documents.
    pub fn error_log(&self) -> EventLog {
        EventLog::new(self.root.join(ERROR_LOG_FILE))
    }
}
