//! Append-only JSON-lines event logs.

use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;

use crate::error::{Result, StoreError};

/// File name of the activity log inside the data directory.
pub const ACTIVITY_LOG_FILE: &str = "activity_log.jsonl";

/// File name of the error log inside the data directory.
pub const ERROR_LOG_FILE: &str = "error_log.jsonl";

/// An append-only log of JSON objects, one per line.
///
/// Every record gets an `event` name and an RFC 3339 UTC `timestamp`.
/// Appends from one `EventLog` are serialized so lines never interleave.
#[derive(Debug)]
pub struct EventLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl EventLog {
    /// Create a log writing to `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an event, logging (not returning) any write failure.
    pub async fn record(&self, event: &str, fields: Value) {
        if let Err(e) = self.try_record(event, fields).await {
            warn!("Failed to write {} to {}: {}", event, self.path.display(), e);
        }
    }

    /// Append an event.
    pub async fn try_record(&self, event: &str, fields: Value) -> Result<()> {
        let mut line = serde_json::to_string(&Value::Object(build_record(event, fields)))?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        file.flush().await.map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }
}

fn build_record(event: &str, fields: Value) -> Map<String, Value> {
    let mut record = match fields {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    record.insert("event".to_string(), Value::String(event.to_string()));
    record.insert(
        "timestamp".to_string(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    record
}
