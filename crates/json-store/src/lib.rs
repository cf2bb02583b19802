//! File-backed persistence for Botty.
//!
//! Two facilities live here:
//!
//! - [`JsonStore`] loads and saves whole named JSON documents in a data
//!   directory. Documents are always rewritten in full.
//! - [`EventLog`] appends timestamped JSON objects, one per line, to an
//!   activity or error log. Logging never fails the caller.
//!
//! # Example
//!
//! ```no_run
//! use json_store::JsonStore;
//! use std::collections::BTreeMap;
//!
//! # async fn example() -> json_store::Result<()> {
//! let store = JsonStore::open("data").await?;
//!
//! let mut counters: BTreeMap<String, u32> = store.load("counters.json").await?.unwrap_or_default();
//! *counters.entry("hello".to_string()).or_default() += 1;
//! store.save("counters.json", &counters).await?;
//!
//! store.activity_log().record("counter_bumped", serde_json::json!({"key": "hello"})).await;
//! # Ok(())
//! # }
//! ```

mod error;
mod event_log;
mod store;

pub use error::{Result, StoreError};
pub use event_log::{EventLog, ACTIVITY_LOG_FILE, ERROR_LOG_FILE};
pub use store::JsonStore;
