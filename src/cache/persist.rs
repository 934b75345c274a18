//! Persisted candidate cache.
//!
//! A small JSON document that survives restarts:
//!
//! ```json
//! {"idx": ["prod"], "fields": ["cluster"], "namespaces": ["default"], "json_app": {"status": ["active"]}}
//! ```
//!
//! Missing keys read as absent. A missing, unreadable or malformed file is an
//! empty cache, never an error.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::Result;

/// Top-level keys of the persisted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKey {
    Indexes,
    Fields,
    Namespaces,
    JsonApp,
}

impl CacheKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKey::Indexes => "idx",
            CacheKey::Fields => "fields",
            CacheKey::Namespaces => "namespaces",
            CacheKey::JsonApp => "json_app",
        }
    }
}

/// File-backed key/value document.
///
/// The mutex is held across the file write so concurrent producers cannot
/// overwrite each other's keys with an older snapshot.
pub struct PersistentCache {
    path: Option<PathBuf>,
    document: Mutex<Map<String, Value>>,
}

impl PersistentCache {
    /// Open the cache at `path`, treating any read or decode failure as empty.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let document = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => parse_document(&raw, &path),
            Err(e) => {
                debug!("No persisted cache at {}: {}", path.display(), e);
                Map::new()
            }
        };

        Self {
            path: Some(path),
            document: Mutex::new(document),
        }
    }

    /// A cache that lives only in memory.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            document: Mutex::new(Map::new()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read a key. Absent keys and values of the wrong shape read as `None`.
    pub async fn get<T: DeserializeOwned>(&self, key: CacheKey) -> Option<T> {
        let value = self.document.lock().await.get(key.as_str()).cloned()?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("Ignoring persisted '{}': {}", key.as_str(), e);
                None
            }
        }
    }

    /// Store a key and flush the whole document to disk.
    pub async fn set<T: Serialize>(&self, key: CacheKey, value: &T) -> Result<()> {
        let mut document = self.document.lock().await;
        document.insert(key.as_str().to_string(), serde_json::to_value(value)?);

        if let Some(path) = &self.path {
            write_document(path, &document).await?;
        }
        Ok(())
    }

    /// Snapshot of the whole document.
    pub async fn snapshot(&self) -> Value {
        Value::Object(self.document.lock().await.clone())
    }

    /// Delete the document at `path`. A missing file is not an error.
    pub async fn clear(path: &Path) -> Result<bool> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

fn parse_document(raw: &str, path: &Path) -> Map<String, Value> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            warn!(
                "Persisted cache {} is not a JSON object, starting empty",
                path.display()
            );
            Map::new()
        }
        Err(e) => {
            warn!(
                "Persisted cache {} is malformed ({}), starting empty",
                path.display(),
                e
            );
            Map::new()
        }
    }
}

async fn write_document(path: &Path, document: &Map<String, Value>) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let raw = serde_json::to_vec_pretty(document)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, raw).await?;
    tokio::fs::rename(&tmp, path).await?;
    debug!("Persisted cache written to {}", path.display());
    Ok(())
}
