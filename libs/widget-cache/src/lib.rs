//! Widget shared cache
//!
//! Blobs written here are consumed by the home-screen widget, which runs on its
//! own schedule inside the platform's shared app-group storage. The host app
//! only writes; the widget only reads.
//!
//! Provides:
//! - Fixed key schema the widget extension understands
//! - Object-safe blob store trait with file-backed and in-memory implementations
//! - Typed JSON access with corrupted-entry eviction
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use widget_cache::{FileBlobStore, SharedCache, WidgetCache, WidgetConfiguration};
//!
//! #[tokio::main]
//! async fn main() -> widget_cache::CacheResult<()> {
//!     let store = FileBlobStore::new("./shared", widget_cache::DEFAULT_APP_GROUP);
//!     let widget = WidgetCache::new(SharedCache::new(Arc::new(store)));
//!     widget.set_configuration(&WidgetConfiguration::default()).await?;
//!     Ok(())
//! }
//! ```

mod error;
mod keys;

pub mod snapshot;

pub use error::{CacheError, CacheResult};
pub use keys::{CacheKey, DEFAULT_APP_GROUP};
pub use snapshot::{
    SnapshotEntry, WidgetCache, WidgetConfiguration, WidgetSnapshot, REFRESH_INTERVALS,
    SCROLL_INTERVALS,
};

use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Raw blob storage shared with the widget extension
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Read a blob, `None` when the key was never written
    async fn read(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Replace a blob
    async fn write(&self, key: &str, data: Vec<u8>) -> CacheResult<()>;

    /// Remove a blob; removing a missing key succeeds
    async fn remove(&self, key: &str) -> CacheResult<()>;
}

/// Blob store backed by one JSON file per key under `{root}/{app_group}`
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(root: impl AsRef<Path>, app_group: &str) -> Self {
        Self {
            dir: root.as_ref().join(app_group),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> CacheResult<PathBuf> {
        if !CacheKey::is_valid(key) {
            return Err(CacheError::InvalidData(format!("invalid cache key: {key}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait::async_trait]
impl BlobStore for FileBlobStore {
    async fn read(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::Io(e)),
        }
    }

    async fn write(&self, key: &str, data: Vec<u8>) -> CacheResult<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        // Atomic replace
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, data).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> CacheResult<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Io(e)),
        }
    }
}

/// In-process blob store, used by tests and platforms without a shared container
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

#[async_trait::async_trait]
impl BlobStore for MemoryBlobStore {
    async fn read(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        Ok(self.blobs.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, data: Vec<u8>) -> CacheResult<()> {
        self.blobs.lock().await.insert(key.to_string(), data);
        Ok(())
    }

    async fn remove(&self, key: &str) -> CacheResult<()> {
        self.blobs.lock().await.remove(key);
        Ok(())
    }
}

/// Typed JSON access on top of a blob store
#[derive(Clone)]
pub struct SharedCache {
    store: Arc<dyn BlobStore>,
}

impl SharedCache {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        let Some(data) = self.store.read(key).await? else {
            debug!(key = %key, "Shared cache miss");
            return Ok(None);
        };

        match serde_json::from_slice::<T>(&data) {
            Ok(value) => {
                debug!(key = %key, "Shared cache hit");
                Ok(Some(value))
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Shared cache deserialization failed");
                // Delete corrupted entry
                let _ = self.store.remove(key).await;
                Ok(None)
            }
        }
    }

    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> CacheResult<()> {
        let data = serde_json::to_vec(value)?;
        self.store.write(key, data).await?;
        debug!(key = %key, "Shared cache set");
        Ok(())
    }

    pub async fn del(&self, key: &str) -> CacheResult<()> {
        self.store.remove(key).await?;
        debug!(key = %key, "Shared cache delete");
        Ok(())
    }

    pub async fn exists(&self, key: &str) -> CacheResult<bool> {
        Ok(self.store.read(key).await?.is_some())
    }
}
