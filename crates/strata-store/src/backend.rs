use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{BackendError, BackendResult};
use crate::traits::BlobBackend;

/// Filesystem-backed blob store.
///
/// Keys map to files under a root directory; slashes in a key become
/// subdirectories (so `blocks/<cid>` lands in a `blocks/` directory).
/// Values survive process restarts. Writes go to a temporary sibling file
/// and are renamed into place, so a reader never observes partial bytes.
pub struct FsBlobBackend {
    root: PathBuf,
}

impl FsBlobBackend {
    /// Open a backend rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> BackendResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The backend's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> BackendResult<PathBuf> {
        if key.is_empty() {
            return Err(BackendError::InvalidKey(key.to_string()));
        }
        let relative = Path::new(key);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(BackendError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobBackend for FsBlobBackend {
    async fn fetch(&self, key: &str) -> BackendResult<Option<Bytes>> {
        let path = self.key_path(key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BackendError::Io(e)),
        }
    }

    async fn store(&self, key: &str, value: Bytes) -> BackendResult<()> {
        let path = self.key_path(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, &value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> BackendResult<bool> {
        let path = self.key_path(key)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }
}

impl std::fmt::Debug for FsBlobBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsBlobBackend")
            .field("root", &self.root)
            .finish()
    }
}

/// In-memory blob backend for tests and embedding.
///
/// Behaves like a durable backend until the process exits. Can be switched
/// to an unavailable state to exercise durable-tier failure paths.
#[derive(Default)]
pub struct MemoryBlobBackend {
    values: RwLock<HashMap<String, Bytes>>,
    unavailable: AtomicBool,
}

impl MemoryBlobBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with [`BackendError::Unavailable`]
    /// (or restore service with `false`). Stored values are kept.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.read().expect("lock poisoned").len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.read().expect("lock poisoned").is_empty()
    }

    fn check_available(&self) -> BackendResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("backend marked offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobBackend for MemoryBlobBackend {
    async fn fetch(&self, key: &str) -> BackendResult<Option<Bytes>> {
        self.check_available()?;
        let map = self.values.read().expect("lock poisoned");
        Ok(map.get(key).cloned())
    }

    async fn store(&self, key: &str, value: Bytes) -> BackendResult<()> {
        self.check_available()?;
        let mut map = self.values.write().expect("lock poisoned");
        map.insert(key.to_string(), value);
        Ok(())
    }

    async fn exists(&self, key: &str) -> BackendResult<bool> {
        self.check_available()?;
        let map = self.values.read().expect("lock poisoned");
        Ok(map.contains_key(key))
    }
}
