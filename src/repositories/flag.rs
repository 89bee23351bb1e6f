use async_trait::async_trait;
use std::{
    collections::HashMap,
    path::PathBuf,
    sync::Arc,
};
use sonic_rs::JsonValueTrait;
use tokio::sync::RwLock;

use crate::{error::FlagError, models::demo::DEMO_FLAG_KEY};

/// A `Result` type for flag storage.
pub type FlagResult<T> = std::result::Result<T, FlagError>;

/// Durable string-keyed storage that outlives the process.
#[async_trait]
pub trait FlagStore: Send + Sync {
    /// Reads the value stored under `key`.
    async fn read(&self, key: &str) -> FlagResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn write(&self, key: &str, value: &str) -> FlagResult<()>;

    /// Removes `key`. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> FlagResult<()>;
}

/// A process-local flag store.
#[derive(Default)]
pub struct MemoryFlagStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryFlagStore {
    /// Creates an empty `MemoryFlagStore`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a `MemoryFlagStore` that already holds `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl FlagStore for MemoryFlagStore {
    async fn read(&self, key: &str) -> FlagResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> FlagResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> FlagResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// A flag store backed by a single JSON object file.
///
/// The whole file is rewritten on every change. A missing file reads as empty.
pub struct FileFlagStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: RwLock<()>,
}

impl FileFlagStore {
    /// Creates a new `FileFlagStore` for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    /// Reads the file, keeping only string entries.
    ///
    /// Unparseable contents read as empty. The returned flag is `false` when the
    /// file held anything that was dropped, so the next write repairs it.
    async fn load(&self) -> FlagResult<(HashMap<String, String>, bool)> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((HashMap::new(), true)),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok((HashMap::new(), true));
        }

        let raw: HashMap<String, sonic_rs::Value> = match sonic_rs::from_str(&contents) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("⚠️ Ignoring unreadable flag file {}: {}", self.path.display(), e);
                return Ok((HashMap::new(), false));
            }
        };

        let total = raw.len();
        let entries: HashMap<String, String> = raw
            .into_iter()
            .filter_map(|(key, value)| value.as_str().map(|v| (key, v.to_string())))
            .collect();
        let clean = entries.len() == total;

        Ok((entries, clean))
    }

    async fn store(&self, entries: &HashMap<String, String>) -> FlagResult<()> {
        let json = sonic_rs::to_string(entries)
            .map_err(|e| FlagError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // Write beside the target and rename so a crash never leaves a torn file.
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl FlagStore for FileFlagStore {
    async fn read(&self, key: &str) -> FlagResult<Option<String>> {
        let _guard = self.lock.read().await;
        let (mut entries, _) = self.load().await?;
        Ok(entries.remove(key))
    }

    async fn write(&self, key: &str, value: &str) -> FlagResult<()> {
        let _guard = self.lock.write().await;
        let (mut entries, _) = self.load().await?;
        entries.insert(key.to_string(), value.to_string());
        self.store(&entries).await
    }

    async fn remove(&self, key: &str) -> FlagResult<()> {
        let _guard = self.lock.write().await;
        let (mut entries, clean) = self.load().await?;
        if entries.remove(key).is_some() || !clean {
            self.store(&entries).await?;
        }
        Ok(())
    }
}

/// Typed access to the "demo session active" flag.
///
/// Only the exact value `"true"` counts as active.
#[derive(Clone)]
pub struct DemoFlag {
    store: Arc<dyn FlagStore>,
}

impl DemoFlag {
    /// Creates a new `DemoFlag` over `store`.
    pub fn new(store: Arc<dyn FlagStore>) -> Self {
        Self { store }
    }

    /// Returns whether a demo session should be rehydrated.
    pub async fn is_active(&self) -> FlagResult<bool> {
        Ok(self.store.read(DEMO_FLAG_KEY).await?.as_deref() == Some("true"))
    }

    /// Marks the demo session as active.
    pub async fn activate(&self) -> FlagResult<()> {
        self.store.write(DEMO_FLAG_KEY, "true").await
    }

    /// Clears the flag.
    pub async fn clear(&self) -> FlagResult<()> {
        self.store.remove(DEMO_FLAG_KEY).await
    }
}
