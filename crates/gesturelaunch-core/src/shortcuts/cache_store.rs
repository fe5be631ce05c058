//! Durable layer for the shortcut index.
//!
//! Stores the [`CacheSnapshot`] projection as JSON. The file store writes
//! `shortcut_cache.json` in the data directory.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::catalog::CacheSnapshot;
use crate::error::CacheError;
use crate::storage::data_dir;

/// Key-value style persistence for the cached catalog projection.
pub trait PersistentCacheStore: Send + Sync {
    fn save(&self, snapshot: &CacheSnapshot) -> Result<(), CacheError>;

    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<CacheSnapshot>, CacheError>;

    fn clear(&self) -> Result<(), CacheError>;
}

/// JSON file on disk.
pub struct JsonFileCacheStore {
    path: PathBuf,
}

impl JsonFileCacheStore {
    /// Open the store in the default data directory.
    pub fn open() -> Result<Self, CacheError> {
        let dir = data_dir().map_err(|e| CacheError::Unavailable(e.to_string()))?;
        Ok(Self {
            path: dir.join("shortcut_cache.json"),
        })
    }

    /// Create a store with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistentCacheStore for JsonFileCacheStore {
    fn save(&self, snapshot: &CacheSnapshot) -> Result<(), CacheError> {
        let data = serde_json::to_string_pretty(snapshot)?;
        // Readers never see a half-written file.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<CacheSnapshot>, CacheError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let snapshot: CacheSnapshot = serde_json::from_str(&content)?;
        Ok(Some(snapshot))
    }

    fn clear(&self) -> Result<(), CacheError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store for tests and hosts without durable storage.
#[derive(Default)]
pub struct MemoryCacheStore {
    slot: Mutex<Option<String>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a raw payload, e.g. to simulate corruption.
    pub fn with_raw(raw: &str) -> Self {
        Self {
            slot: Mutex::new(Some(raw.to_string())),
        }
    }
}

impl PersistentCacheStore for MemoryCacheStore {
    fn save(&self, snapshot: &CacheSnapshot) -> Result<(), CacheError> {
        let data = serde_json::to_string(snapshot)?;
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(data);
        Ok(())
    }

    fn load(&self) -> Result<Option<CacheSnapshot>, CacheError> {
        let guard = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        match guard.as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn clear(&self) -> Result<(), CacheError> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcuts::catalog::CachedShortcut;
    use crate::shortcuts::target::ShortcutKind;

    fn snapshot() -> CacheSnapshot {
        CacheSnapshot {
            last_scan_ms: 42,
            shortcuts: vec![CachedShortcut {
                id: "app_com.mail".into(),
                package_name: "com.mail".into(),
                label: "Mail".into(),
                long_label: None,
                kind: ShortcutKind::DirectLaunch,
            }],
        }
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileCacheStore::with_path(dir.path().join("cache.json"));

        assert!(store.load().unwrap().is_none());
        store.save(&snapshot()).unwrap();
        assert_eq!(store.load().unwrap(), Some(snapshot()));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn file_store_reports_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = JsonFileCacheStore::with_path(path);
        assert!(matches!(store.load(), Err(CacheError::Parse(_))));
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryCacheStore::new();
        store.save(&snapshot()).unwrap();
        assert_eq!(store.load().unwrap(), Some(snapshot()));
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
