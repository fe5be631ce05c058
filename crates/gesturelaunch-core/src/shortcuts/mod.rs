//! Launch targets: ids, scanning, and the cached index the router reads.

mod cache_store;
mod catalog;
mod index;
mod scanner;
mod target;

pub use cache_store::{JsonFileCacheStore, MemoryCacheStore, PersistentCacheStore};
pub use catalog::{CacheSnapshot, CachedShortcut, ShortcutCatalog};
pub use index::{
    IndexConfig, IndexState, RefreshHandle, ShortcutIndex, DEFAULT_COLD_START_DELAY,
    DEFAULT_VALIDITY_MS,
};
pub use scanner::{ScanStats, ShortcutScanCollaborator, ShortcutScanner, ShortcutSource, StaticSource};
pub use target::{IconHandle, LaunchDescriptor, ShortcutId, ShortcutKind, ShortcutTarget};
