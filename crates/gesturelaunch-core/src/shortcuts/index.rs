//! In-memory shortcut index with a persisted cold-start cache.
//!
//! Readers always see one fully built [`ShortcutCatalog`]: a refresh builds
//! a new catalog off to the side and swaps the `Arc` under a short write
//! lock. At most one refresh runs at a time, on a dedicated worker thread.
//!
//! ```text
//! new() ──► load persisted ──► fresh? ──yes──► serve
//!                                 │ no
//!                                 ▼
//!                      deferred refresh (worker)
//!                                 │
//!            scan ──► swap catalog ──► persist ──► publish state
//! ```
//!
//! A [`ShortcutIndex::clear`] that lands while a refresh is running flags a
//! rescan. The worker then skips committing its pre-clear result and scans
//! again before giving up the in-flight slot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::cache_store::PersistentCacheStore;
use super::catalog::ShortcutCatalog;
use super::scanner::ShortcutScanCollaborator;
use super::target::ShortcutTarget;
use crate::clock::Clock;
use crate::error::{CacheError, ScanError};

/// Default validity window: 30 minutes.
pub const DEFAULT_VALIDITY_MS: u64 = 30 * 60 * 1000;

/// Default delay before the first scan after construction.
pub const DEFAULT_COLD_START_DELAY: Duration = Duration::from_millis(500);

/// Refresh policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexConfig {
    /// A catalog older than this is stale.
    pub validity_ms: u64,
    /// How long the cold-start refresh waits before scanning.
    pub cold_start_delay: Duration,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            validity_ms: DEFAULT_VALIDITY_MS,
            cold_start_delay: DEFAULT_COLD_START_DELAY,
        }
    }
}

impl IndexConfig {
    /// No cold-start delay. Used by tests and one-shot tools.
    pub fn immediate() -> Self {
        Self {
            cold_start_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// What observers see.
#[derive(Debug, Clone, Default)]
pub struct IndexState {
    pub catalog: Arc<ShortcutCatalog>,
    /// A refresh is running.
    pub loading: bool,
    /// Message from the last failed refresh, cleared by the next success.
    pub error: Option<String>,
    /// Refreshes finished so far, successful or not.
    pub completed: u64,
}

/// Handle to a scheduled refresh.
pub struct RefreshHandle {
    handle: JoinHandle<Result<usize, ScanError>>,
}

impl RefreshHandle {
    /// Wait for the refresh. Returns the number of targets indexed.
    pub fn join(self) -> Result<usize, ScanError> {
        self.handle
            .join()
            .unwrap_or_else(|_| Err(ScanError::ServiceUnavailable("refresh worker panicked".into())))
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Clears the in-flight flag even if the scan panics.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct ShortcutIndex {
    catalog: RwLock<Arc<ShortcutCatalog>>,
    refreshing: AtomicBool,
    rescan: AtomicBool,
    state: watch::Sender<IndexState>,
    startup: Mutex<Option<RefreshHandle>>,
    scanner: Arc<dyn ShortcutScanCollaborator>,
    store: Arc<dyn PersistentCacheStore>,
    clock: Arc<dyn Clock>,
    config: IndexConfig,
}

impl ShortcutIndex {
    /// Build the index and run the cold-start sequence.
    ///
    /// A fresh persisted catalog is loaded synchronously so `lookup` works
    /// before any scan. When it is stale or absent, a refresh is scheduled
    /// after `cold_start_delay`; see [`ShortcutIndex::take_startup_refresh`].
    pub fn new(
        scanner: Arc<dyn ShortcutScanCollaborator>,
        store: Arc<dyn PersistentCacheStore>,
        clock: Arc<dyn Clock>,
        config: IndexConfig,
    ) -> Arc<Self> {
        let now = clock.now_ms();
        let initial = match load_persisted(store.as_ref()) {
            Some(catalog) if !is_stale(&catalog, now, config.validity_ms) => {
                debug!(count = catalog.len(), "loaded shortcut cache");
                catalog
            }
            Some(catalog) => {
                debug!(last_scan_ms = catalog.last_scan_ms(), "persisted shortcut cache is stale");
                ShortcutCatalog::empty()
            }
            None => ShortcutCatalog::empty(),
        };
        let needs_scan = is_stale(&initial, now, config.validity_ms);
        let initial = Arc::new(initial);
        let (state, _) = watch::channel(IndexState {
            catalog: Arc::clone(&initial),
            ..IndexState::default()
        });

        let index = Arc::new(Self {
            catalog: RwLock::new(initial),
            refreshing: AtomicBool::new(false),
            rescan: AtomicBool::new(false),
            state,
            startup: Mutex::new(None),
            scanner,
            store,
            clock,
            config,
        });

        if needs_scan {
            let handle = index.spawn_refresh(index.config.cold_start_delay);
            *index.startup.lock().unwrap_or_else(|e| e.into_inner()) = handle;
        }
        index
    }

    /// The refresh scheduled by [`ShortcutIndex::new`], if any. Only the
    /// first caller gets it.
    pub fn take_startup_refresh(&self) -> Option<RefreshHandle> {
        self.startup.lock().unwrap_or_else(|e| e.into_inner()).take()
    }

    /// Look up a target by id. Never waits for a scan.
    pub fn lookup(&self, id: &str) -> Option<ShortcutTarget> {
        self.snapshot().get(id).cloned()
    }

    /// The current catalog.
    pub fn snapshot(&self) -> Arc<ShortcutCatalog> {
        Arc::clone(&self.catalog.read().unwrap_or_else(|e| e.into_inner()))
    }

    /// Observe catalog swaps and refresh status.
    pub fn subscribe(&self) -> watch::Receiver<IndexState> {
        self.state.subscribe()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Acquire)
    }

    pub fn config(&self) -> IndexConfig {
        self.config
    }

    /// Empty, or older than the validity window.
    pub fn is_stale(&self) -> bool {
        is_stale(&self.snapshot(), self.clock.now_ms(), self.config.validity_ms)
    }

    /// Schedule a refresh if the catalog is stale and none is running.
    /// Returns immediately; the current data stays readable meanwhile.
    pub fn ensure_fresh(self: &Arc<Self>) -> Option<RefreshHandle> {
        if !self.is_stale() {
            return None;
        }
        self.spawn_refresh(Duration::ZERO)
    }

    /// Wipe the persisted and in-memory catalog, then refresh.
    ///
    /// If a refresh is already running no second one starts and `None` is
    /// returned; the running worker discards its result and scans again.
    pub fn clear(self: &Arc<Self>) -> Option<RefreshHandle> {
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear persisted shortcut cache");
        }
        let empty = Arc::new(ShortcutCatalog::empty());
        *self.catalog.write().unwrap_or_else(|e| e.into_inner()) = Arc::clone(&empty);
        self.state.send_modify(|state| state.catalog = empty);
        info!("shortcut cache cleared");
        // Set after the wipe: any scan that observes it starts after the wipe.
        self.rescan.store(true, Ordering::SeqCst);
        self.spawn_refresh(Duration::ZERO)
    }

    fn spawn_refresh(self: &Arc<Self>, delay: Duration) -> Option<RefreshHandle> {
        if !self.try_begin_refresh() {
            debug!("shortcut refresh already in flight");
            return None;
        }

        let index = Arc::clone(self);
        let spawned = thread::Builder::new()
            .name("shortcut-refresh".into())
            .spawn(move || index.run_refresh(delay));
        match spawned {
            Ok(handle) => Some(RefreshHandle { handle }),
            Err(err) => {
                warn!(error = %err, "failed to spawn shortcut refresh worker");
                let error = err.to_string();
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(error);
                    state.completed += 1;
                });
                self.refreshing.store(false, Ordering::SeqCst);
                None
            }
        }
    }

    /// Claim the single in-flight slot and announce loading.
    fn try_begin_refresh(&self) -> bool {
        if self
            .refreshing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }
        self.state.send_modify(|state| state.loading = true);
        true
    }

    fn run_refresh(&self, delay: Duration) -> Result<usize, ScanError> {
        if !delay.is_zero() {
            thread::sleep(delay);
        }

        loop {
            let in_flight = InFlight(&self.refreshing);
            self.rescan.store(false, Ordering::SeqCst);
            let result = self.refresh_once();
            if !self.rescan.load(Ordering::SeqCst) {
                // Observers see the outcome before the slot frees up.
                self.publish_outcome(&result);
            }
            drop(in_flight);

            if !self.rescan.load(Ordering::SeqCst) || !self.try_begin_refresh() {
                return result.map(|catalog| catalog.len());
            }
            debug!("shortcut cache cleared during refresh, scanning again");
        }
    }

    /// One scan. The result is committed unless a clear arrived meanwhile.
    fn refresh_once(&self) -> Result<Arc<ShortcutCatalog>, ScanError> {
        let targets = self.scanner.scan().inspect_err(|err| {
            warn!(error = %err, "shortcut scan failed, keeping previous catalog");
        })?;
        let catalog = Arc::new(ShortcutCatalog::new(targets, self.clock.now_ms()));
        if self.rescan.load(Ordering::SeqCst) {
            debug!("discarding scan that raced a clear");
            return Ok(catalog);
        }

        *self.catalog.write().unwrap_or_else(|e| e.into_inner()) = Arc::clone(&catalog);
        if self.rescan.load(Ordering::SeqCst) {
            debug!("skipping persist of a scan that raced a clear");
        } else if let Err(err) = self.store.save(&catalog.to_snapshot()) {
            warn!(error = %err, "failed to persist shortcut cache");
        }
        info!(count = catalog.len(), "shortcut catalog refreshed");
        Ok(catalog)
    }

    fn publish_outcome(&self, result: &Result<Arc<ShortcutCatalog>, ScanError>) {
        let current = self.snapshot();
        self.state.send_modify(|state| {
            state.catalog = current;
            state.loading = false;
            state.error = result.as_ref().err().map(|err| err.to_string());
            state.completed += 1;
        });
    }
}

fn is_stale(catalog: &ShortcutCatalog, now_ms: u64, validity_ms: u64) -> bool {
    catalog.is_empty() || now_ms.saturating_sub(catalog.last_scan_ms()) > validity_ms
}

/// Read the durable layer. A corrupt payload counts as no cache.
fn load_persisted(store: &dyn PersistentCacheStore) -> Option<ShortcutCatalog> {
    match store.load() {
        Ok(snapshot) => snapshot.map(ShortcutCatalog::from_snapshot),
        Err(CacheError::Parse(err)) => {
            warn!(error = %err, "ignoring corrupt shortcut cache");
            None
        }
        Err(err) => {
            warn!(error = %err, "failed to read shortcut cache");
            None
        }
    }
}
