//! The resolved set of launch targets and its persistable projection.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::target::{LaunchDescriptor, ShortcutKind, ShortcutTarget};

/// Immutable id -> target map plus the time of the scan that produced it.
///
/// Never mutated in place: a refresh builds a new catalog and swaps it in.
#[derive(Debug, Clone, Default)]
pub struct ShortcutCatalog {
    targets: HashMap<String, ShortcutTarget>,
    last_scan_ms: u64,
}

impl ShortcutCatalog {
    /// Build from scan output. Later duplicates of an id are dropped.
    pub fn new(targets: Vec<ShortcutTarget>, last_scan_ms: u64) -> Self {
        let mut map = HashMap::with_capacity(targets.len());
        for target in targets {
            map.entry(target.id.clone()).or_insert(target);
        }
        Self {
            targets: map,
            last_scan_ms,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&ShortcutTarget> {
        self.targets.get(id)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn last_scan_ms(&self) -> u64 {
        self.last_scan_ms
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShortcutTarget> {
        self.targets.values()
    }

    /// All targets ordered by label, then id.
    pub fn sorted_by_label(&self) -> Vec<&ShortcutTarget> {
        let mut all: Vec<_> = self.targets.values().collect();
        all.sort_by(|a, b| {
            a.label
                .to_lowercase()
                .cmp(&b.label.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        all
    }

    pub fn to_snapshot(&self) -> CacheSnapshot {
        let mut shortcuts: Vec<CachedShortcut> =
            self.targets.values().map(CachedShortcut::from).collect();
        shortcuts.sort_by(|a, b| a.id.cmp(&b.id));
        CacheSnapshot {
            last_scan_ms: self.last_scan_ms,
            shortcuts,
        }
    }

    pub fn from_snapshot(snapshot: CacheSnapshot) -> Self {
        let targets = snapshot
            .shortcuts
            .into_iter()
            .map(CachedShortcut::into_target)
            .collect();
        Self::new(targets, snapshot.last_scan_ms)
    }
}

/// The persisted fields of a target. Icons and launch payloads are live
/// platform handles and are never written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedShortcut {
    pub id: String,
    pub package_name: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_label: Option<String>,
    pub kind: ShortcutKind,
}

impl From<&ShortcutTarget> for CachedShortcut {
    fn from(target: &ShortcutTarget) -> Self {
        Self {
            id: target.id.clone(),
            package_name: target.package_name.clone(),
            label: target.label.clone(),
            long_label: target.long_label.clone(),
            kind: target.kind,
        }
    }
}

impl CachedShortcut {
    /// Restore a target from cache. It has no icon, and its launch payload
    /// is "launch the package" until the next scan supplies the real one.
    pub fn into_target(self) -> ShortcutTarget {
        ShortcutTarget {
            launch_descriptor: LaunchDescriptor::Package(self.package_name.clone()),
            id: self.id,
            package_name: self.package_name,
            label: self.label,
            long_label: self.long_label.filter(|l| !l.is_empty()),
            icon: None,
            kind: self.kind,
        }
    }
}

/// What the durable layer stores: the projection plus the scan time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CacheSnapshot {
    #[serde(default)]
    pub last_scan_ms: u64,
    #[serde(default)]
    pub shortcuts: Vec<CachedShortcut>,
}
