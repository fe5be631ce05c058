//! Enumerating launch targets.
//!
//! The platform supplies one [`ShortcutSource`] per target kind (launchable
//! apps, legacy create-shortcut activities, app shortcuts). The
//! [`ShortcutScanner`] merges them into the list the index swaps in.

use std::collections::HashSet;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::target::ShortcutTarget;
use crate::error::ScanError;

/// Produces the complete current set of launch targets.
///
/// Long-running; only ever called from the index's refresh worker.
/// Implementations deduplicate by id and return the resolvable subset when
/// individual entries fail.
pub trait ShortcutScanCollaborator: Send + Sync {
    fn scan(&self) -> Result<Vec<ShortcutTarget>, ScanError>;
}

/// One platform query, e.g. "all launchable apps".
pub trait ShortcutSource: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Every entry the query returned, resolved or not. An outer `Err`
    /// means the query itself failed.
    fn enumerate(&self) -> Result<Vec<Result<ShortcutTarget, ScanError>>, ScanError>;
}

/// Scan collaborator built from per-kind sources.
#[derive(Default)]
pub struct ShortcutScanner {
    sources: Vec<Box<dyn ShortcutSource>>,
}

/// Per-scan counters, logged after each scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub resolved: usize,
    pub skipped: usize,
    pub duplicates: usize,
    pub failed_sources: usize,
}

impl ShortcutScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: impl ShortcutSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn add_source(&mut self, source: Box<dyn ShortcutSource>) {
        self.sources.push(source);
    }

    /// Run every source and merge. Sources are queried in registration
    /// order; the first target with a given id wins.
    pub fn scan_with_stats(&self) -> Result<(Vec<ShortcutTarget>, ScanStats), ScanError> {
        let started = Instant::now();
        let mut stats = ScanStats::default();
        let mut seen = HashSet::new();
        let mut targets = Vec::new();
        let mut last_failure = None;

        for source in &self.sources {
            let entries = match source.enumerate() {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(source = source.name(), error = %err, "shortcut source failed");
                    stats.failed_sources += 1;
                    last_failure = Some(err);
                    continue;
                }
            };
            for entry in entries {
                match entry {
                    Ok(target) => {
                        if seen.insert(target.id.clone()) {
                            targets.push(target);
                            stats.resolved += 1;
                        } else {
                            stats.duplicates += 1;
                        }
                    }
                    // Expected for packages that hide their shortcuts.
                    Err(ScanError::PermissionDenied(package)) => {
                        debug!(%package, "no permission to query shortcuts");
                        stats.skipped += 1;
                    }
                    Err(err) => {
                        warn!(source = source.name(), error = %err, "skipping shortcut entry");
                        stats.skipped += 1;
                    }
                }
            }
        }

        // Only a scan where every source failed is a failed scan.
        if !self.sources.is_empty() && stats.failed_sources == self.sources.len() {
            if let Some(err) = last_failure {
                return Err(err);
            }
        }

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            resolved = stats.resolved,
            skipped = stats.skipped,
            duplicates = stats.duplicates,
            "shortcut scan completed"
        );
        Ok((targets, stats))
    }
}

impl ShortcutScanCollaborator for ShortcutScanner {
    fn scan(&self) -> Result<Vec<ShortcutTarget>, ScanError> {
        self.scan_with_stats().map(|(targets, _)| targets)
    }
}

/// A fixed list of targets. Useful for hosts that resolve everything up
/// front, and for tests.
pub struct StaticSource {
    name: String,
    entries: Vec<Result<ShortcutTarget, ScanError>>,
}

impl StaticSource {
    pub fn new(name: &str, targets: Vec<ShortcutTarget>) -> Self {
        Self {
            name: name.to_string(),
            entries: targets.into_iter().map(Ok).collect(),
        }
    }

    pub fn with_entries(name: &str, entries: Vec<Result<ShortcutTarget, ScanError>>) -> Self {
        Self {
            name: name.to_string(),
            entries,
        }
    }
}

impl ShortcutSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn enumerate(&self) -> Result<Vec<Result<ShortcutTarget, ScanError>>, ScanError> {
        Ok(self.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenSource;

    impl ShortcutSource for BrokenSource {
        fn name(&self) -> &str {
            "broken"
        }

        fn enumerate(&self) -> Result<Vec<Result<ShortcutTarget, ScanError>>, ScanError> {
            Err(ScanError::ServiceUnavailable("launcher service".into()))
        }
    }

    #[test]
    fn merges_sources_and_dedupes_by_id() {
        let scanner = ShortcutScanner::new()
            .with_source(StaticSource::new(
                "apps",
                vec![
                    ShortcutTarget::direct_launch("com.mail", "Mail"),
                    ShortcutTarget::direct_launch("com.maps", "Maps"),
                ],
            ))
            .with_source(StaticSource::new(
                "shortcuts",
                vec![
                    ShortcutTarget::direct_launch("com.mail", "Mail again"),
                    ShortcutTarget::app_shortcut("com.mail", "compose", "Compose", None),
                ],
            ));

        let (targets, stats) = scanner.scan_with_stats().unwrap();
        let ids: Vec<_> = targets.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["app_com.mail", "app_com.maps", "shortcut_com.mail_compose"]);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(targets[0].label, "Mail");
    }

    #[test]
    fn bad_entries_are_skipped() {
        let scanner = ShortcutScanner::new().with_source(StaticSource::with_entries(
            "apps",
            vec![
                Ok(ShortcutTarget::direct_launch("com.mail", "Mail")),
                Err(ScanError::Entry {
                    entry: "com.broken".into(),
                    message: "label failed to load".into(),
                }),
                Err(ScanError::PermissionDenied("com.secret".into())),
            ],
        ));
        let (targets, stats) = scanner.scan_with_stats().unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(stats.skipped, 2);
    }

    #[test]
    fn one_failed_source_is_partial_success() {
        let scanner = ShortcutScanner::new()
            .with_source(BrokenSource)
            .with_source(StaticSource::new(
                "apps",
                vec![ShortcutTarget::direct_launch("com.mail", "Mail")],
            ));
        assert_eq!(scanner.scan().unwrap().len(), 1);
    }

    #[test]
    fn all_sources_failing_is_an_error() {
        let scanner = ShortcutScanner::new().with_source(BrokenSource);
        assert!(matches!(scanner.scan(), Err(ScanError::ServiceUnavailable(_))));
    }

    #[test]
    fn no_sources_is_an_empty_scan() {
        assert!(ShortcutScanner::new().scan().unwrap().is_empty());
    }
}
