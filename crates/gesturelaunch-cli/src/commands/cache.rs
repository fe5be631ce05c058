use chrono::{DateTime, Utc};
use clap::Subcommand;
use gesturelaunch_core::{JsonFileCacheStore, PersistentCacheStore, ShortcutCatalog};

#[derive(Subcommand)]
pub enum CacheAction {
    /// Show the cached shortcuts
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete the cache file
    Clear,
}

/// The persisted catalog, if there is one.
pub fn load_catalog() -> Result<Option<ShortcutCatalog>, Box<dyn std::error::Error>> {
    let store = JsonFileCacheStore::open()?;
    Ok(store.load()?.map(ShortcutCatalog::from_snapshot))
}

pub fn run(action: CacheAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CacheAction::Show { json } => {
            let store = JsonFileCacheStore::open()?;
            let Some(snapshot) = store.load()? else {
                println!("no shortcut cache at {}", store.path().display());
                return Ok(());
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
                return Ok(());
            }
            let scanned = DateTime::<Utc>::from_timestamp_millis(snapshot.last_scan_ms as i64)
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "never".to_string());
            let catalog = ShortcutCatalog::from_snapshot(snapshot);
            println!("{} shortcuts, last scan {scanned}", catalog.len());
            for target in catalog.sorted_by_label() {
                println!("{:<40} {:?} {}", target.id, target.kind, target.display_label());
            }
        }
        CacheAction::Clear => {
            let store = JsonFileCacheStore::open()?;
            store.clear()?;
            println!("shortcut cache cleared");
        }
    }
    Ok(())
}
