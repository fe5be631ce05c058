use clap::Subcommand;
use gesturelaunch_core::{Config, ConfigStore, GestureType};

use super::cache::load_catalog;

#[derive(Subcommand)]
pub enum MapAction {
    /// List every gesture and its target
    List,
    /// Bind a gesture to a target id
    Set {
        /// Gesture name (e.g. "double_tap", "gyro-x-positive")
        gesture: GestureType,
        /// Target id (e.g. "app_com.example.mail")
        target_id: String,
    },
    /// Remove a gesture binding
    Clear {
        gesture: GestureType,
    },
}

pub fn run(action: MapAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        MapAction::List => {
            let config = Config::load()?;
            let catalog = load_catalog()?;
            for gesture in GestureType::ALL {
                let binding = match config.mapping(gesture) {
                    Some(id) => {
                        let label = catalog
                            .as_ref()
                            .and_then(|c| c.get(&id))
                            .map(|t| t.display_label().to_string())
                            .unwrap_or_else(|| "not in cache".to_string());
                        format!("{id} ({label})")
                    }
                    None => "-".to_string(),
                };
                println!("{:<16} {:<24} {binding}", gesture.key(), gesture.display_name());
            }
        }
        MapAction::Set { gesture, target_id } => {
            let mut config = Config::load()?;
            config.set_mapping(gesture, &target_id)?;
            config.save()?;
            println!("{gesture} -> {}", target_id.trim());
        }
        MapAction::Clear { gesture } => {
            let mut config = Config::load()?;
            match config.clear_mapping(gesture) {
                Some(previous) => {
                    config.save()?;
                    println!("{gesture} unbound (was {previous})");
                }
                None => println!("{gesture} was not bound"),
            }
        }
    }
    Ok(())
}
