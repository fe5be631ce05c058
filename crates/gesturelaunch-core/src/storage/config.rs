//! TOML-based user configuration.
//!
//! Stores:
//! - Gesture to target id mappings
//! - Gyroscope sensitivity per axis
//! - Shortcut cache policy
//!
//! Configuration is stored at `~/.config/gesturelaunch/config.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use crate::error::{ConfigError, Result, ValidationError};
use crate::gesture::GestureType;
use crate::gyro::GyroSensitivity;
use crate::router::ConfigStore;
use crate::shortcuts::IndexConfig;

/// Shortcut cache policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_validity_minutes")]
    pub validity_minutes: u64,
    #[serde(default = "default_cold_start_delay_ms")]
    pub cold_start_delay_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/gesturelaunch/config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Gesture -> target id. Unbound gestures are absent.
    #[serde(default)]
    pub gestures: BTreeMap<GestureType, String>,
    #[serde(default)]
    pub gyro: GyroSensitivity,
    #[serde(default)]
    pub cache: CacheSettings,
}

fn default_validity_minutes() -> u64 {
    30
}
fn default_cold_start_delay_ms() -> u64 {
    500
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            validity_minutes: default_validity_minutes(),
            cold_start_delay_ms: default_cold_start_delay_ms(),
        }
    }
}

impl CacheSettings {
    pub fn index_config(&self) -> IndexConfig {
        IndexConfig {
            validity_ms: self.validity_minutes.saturating_mul(60_000),
            cold_start_delay: Duration::from_millis(self.cold_start_delay_ms),
        }
    }
}

/// Top-level tables whose keys are user data rather than schema.
const OPEN_TABLES: &[&str] = &["gestures"];

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut parent = root;
        if let Some(path) = parent_path {
            for part in path.split('.') {
                parent = parent.get_mut(part).ok_or_else(unknown)?;
            }
        }
        let obj = parent.as_object_mut().ok_or_else(unknown)?;

        let new_value = match obj.get(leaf) {
            Some(serde_json::Value::Bool(_)) => serde_json::Value::Bool(
                value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
            ),
            Some(serde_json::Value::Number(_)) => {
                if let Ok(n) = value.parse::<u64>() {
                    serde_json::Value::Number(n.into())
                } else if let Ok(n) = value.parse::<f64>() {
                    serde_json::Number::from_f64(n)
                        .map(serde_json::Value::Number)
                        .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                } else {
                    return Err(invalid(format!("cannot parse '{value}' as number")));
                }
            }
            Some(serde_json::Value::Object(_)) | Some(serde_json::Value::Array(_)) => {
                serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
            }
            Some(_) => serde_json::Value::String(value.into()),
            // New entries are only allowed in open tables.
            None if parent_path.is_some_and(|p| OPEN_TABLES.contains(&p)) => {
                serde_json::Value::String(value.into())
            }
            None => return Err(unknown()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    fn path() -> std::result::Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let mut cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                cfg.gyro = cfg.gyro.sanitized();
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. The caller saves.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// field (including non-positive sensitivities and unknown gestures).
    /// Sensitivities are clamped like [`Config::set_sensitivity`].
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let mut updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.gyro = GyroSensitivity::new(updated.gyro.x(), updated.gyro.y(), updated.gyro.z())?.clamped();
        *self = updated;
        Ok(())
    }

    /// Every key with its current value, in file order.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (k, v) in map {
                        let key = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&key, v, out);
                    }
                }
                serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }
        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out
    }

    pub fn set_mapping(&mut self, gesture: GestureType, target_id: &str) -> Result<(), ValidationError> {
        let target_id = target_id.trim();
        if target_id.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: gesture.key().to_string(),
                message: "target id is empty".into(),
            });
        }
        self.gestures.insert(gesture, target_id.to_string());
        Ok(())
    }

    /// Returns the previous binding.
    pub fn clear_mapping(&mut self, gesture: GestureType) -> Option<String> {
        self.gestures.remove(&gesture)
    }

    /// Update any subset of axes. Values must be positive and are clamped
    /// to the settings range.
    pub fn set_sensitivity(
        &mut self,
        x: Option<f32>,
        y: Option<f32>,
        z: Option<f32>,
    ) -> Result<GyroSensitivity, ValidationError> {
        let mut next = self.gyro;
        if let Some(x) = x {
            next.set_x(x)?;
        }
        if let Some(y) = y {
            next.set_y(y)?;
        }
        if let Some(z) = z {
            next.set_z(z)?;
        }
        self.gyro = next.clamped();
        Ok(self.gyro)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

impl ConfigStore for Config {
    fn mapping(&self, gesture: GestureType) -> Option<String> {
        self.gestures.get(&gesture).cloned()
    }

    fn sensitivity(&self) -> GyroSensitivity {
        self.gyro
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let mut cfg = Config::default();
        cfg.set_mapping(GestureType::DoubleTap, "app_com.mail").unwrap();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        assert!(toml_str.contains("DOUBLE_TAP = \"app_com.mail\""));
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn empty_file_gives_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.cache.validity_minutes, 30);
        assert_eq!(cfg.cache.cold_start_delay_ms, 500);
        assert_eq!(cfg.gyro, GyroSensitivity::default());
        assert!(cfg.gestures.is_empty());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("cache.validity_minutes").as_deref(), Some("30"));
        assert_eq!(cfg.get("gyro.x").as_deref(), Some("2.0"));
        assert!(cfg.get("cache.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("cache.validity_minutes", "45").unwrap();
        assert_eq!(cfg.cache.validity_minutes, 45);
        cfg.set("gyro.y", "3.5").unwrap();
        assert_eq!(cfg.gyro.y(), 3.5);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("cache.nonexistent", "1"),
            Err(crate::CoreError::Config(ConfigError::UnknownKey(_)))
        ));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("cache.validity_minutes", "soon").is_err());
    }

    #[test]
    fn set_rejects_non_positive_sensitivity() {
        let mut cfg = Config::default();
        assert!(cfg.set("gyro.z", "-1").is_err());
        assert_eq!(cfg.gyro.z(), 2.0);
    }

    #[test]
    fn set_clamps_sensitivity_to_slider_range() {
        let mut cfg = Config::default();
        cfg.set("gyro.x", "9").unwrap();
        cfg.set("gyro.y", "0.2").unwrap();
        assert_eq!(cfg.gyro.x(), 5.0);
        assert_eq!(cfg.gyro.y(), 0.5);
        assert_eq!(cfg.get("gyro.x").as_deref(), Some("5.0"));
    }

    #[test]
    fn set_accepts_new_gesture_mapping_only_for_known_gestures() {
        let mut cfg = Config::default();
        cfg.set("gestures.GYRO_X_POSITIVE", "app_com.maps").unwrap();
        assert_eq!(cfg.mapping(GestureType::GyroXPositive).as_deref(), Some("app_com.maps"));
        assert!(cfg.set("gestures.WAVE", "app_com.maps").is_err());
    }

    #[test]
    fn mapping_set_and_clear() {
        let mut cfg = Config::default();
        cfg.set_mapping(GestureType::DoubleSwipeUp, "shortcut_com.mail_compose").unwrap();
        assert!(cfg.set_mapping(GestureType::DoubleTap, "  ").is_err());
        assert_eq!(
            cfg.clear_mapping(GestureType::DoubleSwipeUp).as_deref(),
            Some("shortcut_com.mail_compose")
        );
        assert_eq!(cfg.mapping(GestureType::DoubleSwipeUp), None);
    }

    #[test]
    fn sensitivity_is_validated_then_clamped() {
        let mut cfg = Config::default();
        let s = cfg.set_sensitivity(Some(9.0), None, Some(0.1)).unwrap();
        assert_eq!((s.x(), s.y(), s.z()), (5.0, 2.0, 0.5));
        assert!(cfg.set_sensitivity(Some(0.0), None, None).is_err());
        assert_eq!(cfg.gyro.x(), 5.0);
    }

    #[test]
    fn load_from_writes_defaults_and_sanitizes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        std::fs::write(&path, "[gyro]\nx = -4.0\ny = 1.5\n").unwrap();
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.gyro.x(), 2.0);
        assert_eq!(cfg.gyro.y(), 1.5);
    }

    #[test]
    fn entries_lists_every_key() {
        let mut cfg = Config::default();
        cfg.set_mapping(GestureType::DoubleTap, "app_com.mail").unwrap();
        let keys: Vec<_> = cfg.entries().into_iter().map(|(k, _)| k).collect();
        assert!(keys.contains(&"gestures.DOUBLE_TAP".to_string()));
        assert!(keys.contains(&"gyro.z".to_string()));
        assert!(keys.contains(&"cache.cold_start_delay_ms".to_string()));
    }

    #[test]
    fn cache_settings_convert_to_index_config() {
        let settings = CacheSettings {
            validity_minutes: 2,
            cold_start_delay_ms: 0,
        };
        let index = settings.index_config();
        assert_eq!(index.validity_ms, 120_000);
        assert!(index.cold_start_delay.is_zero());
    }
}
