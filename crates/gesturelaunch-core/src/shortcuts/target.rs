//! Launch targets and their stable ids.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

const APP_PREFIX: &str = "app_";
const LEGACY_PREFIX: &str = "legacy_";
const SHORTCUT_PREFIX: &str = "shortcut_";

/// How a target is launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShortcutKind {
    /// Launch the package's main activity.
    DirectLaunch,
    /// A shortcut created through the legacy create-shortcut intent.
    LegacyShortcut,
    /// A dynamic, manifest or pinned app shortcut.
    AppShortcut,
}

/// Opaque platform icon handle. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconHandle(pub String);

/// Opaque platform launch payload.
///
/// Only [`LaunchDescriptor::Package`] can be rebuilt from persisted data;
/// the others come from a live scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchDescriptor {
    /// Launch the package's default entry point.
    Package(String),
    /// A component to invoke with the create-shortcut action.
    Component { package: String, activity: String },
    /// A platform shortcut id inside its package.
    Shortcut { package: String, shortcut_id: String },
    /// Anything else the host wants to round-trip untouched.
    Raw(String),
}

/// A resolvable launch action. Identity is `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortcutTarget {
    pub id: String,
    pub package_name: String,
    pub label: String,
    pub long_label: Option<String>,
    pub icon: Option<IconHandle>,
    pub launch_descriptor: LaunchDescriptor,
    pub kind: ShortcutKind,
}

impl ShortcutTarget {
    /// Main-activity launch for `package`.
    pub fn direct_launch(package: &str, label: &str) -> Self {
        Self {
            id: ShortcutId::App {
                package: package.to_string(),
            }
            .to_string(),
            package_name: package.to_string(),
            label: label.to_string(),
            long_label: None,
            icon: None,
            launch_descriptor: LaunchDescriptor::Package(package.to_string()),
            kind: ShortcutKind::DirectLaunch,
        }
    }

    pub fn legacy(package: &str, activity: &str, label: &str) -> Self {
        Self {
            id: ShortcutId::Legacy {
                package: package.to_string(),
                activity: activity.to_string(),
            }
            .to_string(),
            package_name: package.to_string(),
            label: label.to_string(),
            long_label: None,
            icon: None,
            launch_descriptor: LaunchDescriptor::Component {
                package: package.to_string(),
                activity: activity.to_string(),
            },
            kind: ShortcutKind::LegacyShortcut,
        }
    }

    pub fn app_shortcut(
        package: &str,
        shortcut_id: &str,
        label: &str,
        long_label: Option<&str>,
    ) -> Self {
        Self {
            id: ShortcutId::AppShortcut {
                package: package.to_string(),
                shortcut_id: shortcut_id.to_string(),
            }
            .to_string(),
            package_name: package.to_string(),
            label: label.to_string(),
            long_label: long_label.map(str::to_string),
            icon: None,
            launch_descriptor: LaunchDescriptor::Shortcut {
                package: package.to_string(),
                shortcut_id: shortcut_id.to_string(),
            },
            kind: ShortcutKind::AppShortcut,
        }
    }

    pub fn with_icon(mut self, icon: IconHandle) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Label for lists: the long label when present.
    pub fn display_label(&self) -> &str {
        self.long_label.as_deref().unwrap_or(&self.label)
    }
}

/// Structured form of a target id.
///
/// Ids are derived from package/shortcut identity only, so the same
/// underlying target gets the same id on every scan and gesture mappings
/// survive a rescan.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShortcutId {
    App { package: String },
    Legacy { package: String, activity: String },
    AppShortcut { package: String, shortcut_id: String },
}

impl ShortcutId {
    pub fn package(&self) -> &str {
        match self {
            ShortcutId::App { package }
            | ShortcutId::Legacy { package, .. }
            | ShortcutId::AppShortcut { package, .. } => package,
        }
    }

    /// Parse an id, using the known package name to split the suffix.
    /// Package names may themselves contain `_`.
    pub fn parse_with_package(id: &str, package: &str) -> Result<Self, ValidationError> {
        let malformed = || ValidationError::MalformedShortcutId(id.to_string());
        if let Some(rest) = id.strip_prefix(APP_PREFIX) {
            return if rest == package {
                Ok(ShortcutId::App {
                    package: package.to_string(),
                })
            } else {
                Err(malformed())
            };
        }
        let (prefix, kind_legacy) = if id.starts_with(LEGACY_PREFIX) {
            (LEGACY_PREFIX, true)
        } else if id.starts_with(SHORTCUT_PREFIX) {
            (SHORTCUT_PREFIX, false)
        } else {
            return Err(malformed());
        };
        let suffix = id[prefix.len()..]
            .strip_prefix(package)
            .and_then(|s| s.strip_prefix('_'))
            .filter(|s| !s.is_empty())
            .ok_or_else(malformed)?;
        Ok(if kind_legacy {
            ShortcutId::Legacy {
                package: package.to_string(),
                activity: suffix.to_string(),
            }
        } else {
            ShortcutId::AppShortcut {
                package: package.to_string(),
                shortcut_id: suffix.to_string(),
            }
        })
    }
}

impl fmt::Display for ShortcutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShortcutId::App { package } => write!(f, "{APP_PREFIX}{package}"),
            ShortcutId::Legacy { package, activity } => {
                write!(f, "{LEGACY_PREFIX}{package}_{activity}")
            }
            ShortcutId::AppShortcut {
                package,
                shortcut_id,
            } => write!(f, "{SHORTCUT_PREFIX}{package}_{shortcut_id}"),
        }
    }
}

impl FromStr for ShortcutId {
    type Err = ValidationError;

    /// Parse without a known package. Package names use `.` separators,
    /// so the first `_` after the prefix ends the package.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError::MalformedShortcutId(s.to_string());
        if let Some(package) = s.strip_prefix(APP_PREFIX) {
            if package.is_empty() {
                return Err(malformed());
            }
            return Ok(ShortcutId::App {
                package: package.to_string(),
            });
        }
        let rest = s
            .strip_prefix(LEGACY_PREFIX)
            .or_else(|| s.strip_prefix(SHORTCUT_PREFIX))
            .ok_or_else(malformed)?;
        let (package, _) = rest.split_once('_').ok_or_else(malformed)?;
        Self::parse_with_package(s, package)
    }
}
