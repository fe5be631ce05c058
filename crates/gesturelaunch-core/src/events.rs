use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::gesture::GestureType;
use crate::shortcuts::ShortcutKind;

/// Every routing decision and index change produces an Event.
/// The host drains them for its own logging or UI feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    GestureFired {
        gesture: GestureType,
        intensity: f32,
        at: DateTime<Utc>,
    },
    /// No target configured; `dismissed` is true for touch gestures.
    NoMapping {
        gesture: GestureType,
        dismissed: bool,
        at: DateTime<Utc>,
    },
    /// A target id is configured but the index does not know it (yet).
    TargetNotFound {
        gesture: GestureType,
        target_id: String,
        at: DateTime<Utc>,
    },
    Launched {
        gesture: GestureType,
        target_id: String,
        kind: ShortcutKind,
        /// True when the package fallback was used.
        fallback: bool,
        at: DateTime<Utc>,
    },
    /// Every launch attempt failed. The overlay is still dismissed.
    LaunchFailed {
        gesture: GestureType,
        target_id: String,
        error: String,
        at: DateTime<Utc>,
    },
    OverlayDismissed {
        at: DateTime<Utc>,
    },
    /// Gyroscope missing; the session runs touch-only.
    GyroUnavailable {
        at: DateTime<Utc>,
    },
    CatalogRefreshed {
        count: usize,
        at: DateTime<Utc>,
    },
    CatalogRefreshFailed {
        error: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::GestureFired { at, .. }
            | Event::NoMapping { at, .. }
            | Event::TargetNotFound { at, .. }
            | Event::Launched { at, .. }
            | Event::LaunchFailed { at, .. }
            | Event::OverlayDismissed { at }
            | Event::GyroUnavailable { at }
            | Event::CatalogRefreshed { at, .. }
            | Event::CatalogRefreshFailed { at, .. } => *at,
        }
    }
}
