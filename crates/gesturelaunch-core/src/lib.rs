//! # GestureLaunch Core Library
//!
//! This library provides the core logic of a gesture-triggered app launcher
//! overlay. It turns raw sensor samples and pointer events into gestures and
//! gestures into launch decisions. Presentation, sensors and the actual
//! launching are supplied by the host through traits, so the same core runs
//! under a mobile shell, the CLI replay tool and the tests.
//!
//! ## Architecture
//!
//! - **Gyro path**: a post-fire cooldown gate in front of a sustained-motion
//!   classifier
//! - **Touch path**: a velocity-tracked double-swipe-up detector and a
//!   double-tap detector
//! - **Shortcuts**: an in-memory index of launch targets, refreshed on a
//!   worker thread and persisted as JSON for cold starts
//! - **Router**: maps gestures to targets through the user's configuration
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`GyroGestureClassifier`]: gyro state machine
//! - [`SwipeGestureDetector`]: double swipe up
//! - [`ShortcutIndex`]: cached launch targets
//! - [`GestureRouter`]: gesture to launch decision
//! - [`OverlaySession`]: one overlay lifetime
//! - [`Config`]: application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod gesture;
pub mod gyro;
pub mod router;
pub mod session;
pub mod shortcuts;
pub mod storage;
pub mod touch;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{
    CacheError, ConfigError, CoreError, LaunchError, OverlayError, Result, ScanError,
    ValidationError,
};
pub use events::Event;
pub use gesture::{FiredGesture, GestureOrigin, GestureType};
pub use gyro::{
    GyroDetector, GyroGestureClassifier, GyroSensitivity, RotationSample, SensorSampleGate,
    SensorSource,
};
pub use router::{
    ConfigStore, GestureRouter, KeepOpenReason, LaunchCollaborator, LaunchOutcome, LaunchRequest,
    RouteOutcome, TargetLookup,
};
pub use session::{OverlayHost, OverlaySession, SessionState};
pub use shortcuts::{
    IndexConfig, IndexState, JsonFileCacheStore, MemoryCacheStore, PersistentCacheStore,
    RefreshHandle, ShortcutCatalog, ShortcutIndex, ShortcutKind, ShortcutScanCollaborator,
    ShortcutScanner, ShortcutSource, ShortcutTarget,
};
pub use storage::{CacheSettings, Config};
pub use touch::{DoubleTapDetector, PointerEvent, SwipeGestureDetector};
