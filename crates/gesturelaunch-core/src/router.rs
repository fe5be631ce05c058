//! Turns fired gestures into launch decisions.
//!
//! | mapping | lookup | outcome                                  |
//! |---------|--------|------------------------------------------|
//! | none    | -      | touch: dismiss, gyro: stay open          |
//! | some    | miss   | stay open, `TargetNotFound`              |
//! | some    | hit    | launch (with fallback), then dismiss     |

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::LaunchError;
use crate::events::Event;
use crate::gesture::{FiredGesture, GestureType};
use crate::gyro::GyroSensitivity;
use crate::shortcuts::{ShortcutCatalog, ShortcutIndex, ShortcutKind, ShortcutTarget};

/// Read side of the user's settings.
pub trait ConfigStore: Send + Sync {
    /// Target id bound to `gesture`, if any.
    fn mapping(&self, gesture: GestureType) -> Option<String>;

    fn sensitivity(&self) -> GyroSensitivity;
}

/// Anything that resolves target ids.
pub trait TargetLookup: Send + Sync {
    fn lookup(&self, id: &str) -> Option<ShortcutTarget>;
}

impl TargetLookup for ShortcutIndex {
    fn lookup(&self, id: &str) -> Option<ShortcutTarget> {
        ShortcutIndex::lookup(self, id)
    }
}

impl TargetLookup for ShortcutCatalog {
    fn lookup(&self, id: &str) -> Option<ShortcutTarget> {
        self.get(id).cloned()
    }
}

/// What the launcher is asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum LaunchRequest {
    /// Launch the target the way its kind says.
    Target(ShortcutTarget),
    /// Launch the package's default entry point.
    Package(String),
}

/// Platform launcher.
pub trait LaunchCollaborator: Send + Sync {
    fn launch(&self, request: &LaunchRequest) -> Result<(), LaunchError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum KeepOpenReason {
    /// Gyro gesture with nothing bound. The user may try another.
    NoMapping,
    /// Bound id missing from the index. Likely a refresh is pending.
    TargetNotFound { target_id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum LaunchOutcome {
    Launched { target_id: String, fallback: bool },
    Failed { target_id: String, error: LaunchError },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    /// The overlay should close. `launch` is `None` for an unbound touch
    /// gesture.
    Dismissed { launch: Option<LaunchOutcome> },
    KeptOpen(KeepOpenReason),
    /// Already dismissed; the gesture was ignored.
    Finished,
}

impl RouteOutcome {
    pub fn is_dismissed(&self) -> bool {
        matches!(self, RouteOutcome::Dismissed { .. })
    }
}

/// Routing state for one overlay session. Both gesture sources feed the
/// same router, so the first dismissal wins.
pub struct GestureRouter {
    config: Arc<dyn ConfigStore>,
    targets: Arc<dyn TargetLookup>,
    launcher: Arc<dyn LaunchCollaborator>,
    dismissed: bool,
    events: Vec<Event>,
}

impl GestureRouter {
    pub fn new(
        config: Arc<dyn ConfigStore>,
        targets: Arc<dyn TargetLookup>,
        launcher: Arc<dyn LaunchCollaborator>,
    ) -> Self {
        Self {
            config,
            targets,
            launcher,
            dismissed: false,
            events: Vec::new(),
        }
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    /// Drain recorded events.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn route(&mut self, fired: FiredGesture) -> RouteOutcome {
        if self.dismissed {
            debug!(gesture = %fired.gesture, "overlay already dismissed, ignoring gesture");
            return RouteOutcome::Finished;
        }
        let gesture = fired.gesture;
        self.events.push(Event::GestureFired {
            gesture,
            intensity: fired.intensity,
            at: Utc::now(),
        });

        let Some(target_id) = self.config.mapping(gesture) else {
            let dismiss = gesture.is_touch();
            debug!(%gesture, dismiss, "no target mapped");
            self.events.push(Event::NoMapping {
                gesture,
                dismissed: dismiss,
                at: Utc::now(),
            });
            return if dismiss {
                self.dismiss();
                RouteOutcome::Dismissed { launch: None }
            } else {
                RouteOutcome::KeptOpen(KeepOpenReason::NoMapping)
            };
        };

        let Some(target) = self.targets.lookup(&target_id) else {
            warn!(%gesture, %target_id, "mapped target not in shortcut index");
            self.events.push(Event::TargetNotFound {
                gesture,
                target_id: target_id.clone(),
                at: Utc::now(),
            });
            return RouteOutcome::KeptOpen(KeepOpenReason::TargetNotFound { target_id });
        };

        let launch = match self.launch_with_fallback(&target) {
            Ok(fallback) => {
                info!(%gesture, target_id = %target.id, fallback, "launched target");
                self.events.push(Event::Launched {
                    gesture,
                    target_id: target.id.clone(),
                    kind: target.kind,
                    fallback,
                    at: Utc::now(),
                });
                LaunchOutcome::Launched {
                    target_id: target.id,
                    fallback,
                }
            }
            Err(error) => {
                warn!(%gesture, target_id = %target.id, %error, "launch failed");
                self.events.push(Event::LaunchFailed {
                    gesture,
                    target_id: target.id.clone(),
                    error: error.to_string(),
                    at: Utc::now(),
                });
                LaunchOutcome::Failed {
                    target_id: target.id,
                    error,
                }
            }
        };
        // The user's intent was expressed; close even if nothing launched.
        self.dismiss();
        RouteOutcome::Dismissed {
            launch: Some(launch),
        }
    }

    /// `Ok(true)` when the package fallback did the launch.
    fn launch_with_fallback(&self, target: &ShortcutTarget) -> Result<bool, LaunchError> {
        let err = match self.launcher.launch(&LaunchRequest::Target(target.clone())) {
            Ok(()) => return Ok(false),
            Err(err) => err,
        };
        match target.kind {
            ShortcutKind::DirectLaunch => Err(err),
            ShortcutKind::AppShortcut | ShortcutKind::LegacyShortcut => {
                debug!(target_id = %target.id, error = %err, "falling back to package launch");
                self.launcher
                    .launch(&LaunchRequest::Package(target.package_name.clone()))
                    .map(|()| true)
            }
        }
    }

    fn dismiss(&mut self) {
        self.dismissed = true;
        self.events.push(Event::OverlayDismissed { at: Utc::now() });
    }
}
