//! One overlay lifetime: from attach to dismissal.
//!
//! The session owns the detectors and the router, and is the only thing the
//! host talks to while the overlay is up. Sensor samples and pointer events
//! may arrive on different host threads; the host serializes calls into the
//! session (it is `&mut self` throughout).

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::error::{CoreError, OverlayError, Result};
use crate::events::Event;
use crate::gesture::FiredGesture;
use crate::gyro::{GyroDetector, RotationSample, SensorSource};
use crate::router::{ConfigStore, GestureRouter, LaunchCollaborator, RouteOutcome};
use crate::shortcuts::{IndexState, RefreshHandle, ShortcutIndex};
use crate::touch::{DoubleTapDetector, PointerEvent, SwipeGestureDetector};

/// Overlay presentation, owned by the host.
pub trait OverlayHost: Send {
    /// Put the overlay on screen. Failure ends the session.
    fn attach(&mut self) -> std::result::Result<(), OverlayError>;

    /// Take the overlay down. Called at most once per successful attach.
    fn dismiss(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Running,
    Stopped,
}

pub struct OverlaySession<S: SensorSource> {
    host: Box<dyn OverlayHost>,
    gyro: GyroDetector<S>,
    swipe: SwipeGestureDetector,
    tap: DoubleTapDetector,
    router: GestureRouter,
    config: Arc<dyn ConfigStore>,
    index: Arc<ShortcutIndex>,
    index_state: watch::Receiver<IndexState>,
    seen_refreshes: u64,
    refresh: Option<RefreshHandle>,
    state: SessionState,
    attached: bool,
    events: Vec<Event>,
}

impl<S: SensorSource> OverlaySession<S> {
    pub fn new(
        host: Box<dyn OverlayHost>,
        sensor: S,
        config: Arc<dyn ConfigStore>,
        index: Arc<ShortcutIndex>,
        launcher: Arc<dyn LaunchCollaborator>,
    ) -> Self {
        let router = GestureRouter::new(config.clone(), index.clone(), launcher);
        let index_state = index.subscribe();
        let seen_refreshes = index_state.borrow().completed;
        Self {
            host,
            gyro: GyroDetector::new(sensor, config.sensitivity()),
            swipe: SwipeGestureDetector::new(),
            tap: DoubleTapDetector::new(),
            router,
            config,
            index,
            index_state,
            seen_refreshes,
            refresh: None,
            state: SessionState::Created,
            attached: false,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Attach the overlay, start the gyro path when present and make sure
    /// the shortcut index is fresh.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::AttachFailed`] when the host cannot show the
    /// overlay. The session is stopped afterwards and holds no resources.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            SessionState::Running => return Ok(()),
            SessionState::Stopped => return Err(OverlayError::Stopped.into()),
            SessionState::Created => {}
        }

        if let Err(err) = self.host.attach() {
            error!(error = %err, "failed to attach overlay");
            self.stop();
            return Err(CoreError::Overlay(err));
        }
        self.attached = true;
        self.state = SessionState::Running;

        self.gyro.set_sensitivity(self.config.sensitivity());
        if !self.gyro.start() {
            self.events.push(Event::GyroUnavailable { at: Utc::now() });
        }
        self.refresh = self.index.ensure_fresh();
        info!(mode = self.status_line(), "overlay session started");
        Ok(())
    }

    pub fn gyro_enabled(&self) -> bool {
        self.gyro.is_listening()
    }

    pub fn status_line(&self) -> &'static str {
        if self.gyro_enabled() {
            "with gyroscope"
        } else {
            "touch only"
        }
    }

    /// Refresh started by [`OverlaySession::start`], if one was needed.
    pub fn take_refresh(&mut self) -> Option<RefreshHandle> {
        self.refresh.take()
    }

    pub fn on_rotation(&mut self, sample: &RotationSample) -> Option<RouteOutcome> {
        if self.state != SessionState::Running {
            return None;
        }
        let fired = self.gyro.on_sample(sample)?;
        Some(self.dispatch(fired))
    }

    /// Both touch detectors see every event. If the first gesture
    /// dismisses the overlay the second is not routed.
    pub fn on_pointer(&mut self, event: &PointerEvent) -> Option<RouteOutcome> {
        if self.state != SessionState::Running {
            return None;
        }
        let fired = [self.swipe.on_pointer(event), self.tap.on_pointer(event)];
        let mut last = None;
        for gesture in fired.into_iter().flatten() {
            let outcome = self.dispatch(gesture);
            let done = outcome.is_dismissed();
            last = Some(outcome);
            if done {
                break;
            }
        }
        last
    }

    /// The host lost the pointer stream (e.g. the touch was stolen).
    pub fn on_pointer_lost(&mut self, now_ms: u64) -> Option<RouteOutcome> {
        if self.state != SessionState::Running {
            return None;
        }
        self.tap.reset();
        let fired = self.swipe.cancel(now_ms)?;
        Some(self.dispatch(fired))
    }

    fn dispatch(&mut self, fired: FiredGesture) -> RouteOutcome {
        let outcome = self.router.route(fired);
        if outcome.is_dismissed() {
            self.stop();
        }
        outcome
    }

    /// Stop sensor delivery, drop detector state and detach the overlay.
    /// Safe to call more than once. A running index refresh carries on.
    pub fn stop(&mut self) {
        if self.state == SessionState::Stopped {
            return;
        }
        self.gyro.stop();
        self.swipe.reset();
        self.tap.reset();
        if self.attached {
            self.host.dismiss();
            self.attached = false;
        }
        self.state = SessionState::Stopped;
        debug!("overlay session stopped");
    }

    /// Drain session, router and index events in that order.
    ///
    /// Index refreshes that finished since the last drain are coalesced
    /// into one event carrying the latest outcome, even when another
    /// refresh is already running.
    pub fn take_events(&mut self) -> Vec<Event> {
        let mut events = std::mem::take(&mut self.events);
        events.extend(self.router.take_events());
        if self.index_state.has_changed().unwrap_or(false) {
            let state = self.index_state.borrow_and_update().clone();
            if state.completed != self.seen_refreshes {
                self.seen_refreshes = state.completed;
                events.push(match state.error {
                    Some(error) => Event::CatalogRefreshFailed {
                        error,
                        at: Utc::now(),
                    },
                    None => Event::CatalogRefreshed {
                        count: state.catalog.len(),
                        at: Utc::now(),
                    },
                });
            }
        }
        events
    }
}

impl<S: SensorSource> Drop for OverlaySession<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
