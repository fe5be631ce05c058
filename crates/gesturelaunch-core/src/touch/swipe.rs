//! Double-swipe-up detection.
//!
//! Each pointer-down starts a tracking cycle for that pointer. On release
//! the cycle's velocity decides whether it was an upward swipe; the
//! cross-cycle [`SwipeSession`] pairs two swipes inside
//! [`SWIPE_WINDOW_MS`] into a `DOUBLE_SWIPE_UP`.

use tracing::debug;

use super::pointer::{PointerEvent, Position};
use super::velocity::{Velocity, VelocityTracker};
use crate::gesture::{FiredGesture, GestureType};

/// Maximum gap between the two swipes of a pair.
pub const SWIPE_WINDOW_MS: u64 = 1000;
/// Minimum upward speed for a swipe, in px/s.
pub const MIN_SWIPE_VELOCITY: f32 = 100.0;
/// Vertical travel that turns a press into a drag.
pub const DRAG_SLOP_PX: f32 = 1.0;

/// Cross-cycle swipe bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwipeSession {
    pub pending_count: u8,
    pub last_swipe_ms: u64,
}

#[derive(Debug, Clone)]
struct Tracking {
    pointer_id: u64,
    down: Position,
    tracker: VelocityTracker,
    drag_consumed: bool,
}

/// Whether a release velocity counts as an upward swipe: fast enough and
/// mostly vertical.
pub fn is_swipe_up(velocity: Velocity) -> bool {
    velocity.y < -MIN_SWIPE_VELOCITY && velocity.y.abs() > velocity.x.abs()
}

#[derive(Debug, Clone, Default)]
pub struct SwipeGestureDetector {
    tracking: Option<Tracking>,
    session: SwipeSession,
}

impl SwipeGestureDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> SwipeSession {
        self.session
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking.is_some()
    }

    /// Feed one pointer change. Returns `DOUBLE_SWIPE_UP` when the release
    /// completes a pair.
    pub fn on_pointer(&mut self, event: &PointerEvent) -> Option<FiredGesture> {
        let tracked = self.tracking.as_ref().map(|t| t.pointer_id);
        match (tracked, event.pressed) {
            (None, true) => {
                let mut tracker = VelocityTracker::new();
                tracker.add_position(event.timestamp_ms, event.position);
                self.tracking = Some(Tracking {
                    pointer_id: event.pointer_id,
                    down: event.position,
                    tracker,
                    drag_consumed: false,
                });
                None
            }
            (Some(id), true) if id == event.pointer_id => {
                if let Some(t) = self.tracking.as_mut() {
                    t.tracker.add_position(event.timestamp_ms, event.position);
                    if (event.position.y - t.down.y).abs() > DRAG_SLOP_PX {
                        t.drag_consumed = true;
                    }
                }
                None
            }
            (Some(id), false) if id == event.pointer_id => self.finish_cycle(event.timestamp_ms),
            // A second pointer while tracking, or a stray release.
            _ => None,
        }
    }

    /// The tracked pointer was lost without a release (e.g. the host
    /// cancelled the touch stream). Evaluated like a release at `now_ms`.
    pub fn cancel(&mut self, now_ms: u64) -> Option<FiredGesture> {
        if self.tracking.is_some() {
            self.finish_cycle(now_ms)
        } else {
            None
        }
    }

    /// Drop the tracking cycle and the pending swipe.
    pub fn reset(&mut self) {
        self.tracking = None;
        self.session = SwipeSession::default();
    }

    fn finish_cycle(&mut self, now_ms: u64) -> Option<FiredGesture> {
        let tracking = self.tracking.take()?;
        let qualifies = tracking.drag_consumed && {
            let velocity = tracking.tracker.calculate_velocity();
            debug!(vx = velocity.x, vy = velocity.y, "swipe released");
            is_swipe_up(velocity)
        };

        let lapsed = now_ms.saturating_sub(self.session.last_swipe_ms) >= SWIPE_WINDOW_MS;

        if !qualifies {
            if self.session.pending_count == 1 && lapsed {
                self.session = SwipeSession::default();
            }
            return None;
        }

        if self.session.pending_count == 0 || !lapsed {
            self.session.pending_count += 1;
            self.session.last_swipe_ms = now_ms;
            if self.session.pending_count >= 2 {
                self.session = SwipeSession::default();
                debug!("double swipe up detected");
                return Some(FiredGesture::touch(GestureType::DoubleSwipeUp, now_ms));
            }
        } else {
            // Window lapsed: this swipe starts a new pair.
            self.session.pending_count = 1;
            self.session.last_swipe_ms = now_ms;
        }
        None
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Events for one upward swipe of `distance` px over 50 ms starting at `t0`.
    pub(crate) fn swipe_up(pointer: u64, t0: u64, distance: f32) -> Vec<PointerEvent> {
        let mut events = vec![PointerEvent::down(pointer, 200.0, 800.0, t0)];
        for i in 1..=5u64 {
            let y = 800.0 - distance * i as f32 / 5.0;
            events.push(PointerEvent::moved(pointer, 200.0, y, t0 + i * 10));
        }
        events.push(PointerEvent::up(pointer, 200.0, 800.0 - distance, t0 + 55));
        events
    }

    fn run(d: &mut SwipeGestureDetector, events: &[PointerEvent]) -> Vec<FiredGesture> {
        events.iter().filter_map(|e| d.on_pointer(e)).collect()
    }

    #[test]
    fn two_swipes_inside_window_fire() {
        let mut d = SwipeGestureDetector::new();
        assert!(run(&mut d, &swipe_up(1, 0, 300.0)).is_empty());
        assert_eq!(d.session().pending_count, 1);

        let fired = run(&mut d, &swipe_up(1, 500, 300.0));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].gesture, GestureType::DoubleSwipeUp);
        assert_eq!(d.session(), SwipeSession::default());
    }

    #[test]
    fn third_swipe_starts_fresh_pair() {
        let mut d = SwipeGestureDetector::new();
        run(&mut d, &swipe_up(1, 0, 300.0));
        assert_eq!(run(&mut d, &swipe_up(1, 500, 300.0)).len(), 1);

        assert!(run(&mut d, &swipe_up(1, 2500, 300.0)).is_empty());
        assert_eq!(d.session().pending_count, 1);
    }

    #[test]
    fn lapsed_window_restarts_count_at_one() {
        let mut d = SwipeGestureDetector::new();
        run(&mut d, &swipe_up(1, 0, 300.0));
        assert!(run(&mut d, &swipe_up(1, 1500, 300.0)).is_empty());
        assert_eq!(d.session().pending_count, 1);
        assert_eq!(d.session().last_swipe_ms, 1555);

        assert_eq!(run(&mut d, &swipe_up(1, 2000, 300.0)).len(), 1);
    }

    #[test]
    fn downward_and_horizontal_swipes_do_not_qualify() {
        let mut d = SwipeGestureDetector::new();
        assert!(run(&mut d, &swipe_up(1, 0, -300.0)).is_empty());
        assert_eq!(d.session().pending_count, 0);

        let mut sideways = vec![PointerEvent::down(1, 0.0, 500.0, 1000)];
        for i in 1..=5u64 {
            sideways.push(PointerEvent::moved(1, 80.0 * i as f32, 500.0 - 2.0 * i as f32, 1000 + i * 10));
        }
        sideways.push(PointerEvent::up(1, 400.0, 490.0, 1055));
        assert!(run(&mut d, &sideways).is_empty());
        assert_eq!(d.session().pending_count, 0);
    }

    #[test]
    fn non_qualifying_release_after_window_clears_pending() {
        let mut d = SwipeGestureDetector::new();
        run(&mut d, &swipe_up(1, 0, 300.0));
        let tap = [PointerEvent::down(1, 10.0, 10.0, 1200), PointerEvent::up(1, 10.0, 10.0, 1260)];
        run(&mut d, &tap);
        assert_eq!(d.session().pending_count, 0);
    }

    #[test]
    fn non_qualifying_release_inside_window_keeps_pending() {
        let mut d = SwipeGestureDetector::new();
        run(&mut d, &swipe_up(1, 0, 300.0));
        let tap = [PointerEvent::down(1, 10.0, 10.0, 200), PointerEvent::up(1, 10.0, 10.0, 260)];
        run(&mut d, &tap);
        assert_eq!(d.session().pending_count, 1);
        assert_eq!(run(&mut d, &swipe_up(1, 400, 300.0)).len(), 1);
    }

    #[test]
    fn second_pointer_is_ignored() {
        let mut d = SwipeGestureDetector::new();
        let mut events = swipe_up(1, 0, 300.0);
        events.insert(2, PointerEvent::down(2, 0.0, 0.0, 15));
        events.insert(3, PointerEvent::up(2, 0.0, 0.0, 16));
        run(&mut d, &events);
        assert_eq!(d.session().pending_count, 1);
    }

    #[test]
    fn cancel_evaluates_tracked_cycle() {
        let mut d = SwipeGestureDetector::new();
        run(&mut d, &swipe_up(1, 0, 300.0));
        let mut second = swipe_up(1, 300, 300.0);
        second.pop();
        run(&mut d, &second);
        let fired = d.cancel(360);
        assert_eq!(fired.map(|f| f.gesture), Some(GestureType::DoubleSwipeUp));
        assert!(!d.is_tracking());
    }
}
