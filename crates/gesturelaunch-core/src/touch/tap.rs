//! Double-tap detection.

use tracing::debug;

use super::pointer::{PointerEvent, Position};
use crate::gesture::{FiredGesture, GestureType};

/// Maximum time between the first release and the second press.
pub const DOUBLE_TAP_TIMEOUT_MS: u64 = 300;
/// Presses longer than this are long presses, not taps.
pub const LONG_PRESS_TIMEOUT_MS: u64 = 400;
/// Travel beyond this turns a press into a drag.
pub const TOUCH_SLOP_PX: f32 = 8.0;
/// The second tap must land this close to the first.
pub const DOUBLE_TAP_SLOP_PX: f32 = 100.0;

#[derive(Debug, Clone, Copy)]
struct Press {
    pointer_id: u64,
    down: Position,
    down_ms: u64,
    moved: bool,
}

#[derive(Debug, Clone, Copy)]
struct Tap {
    position: Position,
    up_ms: u64,
}

#[derive(Debug, Clone, Default)]
pub struct DoubleTapDetector {
    press: Option<Press>,
    first_tap: Option<Tap>,
}

impl DoubleTapDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_pending_tap(&self) -> bool {
        self.first_tap.is_some()
    }

    pub fn on_pointer(&mut self, event: &PointerEvent) -> Option<FiredGesture> {
        match self.press {
            None if event.pressed => {
                self.press = Some(Press {
                    pointer_id: event.pointer_id,
                    down: event.position,
                    down_ms: event.timestamp_ms,
                    moved: false,
                });
                None
            }
            Some(ref mut press) if press.pointer_id == event.pointer_id && event.pressed => {
                if press.down.distance(&event.position) > TOUCH_SLOP_PX {
                    press.moved = true;
                }
                None
            }
            Some(press) if press.pointer_id == event.pointer_id => {
                self.press = None;
                self.on_release(press, event)
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.press = None;
        self.first_tap = None;
    }

    fn on_release(&mut self, press: Press, event: &PointerEvent) -> Option<FiredGesture> {
        let moved = press.moved || press.down.distance(&event.position) > TOUCH_SLOP_PX;
        let held = event.timestamp_ms.saturating_sub(press.down_ms);
        if moved || held > LONG_PRESS_TIMEOUT_MS {
            self.first_tap = None;
            return None;
        }

        let pairs_with_first = self.first_tap.is_some_and(|first| {
            press.down_ms >= first.up_ms
                && press.down_ms - first.up_ms <= DOUBLE_TAP_TIMEOUT_MS
                && first.position.distance(&press.down) <= DOUBLE_TAP_SLOP_PX
        });

        if pairs_with_first {
            self.first_tap = None;
            debug!("double tap detected");
            Some(FiredGesture::touch(GestureType::DoubleTap, event.timestamp_ms))
        } else {
            self.first_tap = Some(Tap {
                position: event.position,
                up_ms: event.timestamp_ms,
            });
            None
        }
    }
}
