//! Touch gesture path.
//!
//! The host pushes [`PointerEvent`]s from the overlay; the
//! [`SwipeGestureDetector`] and [`DoubleTapDetector`] each see the full
//! stream and independently emit their gesture.

mod pointer;
mod swipe;
mod tap;
mod velocity;

pub use pointer::{PointerEvent, Position};
pub use swipe::{
    is_swipe_up, SwipeGestureDetector, SwipeSession, DRAG_SLOP_PX, MIN_SWIPE_VELOCITY,
    SWIPE_WINDOW_MS,
};
pub use tap::{
    DoubleTapDetector, DOUBLE_TAP_SLOP_PX, DOUBLE_TAP_TIMEOUT_MS, LONG_PRESS_TIMEOUT_MS,
    TOUCH_SLOP_PX,
};
pub use velocity::{Velocity, VelocityTracker, ASSUME_STOPPED_MS, HORIZON_MS};

#[cfg(test)]
pub(crate) use swipe::tests::swipe_up;
