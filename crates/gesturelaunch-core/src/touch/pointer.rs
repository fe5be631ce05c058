use serde::{Deserialize, Serialize};

/// Screen position in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// One pointer change delivered by the host.
///
/// A touch session is a pressed event (down), zero or more pressed events
/// for the same pointer (moves), then a non-pressed event (release).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub pointer_id: u64,
    pub position: Position,
    pub timestamp_ms: u64,
    pub pressed: bool,
}

impl PointerEvent {
    pub fn down(pointer_id: u64, x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self {
            pointer_id,
            position: Position::new(x, y),
            timestamp_ms,
            pressed: true,
        }
    }

    /// Same shape as [`PointerEvent::down`]; moves are pressed events for
    /// an already tracked pointer.
    pub fn moved(pointer_id: u64, x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self::down(pointer_id, x, y, timestamp_ms)
    }

    pub fn up(pointer_id: u64, x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self {
            pointer_id,
            position: Position::new(x, y),
            timestamp_ms,
            pressed: false,
        }
    }
}
