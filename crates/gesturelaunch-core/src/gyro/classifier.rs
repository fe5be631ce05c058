//! Sustained-motion gesture classifier.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Sustaining(g, start) -> (fire) -> Idle
//!              |  different g: restart timer
//!              |  no motion after sustain window: Idle
//! ```
//!
//! A gesture fires only when the same classification holds for at least
//! [`SUSTAIN_MS`]. After a fire the [`SensorSampleGate`] drops samples for
//! its cooldown window, so one physical motion produces one gesture.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::gate::SensorSampleGate;
use super::sensitivity::GyroSensitivity;
use crate::gesture::{FiredGesture, GestureType};

/// Minimum time the same classification must persist before firing.
pub const SUSTAIN_MS: u64 = 200;

/// One rotation-rate reading (rad/s per axis).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub timestamp_ms: u64,
}

impl RotationSample {
    pub fn new(x: f32, y: f32, z: f32, timestamp_ms: u64) -> Self {
        Self { x, y, z, timestamp_ms }
    }
}

/// Classifier state between samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionSession {
    Idle,
    Sustaining { gesture: GestureType, start_ms: u64 },
}

/// Classify a single reading. Axis priority is X, then Y, then Z; values
/// exactly equal to a threshold do not count.
pub fn classify(x: f32, y: f32, z: f32, sensitivity: &GyroSensitivity) -> Option<GestureType> {
    if x.abs() > sensitivity.x() {
        return Some(if x > 0.0 {
            GestureType::GyroXPositive
        } else {
            GestureType::GyroXNegative
        });
    }
    if y.abs() > sensitivity.y() {
        return Some(if y > 0.0 {
            GestureType::GyroYPositive
        } else {
            GestureType::GyroYNegative
        });
    }
    if z.abs() > sensitivity.z() {
        return Some(if z > 0.0 {
            GestureType::GyroZPositive
        } else {
            GestureType::GyroZNegative
        });
    }
    None
}

/// Absolute rate on the axis that produced `gesture`.
pub fn intensity(sample: &RotationSample, gesture: GestureType) -> f32 {
    match gesture {
        GestureType::GyroXPositive | GestureType::GyroXNegative => sample.x.abs(),
        GestureType::GyroYPositive | GestureType::GyroYNegative => sample.y.abs(),
        GestureType::GyroZPositive | GestureType::GyroZNegative => sample.z.abs(),
        GestureType::DoubleTap | GestureType::DoubleSwipeUp => 0.0,
    }
}

/// Turns gated rotation samples into discrete gyro gestures.
#[derive(Debug, Clone)]
pub struct GyroGestureClassifier {
    sensitivity: GyroSensitivity,
    gate: SensorSampleGate,
    session: MotionSession,
}

impl GyroGestureClassifier {
    pub fn new(sensitivity: GyroSensitivity) -> Self {
        Self::with_gate(sensitivity, SensorSampleGate::new())
    }

    pub fn with_gate(sensitivity: GyroSensitivity, gate: SensorSampleGate) -> Self {
        Self {
            sensitivity,
            gate,
            session: MotionSession::Idle,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session(&self) -> MotionSession {
        self.session
    }

    pub fn sensitivity(&self) -> &GyroSensitivity {
        &self.sensitivity
    }

    pub fn gate(&self) -> &SensorSampleGate {
        &self.gate
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn set_sensitivity(&mut self, sensitivity: GyroSensitivity) {
        debug!(
            x = sensitivity.x(),
            y = sensitivity.y(),
            z = sensitivity.z(),
            "updated gyro sensitivity"
        );
        self.sensitivity = sensitivity;
    }

    /// Feed one sample. Returns the fired gesture, if any.
    pub fn process(&mut self, sample: &RotationSample) -> Option<FiredGesture> {
        let now = sample.timestamp_ms;
        if !self.gate.admit(now) {
            return None;
        }

        let detected = classify(sample.x, sample.y, sample.z, &self.sensitivity);

        match (detected, self.session) {
            (None, MotionSession::Sustaining { start_ms, .. }) => {
                if now.saturating_sub(start_ms) > SUSTAIN_MS {
                    self.session = MotionSession::Idle;
                }
                None
            }
            (None, MotionSession::Idle) => None,
            (Some(gesture), MotionSession::Sustaining { gesture: active, start_ms })
                if gesture == active =>
            {
                if now.saturating_sub(start_ms) >= SUSTAIN_MS {
                    let fired = FiredGesture {
                        gesture,
                        intensity: intensity(sample, gesture),
                        at_ms: now,
                    };
                    debug!(%gesture, intensity = fired.intensity, "gyro gesture detected");
                    self.session = MotionSession::Idle;
                    self.gate.record_fire(now);
                    Some(fired)
                } else {
                    None
                }
            }
            (Some(gesture), _) => {
                self.session = MotionSession::Sustaining {
                    gesture,
                    start_ms: now,
                };
                None
            }
        }
    }

    /// Discard in-flight motion state and the cooldown reference.
    pub fn reset(&mut self) {
        self.session = MotionSession::Idle;
        self.gate.reset();
    }
}
