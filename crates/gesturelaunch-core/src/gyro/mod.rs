//! Gyroscope gesture path.
//!
//! Raw rotation-rate samples pass through a [`SensorSampleGate`] (post-fire
//! cooldown) into a [`GyroGestureClassifier`] (sustained-motion state
//! machine). [`GyroDetector`] wires both to a platform [`SensorSource`].

mod classifier;
mod detector;
mod gate;
mod sensitivity;

pub use classifier::{
    classify, intensity, GyroGestureClassifier, MotionSession, RotationSample, SUSTAIN_MS,
};
pub use detector::{GyroDetector, SensorSource};
pub use gate::{SensorSampleGate, COOLDOWN_MS};
pub use sensitivity::{GyroSensitivity, DEFAULT_SENSITIVITY, MAX_SENSITIVITY, MIN_SENSITIVITY};

#[cfg(test)]
pub(crate) use detector::tests::FakeSensor;
