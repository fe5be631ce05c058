//! Gyroscope path lifecycle: capability probe, subscription, teardown.

use tracing::{debug, warn};

use super::classifier::{GyroGestureClassifier, RotationSample};
use super::sensitivity::GyroSensitivity;
use crate::error::Result;
use crate::gesture::FiredGesture;

/// Platform rotation-rate sensor.
///
/// The host delivers samples by calling [`GyroDetector::on_sample`] on a
/// single serialized thread while subscribed; the sampling rate is up to
/// the platform.
pub trait SensorSource: Send {
    /// Whether the device has a gyroscope at all. Probed once.
    fn is_available(&self) -> bool;

    fn subscribe(&mut self) -> Result<()>;

    fn unsubscribe(&mut self);
}

/// Owns the gyro classifier and the sensor subscription for one session.
pub struct GyroDetector<S: SensorSource> {
    source: S,
    classifier: GyroGestureClassifier,
    available: bool,
    listening: bool,
}

impl<S: SensorSource> GyroDetector<S> {
    pub fn new(source: S, sensitivity: GyroSensitivity) -> Self {
        let available = source.is_available();
        if !available {
            warn!("gyroscope sensor not available on this device");
        }
        Self {
            source,
            classifier: GyroGestureClassifier::new(sensitivity),
            available,
            listening: false,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn classifier(&self) -> &GyroGestureClassifier {
        &self.classifier
    }

    /// Subscribe to the sensor. Returns `false` when the device has no
    /// gyroscope or the subscription failed; the touch path is unaffected
    /// either way.
    pub fn start(&mut self) -> bool {
        if !self.available {
            return false;
        }
        if self.listening {
            debug!("already listening to gyroscope");
            return true;
        }
        match self.source.subscribe() {
            Ok(()) => {
                self.listening = true;
                debug!("started listening to gyroscope");
                true
            }
            Err(err) => {
                warn!(error = %err, "failed to register gyroscope listener");
                false
            }
        }
    }

    /// Unsubscribe and drop any in-flight motion session.
    pub fn stop(&mut self) {
        if self.listening {
            self.source.unsubscribe();
            self.listening = false;
            debug!("stopped listening to gyroscope");
        }
        self.classifier.reset();
    }

    pub fn set_sensitivity(&mut self, sensitivity: GyroSensitivity) {
        self.classifier.set_sensitivity(sensitivity);
    }

    /// Feed a sample delivered by the host. Ignored unless listening.
    pub fn on_sample(&mut self, sample: &RotationSample) -> Option<FiredGesture> {
        if !self.listening {
            return None;
        }
        self.classifier.process(sample)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::{CoreError, OverlayError};
    use crate::gesture::GestureType;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    pub(crate) struct FakeSensor {
        pub available: bool,
        pub fail_subscribe: bool,
        pub subscribed: Arc<AtomicUsize>,
        pub unsubscribed: Arc<AtomicUsize>,
    }

    impl FakeSensor {
        pub fn present() -> Self {
            Self {
                available: true,
                ..Self::default()
            }
        }
    }

    impl SensorSource for FakeSensor {
        fn is_available(&self) -> bool {
            self.available
        }

        fn subscribe(&mut self) -> Result<()> {
            if self.fail_subscribe {
                return Err(CoreError::Overlay(OverlayError::AttachFailed(
                    "sensor busy".into(),
                )));
            }
            self.subscribed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn unsubscribe(&mut self) {
            self.unsubscribed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn missing_gyroscope_disables_path() {
        let mut d = GyroDetector::new(FakeSensor::default(), GyroSensitivity::default());
        assert!(!d.is_available());
        assert!(!d.start());
        assert!(d.on_sample(&RotationSample::new(5.0, 0.0, 0.0, 0)).is_none());
    }

    #[test]
    fn start_is_idempotent() {
        let sensor = FakeSensor::present();
        let subscribed = sensor.subscribed.clone();
        let mut d = GyroDetector::new(sensor, GyroSensitivity::default());
        assert!(d.start());
        assert!(d.start());
        assert_eq!(subscribed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subscription_failure_reports_false() {
        let sensor = FakeSensor {
            available: true,
            fail_subscribe: true,
            ..FakeSensor::default()
        };
        let mut d = GyroDetector::new(sensor, GyroSensitivity::default());
        assert!(!d.start());
        assert!(!d.is_listening());
    }

    #[test]
    fn stop_discards_motion_session() {
        let sensor = FakeSensor::present();
        let unsubscribed = sensor.unsubscribed.clone();
        let mut d = GyroDetector::new(sensor, GyroSensitivity::default());
        d.start();
        d.on_sample(&RotationSample::new(0.0, 3.0, 0.0, 0));
        d.stop();
        assert_eq!(unsubscribed.load(Ordering::SeqCst), 1);

        // A restarted session needs a full new sustain window.
        d.start();
        assert!(d.on_sample(&RotationSample::new(0.0, 3.0, 0.0, 250)).is_none());
        let fired = d.on_sample(&RotationSample::new(0.0, 3.0, 0.0, 450));
        assert_eq!(fired.map(|f| f.gesture), Some(GestureType::GyroYPositive));
    }
}
