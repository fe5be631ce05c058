//! Post-fire quiet period for rotation samples.

/// How long samples are dropped after a gyro gesture fires.
pub const COOLDOWN_MS: u64 = 1000;

/// Drops samples that arrive within the cooldown window after the last
/// fired gesture.
///
/// Admitting a sample does not move the reference time; only
/// [`SensorSampleGate::record_fire`] does. The gate is a quiet period after
/// a gesture, not a sampling-rate limiter.
#[derive(Debug, Clone)]
pub struct SensorSampleGate {
    cooldown_ms: u64,
    last_fire_ms: Option<u64>,
}

impl SensorSampleGate {
    pub fn new() -> Self {
        Self::with_cooldown(COOLDOWN_MS)
    }

    pub fn with_cooldown(cooldown_ms: u64) -> Self {
        Self {
            cooldown_ms,
            last_fire_ms: None,
        }
    }

    /// Whether a sample taken at `now_ms` may reach the classifier.
    pub fn admit(&self, now_ms: u64) -> bool {
        match self.last_fire_ms {
            // Out-of-order timestamps count as inside the window.
            Some(last) => now_ms.saturating_sub(last) >= self.cooldown_ms,
            None => true,
        }
    }

    pub fn record_fire(&mut self, now_ms: u64) {
        self.last_fire_ms = Some(now_ms);
    }

    pub fn last_fire_ms(&self) -> Option<u64> {
        self.last_fire_ms
    }

    pub fn reset(&mut self) {
        self.last_fire_ms = None;
    }
}

impl Default for SensorSampleGate {
    fn default() -> Self {
        Self::new()
    }
}
