//! Pointer velocity estimation.
//!
//! Fits a second-degree polynomial to the most recent samples by least
//! squares and takes its derivative at the newest sample. Only samples
//! inside [`HORIZON_MS`] are considered, and the window is cut at the first
//! gap longer than [`ASSUME_STOPPED_MS`], so a pause before release yields
//! a low velocity.

use super::pointer::Position;

const HISTORY_SIZE: usize = 20;
/// Samples older than this (relative to the newest) are ignored.
pub const HORIZON_MS: u64 = 100;
/// A gap this long between samples means the pointer had stopped.
pub const ASSUME_STOPPED_MS: u64 = 40;
const DEGREE: usize = 2;

/// Estimated velocity in pixels per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    timestamp_ms: u64,
    position: Position,
}

/// Ring buffer of recent positions for one pointer.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    samples: [Option<Sample>; HISTORY_SIZE],
    index: usize,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            index: 0,
        }
    }

    pub fn add_position(&mut self, timestamp_ms: u64, position: Position) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(Sample {
            timestamp_ms,
            position,
        });
    }

    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.index = 0;
    }

    pub fn calculate_velocity(&self) -> Velocity {
        let Some(newest) = self.samples[self.index] else {
            return Velocity::default();
        };

        let mut ages = Vec::with_capacity(HISTORY_SIZE);
        let mut xs = Vec::with_capacity(HISTORY_SIZE);
        let mut ys = Vec::with_capacity(HISTORY_SIZE);

        let mut previous = newest;
        let mut idx = self.index;
        for _ in 0..HISTORY_SIZE {
            let Some(sample) = self.samples[idx] else {
                break;
            };
            let age = newest.timestamp_ms.saturating_sub(sample.timestamp_ms);
            let gap = previous.timestamp_ms.saturating_sub(sample.timestamp_ms);
            if age > HORIZON_MS || gap > ASSUME_STOPPED_MS {
                break;
            }
            previous = sample;
            ages.push(-(age as f64));
            xs.push(f64::from(sample.position.x));
            ys.push(f64::from(sample.position.y));
            idx = (idx + HISTORY_SIZE - 1) % HISTORY_SIZE;
        }

        if ages.len() < 2 {
            return Velocity::default();
        }

        let degree = DEGREE.min(ages.len() - 1);
        let slope = |values: &[f64]| {
            poly_fit_least_squares(&ages, values, degree)
                .and_then(|c| c.get(1).copied())
                .unwrap_or(0.0)
        };

        // Coefficients are in px/ms.
        Velocity {
            x: (slope(&xs) * 1000.0) as f32,
            y: (slope(&ys) * 1000.0) as f32,
        }
    }
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Least-squares polynomial fit via Gram-Schmidt QR decomposition.
/// Returns `degree + 1` coefficients, lowest order first, or `None` when
/// the system is degenerate (e.g. all samples share a timestamp).
fn poly_fit_least_squares(x: &[f64], y: &[f64], degree: usize) -> Option<Vec<f64>> {
    let m = x.len();
    let n = degree + 1;
    if m < n || y.len() != m {
        return None;
    }

    let mut a = vec![vec![0.0f64; m]; n];
    for h in 0..m {
        a[0][h] = 1.0;
        for i in 1..n {
            a[i][h] = a[i - 1][h] * x[h];
        }
    }

    let mut q = vec![vec![0.0f64; m]; n];
    let mut r = vec![vec![0.0f64; n]; n];
    for j in 0..n {
        q[j].copy_from_slice(&a[j]);
        for i in 0..j {
            let proj = dot(&q[j], &q[i]);
            for h in 0..m {
                q[j][h] -= proj * q[i][h];
            }
        }
        let norm = dot(&q[j], &q[j]).sqrt();
        if norm < 0.000_001 {
            return None;
        }
        for h in 0..m {
            q[j][h] /= norm;
        }
        for i in 0..n {
            r[j][i] = if i < j { 0.0 } else { dot(&q[j], &a[i]) };
        }
    }

    let mut coefficients = vec![0.0f64; n];
    for i in (0..n).rev() {
        coefficients[i] = dot(&q[i], y);
        for j in (i + 1..n).rev() {
            coefficients[i] -= r[i][j] * coefficients[j];
        }
        coefficients[i] /= r[i][i];
    }
    Some(coefficients)
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(points: &[(u64, f32, f32)]) -> Velocity {
        let mut t = VelocityTracker::new();
        for &(ms, x, y) in points {
            t.add_position(ms, Position::new(x, y));
        }
        t.calculate_velocity()
    }

    #[test]
    fn empty_and_single_sample_are_zero() {
        assert_eq!(VelocityTracker::new().calculate_velocity(), Velocity::default());
        assert_eq!(track(&[(0, 10.0, 10.0)]), Velocity::default());
    }

    #[test]
    fn constant_speed_upward_motion() {
        // 2 px/ms upward = -2000 px/s.
        let points: Vec<_> = (0..8).map(|i| (i * 10, 100.0, 500.0 - 20.0 * i as f32)).collect();
        let v = track(&points);
        assert!((v.y + 2000.0).abs() < 1.0, "vy = {}", v.y);
        assert!(v.x.abs() < 1.0, "vx = {}", v.x);
    }

    #[test]
    fn two_samples_use_linear_fit() {
        let v = track(&[(0, 0.0, 100.0), (10, 5.0, 80.0)]);
        assert!((v.x - 500.0).abs() < 1.0);
        assert!((v.y + 2000.0).abs() < 1.0);
    }

    #[test]
    fn pause_before_release_drops_old_samples() {
        let mut points: Vec<_> = (0..5).map(|i| (i * 10, 0.0, 400.0 - 30.0 * i as f32)).collect();
        points.push((200, 0.0, 280.0));
        assert_eq!(track(&points), Velocity::default());
    }

    #[test]
    fn duplicate_timestamps_are_degenerate() {
        assert_eq!(track(&[(5, 0.0, 0.0), (5, 0.0, 50.0)]), Velocity::default());
    }
}
