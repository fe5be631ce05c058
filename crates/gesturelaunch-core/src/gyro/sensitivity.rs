//! Per-axis rotation-rate thresholds.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default threshold for every axis, in rad/s.
pub const DEFAULT_SENSITIVITY: f32 = 2.0;
/// Lowest threshold the settings surface offers.
pub const MIN_SENSITIVITY: f32 = 0.5;
/// Highest threshold the settings surface offers.
pub const MAX_SENSITIVITY: f32 = 5.0;

/// Rotation-rate thresholds (rad/s), one per axis.
///
/// A sample only classifies as a gesture on an axis when its absolute rate
/// is strictly greater than that axis' threshold. Thresholds are always
/// finite and positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GyroSensitivity {
    #[serde(default = "default_sensitivity")]
    x: f32,
    #[serde(default = "default_sensitivity")]
    y: f32,
    #[serde(default = "default_sensitivity")]
    z: f32,
}

fn default_sensitivity() -> f32 {
    DEFAULT_SENSITIVITY
}

fn check(axis: char, value: f32) -> Result<f32, ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::InvalidSensitivity { axis, value })
    }
}

impl GyroSensitivity {
    pub fn new(x: f32, y: f32, z: f32) -> Result<Self, ValidationError> {
        Ok(Self {
            x: check('x', x)?,
            y: check('y', y)?,
            z: check('z', z)?,
        })
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn z(&self) -> f32 {
        self.z
    }

    pub fn set_x(&mut self, value: f32) -> Result<(), ValidationError> {
        self.x = check('x', value)?;
        Ok(())
    }

    pub fn set_y(&mut self, value: f32) -> Result<(), ValidationError> {
        self.y = check('y', value)?;
        Ok(())
    }

    pub fn set_z(&mut self, value: f32) -> Result<(), ValidationError> {
        self.z = check('z', value)?;
        Ok(())
    }

    /// Restrict every axis to the range offered by the settings slider.
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(MIN_SENSITIVITY, MAX_SENSITIVITY),
            y: self.y.clamp(MIN_SENSITIVITY, MAX_SENSITIVITY),
            z: self.z.clamp(MIN_SENSITIVITY, MAX_SENSITIVITY),
        }
    }

    /// Re-check values that came from an untrusted source (a hand-edited
    /// config file), falling back to the default for any bad axis.
    pub fn sanitized(self) -> Self {
        let fix = |v: f32| if v.is_finite() && v > 0.0 { v } else { DEFAULT_SENSITIVITY };
        Self {
            x: fix(self.x),
            y: fix(self.y),
            z: fix(self.z),
        }
    }
}

impl Default for GyroSensitivity {
    fn default() -> Self {
        Self {
            x: DEFAULT_SENSITIVITY,
            y: DEFAULT_SENSITIVITY,
            z: DEFAULT_SENSITIVITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_thresholds() {
        assert!(GyroSensitivity::new(0.0, 1.0, 1.0).is_err());
        assert!(GyroSensitivity::new(1.0, -2.0, 1.0).is_err());
        assert!(GyroSensitivity::new(1.0, 1.0, f32::NAN).is_err());

        let mut s = GyroSensitivity::default();
        assert_eq!(
            s.set_z(0.0),
            Err(ValidationError::InvalidSensitivity { axis: 'z', value: 0.0 })
        );
        assert_eq!(s.z(), DEFAULT_SENSITIVITY);
    }

    #[test]
    fn clamped_limits_to_slider_range() {
        let s = GyroSensitivity::new(0.1, 3.0, 9.0).unwrap().clamped();
        assert_eq!((s.x(), s.y(), s.z()), (0.5, 3.0, 5.0));
    }

    #[test]
    fn missing_fields_fall_back_to_default() {
        let s: GyroSensitivity = toml::from_str("x = 1.5").unwrap();
        assert_eq!((s.x(), s.y(), s.z()), (1.5, 2.0, 2.0));
    }

    #[test]
    fn sanitized_repairs_bad_axes() {
        let s: GyroSensitivity = toml::from_str("x = -1.0\ny = 0.0\nz = 3.0").unwrap();
        let s = s.sanitized();
        assert_eq!((s.x(), s.y(), s.z()), (2.0, 2.0, 3.0));
    }
}
