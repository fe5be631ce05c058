//! The fixed set of gestures that can be bound to a launch target.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Every gesture the overlay can recognize.
///
/// Touch gestures come from the pointer stream, gyro gestures from the
/// rotation-rate sensor. The set is closed; mappings are keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GestureType {
    DoubleTap,
    DoubleSwipeUp,
    GyroXPositive,
    GyroXNegative,
    GyroYPositive,
    GyroYNegative,
    GyroZPositive,
    GyroZNegative,
}

/// Which event source a gesture comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureOrigin {
    Touch,
    Gyro,
}

impl GestureType {
    pub const ALL: [GestureType; 8] = [
        GestureType::DoubleTap,
        GestureType::DoubleSwipeUp,
        GestureType::GyroXPositive,
        GestureType::GyroXNegative,
        GestureType::GyroYPositive,
        GestureType::GyroYNegative,
        GestureType::GyroZPositive,
        GestureType::GyroZNegative,
    ];

    pub fn origin(self) -> GestureOrigin {
        match self {
            GestureType::DoubleTap | GestureType::DoubleSwipeUp => GestureOrigin::Touch,
            _ => GestureOrigin::Gyro,
        }
    }

    pub fn is_touch(self) -> bool {
        self.origin() == GestureOrigin::Touch
    }

    /// Stable key used in config files and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            GestureType::DoubleTap => "DOUBLE_TAP",
            GestureType::DoubleSwipeUp => "DOUBLE_SWIPE_UP",
            GestureType::GyroXPositive => "GYRO_X_POSITIVE",
            GestureType::GyroXNegative => "GYRO_X_NEGATIVE",
            GestureType::GyroYPositive => "GYRO_Y_POSITIVE",
            GestureType::GyroYNegative => "GYRO_Y_NEGATIVE",
            GestureType::GyroZPositive => "GYRO_Z_POSITIVE",
            GestureType::GyroZNegative => "GYRO_Z_NEGATIVE",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            GestureType::DoubleTap => "Double tap",
            GestureType::DoubleSwipeUp => "Double swipe up",
            GestureType::GyroXPositive => "Tilt forward",
            GestureType::GyroXNegative => "Tilt backward",
            GestureType::GyroYPositive => "Tilt right",
            GestureType::GyroYNegative => "Tilt left",
            GestureType::GyroZPositive => "Spin counter-clockwise",
            GestureType::GyroZNegative => "Spin clockwise",
        }
    }
}

impl fmt::Display for GestureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for GestureType {
    type Err = ValidationError;

    /// Case-insensitive; `-` is accepted in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        GestureType::ALL
            .into_iter()
            .find(|g| g.key() == normalized)
            .ok_or_else(|| ValidationError::UnknownGesture(s.to_string()))
    }
}

/// A recognized gesture, produced at most once per detector input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiredGesture {
    pub gesture: GestureType,
    /// Absolute rotation rate of the dominant axis for gyro gestures,
    /// 1.0 for touch gestures.
    pub intensity: f32,
    pub at_ms: u64,
}

impl FiredGesture {
    pub fn touch(gesture: GestureType, at_ms: u64) -> Self {
        Self {
            gesture,
            intensity: 1.0,
            at_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_splits_touch_and_gyro() {
        assert_eq!(GestureType::DoubleTap.origin(), GestureOrigin::Touch);
        assert_eq!(GestureType::DoubleSwipeUp.origin(), GestureOrigin::Touch);
        for g in &GestureType::ALL[2..] {
            assert_eq!(g.origin(), GestureOrigin::Gyro, "{g}");
        }
    }

    #[test]
    fn parse_accepts_loose_spelling() {
        assert_eq!("double-tap".parse::<GestureType>().unwrap(), GestureType::DoubleTap);
        assert_eq!(
            " gyro_z_negative ".parse::<GestureType>().unwrap(),
            GestureType::GyroZNegative
        );
        assert!("triple_tap".parse::<GestureType>().is_err());
    }

    #[test]
    fn serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&GestureType::GyroYPositive).unwrap();
        assert_eq!(json, "\"GYRO_Y_POSITIVE\"");
        let back: GestureType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, GestureType::GyroYPositive);
    }
}
