//! Offline replay of recorded input.
//!
//! Gyro files hold `t_ms,x,y,z` rows, touch files `t_ms,pointer,x,y,pressed`
//! rows. Blank lines, `#` comments and a non-numeric header row are skipped.
//! Every fired gesture is printed as one JSON line.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use gesturelaunch_core::{
    Config, ConfigStore, DoubleTapDetector, FiredGesture, GyroGestureClassifier, GyroSensitivity,
    PointerEvent, RotationSample, SwipeGestureDetector,
};

#[derive(Subcommand)]
pub enum ReplayAction {
    /// Replay rotation-rate samples through the gyro classifier
    Gyro {
        /// CSV file with t_ms,x,y,z rows
        file: PathBuf,
        /// Override the configured thresholds (same value on every axis)
        #[arg(long)]
        threshold: Option<f32>,
    },
    /// Replay pointer events through the swipe and tap detectors
    Touch {
        /// CSV file with t_ms,pointer,x,y,pressed rows
        file: PathBuf,
    },
}

pub fn run(action: ReplayAction) -> Result<(), Box<dyn std::error::Error>> {
    let fired = match action {
        ReplayAction::Gyro { file, threshold } => {
            let sensitivity = match threshold {
                Some(t) => GyroSensitivity::new(t, t, t)?,
                None => Config::load()?.sensitivity(),
            };
            replay_gyro(&read_rows(&file)?, sensitivity)?
        }
        ReplayAction::Touch { file } => replay_touch(&read_rows(&file)?)?,
    };
    for gesture in &fired {
        println!("{}", serde_json::to_string(gesture)?);
    }
    if fired.is_empty() {
        eprintln!("no gestures detected");
    }
    Ok(())
}

/// Data rows with their 1-based line numbers.
fn read_rows(path: &Path) -> Result<Vec<(usize, Vec<String>)>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    Ok(parse_rows(&content))
}

fn parse_rows(content: &str) -> Vec<(usize, Vec<String>)> {
    content
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            let fields: Vec<String> = line.split(',').map(|f| f.trim().to_string()).collect();
            // Header row.
            if fields.first().is_some_and(|f| f.parse::<u64>().is_err()) && i == 0 {
                return None;
            }
            Some((i + 1, fields))
        })
        .collect()
}

fn field<T: std::str::FromStr>(
    line: usize,
    fields: &[String],
    idx: usize,
    name: &str,
) -> Result<T, String> {
    let raw = fields
        .get(idx)
        .ok_or_else(|| format!("line {line}: missing {name}"))?;
    raw.parse()
        .map_err(|_| format!("line {line}: invalid {name} '{raw}'"))
}

fn parse_pressed(line: usize, raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "down" => Ok(true),
        "0" | "false" | "up" => Ok(false),
        other => Err(format!("line {line}: invalid pressed '{other}'")),
    }
}

fn replay_gyro(
    rows: &[(usize, Vec<String>)],
    sensitivity: GyroSensitivity,
) -> Result<Vec<FiredGesture>, String> {
    let mut classifier = GyroGestureClassifier::new(sensitivity);
    let mut fired = Vec::new();
    for (line, fields) in rows {
        let sample = RotationSample::new(
            field(*line, fields, 1, "x")?,
            field(*line, fields, 2, "y")?,
            field(*line, fields, 3, "z")?,
            field(*line, fields, 0, "t_ms")?,
        );
        fired.extend(classifier.process(&sample));
    }
    Ok(fired)
}

fn replay_touch(rows: &[(usize, Vec<String>)]) -> Result<Vec<FiredGesture>, String> {
    let mut swipe = SwipeGestureDetector::new();
    let mut tap = DoubleTapDetector::new();
    let mut fired = Vec::new();
    for (line, fields) in rows {
        let pressed_raw: String = field(*line, fields, 4, "pressed")?;
        let event = PointerEvent {
            timestamp_ms: field(*line, fields, 0, "t_ms")?,
            pointer_id: field(*line, fields, 1, "pointer")?,
            position: gesturelaunch_core::touch::Position::new(
                field(*line, fields, 2, "x")?,
                field(*line, fields, 3, "y")?,
            ),
            pressed: parse_pressed(*line, &pressed_raw)?,
        };
        fired.extend(swipe.on_pointer(&event));
        fired.extend(tap.on_pointer(&event));
    }
    Ok(fired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gesturelaunch_core::GestureType;

    #[test]
    fn skips_header_comments_and_blanks() {
        let rows = parse_rows("t_ms,x,y,z\n# recorded on device\n\n0,1.0,0,0\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, 4);
    }

    #[test]
    fn gyro_replay_fires_after_sustain() {
        let rows = parse_rows("0,3.0,0,0\n100,3.0,0,0\n200,3.0,0,0\n300,3.0,0,0\n");
        let fired = replay_gyro(&rows, GyroSensitivity::default()).unwrap();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].gesture, GestureType::GyroXPositive);
        assert_eq!(fired[0].at_ms, 200);
    }

    #[test]
    fn gyro_replay_reports_bad_rows() {
        let rows = parse_rows("0,3.0,abc,0\n");
        let err = replay_gyro(&rows, GyroSensitivity::default()).unwrap_err();
        assert!(err.contains("line 1"));
        assert!(err.contains("invalid y"));
    }

    #[test]
    fn touch_replay_detects_double_tap() {
        let rows = parse_rows(
            "t_ms,pointer,x,y,pressed\n0,1,100,100,1\n60,1,100,100,0\n150,1,101,100,1\n200,1,101,100,0\n",
        );
        let fired = replay_touch(&rows).unwrap();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].gesture, GestureType::DoubleTap);
    }

    #[test]
    fn pressed_accepts_words() {
        assert_eq!(parse_pressed(1, "DOWN"), Ok(true));
        assert_eq!(parse_pressed(1, "false"), Ok(false));
        assert!(parse_pressed(1, "maybe").is_err());
    }
}
