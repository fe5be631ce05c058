//! End-to-end: config on disk, cached index, detectors and router inside an
//! overlay session.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use gesturelaunch_core::shortcuts::StaticSource;
use gesturelaunch_core::{
    Config, CoreError, Event, GestureType, IndexConfig, LaunchCollaborator, LaunchError,
    LaunchOutcome, LaunchRequest, ManualClock, MemoryCacheStore, OverlayError, OverlayHost,
    OverlaySession, PointerEvent, RotationSample, RouteOutcome, SensorSource, SessionState,
    ShortcutIndex, ShortcutScanner, ShortcutTarget,
};

const NOW: u64 = 1_700_000_000_000;

#[derive(Clone, Default)]
struct Host {
    dismissed: Arc<AtomicUsize>,
}

impl OverlayHost for Host {
    fn attach(&mut self) -> Result<(), OverlayError> {
        Ok(())
    }

    fn dismiss(&mut self) {
        self.dismissed.fetch_add(1, Ordering::SeqCst);
    }
}

struct Gyro {
    present: bool,
}

impl SensorSource for Gyro {
    fn is_available(&self) -> bool {
        self.present
    }

    fn subscribe(&mut self) -> gesturelaunch_core::Result<()> {
        Ok(())
    }

    fn unsubscribe(&mut self) {}
}

#[derive(Default)]
struct Launcher {
    requests: Mutex<Vec<LaunchRequest>>,
    revoked: bool,
}

impl LaunchCollaborator for Launcher {
    fn launch(&self, request: &LaunchRequest) -> Result<(), LaunchError> {
        self.requests.lock().unwrap().push(request.clone());
        match request {
            LaunchRequest::Target(t) if self.revoked => Err(LaunchError::ShortcutRevoked(t.id.clone())),
            _ => Ok(()),
        }
    }
}

fn index() -> Arc<ShortcutIndex> {
    let scanner = ShortcutScanner::new().with_source(StaticSource::new(
        "apps",
        vec![
            ShortcutTarget::direct_launch("com.example.camera", "Camera"),
            ShortcutTarget::app_shortcut("com.example.notes", "new", "New note", None),
        ],
    ));
    let index = ShortcutIndex::new(
        Arc::new(scanner),
        Arc::new(MemoryCacheStore::new()),
        Arc::new(ManualClock::new(NOW)),
        IndexConfig::immediate(),
    );
    index.take_startup_refresh().unwrap().join().unwrap();
    index
}

fn config_from_disk(toml: &str) -> Config {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, toml).unwrap();
    Config::load_from(&path).unwrap()
}

fn swipe_up(t0: u64) -> Vec<PointerEvent> {
    let mut events = vec![PointerEvent::down(1, 300.0, 1200.0, t0)];
    for i in 1..=6u64 {
        events.push(PointerEvent::moved(1, 300.0, 1200.0 - 60.0 * i as f32, t0 + i * 8));
    }
    events.push(PointerEvent::up(1, 300.0, 840.0, t0 + 50));
    events
}

#[test]
fn test_tilt_launches_configured_camera() {
    let config = config_from_disk(
        "[gestures]\nGYRO_Y_POSITIVE = \"app_com.example.camera\"\n\n[gyro]\ny = 1.5\n",
    );
    let host = Host::default();
    let dismissed = host.dismissed.clone();
    let launcher = Arc::new(Launcher::default());
    let mut session = OverlaySession::new(
        Box::new(host),
        Gyro { present: true },
        Arc::new(config),
        index(),
        launcher.clone(),
    );
    session.start().unwrap();
    assert_eq!(session.status_line(), "with gyroscope");

    // 1.6 rad/s only clears the lowered y threshold.
    let mut outcome = None;
    for t in (0..=300).step_by(20) {
        if let Some(o) = session.on_rotation(&RotationSample::new(0.1, 1.6, 0.2, t)) {
            outcome = Some(o);
            break;
        }
    }
    assert!(outcome.unwrap().is_dismissed());
    assert_eq!(session.state(), SessionState::Stopped);
    assert_eq!(dismissed.load(Ordering::SeqCst), 1);

    let requests = launcher.requests.lock().unwrap();
    assert!(matches!(&requests[0], LaunchRequest::Target(t) if t.id == "app_com.example.camera"));
}

#[test]
fn test_revoked_shortcut_falls_back_and_dismisses() {
    let mut config = Config::default();
    config
        .set_mapping(GestureType::DoubleSwipeUp, "shortcut_com.example.notes_new")
        .unwrap();
    let launcher = Arc::new(Launcher {
        revoked: true,
        ..Launcher::default()
    });
    let mut session = OverlaySession::new(
        Box::new(Host::default()),
        Gyro { present: false },
        Arc::new(config),
        index(),
        launcher.clone(),
    );
    session.start().unwrap();
    assert_eq!(session.status_line(), "touch only");

    let mut events = swipe_up(0);
    events.extend(swipe_up(300));
    let outcome = events.iter().find_map(|e| session.on_pointer(e)).unwrap();
    assert_eq!(
        outcome,
        RouteOutcome::Dismissed {
            launch: Some(LaunchOutcome::Launched {
                target_id: "shortcut_com.example.notes_new".into(),
                fallback: true
            })
        }
    );
    assert_eq!(
        launcher.requests.lock().unwrap()[1],
        LaunchRequest::Package("com.example.notes".into())
    );

    let log = session.take_events();
    assert!(log.iter().any(|e| matches!(e, Event::GyroUnavailable { .. })));
    assert!(log.iter().any(|e| matches!(e, Event::Launched { fallback: true, .. })));
    assert!(matches!(log.last(), Some(Event::OverlayDismissed { .. })));
}

#[test]
fn test_stale_mapping_keeps_overlay_open_for_retry() {
    let mut config = Config::default();
    config
        .set_mapping(GestureType::GyroXNegative, "app_com.example.uninstalled")
        .unwrap();
    config
        .set_mapping(GestureType::GyroZPositive, "app_com.example.camera")
        .unwrap();
    let mut session = OverlaySession::new(
        Box::new(Host::default()),
        Gyro { present: true },
        Arc::new(config),
        index(),
        Arc::new(Launcher::default()),
    );
    session.start().unwrap();

    session.on_rotation(&RotationSample::new(-2.5, 0.0, 0.0, 0));
    let miss = session.on_rotation(&RotationSample::new(-2.5, 0.0, 0.0, 200)).unwrap();
    assert!(!miss.is_dismissed());
    assert_eq!(session.state(), SessionState::Running);

    // The gate holds off for a second after any fire, then the user retries.
    assert!(session.on_rotation(&RotationSample::new(0.0, 0.0, 2.5, 900)).is_none());
    session.on_rotation(&RotationSample::new(0.0, 0.0, 2.5, 1200));
    let hit = session.on_rotation(&RotationSample::new(0.0, 0.0, 2.5, 1400)).unwrap();
    assert!(hit.is_dismissed());
}

#[test]
fn test_start_after_stop_is_rejected() {
    let mut session = OverlaySession::new(
        Box::new(Host::default()),
        Gyro { present: false },
        Arc::new(Config::default()),
        index(),
        Arc::new(Launcher::default()),
    );
    session.start().unwrap();
    session.stop();
    assert!(matches!(
        session.start(),
        Err(CoreError::Overlay(OverlayError::Stopped))
    ));
}
