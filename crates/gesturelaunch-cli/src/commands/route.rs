use std::sync::Arc;

use clap::Args;
use gesturelaunch_core::{
    Config, GestureRouter, GestureType, KeepOpenReason, LaunchCollaborator, LaunchError,
    LaunchOutcome, LaunchRequest, RouteOutcome, ShortcutCatalog,
};
use tracing::debug;

use super::cache::load_catalog;

#[derive(Args)]
pub struct RouteArgs {
    /// Gesture to route (e.g. "double_swipe_up")
    gesture: GestureType,
    /// Pretend the first launch attempt fails, to see the fallback
    #[arg(long)]
    fail_primary: bool,
}

/// Prints launch requests instead of performing them.
struct DryRunLauncher {
    fail_primary: bool,
}

impl LaunchCollaborator for DryRunLauncher {
    fn launch(&self, request: &LaunchRequest) -> Result<(), LaunchError> {
        match request {
            LaunchRequest::Target(target) => {
                println!("launch {} ({:?}, {:?})", target.id, target.kind, target.launch_descriptor);
                if self.fail_primary {
                    return Err(LaunchError::Other("simulated failure".into()));
                }
            }
            LaunchRequest::Package(package) => println!("launch package {package}"),
        }
        Ok(())
    }
}

pub fn run(args: RouteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let catalog = load_catalog()?.unwrap_or_else(|| {
        debug!("no shortcut cache, routing against an empty catalog");
        ShortcutCatalog::empty()
    });
    let mut router = GestureRouter::new(
        Arc::new(config),
        Arc::new(catalog),
        Arc::new(DryRunLauncher {
            fail_primary: args.fail_primary,
        }),
    );

    let fired = if args.gesture.is_touch() {
        gesturelaunch_core::FiredGesture::touch(args.gesture, 0)
    } else {
        gesturelaunch_core::FiredGesture {
            gesture: args.gesture,
            intensity: 0.0,
            at_ms: 0,
        }
    };

    match router.route(fired) {
        RouteOutcome::Dismissed { launch: None } => println!("dismiss (no target mapped)"),
        RouteOutcome::Dismissed {
            launch: Some(LaunchOutcome::Launched { target_id, fallback }),
        } => {
            let via = if fallback { " via package fallback" } else { "" };
            println!("dismiss after launching {target_id}{via}");
        }
        RouteOutcome::Dismissed {
            launch: Some(LaunchOutcome::Failed { target_id, error }),
        } => println!("dismiss after failed launch of {target_id}: {error}"),
        RouteOutcome::KeptOpen(KeepOpenReason::NoMapping) => {
            println!("stay open (no target mapped)")
        }
        RouteOutcome::KeptOpen(KeepOpenReason::TargetNotFound { target_id }) => {
            println!("stay open ({target_id} not in shortcut cache)")
        }
        RouteOutcome::Finished => println!("ignored"),
    }
    Ok(())
}
