use clap::Subcommand;
use gesturelaunch_core::gyro::{MAX_SENSITIVITY, MIN_SENSITIVITY};
use gesturelaunch_core::Config;

#[derive(Subcommand)]
pub enum SensitivityAction {
    /// Show the current thresholds
    Show,
    /// Change one or more axis thresholds (rad/s)
    Set {
        #[arg(long)]
        x: Option<f32>,
        #[arg(long)]
        y: Option<f32>,
        #[arg(long)]
        z: Option<f32>,
    },
}

pub fn run(action: SensitivityAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SensitivityAction::Show => {
            let config = Config::load()?;
            let s = config.gyro;
            println!("x = {:.2}\ny = {:.2}\nz = {:.2}", s.x(), s.y(), s.z());
        }
        SensitivityAction::Set { x, y, z } => {
            if x.is_none() && y.is_none() && z.is_none() {
                return Err("nothing to set: pass --x, --y or --z".into());
            }
            let mut config = Config::load()?;
            let s = config.set_sensitivity(x, y, z)?;
            config.save()?;
            println!(
                "x = {:.2}, y = {:.2}, z = {:.2} (range {MIN_SENSITIVITY}..={MAX_SENSITIVITY})",
                s.x(),
                s.y(),
                s.z()
            );
        }
    }
    Ok(())
}
