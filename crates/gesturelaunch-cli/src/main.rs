use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "gesturelaunch-cli", version, about = "GestureLaunch CLI")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Gesture to shortcut mappings
    Map {
        #[command(subcommand)]
        action: commands::map::MapAction,
    },
    /// Gyroscope sensitivity
    Sensitivity {
        #[command(subcommand)]
        action: commands::sensitivity::SensitivityAction,
    },
    /// Persisted shortcut cache
    Cache {
        #[command(subcommand)]
        action: commands::cache::CacheAction,
    },
    /// Run recorded sensor or touch input through the detectors
    Replay {
        #[command(subcommand)]
        action: commands::replay::ReplayAction,
    },
    /// Show what a gesture would do, without launching anything
    Route(commands::route::RouteArgs),
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Config { action } => commands::config::run(action),
        Commands::Map { action } => commands::map::run(action),
        Commands::Sensitivity { action } => commands::sensitivity::run(action),
        Commands::Cache { action } => commands::cache::run(action),
        Commands::Replay { action } => commands::replay::run(action),
        Commands::Route(args) => commands::route::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
