use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "morning-cli", version, about = "Good morning / good night check-in tracker")]
struct Cli {
    /// Data directory (defaults to ~/.config/morning)
    #[arg(long, global = true, env = "MORNING_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report waking up (早安)
    Wake(commands::checkin::CheckinArgs),
    /// Report going to sleep (晚安)
    Sleep(commands::checkin::CheckinArgs),
    /// Rule configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// User and group statistics
    Routine {
        #[command(subcommand)]
        action: commands::routine::RoutineAction,
    },
    /// Day and week rollover
    Reset {
        #[command(subcommand)]
        action: commands::reset::ResetAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = commands::open_service(cli.data_dir).and_then(|mut service| match cli.command {
        Commands::Wake(args) => commands::checkin::wake(&mut service, args),
        Commands::Sleep(args) => commands::checkin::sleep(&mut service, args),
        Commands::Config { action } => commands::config::run(&mut service, action),
        Commands::Routine { action } => commands::routine::run(&mut service, action),
        Commands::Reset { action } => commands::reset::run(&mut service, action),
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
